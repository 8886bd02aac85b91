//! Interaction state for one detector session.
//!
//! `Session` owns everything the user sees and is only changed through its
//! transition methods. Async work happens outside: `begin_analysis` hands out
//! the request and flips the loading flag, the caller awaits the inference,
//! then `finish_analysis` folds the outcome back in. This keeps a UI from
//! holding a write borrow across an await and guarantees at most one request
//! in flight.

use crate::config::AppConfig;
use crate::inference::{InferenceClient, InferenceResult};
use crate::upload::{self, AcceptedUpload, EncodedImage, FileSource, SelectedFile, UploadError};

pub const NO_IMAGE_DATA_MESSAGE: &str = "No image data to analyze.";

/// Snapshot of what the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub selected_file: Option<SelectedFile>,
    pub preview_url: Option<String>,
    pub encoded_image: Option<EncodedImage>,
    pub detected_emotion: Option<String>,
    pub is_loading: bool,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Ready,
    Analyzing,
    Settled,
}

/// Ticket for one in-flight inference call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub id: u64,
    pub image: EncodedImage,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    state: InteractionState,
    next_request: u64,
    in_flight: Option<u64>,
    // request dropped by `clear` whose call has not come back yet
    abandoned: Option<u64>,
    settled: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn snapshot(&self) -> InteractionState {
        self.state.clone()
    }

    pub fn phase(&self) -> Phase {
        let state = &self.state;
        if state.is_loading {
            Phase::Analyzing
        } else if self.settled {
            Phase::Settled
        } else if state.encoded_image.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    /// Whether the analyze action should be offered.
    pub fn can_analyze(&self) -> bool {
        self.state.selected_file.is_some() && !self.state.is_loading && self.abandoned.is_none()
    }

    /// Apply the outcome of reading a newly selected file.
    ///
    /// Success starts over from a clean baseline with the new image; failure
    /// drops any previous file and shows the error. Ignored while a request is
    /// in flight.
    pub fn apply_selection(&mut self, outcome: Result<AcceptedUpload, UploadError>) {
        if self.state.is_loading {
            tracing::debug!("file selection ignored while analyzing");
            return;
        }
        self.settled = false;
        self.state = match outcome {
            Ok(upload) => InteractionState {
                preview_url: Some(upload.image.data_url()),
                selected_file: Some(upload.file),
                encoded_image: Some(upload.image),
                ..InteractionState::default()
            },
            Err(err) => {
                tracing::info!(error = %err, "file rejected");
                InteractionState {
                    error_message: Some(err.to_string()),
                    ..InteractionState::default()
                }
            }
        };
    }

    /// Validate, read and apply a file in one step.
    pub async fn select_file(&mut self, config: &AppConfig, file: &dyn FileSource) {
        if self.state.is_loading {
            return;
        }
        let outcome = upload::encode_upload(config, file).await;
        self.apply_selection(outcome);
    }

    /// Enter the analyzing state and return the request to send.
    ///
    /// Returns `None` when a request is already in flight (including one
    /// abandoned by `clear` that has not returned), or when there is no image
    /// (in which case an error is shown instead).
    pub fn begin_analysis(&mut self) -> Option<AnalysisRequest> {
        if self.state.is_loading || self.abandoned.is_some() {
            tracing::debug!("analysis already in flight");
            return None;
        }
        let Some(image) = self.state.encoded_image.clone().filter(|img| !img.is_empty()) else {
            self.state.error_message = Some(NO_IMAGE_DATA_MESSAGE.to_string());
            return None;
        };
        self.next_request += 1;
        self.in_flight = Some(self.next_request);
        self.settled = false;
        self.state.is_loading = true;
        self.state.error_message = None;
        self.state.detected_emotion = None;
        Some(AnalysisRequest {
            id: self.next_request,
            image,
        })
    }

    /// Settle request `id`. Results for a request that is no longer in flight
    /// (the session was cleared meanwhile) are dropped.
    pub fn finish_analysis(&mut self, id: u64, result: InferenceResult) {
        if self.abandoned == Some(id) {
            tracing::debug!(request = id, "dropping result of abandoned analysis");
            self.abandoned = None;
            return;
        }
        if self.in_flight != Some(id) {
            tracing::debug!(request = id, "dropping result of unknown analysis");
            return;
        }
        self.in_flight = None;
        self.settled = true;
        self.state.is_loading = false;
        match result {
            InferenceResult::Success(label) => {
                tracing::info!(emotion = %label, "emotion detected");
                self.state.detected_emotion = Some(label);
                self.state.error_message = None;
            }
            InferenceResult::Failure(message) => {
                tracing::warn!(error = %message, "emotion analysis failed");
                self.state.detected_emotion = None;
                self.state.error_message = Some(message);
            }
        }
    }

    /// Run a full analysis round trip against `client`.
    pub async fn analyze(&mut self, client: &InferenceClient) {
        if let Some(request) = self.begin_analysis() {
            let result = client.analyze_emotion(&request.image).await;
            self.finish_analysis(request.id, result);
        }
    }

    /// Back to the empty baseline.
    ///
    /// A request still in flight is abandoned: its result will be dropped, and
    /// no new analysis starts until it has come back.
    pub fn clear(&mut self) {
        if let Some(id) = self.in_flight.take() {
            self.abandoned = Some(id);
        }
        self.state = InteractionState::default();
        self.settled = false;
    }

    /// Hide the current error, leaving the file and preview untouched.
    pub fn dismiss_error(&mut self) {
        self.state.error_message = None;
        self.settled = self.state.detected_emotion.is_some();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(name: &str) -> AcceptedUpload {
        AcceptedUpload {
            file: SelectedFile {
                name: name.to_string(),
                size_bytes: 3,
                mime_type: "image/jpeg".into(),
            },
            image: EncodedImage::from_bytes(b"abc", "image/jpeg"),
        }
    }

    #[test]
    fn starts_idle() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(!session.can_analyze());
    }

    #[test]
    fn selection_moves_to_ready_and_sets_preview() {
        let mut session = Session::new();
        session.apply_selection(Ok(accepted("a.jpg")));
        assert_eq!(session.phase(), Phase::Ready);
        let state = session.state();
        assert_eq!(state.preview_url.as_deref(), Some("data:image/jpeg;base64,YWJj"));
        assert!(session.can_analyze());
    }

    #[test]
    fn failed_selection_clears_previous_file() {
        let mut session = Session::new();
        session.apply_selection(Ok(accepted("a.jpg")));
        session.apply_selection(Err(UploadError::ReadFailed));
        let state = session.state();
        assert!(state.selected_file.is_none());
        assert!(state.preview_url.is_none());
        assert!(state.encoded_image.is_none());
        assert_eq!(state.error_message.as_deref(), Some("Failed to read file."));
        assert_eq!(session.phase(), Phase::Idle);

        session.dismiss_error();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn begin_without_image_reports_error_and_stays_out_of_analyzing() {
        let mut session = Session::new();
        assert!(session.begin_analysis().is_none());
        assert!(!session.is_loading());
        assert_eq!(
            session.state().error_message.as_deref(),
            Some(NO_IMAGE_DATA_MESSAGE)
        );
    }

    #[test]
    fn second_begin_while_analyzing_is_ignored() {
        let mut session = Session::new();
        session.apply_selection(Ok(accepted("a.jpg")));
        assert!(session.begin_analysis().is_some());
        assert_eq!(session.phase(), Phase::Analyzing);
        assert!(session.begin_analysis().is_none());
        assert!(session.state().error_message.is_none());
        assert!(!session.can_analyze());
    }

    #[test]
    fn selection_ignored_while_analyzing() {
        let mut session = Session::new();
        session.apply_selection(Ok(accepted("a.jpg")));
        session.begin_analysis();
        session.apply_selection(Ok(accepted("b.jpg")));
        assert_eq!(
            session.state().selected_file.as_ref().map(|f| f.name.as_str()),
            Some("a.jpg")
        );
        assert_eq!(session.phase(), Phase::Analyzing);
    }

    #[test]
    fn failure_then_dismiss_returns_to_ready() {
        let mut session = Session::new();
        session.apply_selection(Ok(accepted("a.jpg")));
        let request = session.begin_analysis().unwrap();
        session.finish_analysis(request.id, InferenceResult::Failure("API Error: boom".into()));
        assert_eq!(session.phase(), Phase::Settled);
        assert!(!session.is_loading());
        assert!(session.state().detected_emotion.is_none());

        session.dismiss_error();
        assert_eq!(session.phase(), Phase::Ready);
        assert!(session.state().preview_url.is_some());
    }

    #[test]
    fn reanalysis_clears_previous_result() {
        let mut session = Session::new();
        session.apply_selection(Ok(accepted("a.jpg")));
        let request = session.begin_analysis().unwrap();
        session.finish_analysis(request.id, InferenceResult::Success("Happy".into()));
        assert!(session.begin_analysis().is_some());
        assert!(session.state().detected_emotion.is_none());
    }

    #[test]
    fn stray_result_is_dropped() {
        let mut session = Session::new();
        session.finish_analysis(1, InferenceResult::Success("Happy".into()));
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn rejected_selection_after_result_is_idle() {
        let mut session = Session::new();
        session.apply_selection(Ok(accepted("a.jpg")));
        let request = session.begin_analysis().unwrap();
        session.finish_analysis(request.id, InferenceResult::Success("Happy".into()));
        assert_eq!(session.phase(), Phase::Settled);

        session.apply_selection(Err(UploadError::TooLarge { max_mb: 5 }));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.state().error_message.is_some());
    }

    #[test]
    fn missing_image_error_stays_idle() {
        let mut session = Session::new();
        session.begin_analysis();
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn clear_waits_for_abandoned_request_before_next_analysis() {
        let mut session = Session::new();
        session.apply_selection(Ok(accepted("a.jpg")));
        let stale = session.begin_analysis().unwrap();
        session.clear();
        assert_eq!(session.phase(), Phase::Idle);

        session.apply_selection(Ok(accepted("b.jpg")));
        assert_eq!(session.phase(), Phase::Ready);
        assert!(!session.can_analyze());
        assert!(session.begin_analysis().is_none());
        assert!(session.state().error_message.is_none());

        session.finish_analysis(stale.id, InferenceResult::Success("Sad".into()));
        assert!(session.state().detected_emotion.is_none());
        assert_eq!(session.phase(), Phase::Ready);
        assert!(session.can_analyze());

        let current = session.begin_analysis().unwrap();
        assert_ne!(current.id, stale.id);
        session.finish_analysis(current.id, InferenceResult::Success("Happy".into()));
        assert_eq!(session.state().detected_emotion.as_deref(), Some("Happy"));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut session = Session::new();
        session.apply_selection(Ok(accepted("a.jpg")));
        session.clear();
        let once = session.clone();
        session.clear();
        assert_eq!(session, once);
        assert_eq!(session.snapshot(), InteractionState::default());
    }
}
