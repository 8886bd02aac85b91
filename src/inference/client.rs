use crate::config::{AppConfig, EMOTION_ANALYSIS_PROMPT};
use crate::upload::EncodedImage;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::gemini::GeminiClient;

pub const EMPTY_RESPONSE_MESSAGE: &str =
    "AI could not determine an emotion. The response was empty.";

// ============================================
// Error Types
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("Gemini API client is not initialized. Check API Key configuration.")]
    NotInitialized,

    #[error("Invalid or missing Gemini API Key. Please check your configuration.")]
    InvalidCredential,

    #[error("API request limit reached. Please try again later.")]
    QuotaExceeded,

    #[error("The request to the AI timed out. Please try again.")]
    Timeout,

    #[error("API Error: {0}")]
    Api(String),
}

/// Outcome of one analysis attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferenceResult {
    Success(String),
    Failure(String),
}

impl From<Result<String, InferenceError>> for InferenceResult {
    fn from(result: Result<String, InferenceError>) -> Self {
        match result {
            Ok(label) => InferenceResult::Success(label),
            Err(err) => InferenceResult::Failure(err.to_string()),
        }
    }
}

// ============================================
// Transport seam
// ============================================

/// One part of a multimodal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    InlineData { mime_type: String, data: String },
    Text(String),
}

/// A remote model that turns a list of parts into text.
///
/// Futures are not `Send`: the browser build drives them on the UI thread.
#[async_trait(?Send)]
pub trait GenerativeBackend {
    async fn generate(&self, model: &str, parts: Vec<Part>) -> anyhow::Result<String>;
}

// ============================================
// Client
// ============================================

/// Emotion inference over a generative backend.
///
/// Built once at startup. Without a credential the backend is absent and
/// every call fails fast.
#[derive(Clone)]
pub struct InferenceClient {
    backend: Option<Arc<dyn GenerativeBackend>>,
    model: String,
}

impl InferenceClient {
    pub fn from_config(config: &AppConfig) -> Self {
        let backend = match &config.api_key {
            Some(key) => {
                let gemini: Arc<dyn GenerativeBackend> =
                    Arc::new(GeminiClient::new(&config.api_base, key));
                Some(gemini)
            }
            None => {
                tracing::error!(
                    "Gemini API Key is not found. Please ensure the GEMINI_API_KEY environment variable is set."
                );
                None
            }
        };
        Self {
            backend,
            model: config.model.clone(),
        }
    }

    pub fn with_backend(backend: Arc<dyn GenerativeBackend>, model: impl Into<String>) -> Self {
        Self {
            backend: Some(backend),
            model: model.into(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    /// Ask the model for the primary emotion shown in `image`. Exactly one call, no retry.
    pub async fn detect_emotion(&self, image: &EncodedImage) -> Result<String, InferenceError> {
        let backend = self.backend.as_ref().ok_or(InferenceError::NotInitialized)?;

        let parts = vec![
            Part::InlineData {
                mime_type: image.mime_type.clone(),
                data: image.base64_payload.clone(),
            },
            Part::Text(EMOTION_ANALYSIS_PROMPT.to_string()),
        ];

        tracing::debug!(model = %self.model, mime_type = %image.mime_type, "requesting emotion analysis");
        match backend.generate(&self.model, parts).await {
            Ok(text) => Ok(normalize_reply(&text)),
            Err(err) => {
                let message = format!("{err:#}");
                tracing::error!(error = %message, "error analyzing image emotion");
                Err(classify_failure(&message))
            }
        }
    }

    pub async fn analyze_emotion(&self, image: &EncodedImage) -> InferenceResult {
        self.detect_emotion(image).await.into()
    }
}

/// Trim the reply; an empty reply becomes a fixed explanation.
pub fn normalize_reply(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        EMPTY_RESPONSE_MESSAGE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Map transport error text onto the user-facing categories.
pub fn classify_failure(message: &str) -> InferenceError {
    let lower = message.to_lowercase();
    let mentions = |needles: &[&str]| needles.iter().any(|needle| lower.contains(needle));

    if mentions(&["api key not valid", "permission denied"]) {
        InferenceError::InvalidCredential
    } else if mentions(&["quota", "rate limit", "resource exhausted"]) {
        InferenceError::QuotaExceeded
    } else if mentions(&["deadline exceeded", "timeout", "timed out"]) {
        InferenceError::Timeout
    } else {
        InferenceError::Api(message.to_string())
    }
}

#[cfg(test)]
impl InferenceClient {
    fn uninitialized() -> Self {
        Self {
            backend: None,
            model: String::new(),
        }
    }
}
