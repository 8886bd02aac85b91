use crate::config::CONFIG;
use crate::inference::InferenceClient;
use crate::session::Session;
use crate::upload::{self, FileSource};
use crate::views::{EmotionDisplay, ErrorAlert, ImageUploader, LoadingSpinner};
use dioxus::prelude::*;
use std::rc::Rc;
use time::OffsetDateTime;

const DETECTOR_CSS: Asset = asset!("/assets/detector.css");

#[component]
pub fn App() -> Element {
    use_context_provider(|| InferenceClient::from_config(&CONFIG));
    let session = use_signal(Session::new);

    rsx! {
        document::Link { rel: "stylesheet", href: DETECTOR_CSS }
        div { class: "container",
            AppHeader {}
            main { class: "panel",
                DetectorPanel { session }
            }
            AppFooter {}
        }
    }
}

#[component]
fn AppHeader() -> Element {
    rsx! {
        header { class: "header",
            h1 { class: "title", "Emotion Detector AI" }
            p { class: "subtitle", "Upload an image to see the magic!" }
        }
    }
}

#[component]
fn AppFooter() -> Element {
    let year = OffsetDateTime::now_utc().year();
    rsx! {
        footer { class: "footer",
            p { "© {year} Emotion Detector AI. Powered by Gemini." }
        }
    }
}

#[component]
fn DetectorPanel(session: Signal<Session>) -> Element {
    let client = use_context::<InferenceClient>();
    let mut session = session;

    let state = session.read().snapshot();
    let can_analyze = session.read().can_analyze();
    let show_actions = state.selected_file.is_some()
        || state.detected_emotion.is_some()
        || state.error_message.is_some();
    let visible_error = state.error_message.clone().filter(|_| !state.is_loading);
    let visible_emotion = state
        .detected_emotion
        .clone()
        .filter(|_| !state.is_loading && state.error_message.is_none());

    let on_file = move |file: Rc<dyn FileSource>| {
        if session.peek().is_loading() {
            return;
        }
        spawn(async move {
            let outcome = upload::encode_upload(&CONFIG, file.as_ref()).await;
            session.write().apply_selection(outcome);
        });
    };

    let on_analyze = move |_: MouseEvent| {
        let Some(request) = session.write().begin_analysis() else {
            return;
        };
        let client = client.clone();
        spawn(async move {
            let result = client.analyze_emotion(&request.image).await;
            session.write().finish_analysis(request.id, result);
        });
    };

    rsx! {
        ImageUploader {
            on_file,
            preview_url: state.preview_url.clone(),
            disabled: state.is_loading,
        }

        if show_actions {
            div { class: "actions",
                if can_analyze {
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: state.is_loading,
                        onclick: on_analyze,
                        "Analyze Emotion"
                    }
                }
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    disabled: state.is_loading,
                    onclick: move |_| session.write().clear(),
                    "Clear"
                }
            }
        }

        if state.is_loading {
            LoadingSpinner {}
        }

        if let Some(message) = visible_error {
            ErrorAlert {
                message,
                on_close: move |_| session.write().dismiss_error(),
            }
        }

        if let Some(emotion) = visible_emotion {
            EmotionDisplay { emotion }
        }
    }
}
