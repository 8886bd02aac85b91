use crate::emotion::{CLEARER_IMAGE_HINT, emotion_icon, needs_clearer_image};
use dioxus::prelude::*;

#[component]
pub fn EmotionDisplay(emotion: String) -> Element {
    let icon = emotion_icon(&emotion);
    let show_hint = needs_clearer_image(&emotion);
    // no clipboard access from the browser build
    let can_copy = cfg!(any(feature = "desktop", feature = "mobile"));

    let copy_payload = emotion.clone();
    let on_copy = move |_| {
        let raw = copy_payload.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut cb) = arboard::Clipboard::new() {
                    let _ = cb.set_text(raw);
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            let _ = raw;
        });
    };

    rsx! {
        div { class: "emotion-card",
            div { class: "emotion-header",
                h3 { class: "section-title", "Detected Emotion:" }
                if can_copy {
                    button { class: "action-btn", title: "Copy result", onclick: on_copy, "Copy" }
                }
            }
            div { class: "emotion-row",
                span { class: "emotion-icon", "{icon}" }
                p { class: "emotion-label", "{emotion}" }
            }
            if show_hint {
                p { class: "hint text-muted", "{CLEARER_IMAGE_HINT}" }
            }
        }
    }
}
