use dioxus::prelude::*;

#[component]
pub fn ErrorAlert(message: String, on_close: EventHandler<MouseEvent>) -> Element {
    rsx! {
        div { class: "alert", role: "alert",
            div { class: "alert-body",
                span { class: "alert-icon", "⚠" }
                strong { "Error:" }
                span { class: "alert-message", " {message}" }
            }
            button {
                class: "alert-close",
                r#type: "button",
                aria_label: "Close error message",
                onclick: move |evt| on_close.call(evt),
                "✕"
            }
        }
    }
}

#[component]
pub fn LoadingSpinner() -> Element {
    rsx! {
        div { class: "spinner-wrap",
            div { class: "spinner", aria_hidden: "true" }
            span { class: "shimmer-text", "Analyzing…" }
        }
    }
}
