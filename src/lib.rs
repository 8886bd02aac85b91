//! Emotion Detector: upload a face, get the emotion a multimodal model sees in it.
//!
//! The core (`upload`, `inference`, `session`, `emotion`) is renderer-agnostic.
//! The Dioxus front end lives in `ui` and `views`.

pub mod config;
pub mod emotion;
pub mod inference;
pub mod session;
pub mod upload;

#[cfg(feature = "dioxus")]
pub mod ui;
#[cfg(feature = "dioxus")]
pub mod views;
