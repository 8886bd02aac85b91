//! Inference module for the emotion detector
//!
//! This module wraps the single outbound call to the remote multimodal
//! endpoint and folds its outcome into a plain label or a user-facing message.
//!
//! # Architecture
//!
//! - `client` - `InferenceClient`: prompt, reply normalization, failure classification
//! - `gemini` - `GeminiClient`: REST transport for `generateContent`
//!
//! # Usage
//!
//! ```rust,no_run
//! use emotion_detector::config::AppConfig;
//! use emotion_detector::inference::{InferenceClient, InferenceResult};
//! use emotion_detector::upload::EncodedImage;
//!
//! # async fn example() {
//! let client = InferenceClient::from_config(&AppConfig::from_env());
//! let image = EncodedImage::from_bytes(b"...", "image/png");
//! match client.analyze_emotion(&image).await {
//!     InferenceResult::Success(label) => println!("{label}"),
//!     InferenceResult::Failure(message) => eprintln!("{message}"),
//! }
//! # }
//! ```
mod client;
mod gemini;

pub use client::{
    EMPTY_RESPONSE_MESSAGE, GenerativeBackend, InferenceClient, InferenceError, InferenceResult,
    Part, classify_failure, normalize_reply,
};
pub use gemini::GeminiClient;
