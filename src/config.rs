//! Static configuration for the detector.
//!
//! Everything here is resolved once at startup. Keys come from the process
//! environment (which `main` seeds from `.env` on native targets), then from
//! the bundled `assets/config.env` for builds that have no environment. The
//! remaining values are compile-time constants.

use once_cell::sync::Lazy;
use std::env;

pub const GEMINI_API_MODEL: &str = "gemini-2.5-flash-preview-04-17";
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

pub const EMOTION_ANALYSIS_PROMPT: &str = r#"Analyze the facial expression in this image and identify the primary emotion being displayed by the person.
Respond with only the name of the emotion (e.g., Happy, Sad, Angry, Surprised, Disgusted, Fearful, Neutral).
If no clear face or emotion is discernible, respond with "Could not determine emotion" or "No clear face detected"."#;

/// Bundled config for builds without a process environment (web, iOS/Android)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const MAX_FILE_SIZE_MB: u64 = 5;
pub const MAX_FILE_SIZE_BYTES: u64 = MAX_FILE_SIZE_MB * 1024 * 1024;
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Process-wide configuration, read on first access.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub max_upload_bytes: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GEMINI_API_MODEL.to_string(),
            api_base: GEMINI_API_BASE.to_string(),
            max_upload_bytes: MAX_FILE_SIZE_BYTES,
        }
    }
}

impl AppConfig {
    /// Read configuration from environment variables, falling back to the bundled config
    pub fn from_env() -> Self {
        let bundled = parse_env_lines(BUNDLED_CONFIG);
        Self::from_lookup(|key| {
            env::var(key).ok().or_else(|| {
                bundled
                    .iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| value.to_string())
            })
        })
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            model: non_empty("GEMINI_MODEL").unwrap_or(defaults.model),
            api_base: non_empty("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            max_upload_bytes: defaults.max_upload_bytes,
        }
    }

    /// Size ceiling rendered for user-facing messages, in whole megabytes.
    pub fn max_upload_mb(&self) -> u64 {
        self.max_upload_bytes / (1024 * 1024)
    }
}

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped.
pub fn parse_env_lines(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
