//! Upload validation and encoding.
//!
//! A selected file is checked against the size ceiling and the mime-type
//! allow-list before any bytes are read. Accepted files are read once and
//! base64-encoded for the inference request.

use crate::config::{ACCEPTED_IMAGE_TYPES, AppConfig};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as Base64;
use std::io;
use std::path::Path;
use thiserror::Error;

pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("File is too large. Max size is {max_mb}MB.")]
    TooLarge { max_mb: u64 },

    #[error("Invalid file type. Accepted types: {}.", ACCEPTED_IMAGE_TYPES.join(", "))]
    UnsupportedType { mime_type: String },

    #[error("Failed to read file.")]
    ReadFailed,
}

/// A file handed over by the host environment (picker or drop target).
///
/// Name, declared type and size are known synchronously on selection; the
/// content is read on demand.
#[async_trait(?Send)]
pub trait FileSource {
    fn name(&self) -> &str;
    fn declared_mime_type(&self) -> &str;
    fn size_bytes(&self) -> u64;
    async fn read_bytes(&self) -> io::Result<Vec<u8>>;
}

/// Metadata of the accepted file, kept for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
}

/// Image content ready to embed in a JSON request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub base64_payload: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            base64_payload: Base64.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base64_payload.is_empty()
    }

    /// `data:` URL usable directly as an `img` source.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_payload)
    }
}

/// Result of a successful selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedUpload {
    pub file: SelectedFile,
    pub image: EncodedImage,
}

/// Synchronous checks performed before any I/O.
pub fn validate(config: &AppConfig, file: &dyn FileSource) -> Result<(), UploadError> {
    if file.size_bytes() > config.max_upload_bytes {
        return Err(UploadError::TooLarge {
            max_mb: config.max_upload_mb(),
        });
    }
    let mime_type = file.declared_mime_type();
    if !is_accepted_type(mime_type) {
        return Err(UploadError::UnsupportedType {
            mime_type: mime_type.to_string(),
        });
    }
    Ok(())
}

/// Validate, read and encode a selected file.
pub async fn encode_upload(
    config: &AppConfig,
    file: &dyn FileSource,
) -> Result<AcceptedUpload, UploadError> {
    validate(config, file)?;

    let bytes = file.read_bytes().await.map_err(|err| {
        tracing::warn!(file = file.name(), error = %err, "failed to read upload");
        UploadError::ReadFailed
    })?;

    // The declared size came from the host; trust what was actually read.
    if bytes.len() as u64 > config.max_upload_bytes {
        return Err(UploadError::TooLarge {
            max_mb: config.max_upload_mb(),
        });
    }

    let mime_type = file.declared_mime_type().to_string();
    tracing::debug!(file = file.name(), bytes = bytes.len(), %mime_type, "encoded upload");

    Ok(AcceptedUpload {
        file: SelectedFile {
            name: file.name().to_string(),
            size_bytes: bytes.len() as u64,
            mime_type: mime_type.clone(),
        },
        image: EncodedImage::from_bytes(&bytes, mime_type),
    })
}

pub fn is_accepted_type(mime_type: &str) -> bool {
    ACCEPTED_IMAGE_TYPES.contains(&mime_type)
}

/// Mime type for hosts that only report a file name.
pub fn mime_from_file_name(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("jpg" | "jpeg" | "jfif") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => FALLBACK_MIME_TYPE,
    }
}

/// Bytes already held in memory, behind the `FileSource` interface.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

#[async_trait(?Send)]
impl FileSource for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    async fn read_bytes(&self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}
