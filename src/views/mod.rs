pub mod feedback;
pub mod result;
pub mod uploader;

pub use feedback::{ErrorAlert, LoadingSpinner};
pub use result::EmotionDisplay;
pub use uploader::ImageUploader;
