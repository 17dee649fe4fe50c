pub mod content_type;
pub mod error;
pub mod range;
pub mod service;

pub use error::MediaServiceError;
pub use service::{public_location, MediaService, MediaServiceApi, ServedBlob, ServedRange};
