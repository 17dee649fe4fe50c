pub mod artwork;
pub mod error;
pub mod model;
pub mod service;

pub use error::ContentServiceError;
pub use model::{Content, NewContent};
pub use service::{ContentService, ContentServiceApi};
