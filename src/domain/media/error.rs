use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum MediaServiceError {
    #[error("no object stored under key {0}")]
    NotFound(String),
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<MediaServiceError> for AppError {
    fn from(err: MediaServiceError) -> Self {
        match err {
            MediaServiceError::NotFound(key) => AppError::NotFound(key),
            MediaServiceError::Dependency(msg) => AppError::ExternalService(msg),
            MediaServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
