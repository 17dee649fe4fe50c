use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ContentServiceError {
    #[error("content not found")]
    NotFound,
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for ContentServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => ContentServiceError::Invalid(msg),
            AppError::NotFound(_) => ContentServiceError::NotFound,
            _ => ContentServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<ContentServiceError> for AppError {
    fn from(err: ContentServiceError) -> Self {
        match err {
            ContentServiceError::NotFound => AppError::NotFound("content".to_string()),
            ContentServiceError::Invalid(msg) => AppError::BadRequest(msg),
            ContentServiceError::Dependency(msg) => AppError::ExternalService(msg),
            ContentServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
