use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("no text provided")]
    EmptyInput,
    #[error("speech service failed: {0}")]
    Upstream(String),
    #[error("speech service failed on chunk {ordinal} of {total}: {message}")]
    UpstreamChunk {
        ordinal: usize,
        total: usize,
        message: String,
    },
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::EmptyInput => AppError::BadRequest("No text provided".to_string()),
            e @ (TtsServiceError::Upstream(_) | TtsServiceError::UpstreamChunk { .. }) => {
                AppError::ExternalService(e.to_string())
            }
            TtsServiceError::Dependency(msg) => AppError::ExternalService(msg),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
