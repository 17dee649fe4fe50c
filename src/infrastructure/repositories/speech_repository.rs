use async_trait::async_trait;
use serde::Serialize;

/// One synthesis call to the upstream speech service.
#[derive(Debug, Clone, Serialize)]
pub struct SpeechRequest {
    pub title: String,
    pub text: String,
    pub voice: String,
    pub metadata: SpeechMetadata,
}

/// Job metadata forwarded to the speech service. The chunk ordinal and
/// total are 1-based and only present for segmented jobs.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechMetadata {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chunks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_preview: Option<bool>,
}

/// Repository for speech synthesis calls.
/// Abstracts the upstream speech service endpoint.
///
/// The service is size-limited per call; splitting long text and merging
/// the results is the caller's concern, not the repository's.
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Issue exactly one synthesis call.
    ///
    /// Returns an absolute URL the resulting audio can be fetched from.
    /// Any non-success upstream response is a hard failure for the call.
    async fn synthesize_clip(&self, request: &SpeechRequest) -> Result<String, String>;

    /// Fetch the raw audio bytes behind a location returned by
    /// [`synthesize_clip`](Self::synthesize_clip).
    async fn fetch_audio(&self, url: &str) -> Result<Vec<u8>, String>;
}
