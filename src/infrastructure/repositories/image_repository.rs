use async_trait::async_trait;

/// Repository for image generation calls.
/// Abstracts the upstream image service endpoint: consumes a text prompt,
/// returns finished image bytes (PNG).
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, String>;
}
