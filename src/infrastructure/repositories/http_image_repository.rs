use super::image_repository::ImageRepository;
use async_trait::async_trait;
use serde_json::json;

/// HTTP implementation of the image repository.
pub struct HttpImageRepository {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpImageRepository {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl ImageRepository for HttpImageRepository {
    async fn generate(&self, prompt: &str) -> Result<Vec<u8>, String> {
        tracing::info!(prompt_length = prompt.len(), "Calling image service");

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("X-Api-Key", &self.api_key)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| format!("image service unreachable: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Image service call failed");
            return Err(format!("image service returned status {}", status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read image body: {}", e))?;

        if bytes.is_empty() {
            return Err("image service returned an empty body".to_string());
        }

        Ok(bytes.to_vec())
    }
}
