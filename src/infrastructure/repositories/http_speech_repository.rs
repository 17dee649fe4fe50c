use super::speech_repository::{SpeechRepository, SpeechRequest};
use async_trait::async_trait;
use serde::Deserialize;

/// Path of the generate endpoint under the configured service base URL.
const GENERATE_PATH: &str = "/api/speech/generate";

/// HTTP implementation of the speech repository.
///
/// The upstream service consumes `{title, text, voice, metadata}` and
/// answers `{audioUrl}`, where the URL may be relative to the service's
/// own origin.
pub struct HttpSpeechRepository {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(rename = "audioUrl")]
    audio_url: Option<String>,
}

impl HttpSpeechRepository {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Resolve a possibly service-relative audio location to an absolute URL.
    fn resolve_audio_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}{}", self.base_url, url)
        }
    }
}

#[async_trait]
impl SpeechRepository for HttpSpeechRepository {
    async fn synthesize_clip(&self, request: &SpeechRequest) -> Result<String, String> {
        let endpoint = format!("{}{}", self.base_url, GENERATE_PATH);

        tracing::info!(
            voice = %request.voice,
            text_length = request.text.len(),
            chunk = ?request.metadata.chunk,
            total_chunks = ?request.metadata.total_chunks,
            "Calling speech service"
        );

        let response = self
            .http_client
            .post(&endpoint)
            .header("X-Api-Key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| format!("speech service unreachable: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                text_length = request.text.len(),
                "Speech service call failed"
            );
            return Err(format!("speech service returned status {}", status.as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid speech service response: {}", e))?;

        let audio_url = body
            .audio_url
            .ok_or_else(|| "speech service returned no audio location".to_string())?;

        Ok(self.resolve_audio_url(&audio_url))
    }

    async fn fetch_audio(&self, url: &str) -> Result<Vec<u8>, String> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("audio fetch failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("audio fetch returned status {}", status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read audio body: {}", e))?;

        tracing::debug!(url = %url, audio_size = bytes.len(), "Audio fetched");

        Ok(bytes.to_vec())
    }
}
