use super::error::TtsServiceError;
use super::segmenter::segment;
use crate::domain::media::public_location;
use crate::infrastructure::repositories::{
    BlobRepository, ContentRepository, SpeechMetadata, SpeechRepository, SpeechRequest,
};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Character limit per synthesis call. The speech engine caps requests
/// around 4096 characters; 3500 leaves headroom.
const CHUNK_CHAR_LIMIT: usize = 3500;
/// Texts longer than this go through the segmenter. Strictly greater than
/// CHUNK_CHAR_LIMIT, so a short text is never sub-split.
const LONG_TEXT_THRESHOLD: usize = 4000;

/// Every segment comes back from the speech engine as MP3; the combined
/// object inherits that format.
const COMBINED_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

pub const DEFAULT_VOICE: &str = "nova";
const DEFAULT_PREVIEW_TEXT: &str = "Hello! This is how I sound.";

const SOURCE_TAG: &str = "inkwell-library";
const PREVIEW_SOURCE_TAG: &str = "inkwell-preview";

/// Result of one end-to-end synthesis job.
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    /// Where the finished audio can be fetched from.
    pub location: String,
    /// Whether the text went through the segmenter.
    pub chunked: bool,
    pub chunk_count: Option<usize>,
    pub total_chars: Option<usize>,
    /// Failure of the best-effort owning-record update. The synthesis
    /// itself still succeeded when this is set.
    pub owner_update_error: Option<String>,
}

pub struct TtsService {
    speech_repo: Arc<dyn SpeechRepository>,
    blob_repo: Arc<dyn BlobRepository>,
    content_repo: Arc<ContentRepository>,
    public_base_url: Option<String>,
    preview_cache: Option<Cache<String, String>>,
}

impl TtsService {
    pub fn new(
        speech_repo: Arc<dyn SpeechRepository>,
        blob_repo: Arc<dyn BlobRepository>,
        content_repo: Arc<ContentRepository>,
        public_base_url: Option<String>,
        preview_cache_enabled: bool,
    ) -> Self {
        // Previews are tiny and repeat often (users click through the
        // voice list); cache them if enabled
        let preview_cache = if preview_cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(100)
                    .time_to_idle(Duration::from_secs(30 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self {
            speech_repo,
            blob_repo,
            content_repo,
            public_base_url,
            preview_cache,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Turn text into a single playable audio object.
    ///
    /// Short texts are synthesized with one remote call and the upstream
    /// location is the result. Longer texts are segmented, synthesized
    /// chunk by chunk in strict order, byte-concatenated, and persisted as
    /// one new blob. When an owning content record is named, its audio
    /// location is updated best-effort.
    async fn synthesize(
        &self,
        text: String,
        voice: Option<String>,
        owner_id: Option<Uuid>,
    ) -> Result<SynthesisOutcome, TtsServiceError>;

    /// Generate a short voice preview; returns the upstream audio location.
    async fn preview(
        &self,
        voice: Option<String>,
        text: Option<String>,
    ) -> Result<String, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        text: String,
        voice: Option<String>,
        owner_id: Option<Uuid>,
    ) -> Result<SynthesisOutcome, TtsServiceError> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(TtsServiceError::EmptyInput);
        }

        let voice = voice.unwrap_or_else(|| DEFAULT_VOICE.to_string());

        tracing::info!(
            text_length = text.len(),
            voice = %voice,
            owner_id = ?owner_id,
            "TTS synthesis request"
        );

        if text.len() <= LONG_TEXT_THRESHOLD {
            return self.synthesize_short(&text, &voice, owner_id).await;
        }

        self.synthesize_long(&text, &voice, owner_id).await
    }

    async fn preview(
        &self,
        voice: Option<String>,
        text: Option<String>,
    ) -> Result<String, TtsServiceError> {
        let voice = voice.unwrap_or_else(|| DEFAULT_VOICE.to_string());
        let text = text.unwrap_or_else(|| DEFAULT_PREVIEW_TEXT.to_string());

        let cache_key = format!("{}|{}", voice, text);
        if let Some(cache) = &self.preview_cache {
            if let Some(location) = cache.get(&cache_key).await {
                tracing::info!(voice = %voice, "Voice preview cache hit");
                return Ok(location);
            }
        }

        let request = SpeechRequest {
            title: "Voice preview".to_string(),
            text,
            voice,
            metadata: SpeechMetadata {
                source: PREVIEW_SOURCE_TAG.to_string(),
                is_preview: Some(true),
                ..Default::default()
            },
        };

        let location = self
            .speech_repo
            .synthesize_clip(&request)
            .await
            .map_err(TtsServiceError::Upstream)?;

        if let Some(cache) = &self.preview_cache {
            cache.insert(cache_key, location.clone()).await;
        }

        Ok(location)
    }
}

impl TtsService {
    /// Short path: one remote call, the upstream location is the result.
    async fn synthesize_short(
        &self,
        text: &str,
        voice: &str,
        owner_id: Option<Uuid>,
    ) -> Result<SynthesisOutcome, TtsServiceError> {
        let request = SpeechRequest {
            title: "Inkwell TTS".to_string(),
            text: text.to_string(),
            voice: voice.to_string(),
            metadata: SpeechMetadata {
                source: SOURCE_TAG.to_string(),
                content_id: owner_id.map(|id| id.to_string()),
                ..Default::default()
            },
        };

        let location = self
            .speech_repo
            .synthesize_clip(&request)
            .await
            .map_err(TtsServiceError::Upstream)?;

        let owner_update_error = self.record_owner_location(owner_id, &location).await;

        Ok(SynthesisOutcome {
            location,
            chunked: false,
            chunk_count: None,
            total_chars: None,
            owner_update_error,
        })
    }

    /// Long path: segment, synthesize each chunk in strict order, fetch
    /// the bytes, concatenate, persist as one blob.
    async fn synthesize_long(
        &self,
        text: &str,
        voice: &str,
        owner_id: Option<Uuid>,
    ) -> Result<SynthesisOutcome, TtsServiceError> {
        let chunks = segment(text, CHUNK_CHAR_LIMIT);
        let total = chunks.len();

        tracing::info!(
            text_length = text.len(),
            chunk_count = total,
            "Long text split for synthesis"
        );

        // Chunk calls run strictly one at a time: ordering must be
        // preserved for the final concatenation, and the upstream service
        // rate-limits. Any failure aborts the whole job with the failing
        // ordinal; partial results are discarded.
        let mut clip_urls = Vec::with_capacity(total);
        for (index, chunk) in chunks.iter().enumerate() {
            let ordinal = index + 1;

            tracing::info!(
                chunk = ordinal,
                total_chunks = total,
                chunk_size = chunk.len(),
                "Synthesizing chunk"
            );

            let request = SpeechRequest {
                title: format!("Inkwell TTS - Part {}", ordinal),
                text: chunk.clone(),
                voice: voice.to_string(),
                metadata: SpeechMetadata {
                    source: SOURCE_TAG.to_string(),
                    content_id: owner_id.map(|id| id.to_string()),
                    chunk: Some(ordinal),
                    total_chunks: Some(total),
                    ..Default::default()
                },
            };

            let url = self.speech_repo.synthesize_clip(&request).await.map_err(
                |message| TtsServiceError::UpstreamChunk {
                    ordinal,
                    total,
                    message,
                },
            )?;

            clip_urls.push(url);
        }

        // Resolve every clip to raw bytes, still in chunk order.
        let mut buffers = Vec::with_capacity(total);
        for (index, url) in clip_urls.iter().enumerate() {
            let ordinal = index + 1;
            let bytes = self.speech_repo.fetch_audio(url).await.map_err(|message| {
                TtsServiceError::UpstreamChunk {
                    ordinal,
                    total,
                    message,
                }
            })?;
            buffers.push(bytes);
        }

        // Byte-faithful join: every chunk shares one codec and container,
        // so plain concatenation in chunk order is the whole assembly step.
        let combined_size = buffers.iter().map(Vec::len).sum();
        let mut combined = Vec::with_capacity(combined_size);
        for buffer in &buffers {
            combined.extend_from_slice(buffer);
        }

        let key = derive_storage_key(owner_id);
        self.blob_repo
            .put(&key, combined, COMBINED_AUDIO_CONTENT_TYPE)
            .await
            .map_err(TtsServiceError::Dependency)?;

        let location = self.media_location(&key);

        tracing::info!(
            key = %key,
            location = %location,
            combined_size_bytes = combined_size,
            chunk_count = total,
            "Combined audio persisted"
        );

        let owner_update_error = self.record_owner_location(owner_id, &location).await;

        Ok(SynthesisOutcome {
            location,
            chunked: true,
            chunk_count: Some(total),
            total_chars: Some(text.len()),
            owner_update_error,
        })
    }

    /// Best-effort: a failed record update is reported, not fatal - the
    /// audio asset already exists.
    async fn record_owner_location(
        &self,
        owner_id: Option<Uuid>,
        location: &str,
    ) -> Option<String> {
        let owner_id = owner_id?;

        match self
            .content_repo
            .update_audio_location(owner_id, location)
            .await
        {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(
                    owner_id = %owner_id,
                    error = %e,
                    "Audio location update failed after successful synthesis"
                );
                Some(e.to_string())
            }
        }
    }

    fn media_location(&self, key: &str) -> String {
        public_location(self.public_base_url.as_deref(), key)
    }
}

/// Combined-audio keys are stable per owning record, so re-synthesis
/// replaces the previous asset; ownerless jobs get a timestamped key.
fn derive_storage_key(owner_id: Option<Uuid>) -> String {
    match owner_id {
        Some(id) => format!("audio/tts-{}.mp3", id),
        None => format!("audio/tts-{}.mp3", chrono::Utc::now().timestamp_millis()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::{BlobDownload, BlobMetadata};
    use pretty_assertions::assert_eq;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Mutex;

    /// Speech mock: records every request, optionally fails one ordinal,
    /// and serves deterministic bytes per clip.
    struct MockSpeechRepository {
        requests: Mutex<Vec<SpeechRequest>>,
        fail_on_chunk: Option<usize>,
    }

    impl MockSpeechRepository {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_on_chunk: None,
            }
        }

        fn failing_on(ordinal: usize) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                fail_on_chunk: Some(ordinal),
            }
        }

        fn recorded(&self) -> Vec<SpeechRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SpeechRepository for MockSpeechRepository {
        async fn synthesize_clip(&self, request: &SpeechRequest) -> Result<String, String> {
            self.requests.lock().unwrap().push(request.clone());

            let ordinal = request.metadata.chunk.unwrap_or(0);
            if self.fail_on_chunk == Some(ordinal) {
                return Err("upstream exploded".to_string());
            }

            Ok(format!("https://speech.test/clips/{}", ordinal))
        }

        async fn fetch_audio(&self, url: &str) -> Result<Vec<u8>, String> {
            let ordinal = url.rsplit('/').next().unwrap();
            Ok(format!("segment-{};", ordinal).into_bytes())
        }
    }

    /// Blob mock: records puts, serves nothing.
    struct MockBlobRepository {
        puts: Mutex<Vec<(String, Vec<u8>, String)>>,
    }

    impl MockBlobRepository {
        fn new() -> Self {
            Self {
                puts: Mutex::new(Vec::new()),
            }
        }

        fn recorded_puts(&self) -> Vec<(String, Vec<u8>, String)> {
            self.puts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BlobRepository for MockBlobRepository {
        async fn get(&self, _key: &str) -> Result<Option<BlobDownload>, String> {
            Ok(None)
        }

        async fn get_range(
            &self,
            _key: &str,
            _start: u64,
            _end: u64,
        ) -> Result<Option<BlobDownload>, String> {
            Ok(None)
        }

        async fn head(&self, _key: &str) -> Result<Option<BlobMetadata>, String> {
            Ok(None)
        }

        async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), String> {
            self.puts
                .lock()
                .unwrap()
                .push((key.to_string(), bytes, content_type.to_string()));
            Ok(())
        }
    }

    /// Repository over a lazy pool: constructing it needs no database, and
    /// any actual query fails fast - which is exactly what the best-effort
    /// update tests want.
    fn unreachable_content_repo() -> Arc<ContentRepository> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://unused@127.0.0.1:1/unused")
            .unwrap();
        Arc::new(ContentRepository::new(Arc::new(pool)))
    }

    fn service(
        speech: Arc<MockSpeechRepository>,
        blobs: Arc<MockBlobRepository>,
    ) -> TtsService {
        TtsService::new(
            speech,
            blobs,
            unreachable_content_repo(),
            None,
            false,
        )
    }

    fn long_text() -> String {
        "The quick brown fox jumps over the lazy dog. ".repeat(120)
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let speech = Arc::new(MockSpeechRepository::new());
        let blobs = Arc::new(MockBlobRepository::new());
        let svc = service(speech.clone(), blobs);

        for text in ["", "   ", "\n\t  \n"] {
            let err = svc.synthesize(text.to_string(), None, None).await.unwrap_err();
            assert!(matches!(err, TtsServiceError::EmptyInput));
        }
        assert!(speech.recorded().is_empty());
    }

    #[tokio::test]
    async fn test_short_text_takes_the_single_call_path() {
        let speech = Arc::new(MockSpeechRepository::new());
        let blobs = Arc::new(MockBlobRepository::new());
        let svc = service(speech.clone(), blobs.clone());

        let outcome = svc
            .synthesize("A short note.".to_string(), None, None)
            .await
            .unwrap();

        assert!(!outcome.chunked);
        assert_eq!(outcome.chunk_count, None);
        assert_eq!(outcome.location, "https://speech.test/clips/0");
        assert_eq!(outcome.owner_update_error, None);

        let requests = speech.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].metadata.chunk, None);
        assert_eq!(requests[0].metadata.total_chunks, None);
        assert_eq!(requests[0].voice, DEFAULT_VOICE);

        // No concatenation, no persistence on the short path
        assert!(blobs.recorded_puts().is_empty());
    }

    #[tokio::test]
    async fn test_long_text_synthesizes_chunks_in_order_and_concatenates() {
        let speech = Arc::new(MockSpeechRepository::new());
        let blobs = Arc::new(MockBlobRepository::new());
        let svc = service(speech.clone(), blobs.clone());

        let outcome = svc.synthesize(long_text(), None, None).await.unwrap();

        assert!(outcome.chunked);
        let total = outcome.chunk_count.unwrap();
        assert!(total > 1);
        assert_eq!(outcome.total_chars, Some(long_text().trim().len()));
        assert!(outcome.location.starts_with("/api/media/audio/tts-"));
        assert!(outcome.location.ends_with(".mp3"));

        // Ordinals observed upstream are 1..=total, in order
        let requests = speech.recorded();
        assert_eq!(requests.len(), total);
        for (index, request) in requests.iter().enumerate() {
            assert_eq!(request.metadata.chunk, Some(index + 1));
            assert_eq!(request.metadata.total_chunks, Some(total));
        }

        // Exactly one object persisted: the byte-faithful join in order
        let puts = blobs.recorded_puts();
        assert_eq!(puts.len(), 1);
        let expected: Vec<u8> = (1..=total)
            .flat_map(|i| format!("segment-{};", i).into_bytes())
            .collect();
        assert_eq!(puts[0].1, expected);
        assert_eq!(puts[0].2, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_failing_chunk_aborts_the_job_without_persisting() {
        let speech = Arc::new(MockSpeechRepository::failing_on(2));
        let blobs = Arc::new(MockBlobRepository::new());
        let svc = service(speech.clone(), blobs.clone());

        let err = svc.synthesize(long_text(), None, None).await.unwrap_err();

        match err {
            TtsServiceError::UpstreamChunk { ordinal, total, .. } => {
                assert_eq!(ordinal, 2);
                assert!(total >= 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // The job stopped at the failing ordinal and nothing was persisted
        assert_eq!(speech.recorded().len(), 2);
        assert!(blobs.recorded_puts().is_empty());
    }

    #[tokio::test]
    async fn test_owner_update_failure_is_reported_not_fatal() {
        let speech = Arc::new(MockSpeechRepository::new());
        let blobs = Arc::new(MockBlobRepository::new());
        let svc = service(speech, blobs);

        let owner = Uuid::new_v4();
        let outcome = svc
            .synthesize(long_text(), None, Some(owner))
            .await
            .unwrap();

        // Synthesis succeeded; the unreachable database only cost us the
        // best-effort record update
        assert!(outcome.chunked);
        assert!(outcome.location.contains(&owner.to_string()));
        assert!(outcome.owner_update_error.is_some());
    }

    #[tokio::test]
    async fn test_owner_key_is_deterministic() {
        let owner = Uuid::new_v4();
        let first = derive_storage_key(Some(owner));
        let second = derive_storage_key(Some(owner));
        assert_eq!(first, second);
        assert_eq!(first, format!("audio/tts-{}.mp3", owner));
    }

    #[tokio::test]
    async fn test_preview_returns_upstream_location() {
        let speech = Arc::new(MockSpeechRepository::new());
        let blobs = Arc::new(MockBlobRepository::new());
        let svc = service(speech.clone(), blobs);

        let location = svc.preview(Some("alloy".to_string()), None).await.unwrap();
        assert_eq!(location, "https://speech.test/clips/0");

        let requests = speech.recorded();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].voice, "alloy");
        assert_eq!(requests[0].metadata.is_preview, Some(true));
    }
}
