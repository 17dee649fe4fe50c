use super::content_type;
use super::error::MediaServiceError;
use super::range::{parse_range_header, resolve};
use crate::infrastructure::repositories::BlobRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// The byte window served by a partial response; bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServedRange {
    pub start: u64,
    pub end: u64,
}

/// A blob resolved for delivery. `range` is `None` for a full response.
#[derive(Debug, Clone)]
pub struct ServedBlob {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub etag: Option<String>,
    pub total_size: u64,
    pub range: Option<ServedRange>,
}

pub struct MediaService {
    blob_repo: Arc<dyn BlobRepository>,
    public_base_url: Option<String>,
}

impl MediaService {
    pub fn new(blob_repo: Arc<dyn BlobRepository>, public_base_url: Option<String>) -> Self {
        Self {
            blob_repo,
            public_base_url,
        }
    }
}

#[async_trait]
pub trait MediaServiceApi: Send + Sync {
    /// Serve a stored blob, honoring an optional `Range` header value.
    ///
    /// A well-formed single byte range yields a partial result read
    /// natively from the store; no header, a malformed header, or a range
    /// that cannot be satisfied yields the full object.
    async fn serve(
        &self,
        key: &str,
        range_header: Option<&str>,
    ) -> Result<ServedBlob, MediaServiceError>;

    /// Store an uploaded payload; returns `(key, public location)`.
    async fn store_upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(String, String), MediaServiceError>;
}

#[async_trait]
impl MediaServiceApi for MediaService {
    async fn serve(
        &self,
        key: &str,
        range_header: Option<&str>,
    ) -> Result<ServedBlob, MediaServiceError> {
        if let Some(requested) = range_header.and_then(parse_range_header) {
            // Metadata probe first: its absence alone decides the 404, and
            // the range resolves against the reported total size.
            let meta = self
                .blob_repo
                .head(key)
                .await
                .map_err(MediaServiceError::Dependency)?
                .ok_or_else(|| MediaServiceError::NotFound(key.to_string()))?;

            if let Some(resolved) = resolve(requested, meta.size) {
                let download = self
                    .blob_repo
                    .get_range(key, resolved.start, resolved.end)
                    .await
                    .map_err(MediaServiceError::Dependency)?
                    .ok_or_else(|| MediaServiceError::NotFound(key.to_string()))?;

                tracing::debug!(
                    key = %key,
                    start = resolved.start,
                    end = resolved.end,
                    total_size = meta.size,
                    "Serving blob range"
                );

                let stored_type = download.content_type.or(meta.content_type);
                return Ok(ServedBlob {
                    content_type: content_type::resolve(stored_type.as_deref(), key),
                    etag: download.etag.or(meta.etag),
                    total_size: meta.size,
                    range: Some(ServedRange {
                        start: resolved.start,
                        end: resolved.end,
                    }),
                    bytes: download.bytes,
                });
            }
            // Unservable range: fall through to the full response, the
            // same lane a malformed header takes.
        }

        let download = self
            .blob_repo
            .get(key)
            .await
            .map_err(MediaServiceError::Dependency)?
            .ok_or_else(|| MediaServiceError::NotFound(key.to_string()))?;

        let total_size = download.bytes.len() as u64;

        Ok(ServedBlob {
            content_type: content_type::resolve(download.content_type.as_deref(), key),
            etag: download.etag,
            total_size,
            range: None,
            bytes: download.bytes,
        })
    }

    async fn store_upload(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(String, String), MediaServiceError> {
        let key = format!(
            "uploads/{}-{}",
            chrono::Utc::now().timestamp_millis(),
            sanitize_name(name)
        );

        self.blob_repo
            .put(&key, bytes, content_type)
            .await
            .map_err(MediaServiceError::Dependency)?;

        let location = public_location(self.public_base_url.as_deref(), &key);

        tracing::info!(key = %key, location = %location, "Upload stored");

        Ok((key, location))
    }
}

/// Public location for a stored key: one path-style scheme, optionally
/// absolute when a base URL is configured.
pub fn public_location(base: Option<&str>, key: &str) -> String {
    match base {
        Some(base) => format!("{}/api/media/{}", base.trim_end_matches('/'), key),
        None => format!("/api/media/{}", key),
    }
}

/// Keep upload names path-safe; everything unusual becomes a dash.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::{BlobDownload, BlobMetadata};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// One-object store that records which access paths were taken.
    struct FixtureBlobRepository {
        key: String,
        bytes: Vec<u8>,
        content_type: Option<String>,
        etag: Option<String>,
        full_gets: Mutex<usize>,
        range_gets: Mutex<usize>,
    }

    impl FixtureBlobRepository {
        fn new(key: &str, bytes: Vec<u8>) -> Self {
            Self {
                key: key.to_string(),
                bytes,
                content_type: None,
                etag: Some("\"rev-1\"".to_string()),
                full_gets: Mutex::new(0),
                range_gets: Mutex::new(0),
            }
        }

        fn with_content_type(mut self, content_type: &str) -> Self {
            self.content_type = Some(content_type.to_string());
            self
        }
    }

    #[async_trait]
    impl BlobRepository for FixtureBlobRepository {
        async fn get(&self, key: &str) -> Result<Option<BlobDownload>, String> {
            *self.full_gets.lock().unwrap() += 1;
            if key != self.key {
                return Ok(None);
            }
            Ok(Some(BlobDownload {
                bytes: self.bytes.clone(),
                content_type: self.content_type.clone(),
                etag: self.etag.clone(),
            }))
        }

        async fn get_range(
            &self,
            key: &str,
            start: u64,
            end: u64,
        ) -> Result<Option<BlobDownload>, String> {
            *self.range_gets.lock().unwrap() += 1;
            if key != self.key {
                return Ok(None);
            }
            let slice = self.bytes[start as usize..=end as usize].to_vec();
            Ok(Some(BlobDownload {
                bytes: slice,
                content_type: self.content_type.clone(),
                etag: self.etag.clone(),
            }))
        }

        async fn head(&self, key: &str) -> Result<Option<BlobMetadata>, String> {
            if key != self.key {
                return Ok(None);
            }
            Ok(Some(BlobMetadata {
                size: self.bytes.len() as u64,
                content_type: self.content_type.clone(),
                etag: self.etag.clone(),
            }))
        }

        async fn put(&self, _key: &str, _bytes: Vec<u8>, _ct: &str) -> Result<(), String> {
            Ok(())
        }
    }

    fn thousand_bytes() -> Vec<u8> {
        (0..1000u32).map(|i| (i % 251) as u8).collect()
    }

    #[tokio::test]
    async fn test_full_response_without_range_header() {
        let repo = Arc::new(FixtureBlobRepository::new(
            "audio/track.mp3",
            thousand_bytes(),
        ));
        let service = MediaService::new(repo.clone(), None);

        let served = service.serve("audio/track.mp3", None).await.unwrap();

        assert_eq!(served.range, None);
        assert_eq!(served.total_size, 1000);
        assert_eq!(served.bytes, thousand_bytes());
        assert_eq!(served.content_type, "audio/mpeg");
        assert_eq!(served.etag, Some("\"rev-1\"".to_string()));
    }

    #[tokio::test]
    async fn test_partial_response_reads_only_the_range() {
        let repo = Arc::new(FixtureBlobRepository::new(
            "audio/track.mp3",
            thousand_bytes(),
        ));
        let service = MediaService::new(repo.clone(), None);

        let served = service
            .serve("audio/track.mp3", Some("bytes=100-199"))
            .await
            .unwrap();

        assert_eq!(served.range, Some(ServedRange { start: 100, end: 199 }));
        assert_eq!(served.total_size, 1000);
        assert_eq!(served.bytes, thousand_bytes()[100..=199].to_vec());
        assert_eq!(served.bytes.len(), 100);

        // The store resolved the sub-range natively; the full object was
        // never downloaded just to slice it
        assert_eq!(*repo.range_gets.lock().unwrap(), 1);
        assert_eq!(*repo.full_gets.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_open_ended_range_is_clamped_to_the_last_byte() {
        let repo = Arc::new(FixtureBlobRepository::new(
            "audio/track.mp3",
            thousand_bytes(),
        ));
        let service = MediaService::new(repo, None);

        let served = service
            .serve("audio/track.mp3", Some("bytes=900-"))
            .await
            .unwrap();

        assert_eq!(served.range, Some(ServedRange { start: 900, end: 999 }));
        assert_eq!(served.bytes.len(), 100);
    }

    #[tokio::test]
    async fn test_missing_key_is_not_found_in_both_modes() {
        let repo = Arc::new(FixtureBlobRepository::new("exists.mp3", vec![1, 2, 3]));
        let service = MediaService::new(repo, None);

        let err = service.serve("missing.mp3", None).await.unwrap_err();
        assert!(matches!(err, MediaServiceError::NotFound(_)));

        let err = service
            .serve("missing.mp3", Some("bytes=0-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, MediaServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_range_degrades_to_full() {
        let repo = Arc::new(FixtureBlobRepository::new(
            "audio/track.mp3",
            thousand_bytes(),
        ));
        let service = MediaService::new(repo.clone(), None);

        let served = service
            .serve("audio/track.mp3", Some("bytes=whatever"))
            .await
            .unwrap();

        assert_eq!(served.range, None);
        assert_eq!(served.bytes.len(), 1000);
        assert_eq!(*repo.full_gets.lock().unwrap(), 1);
        assert_eq!(*repo.range_gets.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_out_of_bounds_start_degrades_to_full() {
        let repo = Arc::new(FixtureBlobRepository::new(
            "audio/track.mp3",
            thousand_bytes(),
        ));
        let service = MediaService::new(repo.clone(), None);

        let served = service
            .serve("audio/track.mp3", Some("bytes=5000-"))
            .await
            .unwrap();

        assert_eq!(served.range, None);
        assert_eq!(served.bytes.len(), 1000);
    }

    #[tokio::test]
    async fn test_stored_content_type_beats_extension() {
        let repo = Arc::new(
            FixtureBlobRepository::new("audio/track.mp3", vec![0; 10])
                .with_content_type("audio/flac"),
        );
        let service = MediaService::new(repo, None);

        let served = service.serve("audio/track.mp3", None).await.unwrap();
        assert_eq!(served.content_type, "audio/flac");
    }

    #[tokio::test]
    async fn test_extension_fallback_when_no_stored_type() {
        let repo = Arc::new(FixtureBlobRepository::new("artwork/cover.png", vec![0; 10]));
        let service = MediaService::new(repo, None);

        let served = service.serve("artwork/cover.png", None).await.unwrap();
        assert_eq!(served.content_type, "image/png");
    }

    #[test]
    fn test_public_location_scheme() {
        assert_eq!(
            public_location(None, "audio/tts-1.mp3"),
            "/api/media/audio/tts-1.mp3"
        );
        assert_eq!(
            public_location(Some("https://library.example/"), "audio/tts-1.mp3"),
            "https://library.example/api/media/audio/tts-1.mp3"
        );
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("cover art (final).png"), "cover-art--final-.png");
        assert_eq!(sanitize_name(""), "upload");
    }
}
