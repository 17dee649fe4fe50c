use async_trait::async_trait;

/// Metadata for a stored blob, as reported by the object store.
#[derive(Debug, Clone)]
pub struct BlobMetadata {
    /// Total object size in bytes.
    pub size: u64,
    pub content_type: Option<String>,
    /// Opaque revision marker assigned by the store. Passed through to
    /// clients verbatim as the `ETag`; the service never computes hashes.
    pub etag: Option<String>,
}

/// A downloaded payload - the whole object or a resolved sub-range.
#[derive(Debug, Clone)]
pub struct BlobDownload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub etag: Option<String>,
}

/// Repository for immutable named byte sequences.
/// Abstracts the underlying object store (S3, R2, MinIO, etc.)
///
/// Implementations are responsible for:
/// - Resolving sub-range reads natively in the store (the caller never
///   downloads a full object just to slice it)
/// - Reporting metadata (size, content type, revision marker) without
///   fetching the payload
#[async_trait]
pub trait BlobRepository: Send + Sync {
    /// Fetch a whole object. `Ok(None)` when the key has no backing object.
    async fn get(&self, key: &str) -> Result<Option<BlobDownload>, String>;

    /// Fetch the inclusive byte range `[start, end]` of an object.
    /// `Ok(None)` when the key has no backing object.
    async fn get_range(
        &self,
        key: &str,
        start: u64,
        end: u64,
    ) -> Result<Option<BlobDownload>, String>;

    /// Probe an object's metadata without its payload.
    async fn head(&self, key: &str) -> Result<Option<BlobMetadata>, String>;

    /// Store a new object under `key`. Existing keys are overwritten; the
    /// service only ever re-derives the same key deliberately.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), String>;
}
