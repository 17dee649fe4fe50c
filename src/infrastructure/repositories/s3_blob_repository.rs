use super::blob_repository::{BlobDownload, BlobMetadata, BlobRepository};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use std::sync::Arc;

/// S3-compatible implementation of the blob repository.
///
/// Works against AWS S3 proper or any S3-compatible store (Cloudflare R2,
/// MinIO) via a custom endpoint configured on the client.
pub struct S3BlobRepository {
    s3_client: Arc<S3Client>,
    bucket: String,
}

impl S3BlobRepository {
    pub fn new(s3_client: Arc<S3Client>, bucket: String) -> Self {
        Self { s3_client, bucket }
    }
}

#[async_trait]
impl BlobRepository for S3BlobRepository {
    async fn get(&self, key: &str) -> Result<Option<BlobDownload>, String> {
        let result = self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Ok(None);
                }
                tracing::error!(key = %key, error = ?service_err, "Object store get failed");
                return Err(format!("object store get failed: {}", service_err));
            }
        };

        let content_type = output.content_type().map(str::to_string);
        let etag = output.e_tag().map(str::to_string);

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| format!("failed to read object body: {}", e))?
            .into_bytes()
            .to_vec();

        Ok(Some(BlobDownload {
            bytes,
            content_type,
            etag,
        }))
    }

    async fn get_range(
        &self,
        key: &str,
        start: u64,
        end: u64,
    ) -> Result<Option<BlobDownload>, String> {
        // The store resolves the sub-range itself, per RFC 9110 byte-range
        // syntax; both bounds are inclusive.
        let result = self
            .s3_client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .range(format!("bytes={}-{}", start, end))
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Ok(None);
                }
                tracing::error!(
                    key = %key,
                    start = start,
                    end = end,
                    error = ?service_err,
                    "Object store range get failed"
                );
                return Err(format!("object store range get failed: {}", service_err));
            }
        };

        let content_type = output.content_type().map(str::to_string);
        let etag = output.e_tag().map(str::to_string);

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| format!("failed to read object body: {}", e))?
            .into_bytes()
            .to_vec();

        Ok(Some(BlobDownload {
            bytes,
            content_type,
            etag,
        }))
    }

    async fn head(&self, key: &str) -> Result<Option<BlobMetadata>, String> {
        let result = self
            .s3_client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    return Ok(None);
                }
                tracing::error!(key = %key, error = ?service_err, "Object store head failed");
                return Err(format!("object store head failed: {}", service_err));
            }
        };

        let size = output
            .content_length()
            .and_then(|len| u64::try_from(len).ok())
            .ok_or_else(|| format!("object store reported no size for key {}", key))?;

        Ok(Some(BlobMetadata {
            size,
            content_type: output.content_type().map(str::to_string),
            etag: output.e_tag().map(str::to_string),
        }))
    }

    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), String> {
        let size = bytes.len();

        self.s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                tracing::error!(key = %key, error = ?service_err, "Object store put failed");
                format!("object store put failed: {}", service_err)
            })?;

        tracing::debug!(key = %key, size_bytes = size, "Object stored");

        Ok(())
    }
}
