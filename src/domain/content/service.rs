use super::artwork::build_artwork_prompt;
use super::error::ContentServiceError;
use super::model::{Content, NewContent};
use crate::domain::media::public_location;
use crate::infrastructure::repositories::{BlobRepository, ContentRepository, ImageRepository};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

const SUPPORTED_TYPES: &[&str] = &["text", "audio", "debate", "brief"];

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

pub struct ContentService {
    content_repo: Arc<ContentRepository>,
    image_repo: Arc<dyn ImageRepository>,
    blob_repo: Arc<dyn BlobRepository>,
    public_base_url: Option<String>,
}

impl ContentService {
    pub fn new(
        content_repo: Arc<ContentRepository>,
        image_repo: Arc<dyn ImageRepository>,
        blob_repo: Arc<dyn BlobRepository>,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            content_repo,
            image_repo,
            blob_repo,
            public_base_url,
        }
    }
}

#[async_trait]
pub trait ContentServiceApi: Send + Sync {
    async fn list(
        &self,
        content_type: Option<String>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Content>, ContentServiceError>;

    async fn get(&self, content_id: Uuid) -> Result<Content, ContentServiceError>;

    async fn create(&self, new_content: NewContent) -> Result<Content, ContentServiceError>;

    async fn delete(&self, content_id: Uuid) -> Result<(), ContentServiceError>;

    /// Generate header artwork for a record via the image service, store
    /// it, and record its location. Returns the image location.
    async fn generate_artwork(&self, content_id: Uuid) -> Result<String, ContentServiceError>;
}

#[async_trait]
impl ContentServiceApi for ContentService {
    async fn list(
        &self,
        content_type: Option<String>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Content>, ContentServiceError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        let offset = offset.unwrap_or(0).max(0);

        self.content_repo
            .list(content_type.as_deref(), limit, offset)
            .await
            .map_err(|e| ContentServiceError::Dependency(e.to_string()))
    }

    async fn get(&self, content_id: Uuid) -> Result<Content, ContentServiceError> {
        self.find_content(content_id).await
    }

    async fn create(&self, new_content: NewContent) -> Result<Content, ContentServiceError> {
        if new_content.title.trim().is_empty() {
            return Err(ContentServiceError::Invalid(
                "Title cannot be empty".to_string(),
            ));
        }
        if !is_supported_type(&new_content.content_type) {
            return Err(ContentServiceError::Invalid(format!(
                "Unsupported content type: {}",
                new_content.content_type
            )));
        }

        self.content_repo
            .create(new_content)
            .await
            .map_err(|e| ContentServiceError::Dependency(e.to_string()))
    }

    async fn delete(&self, content_id: Uuid) -> Result<(), ContentServiceError> {
        let deleted = self
            .content_repo
            .delete(content_id)
            .await
            .map_err(|e| ContentServiceError::Dependency(e.to_string()))?;

        if !deleted {
            return Err(ContentServiceError::NotFound);
        }

        Ok(())
    }

    async fn generate_artwork(&self, content_id: Uuid) -> Result<String, ContentServiceError> {
        let content = self.find_content(content_id).await?;

        let prompt = build_artwork_prompt(
            &content.content_type,
            &content.title,
            content.content.as_deref().unwrap_or(""),
        );

        tracing::info!(
            content_id = %content_id,
            content_type = %content.content_type,
            "Generating artwork"
        );

        let image_bytes = self
            .image_repo
            .generate(&prompt)
            .await
            .map_err(ContentServiceError::Dependency)?;

        let key = format!(
            "artwork/artwork-{}-{}.png",
            content_id,
            chrono::Utc::now().timestamp_millis()
        );

        self.blob_repo
            .put(&key, image_bytes, "image/png")
            .await
            .map_err(ContentServiceError::Dependency)?;

        let location = public_location(self.public_base_url.as_deref(), &key);

        self.content_repo
            .update_image_location(content_id, &location)
            .await
            .map_err(|e| ContentServiceError::Dependency(e.to_string()))?;

        tracing::info!(content_id = %content_id, location = %location, "Artwork stored");

        Ok(location)
    }
}

impl ContentService {
    async fn find_content(&self, content_id: Uuid) -> Result<Content, ContentServiceError> {
        self.content_repo
            .find_by_id(content_id)
            .await
            .map_err(|e| ContentServiceError::Dependency(e.to_string()))?
            .ok_or(ContentServiceError::NotFound)
    }
}

fn is_supported_type(content_type: &str) -> bool {
    SUPPORTED_TYPES.contains(&content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_types() {
        for t in ["text", "audio", "debate", "brief"] {
            assert!(is_supported_type(t));
        }
        assert!(!is_supported_type("video"));
        assert!(!is_supported_type(""));
    }
}
