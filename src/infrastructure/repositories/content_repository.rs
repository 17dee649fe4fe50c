use crate::domain::content::{Content, NewContent};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use std::sync::Arc;
use uuid::Uuid;

pub struct ContentRepository {
    pool: Arc<DbPool>,
}

impl ContentRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Find a catalog record by ID
    pub async fn find_by_id(&self, content_id: Uuid) -> AppResult<Option<Content>> {
        let pool = self.pool.as_ref();
        let content = sqlx::query_as::<_, Content>("SELECT * FROM content WHERE id = $1")
            .bind(content_id)
            .fetch_optional(pool)
            .await?;

        Ok(content)
    }

    /// List catalog records, newest first, optionally filtered by type
    pub async fn list(
        &self,
        content_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Content>> {
        let pool = self.pool.as_ref();

        let records = if let Some(content_type) = content_type {
            sqlx::query_as::<_, Content>(
                "SELECT * FROM content WHERE type = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            )
            .bind(content_type)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        } else {
            sqlx::query_as::<_, Content>(
                "SELECT * FROM content ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        };

        Ok(records)
    }

    /// Create a new catalog record
    pub async fn create(&self, new_content: NewContent) -> AppResult<Content> {
        let pool = self.pool.as_ref();
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        let content = sqlx::query_as::<_, Content>(
            r#"
            INSERT INTO content (id, type, title, content, audio_url, image_url, metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&new_content.content_type)
        .bind(&new_content.title)
        .bind(&new_content.content)
        .bind(&new_content.audio_url)
        .bind(&new_content.image_url)
        .bind(&new_content.metadata)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(content)
    }

    /// Delete a catalog record; returns whether a row existed
    pub async fn delete(&self, content_id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM content WHERE id = $1")
            .bind(content_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record the audio location produced by a synthesis job
    pub async fn update_audio_location(&self, content_id: Uuid, location: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        sqlx::query("UPDATE content SET audio_url = $1, updated_at = $2 WHERE id = $3")
            .bind(location)
            .bind(now)
            .bind(content_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Record the artwork location produced by image generation
    pub async fn update_image_location(&self, content_id: Uuid, location: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        sqlx::query("UPDATE content SET image_url = $1, updated_at = $2 WHERE id = $3")
            .bind(location)
            .bind(now)
            .bind(content_id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
