use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::content::{Content, ContentService, ContentServiceApi, NewContent},
    error::{AppError, AppResult},
};

#[derive(Debug, Deserialize)]
pub struct ListContentParams {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArtworkResponse {
    pub location: String,
}

pub struct ContentController {
    content_service: Arc<ContentService>,
}

impl ContentController {
    pub fn new(content_service: Arc<ContentService>) -> Self {
        Self { content_service }
    }

    /// GET /api/content - List catalog records
    pub async fn list_content(
        State(controller): State<Arc<ContentController>>,
        Query(params): Query<ListContentParams>,
    ) -> AppResult<Json<Vec<Content>>> {
        let records = controller
            .content_service
            .list(params.content_type, params.limit, params.offset)
            .await
            .map_err(AppError::from)?;

        Ok(Json(records))
    }

    /// GET /api/content/{contentId} - Fetch one record
    pub async fn get_content(
        State(controller): State<Arc<ContentController>>,
        Path(content_id): Path<Uuid>,
    ) -> AppResult<Json<Content>> {
        let record = controller
            .content_service
            .get(content_id)
            .await
            .map_err(AppError::from)?;

        Ok(Json(record))
    }

    /// POST /api/content - Create a record
    pub async fn create_content(
        State(controller): State<Arc<ContentController>>,
        Json(request): Json<NewContent>,
    ) -> AppResult<(StatusCode, Json<Content>)> {
        let record = controller
            .content_service
            .create(request)
            .await
            .map_err(AppError::from)?;

        Ok((StatusCode::CREATED, Json(record)))
    }

    /// DELETE /api/content/{contentId} - Delete a record
    pub async fn delete_content(
        State(controller): State<Arc<ContentController>>,
        Path(content_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller
            .content_service
            .delete(content_id)
            .await
            .map_err(AppError::from)?;

        Ok(StatusCode::NO_CONTENT)
    }

    /// POST /api/content/{contentId}/artwork - Generate header artwork
    pub async fn generate_artwork(
        State(controller): State<Arc<ContentController>>,
        Path(content_id): Path<Uuid>,
    ) -> AppResult<Json<ArtworkResponse>> {
        let location = controller
            .content_service
            .generate_artwork(content_id)
            .await
            .map_err(AppError::from)?;

        Ok(Json(ArtworkResponse { location }))
    }
}
