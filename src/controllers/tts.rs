use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::tts::{TtsService, TtsServiceApi},
    error::{AppError, AppResult},
};

/// Request for POST /api/tts
#[derive(Debug, Serialize, Deserialize)]
pub struct TtsRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(rename = "contentId", skip_serializing_if = "Option::is_none")]
    pub content_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsResponse {
    pub location: String,
    pub chunked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chars: Option<usize>,
    /// Set when the synthesis succeeded but the owning record could not be
    /// updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_update_error: Option<String>,
}

/// Request for POST /api/tts/preview
#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub location: String,
}

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /api/tts - Turn text into a single audio object
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<TtsRequest>,
    ) -> AppResult<Json<TtsResponse>> {
        let outcome = controller
            .tts_service
            .synthesize(request.text, request.voice, request.content_id)
            .await
            .map_err(AppError::from)?;

        Ok(Json(TtsResponse {
            location: outcome.location,
            chunked: outcome.chunked,
            chunk_count: outcome.chunk_count,
            total_chars: outcome.total_chars,
            owner_update_error: outcome.owner_update_error,
        }))
    }

    /// POST /api/tts/preview - Short voice preview
    pub async fn preview(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<PreviewRequest>,
    ) -> AppResult<Json<PreviewResponse>> {
        let location = controller
            .tts_service
            .preview(request.voice, request.text)
            .await
            .map_err(AppError::from)?;

        Ok(Json(PreviewResponse { location }))
    }
}
