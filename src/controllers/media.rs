use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::media::{MediaService, MediaServiceApi},
    error::{AppError, AppResult},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub key: String,
    pub location: String,
}

pub struct MediaController {
    media_service: Arc<MediaService>,
}

impl MediaController {
    pub fn new(media_service: Arc<MediaService>) -> Self {
        Self { media_service }
    }

    /// GET /api/media/*key - Serve a stored blob with byte-range support
    pub async fn serve(
        State(controller): State<Arc<MediaController>>,
        Path(key): Path<String>,
        headers: HeaderMap,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let range_header = headers
            .get(header::RANGE)
            .and_then(|value| value.to_str().ok());

        let served = controller
            .media_service
            .serve(&key, range_header)
            .await
            .map_err(AppError::from)?;

        let mut response_headers = HeaderMap::new();
        if let Ok(value) = served.content_type.parse() {
            response_headers.insert(header::CONTENT_TYPE, value);
        }
        // Advertise seek capability even on requests that didn't use it
        response_headers.insert(header::ACCEPT_RANGES, "bytes".parse().unwrap());
        response_headers.insert(
            header::CACHE_CONTROL,
            "public, max-age=31536000".parse().unwrap(),
        );
        // Revision marker straight from the store; never a computed hash
        if let Some(etag) = &served.etag {
            if let Ok(value) = etag.parse() {
                response_headers.insert(header::ETAG, value);
            }
        }

        match served.range {
            Some(range) => {
                let length = range.end - range.start + 1;
                response_headers.insert(
                    header::CONTENT_LENGTH,
                    length.to_string().parse().unwrap(),
                );
                response_headers.insert(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", range.start, range.end, served.total_size)
                        .parse()
                        .unwrap(),
                );
                Ok((
                    StatusCode::PARTIAL_CONTENT,
                    response_headers,
                    Body::from(served.bytes),
                ))
            }
            None => {
                response_headers.insert(
                    header::CONTENT_LENGTH,
                    served.total_size.to_string().parse().unwrap(),
                );
                Ok((StatusCode::OK, response_headers, Body::from(served.bytes)))
            }
        }
    }

    /// POST /api/uploads/:name - Store a raw-body upload
    pub async fn upload(
        State(controller): State<Arc<MediaController>>,
        Path(name): Path<String>,
        headers: HeaderMap,
        body: Bytes,
    ) -> AppResult<(StatusCode, Json<UploadResponse>)> {
        if body.is_empty() {
            return Err(AppError::BadRequest("No payload provided".to_string()));
        }

        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream");

        let (key, location) = controller
            .media_service
            .store_upload(&name, body.to_vec(), content_type)
            .await
            .map_err(AppError::from)?;

        Ok((StatusCode::CREATED, Json(UploadResponse { key, location })))
    }
}
