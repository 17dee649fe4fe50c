use axum::{
    handler::Handler,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::infrastructure::config::Config;
use crate::infrastructure::db::DbPool;
use crate::{
    controllers::{
        content::ContentController, health, media::MediaController, tts::TtsController,
    },
    infrastructure::auth::{auth_middleware, request_id_middleware},
};

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    tts_controller: Arc<TtsController>,
    media_controller: Arc<MediaController>,
    content_controller: Arc<ContentController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let auth = middleware::from_fn_with_state(config.clone(), auth_middleware);

    // Synthesis routes (need the shared secret)
    let tts_routes = Router::new()
        .route("/api/tts", post(TtsController::synthesize))
        .route("/api/tts/preview", post(TtsController::preview))
        .with_state(tts_controller.clone())
        .layer(auth.clone());

    // Blob serving is public; audio/video clients send no credentials.
    // CORS is open so the reader frontend can stream from another origin.
    let media_read_routes = Router::new()
        .route("/api/media/*key", get(MediaController::serve))
        .with_state(media_controller.clone())
        .layer(CorsLayer::permissive());

    // Uploads need the shared secret; kept off the wildcard subtree so the
    // two routes can never shadow each other
    let media_upload_routes = Router::new()
        .route("/api/uploads/:name", post(MediaController::upload))
        .with_state(media_controller.clone())
        .layer(auth.clone());

    // Catalog reads are public, mutations need the shared secret
    let content_routes = Router::new()
        .route(
            "/api/content",
            get(ContentController::list_content)
                .post(ContentController::create_content.layer(auth.clone())),
        )
        .route(
            "/api/content/:contentId",
            get(ContentController::get_content)
                .delete(ContentController::delete_content.layer(auth.clone())),
        )
        .route(
            "/api/content/:contentId/artwork",
            post(ContentController::generate_artwork.layer(auth.clone())),
        )
        .with_state(content_controller.clone());

    // Build application routes
    let app = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(pool.clone())
        .merge(tts_routes)
        .merge(media_read_routes)
        .merge(media_upload_routes)
        .merge(content_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
