use inkwell_backend::infrastructure::config::{Config, LogFormat};
use inkwell_backend::infrastructure::db::{check_connection, create_pool};
use inkwell_backend::infrastructure::http::start_http_server;
use inkwell_backend::infrastructure::repositories::{
    BlobRepository, ImageRepository, SpeechRepository,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration; required values (shared secret, speech service
    // credentials, bucket) fail startup when absent
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Inkwell Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    // Create the S3-compatible object store client
    tracing::info!(
        region = %config.aws_region,
        endpoint = ?config.s3_endpoint_url,
        "Initializing object store client"
    );

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    let mut s3_config = aws_sdk_s3::config::Builder::from(&aws_config);
    if let Some(endpoint) = &config.s3_endpoint_url {
        // R2/MinIO style endpoints want path-style addressing
        s3_config = s3_config.endpoint_url(endpoint).force_path_style(true);
    }
    let s3_client = aws_sdk_s3::Client::from_conf(s3_config.build());
    tracing::info!(bucket = %config.media_bucket, "Object store client initialized");

    let pool = Arc::new(pool);
    let config = Arc::new(config);
    let s3_client = Arc::new(s3_client);

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject db pool and remote clients)
    tracing::info!("Instantiating repositories...");
    let content_repo = Arc::new(
        inkwell_backend::infrastructure::repositories::ContentRepository::new(pool.clone()),
    );
    let blob_repo: Arc<dyn BlobRepository> = Arc::new(
        inkwell_backend::infrastructure::repositories::S3BlobRepository::new(
            s3_client.clone(),
            config.media_bucket.clone(),
        ),
    );
    let speech_repo: Arc<dyn SpeechRepository> = Arc::new(
        inkwell_backend::infrastructure::repositories::HttpSpeechRepository::new(
            config.speech_base_url.clone(),
            config.speech_api_key.clone(),
        ),
    );
    let image_repo: Arc<dyn ImageRepository> = Arc::new(
        inkwell_backend::infrastructure::repositories::HttpImageRepository::new(
            config.image_api_url.clone(),
            config.image_api_key.clone(),
        ),
    );

    // 2. Instantiate services (inject repositories)
    tracing::info!("Instantiating services...");
    let tts_service = Arc::new(inkwell_backend::domain::tts::TtsService::new(
        speech_repo.clone(),
        blob_repo.clone(),
        content_repo.clone(),
        config.public_base_url.clone(),
        config.preview_cache_enabled,
    ));
    let media_service = Arc::new(inkwell_backend::domain::media::MediaService::new(
        blob_repo.clone(),
        config.public_base_url.clone(),
    ));
    let content_service = Arc::new(inkwell_backend::domain::content::ContentService::new(
        content_repo.clone(),
        image_repo,
        blob_repo.clone(),
        config.public_base_url.clone(),
    ));

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(inkwell_backend::controllers::tts::TtsController::new(
        tts_service,
    ));
    let media_controller = Arc::new(inkwell_backend::controllers::media::MediaController::new(
        media_service,
    ));
    let content_controller = Arc::new(
        inkwell_backend::controllers::content::ContentController::new(content_service),
    );

    // Start HTTP server with all routes
    start_http_server(
        pool,
        config,
        tts_controller,
        media_controller,
        content_controller,
    )
    .await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "inkwell_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "inkwell_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
