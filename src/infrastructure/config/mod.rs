use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Static shared secret for the write endpoints. Required - there is
    /// deliberately no fallback value, a missing secret fails startup.
    pub api_key: String,
    // Speech synthesis service
    pub speech_base_url: String,
    pub speech_api_key: String,
    // Image generation service
    pub image_api_url: String,
    pub image_api_key: String,
    // Object storage (S3-compatible, R2 included)
    pub media_bucket: String,
    pub aws_region: String,
    pub s3_endpoint_url: Option<String>,
    /// Prepended to recorded media locations when set; locations are
    /// server-relative otherwise.
    pub public_base_url: Option<String>,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Voice preview cache
    pub preview_cache_enabled: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            api_key: env::var("API_KEY")?,
            speech_base_url: env::var("SPEECH_BASE_URL")?,
            speech_api_key: env::var("SPEECH_API_KEY")?,
            image_api_url: env::var("IMAGE_API_URL")?,
            image_api_key: env::var("IMAGE_API_KEY")?,
            media_bucket: env::var("MEDIA_BUCKET")?,
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "auto".to_string()),
            s3_endpoint_url: env::var("S3_ENDPOINT_URL").ok(),
            public_base_url: env::var("PUBLIC_BASE_URL").ok(),
            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "production" => Environment::Production,
                    _ => Environment::Development,
                })?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .parse::<String>()
                .map(|s| match s.as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                })?,
            preview_cache_enabled: env::var("PREVIEW_CACHE_ENABLED")
                .unwrap_or_else(|_| "false".to_string())
                .parse::<String>()
                .map(|s| s.to_lowercase() == "true")
                .unwrap_or(false),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}
