pub mod blob_repository;
pub mod content_repository;
pub mod http_image_repository;
pub mod http_speech_repository;
pub mod image_repository;
pub mod s3_blob_repository;
pub mod speech_repository;

pub use blob_repository::{BlobDownload, BlobMetadata, BlobRepository};
pub use content_repository::ContentRepository;
pub use http_image_repository::HttpImageRepository;
pub use http_speech_repository::HttpSpeechRepository;
pub use image_repository::ImageRepository;
pub use s3_blob_repository::S3BlobRepository;
pub use speech_repository::{SpeechMetadata, SpeechRepository, SpeechRequest};
