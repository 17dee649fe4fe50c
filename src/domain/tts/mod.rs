pub mod error;
pub mod segmenter;
pub mod service;

pub use error::TtsServiceError;
pub use segmenter::segment;
pub use service::{SynthesisOutcome, TtsService, TtsServiceApi, DEFAULT_VOICE};
