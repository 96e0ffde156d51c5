pub mod assembly;
pub mod config;
pub mod core;
pub mod curation;
pub mod error;
pub mod export;
pub mod logging;
pub mod ocr;
pub mod pipeline;

pub use crate::core::color::ColorLabel;
pub use crate::core::model::{CardDraft, TextDetection};
pub use error::ConfigError;
