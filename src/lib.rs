//! Extract structured markdown from an image by delegating recognition to a
//! vision-capable chat-completion endpoint.

pub mod client;
pub mod config;
pub mod extract;
pub mod models;
pub mod source;

pub use client::{ClientError, GroqClient, VisionClient};
pub use config::{Config, ConfigError};
pub use extract::{ExtractionError, Extractor, OcrOptions, SYSTEM_PROMPT};
pub use source::{FileReader, FsReader, ImageSource};
