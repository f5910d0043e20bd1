use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

/// Media type stamped on every local image, whatever its real format.
pub const LOCAL_MEDIA_TYPE: &str = "image/jpeg";

/// Where an image reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    Local(PathBuf),
}

impl ImageSource {
    pub fn classify(reference: &str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            Self::Remote(reference.to_string())
        } else {
            Self::Local(PathBuf::from(reference))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Reads raw bytes from a local path.
#[async_trait]
pub trait FileReader: Send + Sync {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Filesystem-backed reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsReader;

#[async_trait]
impl FileReader for FsReader {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

/// `data:image/jpeg;base64,<payload>` for the given bytes.
pub fn data_uri(bytes: &[u8]) -> String {
    format!("data:{};base64,{}", LOCAL_MEDIA_TYPE, STANDARD.encode(bytes))
}
