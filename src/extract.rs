use std::io;

use tracing::{debug, info, warn};

use crate::client::{ClientError, GroqClient, VisionClient};
use crate::config::Config;
use crate::models::{ChatMessage, ChatRequest, ContentPart, ImageUrl};
use crate::source::{data_uri, FileReader, FsReader, ImageSource};

// ── Constants ────────────────────────────────────────────────────────────────

/// Instruction sent as the first content part of every request.
pub const SYSTEM_PROMPT: &str = concat!(
    "You are a precise OCR system. Extract text from the image and format it as clean Markdown. Rules:\n",
    "\n",
    "1. Format:\n",
    "   - Use proper markdown headings (#, ##, ###)\n",
    "   - Use bullet lists (- or *) for itemized content\n",
    "   - Use numbered lists (1., 2., etc.) for sequential items\n",
    "   - Use tables with | separator for tabular data\n",
    "   - Preserve original text formatting (bold, italic) when clear\n",
    "   \n",
    "2. Content:\n",
    "   - Extract ALL text visible in the image\n",
    "   - Maintain the original text hierarchy\n",
    "   - Keep all numbers and amounts exactly as shown\n",
    "   - Include dates and times in their original format\n",
    "   \n",
    "3. Structure:\n",
    "   - Start with the most prominent text as a heading\n",
    "   - Group related items together\n",
    "   - Use horizontal rules (---) to separate major sections\n",
    "   \n",
    "4. Output:\n",
    "   - Return ONLY the markdown content\n",
    "   - Do not explain, describe, or analyze the content\n",
    "   - Do not include [END] or similar markers\n",
    "   - Ensure the markdown is valid and well-formatted",
);

const NO_CONTENT: &str = "No content received from API";

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("filePath is required")]
    InvalidInput,
    #[error("The GROQ_API_KEY environment variable is missing or empty; either provide it, or pass an API key explicitly")]
    MissingCredential,
    #[error("Failed to read image file: {0}")]
    FileRead(#[source] io::Error),
    #[error("Failed to process image: {0}")]
    Processing(String),
    #[error("No content was extracted from the image")]
    EmptyResult,
}

impl From<ClientError> for ExtractionError {
    fn from(err: ClientError) -> Self {
        Self::Processing(err.to_string())
    }
}

// ── Per-call options ─────────────────────────────────────────────────────────

/// Overrides for a single extraction; unset or blank fields fall back to
/// [`Config`].
#[derive(Debug, Clone, Default)]
pub struct OcrOptions {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ── Orchestrator ─────────────────────────────────────────────────────────────

pub struct Extractor<C = GroqClient, R = FsReader> {
    client: C,
    reader: R,
    config: Config,
}

impl Extractor {
    /// Production wiring: Groq over HTTP, images from the local filesystem.
    pub fn from_config(config: Config) -> Result<Self, ClientError> {
        let client = GroqClient::from_config(&config)?;
        Ok(Self::new(client, FsReader, config))
    }
}

impl<C: VisionClient, R: FileReader> Extractor<C, R> {
    pub fn new(client: C, reader: R, config: Config) -> Self {
        Self {
            client,
            reader,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract markdown from the image at `reference` (local path or
    /// `http(s)://` URL). The model's text is returned unmodified.
    pub async fn extract(
        &self,
        reference: &str,
        options: &OcrOptions,
    ) -> Result<String, ExtractionError> {
        if reference.trim().is_empty() {
            return Err(ExtractionError::InvalidInput);
        }

        let credential = non_blank(&options.api_key).or(non_blank(&self.config.api_key));
        if credential.is_none() && self.client.requires_credential() {
            warn!("no API key configured or supplied");
            return Err(ExtractionError::MissingCredential);
        }

        let source = ImageSource::classify(reference);
        let model = non_blank(&options.model).unwrap_or(&self.config.model);

        info!(remote = source.is_remote(), model, "extracting markdown from image");

        let image_url = self.image_url(source).await?;
        let request = build_request(model, image_url);

        let response = self.client.complete(credential, &request).await.map_err(|e| {
            warn!(error = %e, "vision request failed");
            ExtractionError::from(e)
        })?;

        let content = response
            .first_content()
            .ok_or_else(|| ExtractionError::Processing(NO_CONTENT.to_string()))?;

        if content.trim().is_empty() {
            return Err(ExtractionError::EmptyResult);
        }

        debug!(chars = content.len(), "received markdown");
        Ok(content.to_string())
    }

    async fn image_url(&self, source: ImageSource) -> Result<String, ExtractionError> {
        match source {
            ImageSource::Remote(url) => Ok(url),
            ImageSource::Local(path) => {
                let bytes = self.reader.read(&path).await.map_err(|e| {
                    warn!(path = %path.display(), error = %e, "failed to read image file");
                    ExtractionError::FileRead(e)
                })?;
                debug!(bytes = bytes.len(), "encoding local image");
                Ok(data_uri(&bytes))
            }
        }
    }
}

/// Single user message: the fixed instruction followed by the image.
pub fn build_request(model: &str, image_url: String) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: vec![
                ContentPart::Text {
                    text: SYSTEM_PROMPT.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl { url: image_url },
                },
            ],
        }],
    }
}
