use serde::{Deserialize, Serialize};

// ── Chat-completion wire types ───────────────────────────────────────────────

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

/// One unit of a multimodal message.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ImageUrl {
    pub url: String,
}

impl ChatRequest {
    /// URL of the first image part, if the request carries one.
    pub fn image_url(&self) -> Option<&str> {
        self.messages
            .iter()
            .flat_map(|m| m.content.iter())
            .find_map(|part| match part {
                ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
                ContentPart::Text { .. } => None,
            })
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first candidate, if present and non-empty.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|s| !s.is_empty())
    }
}

// ── HTTP service bodies ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OcrRequest {
    #[serde(default)]
    pub file_path: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OcrResponse {
    pub markdown: String,
}
