use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::config::Config;
use crate::models::{ChatRequest, ChatResponse};

const USER_AGENT: &str = "vision-ocr/0.1";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("The GROQ_API_KEY environment variable is missing or empty; either provide it, or pass an API key explicitly")]
    MissingApiKey,
    #[error("{0}")]
    Request(String),
    #[error("{status} {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid response body: {0}")]
    Decode(String),
}

// ── Client seam ──────────────────────────────────────────────────────────────

/// A chat-completion endpoint that accepts mixed text and image content.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Whether calls without a credential are rejected outright.
    fn requires_credential(&self) -> bool {
        true
    }

    async fn complete(
        &self,
        credential: Option<&str>,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ClientError>;
}

/// OpenAI-compatible client for the Groq chat-completions API.
pub struct GroqClient {
    http: reqwest::Client,
    base_url: String,
}

impl GroqClient {
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let http = reqwest::ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ClientError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl VisionClient for GroqClient {
    async fn complete(
        &self,
        credential: Option<&str>,
        request: &ChatRequest,
    ) -> Result<ChatResponse, ClientError> {
        let api_key = credential.ok_or(ClientError::MissingApiKey)?;

        debug!(model = %request.model, endpoint = %self.endpoint(), "sending chat completion");

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Request(format!("TimeoutError: {}", e))
                } else if e.is_connect() {
                    ClientError::Request(format!("ConnectError: {}", e))
                } else {
                    ClientError::Request(format!("RequestError: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}
