//! Client for the hosted language model.
//!
//! The rest of the crate only sees [`ModelClient::send_prompt`]; transport, authentication
//! and model selection stay here.

use crate::config::ModelConfig;
use futures::future::{BoxFuture, FutureExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Errors from a model call.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the API
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Body that could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Decoded body without any text
    #[error("model returned no text")]
    EmptyResponse,

    /// No API key configured
    #[error("missing API key: {0}")]
    MissingApiKey(String),

    /// The call could not be started, e.g. no async runtime is available
    #[error("model call could not be started: {0}")]
    Dispatch(String),
}

/// Asynchronous request/response call to a language model.
pub trait ModelClient: Send + Sync {
    /// Sends one prompt and resolves to the model's text reply.
    fn send_prompt<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ModelError>>;
}

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents, oldest first
    pub contents: Vec<Content>,
    /// Sampling parameters
    pub generation_config: GenerationConfig,
}

/// One message of a request or candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Message fragments
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A text fragment of a [`Content`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    /// Text of the fragment, absent for non-text parts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling parameters.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Output token cap
    pub max_output_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

/// Response body of `generateContent`.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    /// Generated answers, best first
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated answer.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    /// Answer body, absent when blocked
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    config: ModelConfig,
}

impl GeminiClient {
    /// Creates a client for the given configuration.
    pub fn new(config: ModelConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Builds the request body for a single-turn prompt.
    pub fn build_request(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
            },
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Sends a prompt to the model and returns its text.
    pub async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ModelError::MissingApiKey("GOOGLE_API_KEY not set".into()))?;

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&self.build_request(prompt))
            .send()
            .await?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_else(|_| "(no body)".into());
            return Err(ModelError::Api {
                status,
                message: body,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("failed to parse response: {e}")))?;

        body.text().ok_or(ModelError::EmptyResponse)
    }
}

impl ModelClient for GeminiClient {
    fn send_prompt<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, ModelError>> {
        self.generate(prompt).boxed()
    }
}
