// mentor-service-rs/src/llm_client.rs
//
// HTTP client for the chat-completion provider (OpenAI-compatible API)
//
// This module provides:
// - A single synchronous completion call per feedback request via reqwest
// - An explicit, configurable upstream timeout with a dedicated error kind
// - Error classification for operator logs; callers collapse every failure
//   to one generic wire response
//
// Configuration (.env file):
// - LLM_API_KEY: API key for the completion provider
// - LLM_API_URL: API endpoint URL (defaults to the OpenAI chat completions endpoint)
// - LLM_MODEL: Model to use (default: "gpt-4.1-mini")
// - LLM_TIMEOUT_SECS: Upstream request timeout in seconds (default: 60)

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Sampling temperature for feedback requests. Low on purpose: feedback
/// should stay focused and repeatable.
pub const FEEDBACK_TEMPERATURE: f32 = 0.3;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

// Custom error type for completion client operations
// The classification exists for the operator log; the analyze endpoint maps
// every variant to the same generic 500 response.
#[derive(Debug)]
pub enum LLMError {
    InvalidRequest(String),    // 400, 401, 403, 404 - won't be fixed by retrying
    RateLimitExceeded(String), // 429
    ServerError(String),       // 500, 502, 503, 504 from the provider
    NetworkError(String),      // connection issues, transport failures
    Timeout(String),           // upstream call exceeded the configured deadline
    ParseError(String),        // malformed provider response
    UnknownError(String),      // any other unclassified failure
}

impl std::fmt::Display for LLMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            LLMError::RateLimitExceeded(msg) => write!(f, "Rate limit exceeded: {}", msg),
            LLMError::ServerError(msg) => write!(f, "Server error: {}", msg),
            LLMError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            LLMError::Timeout(msg) => write!(f, "Timeout: {}", msg),
            LLMError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            LLMError::UnknownError(msg) => write!(f, "Unknown error: {}", msg),
        }
    }
}

impl std::error::Error for LLMError {}

#[derive(Debug)]
pub struct LLMClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl LLMClient {
    /// Creates a new LLMClient instance with configuration from environment
    /// variables.
    ///
    /// A missing API key is logged as a warning here and surfaces as a
    /// failure on the first feedback request, not at startup.
    pub fn new() -> Self {
        let api_url = env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let timeout_secs = env::var("LLM_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let api_key = env::var("LLM_API_KEY").unwrap_or_default();
        if api_key.is_empty() {
            log::warn!("LLM_API_KEY is not set; feedback requests will fail until it is provided");
        }

        Self::with_config(api_url, api_key, model, Duration::from_secs(timeout_secs))
    }

    /// Construct a client against an explicit endpoint. Tests use this to
    /// point the client at a stub server.
    pub fn with_config(api_url: String, api_key: String, model: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        log::info!("LLM client initialized for {} (model: {})", api_url, model);

        Self {
            client,
            api_key,
            api_url,
            model,
        }
    }

    /// Check if the completion credential is available
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Request feedback text from the completion provider.
    ///
    /// Sends exactly one chat-completion request: the system instruction,
    /// the prepared prompt as the user message, and the fixed low sampling
    /// temperature. Returns the first choice's message text, or an empty
    /// string when the provider returns no choices or no content - that case
    /// is not an error, the caller substitutes its fallback text. Failures
    /// are classified and never retried.
    pub async fn generate_feedback(
        &self,
        system_prompt: &str,
        prompt: &str,
    ) -> Result<String, LLMError> {
        if self.api_key.is_empty() {
            return Err(LLMError::InvalidRequest("API key is not set".to_string()));
        }

        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: Some(FEEDBACK_TEMPERATURE),
        };

        log::info!(
            "Sending completion request to {} (model: {})",
            self.api_url,
            self.model
        );

        let response = match self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                return if err.is_timeout() {
                    Err(LLMError::Timeout(format!("Request timed out: {}", err)))
                } else if err.is_connect() {
                    Err(LLMError::NetworkError(format!("Connection failed: {}", err)))
                } else {
                    Err(LLMError::NetworkError(format!("Network error: {}", err)))
                };
            }
        };

        // Handle HTTP status codes
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return match status.as_u16() {
                400 => Err(LLMError::InvalidRequest(format!("Bad request: {}", text))),
                401 => Err(LLMError::InvalidRequest(format!("Unauthorized: {}", text))),
                403 => Err(LLMError::InvalidRequest(format!("Forbidden: {}", text))),
                404 => Err(LLMError::InvalidRequest(format!("Not found: {}", text))),
                429 => Err(LLMError::RateLimitExceeded(format!(
                    "Rate limit exceeded: {}",
                    text
                ))),
                500 | 502 | 503 | 504 => Err(LLMError::ServerError(format!(
                    "Server error ({}): {}",
                    status, text
                ))),
                _ => Err(LLMError::UnknownError(format!(
                    "Unknown error ({}): {}",
                    status, text
                ))),
            };
        }

        // Parse the successful response
        let data: ChatCompletionResponse = match response.json().await {
            Ok(data) => data,
            Err(err) => {
                return Err(LLMError::ParseError(format!(
                    "Failed to parse response: {}",
                    err
                )))
            }
        };

        // Log token usage if available
        if let Some(usage) = &data.usage {
            log::info!("Completion request finished. Used {} tokens", usage.total_tokens);
        }

        Ok(data
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
