//! Remote chat completion calls.
//!
//! The session only needs one operation from the outside world: hand over the
//! conversation context and get back the model's reply text. That operation
//! lives behind [`CompletionBackend`] so the reply policy can be exercised
//! without a network; [`HttpBackend`] is the OpenAI-compatible implementation.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{error_summary, ChatCompletionResponse, ChatMessage, ChatRequest};
use crate::core::config::Settings;
use crate::core::constants::{REQUEST_TIMEOUT, TEMPERATURE};
use crate::utils::url::construct_api_url;

/// Why a completion call produced no reply.
#[derive(Debug)]
pub enum CompletionError {
    /// The endpoint answered with a non-success status code.
    Status { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    Timeout(Duration),

    /// Connection, TLS, or body transfer failure.
    Transport(String),

    /// The body was not a chat completion payload.
    Decode(String),

    /// The payload parsed but carried no `choices[0].message.content`.
    EmptyResponse,
}

impl CompletionError {
    /// The HTTP status for structured remote failures.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CompletionError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return CompletionError::Timeout(timeout);
        }

        let mut text = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !text.contains(&cause_text) {
                text.push_str(": ");
                text.push_str(&cause_text);
            }
            source = cause.source();
        }
        CompletionError::Transport(text)
    }
}

impl fmt::Display for CompletionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionError::Status { status, body } => match error_summary(body) {
                Some(summary) => write!(f, "API request failed with status {status}: {summary}"),
                None => write!(f, "API request failed with status {status}"),
            },
            CompletionError::Timeout(after) => {
                write!(f, "request timed out after {}s", after.as_secs_f64())
            }
            CompletionError::Transport(text) => write!(f, "{text}"),
            CompletionError::Decode(text) => write!(f, "invalid response body: {text}"),
            CompletionError::EmptyResponse => write!(f, "response contained no message content"),
        }
    }
}

impl StdError for CompletionError {}

/// Something that can turn a conversation context into a reply.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send the full context and return the raw (untrimmed) reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

/// OpenAI-compatible `chat/completions` client.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: TEMPERATURE,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            construct_api_url(&settings.base_url, "chat/completions"),
            settings.api_key.clone(),
            settings.model.clone(),
        )
        .with_timeout(settings.timeout)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionBackend for HttpBackend {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        // The client lives for this call only and is dropped on every return path.
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| CompletionError::from_reqwest(err, self.timeout))?;

        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
        };

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            messages = messages.len(),
            "sending chat completion request"
        );

        let response = client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| CompletionError::from_reqwest(err, self.timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| CompletionError::from_reqwest(err, self.timeout))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "chat completion request rejected");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|err| CompletionError::Decode(err.to_string()))?;

        parsed
            .first_content()
            .map(str::to_owned)
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests;
