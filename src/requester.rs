use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde_json::Value;

use crate::prompt::build_prompt;

/// LM Studio's chat-completions route on its standard port.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:1234/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "local-model";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 200;
const MESSAGE_POINTERS: [&str; 3] = ["/choices/0/message/content", "/content", "/response"];

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ApiError,
    ConnectionError,
    UnknownError,
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("endpoint returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("service unreachable")]
    Connection,

    #[error("{0}")]
    Unknown(String),
}

impl RequestError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Api { .. } => FailureKind::ApiError,
            Self::Connection => FailureKind::ConnectionError,
            Self::Unknown(_) => FailureKind::UnknownError,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::Api { status, body } => format!("Status: {}\nResponse: {body}", status.as_u16()),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Connection
        } else if err.is_timeout() {
            Self::Unknown(format!("request timed out waiting for the endpoint ({err})"))
        } else {
            Self::Unknown(err.to_string())
        }
    }
}

/// Terminal result of one request: the extracted message or a classified failure.
pub type RequestOutcome = Result<String, RequestError>;

/// Anything that can turn ten words into one message.
///
/// Implementations block until the outcome is known; callers that must stay
/// responsive run them through [`crate::relay::spawn_request`].
pub trait MessageSource: Send + Sync {
    fn request_message(&self, words: &[String]) -> RequestOutcome;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequesterConfig {
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Blocking client for an OpenAI-compatible chat-completions endpoint.
pub struct MessageRequester {
    http: HttpClient,
    config: RequesterConfig,
}

impl MessageRequester {
    pub fn new(config: RequesterConfig) -> Result<Self, RequestError> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &RequesterConfig {
        &self.config
    }

    fn send(&self, prompt: &str) -> RequestOutcome {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        };

        let resp = self
            .http
            .post(&self.config.endpoint)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&request)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .unwrap_or_else(|_| "Could not read response text".to_string());
            return Err(RequestError::Api { status, body });
        }

        let body = resp.text()?;
        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| RequestError::Unknown(format!("invalid JSON response: {e}")))?;
        Ok(extract_message(&parsed))
    }
}

impl MessageSource for MessageRequester {
    fn request_message(&self, words: &[String]) -> RequestOutcome {
        log::info!("requesting message from {}", self.config.endpoint);
        let outcome = self.send(&build_prompt(words));
        match &outcome {
            Ok(message) => log::info!("received message ({} chars)", message.len()),
            Err(e) => log::warn!("request failed ({:?}): {e}", e.kind()),
        }
        outcome
    }
}

/// Pull the reply text out of a response body.
///
/// Tries the chat-completions shape first, then bare `content` and
/// `response` fields. Unknown shapes are rendered whole rather than dropped.
pub fn extract_message(body: &Value) -> String {
    let field = MESSAGE_POINTERS
        .iter()
        .filter_map(|pointer| body.pointer(pointer))
        .find(|value| !value.is_null());

    render_value(field.unwrap_or(body))
}

fn render_value(value: &Value) -> String {
    value
        .as_str()
        .map_or_else(|| value.to_string(), str::to_owned)
}
