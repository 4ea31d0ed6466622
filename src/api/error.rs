//! The single error shape surfaced by the API client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when the response body carries no usable error text.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Message used when no response was received at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Normalized failure of an API call.
///
/// Every failed call resolves to exactly one of these, whether the backend
/// answered with an error status, the response could not be decoded, or the
/// request never got a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Transport attempts made before giving up. `1` means no retry happened,
    /// `0` means the request was rejected before it was sent.
    pub attempts: u32,
}

/// Known error body layouts. FastAPI uses `detail`, other handlers use
/// `message` or `error`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl ErrorEnvelope {
    /// Only JSON objects qualify; serde would otherwise fill the fields of
    /// an array body by position.
    fn parse(data: &Value) -> Option<Self> {
        data.as_object()?;
        ErrorEnvelope::deserialize(data).ok()
    }

    /// First non-empty string among `detail`, `message`, `error`.
    fn message(&self) -> Option<String> {
        [&self.detail, &self.message, &self.error]
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }
}

/// Interprets a raw response body: JSON when it parses, the text itself
/// otherwise, nothing when empty.
pub(crate) fn parse_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}

impl ApiError {
    /// Builds the error for a response with a failing status.
    pub fn from_response(status: u16, body: &str, attempts: u32) -> Self {
        let data = parse_body(body);
        let message = data
            .as_ref()
            .and_then(ErrorEnvelope::parse)
            .and_then(|envelope| envelope.message())
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());

        Self {
            message,
            status: Some(status),
            data,
            attempts,
        }
    }

    /// Builds the error for a request that never received a response.
    pub fn network(attempts: u32) -> Self {
        Self {
            message: NETWORK_ERROR_MESSAGE.to_string(),
            status: None,
            data: None,
            attempts,
        }
    }

    /// Builds the error for a success response whose body didn't match the
    /// expected payload type.
    pub fn decode(status: u16, body: &str, reason: &str, attempts: u32) -> Self {
        Self {
            message: format!("Failed to parse response: {}", reason),
            status: Some(status),
            data: parse_body(body),
            attempts,
        }
    }

    /// Builds the error for a request rejected before it was sent.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            data: None,
            attempts: 0,
        }
    }

    /// True if at least one retry was made before failing.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {})", self.message, status),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}
