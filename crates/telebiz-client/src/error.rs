//! Error types for the API client.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from talking to the Telebiz backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success status without a recognizable validation body.
    #[error("API error {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The backend rejected the payload.
    #[error("validation failed: {message}")]
    Validation {
        /// Top-level message.
        message: String,
        /// Per-field messages, keyed by field name.
        errors: Map<String, Value>,
    },

    /// Response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Missing or malformed client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// `{"message": "...", "errors": {...}}` as returned by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ValidationPayload {
    pub message: String,
    #[serde(default)]
    pub errors: Map<String, Value>,
}

impl From<ValidationPayload> for ClientError {
    fn from(payload: ValidationPayload) -> Self {
        Self::Validation {
            message: payload.message,
            errors: payload.errors,
        }
    }
}

/// Extracts a validation payload embedded in free text, e.g.
/// `Request failed: 422 {"message": "Invalid", "errors": {...}}`.
pub fn unpack_validation_error(text: &str) -> Option<ValidationPayload> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

impl ClientError {
    /// Text suitable for showing to the person who submitted the form.
    ///
    /// Validation payloads, including ones embedded in a status body, are
    /// rendered as the message followed by one line per field error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, errors } => render_validation(message, errors),
            Self::Status { body, .. } => match unpack_validation_error(body) {
                Some(payload) => render_validation(&payload.message, &payload.errors),
                None => self.to_string(),
            },
            other => other.to_string(),
        }
    }
}

fn render_validation(message: &str, errors: &Map<String, Value>) -> String {
    let mut out = message.to_string();
    for (field, detail) in errors {
        let detail = match detail {
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        };
        out.push_str(&format!("\n- {}: {}", field, detail));
    }
    out
}
