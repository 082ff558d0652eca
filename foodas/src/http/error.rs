use reqwest::{Response, StatusCode};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 401 that could not be recovered by a token refresh
    #[error("Authentication required")]
    Unauthorized { body: Option<Value> },

    #[error("Request failed with status {status}")]
    Status { status: StatusCode, body: Option<Value> },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Session storage error: {0}")]
    Storage(#[from] shared::Error),
}

impl ApiError {
    /// Build an error from a non-success response, keeping its JSON body if it has one
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let body = match response.bytes().await {
            Ok(bytes) if !bytes.is_empty() => serde_json::from_slice::<Value>(&bytes).ok(),
            _ => None,
        };

        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized { body }
        } else {
            ApiError::Status { status, body }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Unauthorized { body } | ApiError::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Human-readable message for showing next to a form.
    ///
    /// Fields in `preferred` are tried in order, then `detail`, then
    /// `non_field_errors`, then any other field; `fallback` when the body
    /// carries nothing usable.
    pub fn user_message(&self, preferred: &[&str], fallback: &str) -> String {
        self.body()
            .and_then(|body| extract_message(body, preferred))
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Pull the first human-readable message out of a DRF-style error body.
pub fn extract_message(body: &Value, preferred: &[&str]) -> Option<String> {
    match body {
        Value::String(s) => non_empty(s),
        Value::Array(items) => items.iter().find_map(first_text),
        Value::Object(map) => preferred
            .iter()
            .chain(["detail", "non_field_errors"].iter())
            .find_map(|key| map.get(*key).and_then(first_text))
            .or_else(|| map.values().find_map(first_text)),
        _ => None,
    }
}

/// `"msg"` or `["msg", ...]`
fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(s) => non_empty(s),
            _ => None,
        }),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
