//! Remote service errors, translated once at the HTTP boundary

use serde_json::Value;
use thiserror::Error;

/// Closed set of failures the remote service can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("rate limited")]
    RateLimited,

    #[error("payload too large")]
    PayloadTooLarge,

    #[error("{}", .message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    Other {
        status: Option<u16>,
        message: Option<String>,
    },
}

/// Shown when neither a nested nor a top-level message is available.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Translate a non-success response into an `ApiError`.
    ///
    /// The tag comes from the body's `error.type` / `error.code` when present,
    /// otherwise from the HTTP status. `resource` names what was requested and
    /// stands in for a missing not-found message.
    pub fn from_response(status: u16, body: &str, resource: &str) -> Self {
        let json: Option<Value> = serde_json::from_str(body).ok();
        let message = json.as_ref().and_then(extract_message);
        let tag = json.as_ref().and_then(extract_tag);

        let tag = tag
            .as_deref()
            .map(normalize_tag)
            .filter(|t| *t != Tag::Unknown)
            .unwrap_or_else(|| status_tag(status));

        match tag {
            Tag::Unauthorized => Self::Unauthorized {
                message: message.unwrap_or_else(|| "invalid or missing API key".to_string()),
            },
            Tag::NotFound => Self::NotFound {
                message: message.unwrap_or_else(|| resource.to_string()),
            },
            Tag::RateLimited => Self::RateLimited,
            Tag::PayloadTooLarge => Self::PayloadTooLarge,
            Tag::Unknown => Self::Other {
                status: Some(status),
                message: message.or_else(|| non_json_message(body)),
            },
        }
    }

    /// Wrap a transport-level failure (DNS, TLS, connection reset, bad JSON).
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Other {
            status: None,
            message: Some(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Unauthorized,
    NotFound,
    RateLimited,
    PayloadTooLarge,
    Unknown,
}

fn status_tag(status: u16) -> Tag {
    match status {
        401 | 403 => Tag::Unauthorized,
        404 => Tag::NotFound,
        413 => Tag::PayloadTooLarge,
        429 => Tag::RateLimited,
        _ => Tag::Unknown,
    }
}

fn normalize_tag(raw: &str) -> Tag {
    let tag = raw.to_ascii_lowercase().replace(['-', ' '], "_");
    let tag = tag.trim_end_matches("_error");
    match tag {
        "unauthorized" | "unauthenticated" | "forbidden" => Tag::Unauthorized,
        "not_found" => Tag::NotFound,
        "rate_limited" | "rate_limit" | "too_many_requests" => Tag::RateLimited,
        "payload_too_large" | "request_too_large" => Tag::PayloadTooLarge,
        _ => Tag::Unknown,
    }
}

/// Nested `error.message` wins over top-level `message`; a bare string
/// `error` field counts as nested.
fn extract_message(json: &Value) -> Option<String> {
    let nested = match json.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(obj) => obj.get("message").and_then(Value::as_str).map(str::to_string),
        None => None,
    };
    nested
        .or_else(|| json.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|m| !m.trim().is_empty())
}

fn extract_tag(json: &Value) -> Option<String> {
    let error = json.get("error")?;
    error
        .get("type")
        .or_else(|| error.get("code"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn non_json_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with('{') || trimmed.starts_with('<') {
        None
    } else {
        Some(trimmed.to_string())
    }
}
