use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong";

/// Every failure of a remote call. `Display` is the message shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status(),
            ApiError::Decode(_) => None,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<Value>,
}

/// Pulls the server-provided message out of an error body, falling back to
/// [`GENERIC_ERROR_MESSAGE`].
pub fn extract_message(body: &[u8]) -> String {
    let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) else {
        return GENERIC_ERROR_MESSAGE.to_owned();
    };
    if let Some(message) = parsed.message.filter(|m| !m.trim().is_empty()) {
        return message;
    }
    match parsed.detail {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail,
        Some(Value::Array(items)) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .map(str::to_owned)
            .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_owned()),
        _ => GENERIC_ERROR_MESSAGE.to_owned(),
    }
}
