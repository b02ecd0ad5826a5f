//! Error types for vaultbank-api

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message}")]
    Unauthorized { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    BadRequest { message: String },

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {message}")]
    Transport { message: String },

    #[error("Unexpected response: {message}")]
    Decode { message: String },

    #[error("Could not read {path}: {message}")]
    Io { path: String, message: String },
}

impl ApiError {
    /// Map a failed response. The backend's `message` field wins; otherwise
    /// the raw body, otherwise the caller's `fallback`.
    pub fn from_response(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty() && !trimmed.starts_with('<')).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| fallback.to_string());

        match status {
            400 | 422 => ApiError::BadRequest { message },
            401 | 403 => ApiError::Unauthorized { message },
            404 => ApiError::NotFound { message },
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Http { status, message },
        }
    }

    /// The session token was rejected and a new login is needed
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode {
                message: error.to_string(),
            }
        } else {
            ApiError::Transport {
                message: error.to_string(),
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
