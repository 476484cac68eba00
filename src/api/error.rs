//! Error types for backend calls.

use thiserror::Error;

/// Backend client error type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Response body did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing, expired or rejected access token (401 or `token_not_valid`).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Backend returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },
}

impl ApiError {
    /// Text suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } | Self::Unauthorized(message) => message.clone(),
            Self::Http(err) if err.is_timeout() => "The server took too long to respond".into(),
            Self::Http(_) => "Could not reach the server".into(),
            Self::InvalidUrl(_) | Self::Json(_) => "Unexpected response from the server".into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Result type alias for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_surface_backend_message() {
        let err = ApiError::Api {
            status: 400,
            message: "Name is required".into(),
        };
        assert_eq!(err.user_message(), "Name is required");
        assert_eq!(err.to_string(), "API error (400): Name is required");
        assert!(!err.is_unauthorized());
    }
}
