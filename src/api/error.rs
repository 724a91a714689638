//! Error types for the REST client.

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for API calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure of a single request against the patient services API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Server {
        status: u16,
        /// `message` field of the JSON error body, when the server sent one.
        message: Option<String>,
    },

    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The request thread went away without answering.
    #[error("Request was interrupted")]
    Interrupted,
}

impl ApiError {
    /// The text shown to the user for this failure.
    ///
    /// Prefers the message supplied by the server over the generic one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Extracts the `message` field from an error response body.
pub(crate) fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_status_text() {
        let err = ApiError::Server {
            status: 404,
            message: Some("Patient not found with id 9".to_string()),
        };
        assert_eq!(err.user_message(), "Patient not found with id 9");
    }

    #[test]
    fn status_text_is_the_fallback() {
        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), "Request failed with status code 500");
    }

    #[test]
    fn message_is_read_from_spring_style_body() {
        let body = r#"{"timestamp":"2024-01-01T00:00:00","status":400,"error":"Bad Request","message":"age must be positive"}"#;
        assert_eq!(server_message(body).as_deref(), Some("age must be positive"));
    }

    #[test]
    fn blank_or_missing_message_is_ignored() {
        assert_eq!(server_message(r#"{"message":""}"#), None);
        assert_eq!(server_message(r#"{"error":"Bad Request"}"#), None);
        assert_eq!(server_message("<html>oops</html>"), None);
    }
}
