//! Error types for GA4 API calls.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the GA4 APIs.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service-account key could not be read or used.
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    /// The OAuth2 token exchange failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The API answered with an error status.
    #[error("API returned status {status}: {message}")]
    Api {
        status: u16,
        /// Canonical status such as `PERMISSION_DENIED` or `ALREADY_EXISTS`.
        code: Option<String>,
        message: String,
    },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,
}

impl ClientError {
    /// Whether the API rejected a create because the resource already exists.
    pub fn is_already_exists(&self) -> bool {
        match self {
            ClientError::Api {
                status,
                code,
                message,
            } => {
                let message = message.to_lowercase();
                *status == 409
                    || code.as_deref() == Some("ALREADY_EXISTS")
                    || message.contains("already exists")
                    || message.contains("duplicate")
            }
            _ => false,
        }
    }

    /// Build an [`ClientError::Api`] from a status code and raw error body.
    ///
    /// Google APIs wrap errors as `{"error": {"code", "message", "status"}}`;
    /// anything else is reported verbatim.
    pub fn from_api_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorEnvelope>(body) {
            Ok(envelope) => ClientError::Api {
                status,
                code: envelope.error.status,
                message: envelope.error.message,
            },
            Err(_) => ClientError::Api {
                status,
                code: None,
                message: body.trim().to_string(),
            },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}
