use thiserror::Error;
use validator::ValidationErrors;

/// Errors produced by the REST boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The session is not (or no longer) authenticated, even after the
    /// single silent token refresh the client is allowed to attempt.
    #[error("unauthorized")]
    Unauthorized,
    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status {
        /// HTTP status code of the response.
        status: u16,
        /// Message extracted from the response body, if any.
        message: String,
    },
    /// The request never completed (connection, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The response body was not the JSON shape we expected.
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Errors produced by the push channel.
#[derive(Debug, Error)]
pub enum PushError {
    /// Opening the WebSocket connection failed.
    #[error("push connect failed: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),
    /// The established connection broke while reading or writing.
    #[error("push transport error: {0}")]
    Transport(#[source] tokio_tungstenite::tungstenite::Error),
}

/// Top-level errors surfaced by the client engine.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A REST call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The push channel failed.
    #[error(transparent)]
    Push(#[from] PushError),
    /// Caller-provided input did not pass validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<ValidationErrors> for ClientError {
    fn from(err: ValidationErrors) -> Self {
        ClientError::InvalidInput(format!("validation failed: {err}"))
    }
}
