//! Unified error type for txt2img.

use thiserror::Error;

/// Errors that can occur while talking to the image service or running the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with a non-success status.
    #[error("Service error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered 2xx but the body was not the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A recorded error, or a cassette that ran out of interactions.
    #[error("Replayed error: {0}")]
    Replayed(String),
}
