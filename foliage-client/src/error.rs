//! Error types for the Foliage clients

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the backend or the EOP services
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Remote side answered with a non-2xx status
    #[error("Request to {url} failed (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Target URL
        url: String,
        /// Raw response body
        message: String,
    },

    /// Remote side answered 2xx but reported a processing failure
    #[error("Processing failed for request to {url}: {message}")]
    Application {
        /// Target URL
        url: String,
        /// Error description from the envelope
        message: String,
    },

    /// Local file could not be read or written
    #[error("File transfer failed for {}: {source}", path.display())]
    Transfer {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// A configured URL is malformed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Overall wait bound reached while a job was still running
    #[error("Gave up waiting for {url} after {waited:?}")]
    PollTimedOut { url: String, waited: Duration },
}

impl ClientError {
    /// Create an API error from status code, url and body
    pub fn api_error(status: u16, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a transfer error for a local path
    pub fn transfer(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Transfer {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
