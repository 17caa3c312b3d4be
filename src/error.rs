//! Error types for Takhrij

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TakhrijError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Commentary unavailable: {0}")]
    CommentaryUnavailable(String),

    #[error("Reference data error: {0}")]
    ReferenceData(String),
}

impl serde::Serialize for TakhrijError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Why a single call to the remote service did not produce a usable body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceFailure {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Service returned HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceFailure::Timeout
        } else if e.is_decode() {
            ServiceFailure::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            ServiceFailure::Status(status.as_u16())
        } else {
            ServiceFailure::Transport(e.to_string())
        }
    }
}

impl serde::Serialize for ServiceFailure {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
