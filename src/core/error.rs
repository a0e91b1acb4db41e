use crate::config::Provider;
use std::io;
use thiserror::Error;

/// Unified error type for the duochat application
#[derive(Error, Debug)]
pub enum ChatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// A reply is still outstanding for this conversation
    #[error("Still waiting for the previous reply")]
    Busy,

    /// Submitted text was blank after trimming
    #[error("Nothing to send")]
    EmptyInput,

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Unknown or unexpected errors
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for ChatError {
    fn from(err: serde_yml::Error) -> Self {
        ChatError::Serialization(format!("YAML error: {}", err))
    }
}

impl From<String> for ChatError {
    fn from(err: String) -> Self {
        ChatError::Unknown(err)
    }
}

impl From<&str> for ChatError {
    fn from(err: &str) -> Self {
        ChatError::Unknown(err.to_string())
    }
}

/// Why a single request to a provider did not yield text.
///
/// Every variant ends up in the transcript as an assistant message, so the
/// `Display` output is what the user reads.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No usable API key; the request was never sent
    #[error("Error: {provider} API key not configured")]
    MissingCredential { provider: Provider },

    /// The request did not complete at the transport level
    #[error("Network Error: {0}")]
    Transport(String),

    /// The body was not JSON
    #[error("Error: Failed to parse {provider} response")]
    MalformedBody { provider: Provider },

    /// JSON without the expected success fields
    #[error("Error: Invalid {provider} response format")]
    InvalidFormat { provider: Provider },

    /// The provider answered with its own error object
    #[error("{provider} API Error: {message}")]
    Api { provider: Provider, message: String },

    #[error("Error: Request cancelled")]
    Cancelled,
}

impl DispatchError {
    pub fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            DispatchError::Transport(format!("Connection failed: {}", err))
        } else {
            DispatchError::Transport(format!("Request failed: {}", err))
        }
    }
}
