//! Client error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client errors
///
/// Every failure aborts the call it happened in. Nothing is retried and no
/// partial result is ever handed back alongside an error.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The HTTP exchange did not deliver a complete response body
    #[error("transport failure: {0}")]
    Transport(String),

    /// The response body is not a JSON document
    #[error("malformed response: {message}\nInput JSON:\n{body}")]
    MalformedResponse { message: String, body: String },

    /// One line of a newline-delimited JSON body is not a JSON document
    #[error("malformed response, line {line}: {message}\nInput JSON:\n{body}")]
    MalformedLine {
        line: usize,
        message: String,
        body: String,
    },

    /// A well-formed response lacks a field the call depends on
    #[error("unexpected reply: valid JSON, but without the \"{field}\" property:\n{document}")]
    MissingField {
        field: &'static str,
        document: String,
    },

    /// An add-progress record carries no file name
    #[error("unexpected reply: valid JSON, but without the \"Name\" property on line {line}:\n{body}")]
    MissingName { line: usize, body: String },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Check if the failure happened in the network exchange
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Check if the daemon answered with something we could not decode
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedResponse { .. }
                | Self::MalformedLine { .. }
                | Self::MissingField { .. }
                | Self::MissingName { .. }
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Transport(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ClientError::Transport(format!("connection failed: {}", err))
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Transport(format!("io error: {}", err))
    }
}
