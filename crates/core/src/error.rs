//! Error types for call evaluation

use thiserror::Error;

use crate::scores::MetricKind;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for call evaluation
#[derive(Error, Debug)]
pub enum Error {
    /// An external model answered, but the answer could not be parsed or validated
    #[error("Malformed output from {service}: {message}")]
    MalformedExternalOutput { service: String, message: String },

    /// An external collaborator returned a non-success status or was unreachable
    #[error("{service} unavailable (status {status}): {message}")]
    UpstreamUnavailable {
        service: String,
        status: u16,
        message: String,
    },

    /// The caller supplied an invalid transcript or upload
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Embedding errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// A metric task failed or panicked
    #[error("Metric {metric} failed: {message}")]
    MetricFailed { metric: MetricKind, message: String },

    /// A sub-score never arrived at the aggregator
    #[error("Missing sub-score for {0}")]
    MissingScore(MetricKind),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Coarse classification used to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself was bad
    BadInput,
    /// An external service failed or misbehaved
    Upstream,
    /// Anything else
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::BadInput => "bad_input",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Internal => "internal",
        }
    }
}

impl Error {
    /// Create a generic error from a string
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Create a malformed-output error for the named service
    pub fn malformed<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Error::MalformedExternalOutput {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create an upstream error for the named service
    pub fn upstream<S: Into<String>, M: Into<String>>(service: S, status: u16, message: M) -> Self {
        Error::UpstreamUnavailable {
            service: service.into(),
            status,
            message: message.into(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::BadInput,
            Error::MalformedExternalOutput { .. } | Error::UpstreamUnavailable { .. } => {
                ErrorKind::Upstream
            }
            Error::MetricFailed { .. }
            | Error::MissingScore(_)
            | Error::Embedding(_)
            | Error::Config(_)
            | Error::Io(_)
            | Error::Serialization(_)
            | Error::Other(_) => ErrorKind::Internal,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
