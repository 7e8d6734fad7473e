//! Error handling for domain quoting operations.
//!
//! This module defines the error type shared by the whole library, from
//! transport failures against the registrar to invalid input and bad
//! configuration files.
//!
//! A domain that simply cannot be ordered is *not* an error; see
//! [`crate::QuoteFailure::NotOrderable`].

use std::fmt;
use std::time::Duration;

/// Main error type for domain quoting operations.
#[derive(Debug, Clone)]
pub enum DomainQuoteError {
    /// Invalid domain name format
    InvalidDomain { domain: String, reason: String },

    /// Transport or HTTP-level failure (connection, non-success status, etc.)
    NetworkError {
        message: String,
        source: Option<String>,
        status_code: Option<u16>,
    },

    /// The registrar answered, but not with the shape we expect
    MalformedResponse {
        context: String,
        message: String,
    },

    /// Configuration errors (invalid settings, bad TOML, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading domain lists or config files
    FileError { path: String, message: String },

    /// Timeout errors when a request takes too long
    Timeout {
        operation: String,
        duration: Duration,
    },
}

impl DomainQuoteError {
    /// Create a new invalid domain error.
    pub fn invalid_domain<D: Into<String>, R: Into<String>>(domain: D, reason: R) -> Self {
        Self::InvalidDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
            status_code: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
            status_code: None,
        }
    }

    /// Create a new network error carrying the HTTP status that caused it.
    pub fn network_with_status<M: Into<String>>(message: M, status_code: u16) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
            status_code: Some(status_code),
        }
    }

    /// Create a new malformed response error.
    pub fn malformed<C: Into<String>, M: Into<String>>(context: C, message: M) -> Self {
        Self::MalformedResponse {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from talking to the registrar (as opposed to
    /// local input or configuration problems).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::MalformedResponse { .. } | Self::Timeout { .. }
        )
    }
}

impl fmt::Display for DomainQuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDomain { domain, reason } => {
                write!(f, "Invalid domain '{}': {}", domain, reason)
            }
            Self::NetworkError {
                message,
                source,
                status_code,
            } => {
                write!(f, "Network error: {}", message)?;
                if let Some(code) = status_code {
                    write!(f, " (HTTP {})", code)?;
                }
                if let Some(source) = source {
                    write!(f, " (source: {})", source)?;
                }
                Ok(())
            }
            Self::MalformedResponse { context, message } => {
                write!(f, "Malformed response for {}: {}", context, message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
        }
    }
}

impl std::error::Error for DomainQuoteError {}

// Implement From conversions for common error types
impl From<serde_json::Error> for DomainQuoteError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed("JSON body", err.to_string())
    }
}

impl From<regex::Error> for DomainQuoteError {
    fn from(err: regex::Error) -> Self {
        Self::config(format!("Invalid regular expression: {}", err))
    }
}
