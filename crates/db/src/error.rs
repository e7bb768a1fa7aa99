//! Error types for client construction and initialization.

use std::fmt;

use thiserror::Error;

use crate::config::MissingConfig;

/// Coarse classification of a construction failure, used in logs and in
/// [`Unavailable`](crate::Unavailable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A configuration value was rejected before any I/O.
    Malformed,
    /// The service refused the credentials.
    Auth,
    /// The service could not be reached.
    Network,
    /// The client itself failed unexpectedly.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Malformed => "malformed",
            ErrorKind::Auth => "auth",
            ErrorKind::Network => "network",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised by a [`Connector`](crate::Connector) while building the app or client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("invalid `{field}`: {reason}")]
    InvalidOption { field: &'static str, reason: String },

    #[error("credentials rejected: {0}")]
    Rejected(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("client panicked: {0}")]
    Internal(String),
}

impl ClientError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::InvalidOption { .. } => ErrorKind::Malformed,
            ClientError::Rejected(_) => ErrorKind::Auth,
            ClientError::Transport(_) => ErrorKind::Network,
            ClientError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Why [`try_initialize`](crate::try_initialize) produced no handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error(transparent)]
    MissingConfig(#[from] MissingConfig),

    #[error("failed to construct Firestore client: {0}")]
    Construction(#[from] ClientError),
}
