//! Transport error types

use thiserror::Error;

/// Transport error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
    /// HTTP status, when the endpoint answered
    pub status: Option<u16>,
}

impl TransportError {
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::NetworkFailure, message)
    }

    #[must_use]
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(TransportErrorKind::NonSuccessStatus, message)
        }
    }

    #[must_use]
    pub fn no_candidates() -> Self {
        Self::new(TransportErrorKind::NoCandidates, "No candidates in response")
    }
}

/// Error classification for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection, timeout, or unreadable envelope
    NetworkFailure,
    /// Endpoint answered with a non-2xx status
    NonSuccessStatus,
    /// Envelope carried no candidate text
    NoCandidates,
}

impl TransportErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NetworkFailure => "network_failure",
            Self::NonSuccessStatus => "non_success_status",
            Self::NoCandidates => "no_candidates",
        }
    }
}
