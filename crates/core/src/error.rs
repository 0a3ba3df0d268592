//! Error types raised by faultline itself
//!
//! These are programmer errors (misuse of the builder, an unrecognized kind
//! literal), not [`ErrorRecord`](crate::ErrorRecord)s.

use thiserror::Error;

use crate::kind::ErrorKind;

/// Failure to build an error record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// `build()` was called before `message()`
    #[error("cannot build {kind} error: message was never set")]
    MissingMessage {
        /// Kind the builder was opened with
        kind: ErrorKind,
    },

    /// The message was set but is empty or whitespace only
    #[error("cannot build {kind} error: message is empty")]
    EmptyMessage {
        /// Kind the builder was opened with
        kind: ErrorKind,
    },
}

impl BuildError {
    /// Kind of the record that failed to build
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::MissingMessage { kind } | BuildError::EmptyMessage { kind } => *kind,
        }
    }
}

/// A string that is not one of the [`ErrorKind`] literals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error kind: {0:?}")]
pub struct UnknownKind(pub String);
