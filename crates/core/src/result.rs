//! Result helpers for code that returns records

use serde_json::Value;
use std::error::Error as StdError;

use crate::convert::{from_error, Thrown};
use crate::kind::ErrorKind;
use crate::record::ErrorRecord;

/// Result type for operations failing with an [`ErrorRecord`]
pub type DomainResult<T> = std::result::Result<T, ErrorRecord>;

/// Extension methods on `DomainResult`
pub trait ResultExt<T> {
    /// Wrap the error in a new record of `kind`, keeping it as the cause
    fn wrap_err(self, kind: ErrorKind, message: impl Into<String>) -> DomainResult<T>;

    /// Add a context entry to the error (later keys win)
    fn with_context(self, key: &str, value: impl Into<Value>) -> DomainResult<T>;
}

impl<T> ResultExt<T> for DomainResult<T> {
    fn wrap_err(self, kind: ErrorKind, message: impl Into<String>) -> DomainResult<T> {
        self.map_err(|record| record.wrap(kind, message))
    }

    fn with_context(self, key: &str, value: impl Into<Value>) -> DomainResult<T> {
        self.map_err(|record| record.with_context_entry(key, value))
    }
}

/// Convert a foreign error result into a [`DomainResult`]
///
/// Implemented for every `Result<T, E>` whose error boxes into
/// `Box<dyn Error + Send + Sync>`: Rust errors, boxed errors and
/// `anyhow::Error`.
pub trait IntoDomainResult<T> {
    /// Map the error through [`from_error`]
    fn into_domain(self) -> DomainResult<T>;
}

impl<T, E> IntoDomainResult<T> for Result<T, E>
where
    E: Into<Box<dyn StdError + Send + Sync + 'static>> + 'static,
{
    fn into_domain(self) -> DomainResult<T> {
        self.map_err(|error| from_error(Thrown::boxed(error)))
    }
}
