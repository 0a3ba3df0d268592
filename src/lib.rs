//! Faultline - structured domain errors as values
//!
//! Failures are returned as immutable, serializable [`ErrorRecord`]s instead
//! of being thrown. Every record has a `kind` from a closed taxonomy, a
//! message, optional structured context, an optional cause chain and an
//! optional stack.
//!
//! # Quick Start
//!
//! ```
//! use faultline::{file_not_found, try_result_safe_sync, DomainResult, ErrorKind, ResultExt};
//!
//! fn load(path: &str) -> DomainResult<String> {
//!     Err(file_not_found(path))
//! }
//!
//! let err = load("/etc/app.json")
//!     .wrap_err(ErrorKind::MissingConfig, "configuration unavailable")
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::MissingConfig);
//!
//! // Foreign errors and panics are converted at the boundary
//! let parsed = try_result_safe_sync(|| "12".parse::<u8>());
//! assert_eq!(parsed.unwrap(), 12);
//! ```
//!
//! # Architecture
//!
//! The record model, builder, factories and conversions live in
//! `faultline-core` and are re-exported here. Log, span and metric adapters
//! live in `faultline-observe` and are available under [`observe`].

pub use faultline_core::*;

/// Log, span and metric views over records
pub mod observe {
    pub use faultline_observe::*;
}

pub use serde_json::{json, Value};
