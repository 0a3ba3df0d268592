//! Core error model for Faultline
//!
//! Failures are plain values rather than exceptions:
//! - ErrorKind / ErrorCategory: the closed error taxonomy (28 kinds, 8 categories)
//! - ErrorRecord: immutable, serializable record with context, cause chain and stack
//! - ErrorBuilder: the only way records are created
//! - StackCapturePolicy: whether new records carry a stack
//! - DomainError: typed per-kind payloads behind the factory shortcuts
//! - Factories: one function per kind (`file_not_found`, `http_error`, ...)
//! - Conversion: `from_error`, `to_sentry_error`, `try_result_safe`
//! - Validation: mapping validator issues to `SchemaValidation` records

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod convert;
pub mod domain;
pub mod error;
pub mod factories;
pub mod kind;
pub mod record;
pub mod result;
pub mod safe;
pub mod stack;
pub mod timestamp;
pub mod validation;

pub use builder::ErrorBuilder;
pub use convert::{
    from_error, from_error_with, from_panic, from_std_error, to_sentry_error, SentryError, Thrown,
    ORIGINAL_ERROR_KEY,
};
pub use domain::DomainError;
pub use error::{BuildError, UnknownKind};
pub use factories::*;
pub use kind::{ErrorCategory, ErrorKind};
pub use record::{
    Cause, Causes, Context, DepthExceeded, ErrorRecord, ForeignCause, MAX_CAUSE_DEPTH,
};
pub use result::{DomainResult, IntoDomainResult, ResultExt};
pub use safe::{
    try_result_safe, try_result_safe_sync, try_result_safe_sync_value, try_result_safe_sync_with,
    try_result_safe_value, try_result_safe_with, IntoRecordResult,
};
pub use stack::{
    capture_current_stack, effective_capture, global_policy, set_global_override, Environment,
    StackCapturePolicy, StackOverride,
};
pub use timestamp::Timestamp;
pub use validation::{from_validation_issues, require, FieldIssue};
