//! Run fallible code and always get a `Result<T, ErrorRecord>` back
//!
//! The closure (or future) may return `Result<T, ErrorRecord>` or
//! `Result<T, E>` for any `E` that boxes into `Box<dyn Error + Send + Sync>`
//! (Rust errors, boxed errors, `anyhow::Error`, string messages), and it may
//! panic. Records pass through untouched; everything else is converted with
//! [`from_error`](crate::from_error). A record is never wrapped in a second
//! record. Code that cannot fail goes through [`try_result_safe_sync_value`]
//! or [`try_result_safe_value`], which only catch panics.
//!
//! ```
//! use faultline_core::{try_result_safe_sync, ErrorKind};
//!
//! let parsed = try_result_safe_sync(|| "42".parse::<u32>());
//! assert_eq!(parsed.unwrap(), 42);
//!
//! let failed = try_result_safe_sync(|| "x".parse::<u32>());
//! assert_eq!(failed.unwrap_err().kind(), ErrorKind::Unexpected);
//! ```

use futures::FutureExt;
use std::error::Error as StdError;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use crate::convert::{from_error_with, Thrown};
use crate::record::ErrorRecord;
use crate::stack::{self, StackCapturePolicy};

/// Outcome that can be normalized into `Result<T, ErrorRecord>`
pub trait IntoRecordResult {
    /// Success type
    type Value;

    /// Normalize, converting foreign errors under `policy`
    fn into_record_result(self, policy: &StackCapturePolicy) -> Result<Self::Value, ErrorRecord>;
}

impl<T> IntoRecordResult for Result<T, ErrorRecord> {
    type Value = T;

    fn into_record_result(self, _policy: &StackCapturePolicy) -> Result<T, ErrorRecord> {
        self
    }
}

impl<T, E> IntoRecordResult for Result<T, E>
where
    E: Into<Box<dyn StdError + Send + Sync + 'static>> + 'static,
{
    type Value = T;

    fn into_record_result(self, policy: &StackCapturePolicy) -> Result<T, ErrorRecord> {
        self.map_err(|error| from_error_with(Thrown::boxed(error), policy))
    }
}

/// Run `f`, converting its error or panic into a record
pub fn try_result_safe_sync<F, R>(f: F) -> Result<R::Value, ErrorRecord>
where
    F: FnOnce() -> R,
    R: IntoRecordResult,
{
    try_result_safe_sync_with(&stack::global_policy(), f)
}

/// [`try_result_safe_sync`] with an explicit stack policy
pub fn try_result_safe_sync_with<F, R>(
    policy: &StackCapturePolicy,
    f: F,
) -> Result<R::Value, ErrorRecord>
where
    F: FnOnce() -> R,
    R: IntoRecordResult,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(outcome) => outcome.into_record_result(policy),
        Err(payload) => Err(from_error_with(Thrown::from_panic(payload), policy)),
    }
}

/// Run an infallible `f`, converting a panic into a record
pub fn try_result_safe_sync_value<F, T>(f: F) -> Result<T, ErrorRecord>
where
    F: FnOnce() -> T,
{
    try_result_safe_sync(|| Ok::<T, ErrorRecord>(f()))
}

/// Await `future`, converting its error or panic into a record
pub async fn try_result_safe<Fut>(future: Fut) -> Result<<Fut::Output as IntoRecordResult>::Value, ErrorRecord>
where
    Fut: Future,
    Fut::Output: IntoRecordResult,
{
    try_result_safe_with(&stack::global_policy(), future).await
}

/// [`try_result_safe`] with an explicit stack policy
pub async fn try_result_safe_with<Fut>(
    policy: &StackCapturePolicy,
    future: Fut,
) -> Result<<Fut::Output as IntoRecordResult>::Value, ErrorRecord>
where
    Fut: Future,
    Fut::Output: IntoRecordResult,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(outcome) => outcome.into_record_result(policy),
        Err(payload) => Err(from_error_with(Thrown::from_panic(payload), policy)),
    }
}

/// Await an infallible `future`, converting a panic into a record
pub async fn try_result_safe_value<Fut>(future: Fut) -> Result<Fut::Output, ErrorRecord>
where
    Fut: Future,
{
    try_result_safe(future.map(Ok::<Fut::Output, ErrorRecord>)).await
}
