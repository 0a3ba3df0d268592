//! Fluent error record builder
//!
//! Every [`ErrorRecord`] is created here, either directly or through a
//! factory shortcut.
//!
//! ```
//! use faultline_core::{ErrorBuilder, ErrorKind, StackCapturePolicy};
//!
//! let record = ErrorBuilder::with_policy(ErrorKind::QueryFailed, StackCapturePolicy::never())
//!     .message("query failed: relation \"users\" does not exist")
//!     .context_entry("table", "users")
//!     .context([("attempt", 1), ("attempt", 2)])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(record.context_value("attempt").unwrap(), 2);
//! assert!(!record.has_stack());
//! ```
//!
//! `build()` fails with [`BuildError`] when no (or an empty) message was set.
//! That is a bug at the call site, not a domain error, so it is not an
//! `ErrorRecord`.

use serde_json::Value;

use crate::error::BuildError;
use crate::kind::ErrorKind;
use crate::record::{Cause, Context, ErrorRecord};
use crate::stack::{self, StackCapturePolicy, StackOverride};
use crate::timestamp::Timestamp;

/// Builder for [`ErrorRecord`]
///
/// Consumed by [`build`](ErrorBuilder::build), so a builder can't be reused
/// after producing a record.
#[derive(Debug, Clone)]
#[must_use = "a builder does nothing until build() is called"]
pub struct ErrorBuilder {
    kind: ErrorKind,
    message: Option<String>,
    context: Context,
    cause: Option<Cause>,
    /// Per-builder override, wins over the policy
    stack: StackOverride,
    /// Explicit policy; `None` reads the process-wide policy at build time
    policy: Option<StackCapturePolicy>,
}

impl ErrorBuilder {
    /// Open a builder that consults the process-wide stack policy
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            context: Context::new(),
            cause: None,
            stack: StackOverride::Unset,
            policy: None,
        }
    }

    /// Open a builder with an explicit stack policy
    pub fn with_policy(kind: ErrorKind, policy: StackCapturePolicy) -> Self {
        Self {
            policy: Some(policy),
            ..Self::new(kind)
        }
    }

    /// Kind this builder will produce
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Set (or overwrite) the message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Merge entries into the context; later keys win
    pub fn context<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.context.insert(key.into(), value.into());
        }
        self
    }

    /// Merge one context entry
    pub fn context_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Merge a whole context map
    pub fn context_map(mut self, context: Context) -> Self {
        self.context.extend(context);
        self
    }

    /// Set the cause (a record or a foreign cause)
    pub fn cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Capture a stack for this record regardless of policy
    pub fn capture_stack(mut self) -> Self {
        self.stack = StackOverride::ForceOn;
        self
    }

    /// Never capture a stack for this record regardless of policy
    pub fn skip_stack(mut self) -> Self {
        self.stack = StackOverride::ForceOff;
        self
    }

    /// Produce the record
    ///
    /// # Errors
    ///
    /// - [`BuildError::MissingMessage`] if `message()` was never called
    /// - [`BuildError::EmptyMessage`] if the message is empty or whitespace
    pub fn build(mut self) -> Result<ErrorRecord, BuildError> {
        let message = match self.message.take() {
            None => return Err(BuildError::MissingMessage { kind: self.kind }),
            Some(message) if message.trim().is_empty() => {
                return Err(BuildError::EmptyMessage { kind: self.kind })
            }
            Some(message) => message,
        };
        Ok(self.assemble(message))
    }

    /// Build with a message the caller guarantees is non-empty
    pub(crate) fn assemble(self, message: String) -> ErrorRecord {
        let capture = match self.stack {
            StackOverride::ForceOn => true,
            StackOverride::ForceOff => false,
            StackOverride::Unset => match &self.policy {
                Some(policy) => policy.effective_capture(),
                None => stack::effective_capture(),
            },
        };
        let stack = if capture {
            Some(stack::force_capture())
        } else {
            None
        };
        ErrorRecord::from_parts(
            self.kind,
            message,
            self.context,
            self.cause,
            stack,
            Some(Timestamp::now()),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
