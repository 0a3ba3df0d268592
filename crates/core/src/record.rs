//! The error record model
//!
//! An [`ErrorRecord`] is the single data shape every failure is reduced to:
//! `kind`, `message`, optional `context`, optional `cause`, optional `stack`
//! and a `timestamp`. Records are produced by [`ErrorBuilder`](crate::ErrorBuilder)
//! (directly or through the factory shortcuts) and are immutable afterwards:
//! fields are private and every "modification" returns a new record.
//!
//! ## Invariants
//!
//! - `message` is never empty
//! - `context`, when present, is a non-empty map
//! - `cause` chains are traversed and serialized at most [`MAX_CAUSE_DEPTH`]
//!   links deep; serialization replaces the next link with a
//!   [`DepthExceeded`] marker
//! - the JSON form of a chain within the cap round-trips losslessly (apart
//!   from live foreign error instances, which are kept only in memory)
//!
//! Records are values, not exceptions, so `ErrorRecord` does not implement
//! `std::error::Error`. Use [`to_sentry_error`](crate::to_sentry_error) when an
//! exception-shaped value is required.

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::builder::ErrorBuilder;
use crate::error::BuildError;
use crate::kind::{ErrorCategory, ErrorKind};
use crate::stack::{self, StackCapturePolicy};
use crate::timestamp::Timestamp;

/// Structured metadata attached to a record
pub type Context = serde_json::Map<String, Value>;

/// Maximum number of cause links any traversal will follow
pub const MAX_CAUSE_DEPTH: usize = 10;

// ============================================================================
// Foreign causes
// ============================================================================

/// A failure that did not originate as an [`ErrorRecord`]
///
/// Keeps a serializable description (`name`, `message`, optional `stack`)
/// and, when the cause was converted from a live Rust error, the error
/// itself so callers can downcast back to the original instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignCause {
    name: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
    #[serde(skip)]
    error: Option<Arc<dyn StdError + Send + Sync + 'static>>,
}

impl ForeignCause {
    /// Description-only foreign cause
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
            error: None,
        }
    }

    /// Attach stack text captured by the foreign side
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        let stack = stack.into();
        self.stack = if stack.trim().is_empty() { None } else { Some(stack) };
        self
    }

    /// Wrap a live Rust error, keeping the instance for later downcasts
    ///
    /// The name is the error's type name without its module path. A
    /// [`SentryError`](crate::SentryError) keeps its own name and stack.
    pub fn from_error<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_boxable(error)
    }

    /// Wrap anything that converts into a boxed error
    ///
    /// Covers every `std::error::Error`, `Box<dyn Error + Send + Sync>`,
    /// `String` messages and `anyhow::Error` (which keeps its backtrace and
    /// context chain, see [`from_anyhow`](Self::from_anyhow)).
    pub fn from_boxable<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>> + 'static,
    {
        let mut slot = Some(error);
        let any: &mut dyn Any = &mut slot;
        if let Some(error) = any
            .downcast_mut::<Option<anyhow::Error>>()
            .and_then(Option::take)
        {
            return Self::from_anyhow(error);
        }
        let name = match short_type_name::<E>() {
            "Box" => "Error",
            name => name,
        };
        match slot {
            Some(error) => Self::from_boxed(name, error.into()),
            // only an anyhow::Error is taken out above
            None => Self::new(name, String::new()),
        }
    }

    fn from_boxed(name: &str, error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        let mut cause = match error.downcast_ref::<crate::convert::SentryError>() {
            Some(sentry) => {
                let mut cause = ForeignCause::new(sentry.name(), sentry.message());
                cause.stack = sentry.stack().map(str::to_string);
                cause
            }
            None => ForeignCause::new(name, error.to_string()),
        };
        cause.error = Some(Arc::from(error));
        cause
    }

    /// Wrap an `anyhow::Error`; a captured backtrace becomes the stack
    pub fn from_anyhow(error: anyhow::Error) -> Self {
        let backtrace = error.backtrace();
        let stack = match backtrace.status() {
            std::backtrace::BacktraceStatus::Captured => {
                Some(stack::normalize_foreign_backtrace(&backtrace.to_string()))
            }
            _ => None,
        };
        let mut cause = ForeignCause::new("Error", format!("{:#}", error));
        cause.stack = stack.filter(|s| !s.is_empty());
        let boxed: Box<dyn StdError + Send + Sync + 'static> = error.into();
        cause.error = Some(Arc::from(boxed));
        cause
    }

    /// Type name of the foreign error (or the name it reported)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Message of the foreign error
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stack text embedded in the foreign error, if any
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// The live error, when this cause was built from one
    pub fn error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.error.as_deref()
    }

    /// Downcast the live error to its concrete type
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.error.as_deref()?.downcast_ref::<E>()
    }

    /// JSON description (`{"name", "message"}`) used for `context.originalError`
    pub fn describe(&self) -> Value {
        serde_json::json!({ "name": self.name, "message": self.message })
    }
}

impl PartialEq for ForeignCause {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.message == other.message && self.stack == other.stack
    }
}

/// Last path segment of a type name, generics removed
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ============================================================================
// Cause
// ============================================================================

/// What triggered a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cause {
    /// Another record; the chain continues through it
    Record(Arc<ErrorRecord>),
    /// A foreign error or value; the chain ends here
    Foreign(ForeignCause),
    /// Links cut off when the chain was serialized; the chain ends here
    DepthExceeded(DepthExceeded),
}

impl Cause {
    /// The record, if this link is one
    pub fn as_record(&self) -> Option<&ErrorRecord> {
        match self {
            Cause::Record(record) => Some(record),
            _ => None,
        }
    }

    /// The foreign cause, if this link is one
    pub fn as_foreign(&self) -> Option<&ForeignCause> {
        match self {
            Cause::Foreign(foreign) => Some(foreign),
            _ => None,
        }
    }

    /// Message of this link
    pub fn message(&self) -> &str {
        match self {
            Cause::Record(record) => record.message(),
            Cause::Foreign(foreign) => foreign.message(),
            Cause::DepthExceeded(_) => DepthExceeded::MESSAGE,
        }
    }

    /// Whether this link marks a truncated chain
    pub fn is_depth_exceeded(&self) -> bool {
        matches!(self, Cause::DepthExceeded(_))
    }
}

impl From<ErrorRecord> for Cause {
    fn from(record: ErrorRecord) -> Self {
        Cause::Record(Arc::new(record))
    }
}

impl From<Arc<ErrorRecord>> for Cause {
    fn from(record: Arc<ErrorRecord>) -> Self {
        Cause::Record(record)
    }
}

impl From<ForeignCause> for Cause {
    fn from(foreign: ForeignCause) -> Self {
        Cause::Foreign(foreign)
    }
}

/// Marker standing in for cause links past [`MAX_CAUSE_DEPTH`]
///
/// Serializes as `{"depthExceeded": true, "maxDepth": 10}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthExceeded {
    depth_exceeded: bool,
    max_depth: usize,
}

impl DepthExceeded {
    /// Message reported for the marker link
    pub const MESSAGE: &'static str = "cause chain exceeds the maximum depth";

    /// Marker for the current depth cap
    pub const fn new() -> Self {
        Self {
            depth_exceeded: true,
            max_depth: MAX_CAUSE_DEPTH,
        }
    }

    /// Cap the chain was cut at
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// JSON form of the marker
    pub fn to_json(&self) -> Value {
        serde_json::json!({ "depthExceeded": self.depth_exceeded, "maxDepth": self.max_depth })
    }
}

impl Default for DepthExceeded {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// ErrorRecord
// ============================================================================

/// An immutable, serializable domain error
///
/// # Example
///
/// ```
/// use faultline_core::{file_not_found, ErrorKind};
///
/// let record = file_not_found("/etc/app.json");
/// assert_eq!(record.kind(), ErrorKind::FileNotFound);
/// assert_eq!(record.context_value("path").unwrap(), "/etc/app.json");
/// assert!(record.message().contains("/etc/app.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RecordRepr")]
pub struct ErrorRecord {
    kind: ErrorKind,
    message: String,
    context: Option<Context>,
    cause: Option<Cause>,
    stack: Option<String>,
    timestamp: Option<Timestamp>,
}

/// Wire form, validated into an [`ErrorRecord`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordRepr {
    kind: ErrorKind,
    message: String,
    #[serde(default)]
    context: Option<Context>,
    #[serde(default)]
    cause: Option<Cause>,
    #[serde(default)]
    stack: Option<String>,
    #[serde(default)]
    timestamp: Option<Timestamp>,
}

impl TryFrom<RecordRepr> for ErrorRecord {
    type Error = BuildError;

    fn try_from(repr: RecordRepr) -> Result<Self, Self::Error> {
        if repr.message.trim().is_empty() {
            return Err(BuildError::EmptyMessage { kind: repr.kind });
        }
        Ok(ErrorRecord::from_parts(
            repr.kind,
            repr.message,
            repr.context.unwrap_or_default(),
            repr.cause,
            repr.stack,
            repr.timestamp,
        ))
    }
}

impl ErrorRecord {
    /// Assemble a record, normalizing empty context and stack to absent
    pub(crate) fn from_parts(
        kind: ErrorKind,
        message: String,
        context: Context,
        cause: Option<Cause>,
        stack: Option<String>,
        timestamp: Option<Timestamp>,
    ) -> Self {
        Self {
            kind,
            message,
            context: if context.is_empty() { None } else { Some(context) },
            cause,
            stack: stack.filter(|s| !s.is_empty()),
            timestamp,
        }
    }

    /// Replace the stack of a record that has not been handed out yet
    pub(crate) fn with_stack(mut self, stack: String) -> Self {
        self.stack = Some(stack).filter(|s| !s.is_empty());
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Discriminator
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Category of the discriminator
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    /// Check the discriminator
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Human-readable description
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured metadata, if any
    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// One context entry
    pub fn context_value(&self, key: &str) -> Option<&Value> {
        self.context.as_ref()?.get(key)
    }

    /// Direct cause
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Captured stack text
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// Whether a stack was captured
    pub fn has_stack(&self) -> bool {
        self.stack.is_some()
    }

    /// When the record was built
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    // =========================================================================
    // Cause chain
    // =========================================================================

    /// Iterate the cause chain, at most [`MAX_CAUSE_DEPTH`] links
    pub fn causes(&self) -> Causes<'_> {
        Causes::new(self.cause.as_ref(), MAX_CAUSE_DEPTH)
    }

    /// Deepest reachable cause (within the depth cap)
    pub fn root_cause(&self) -> Option<&Cause> {
        self.causes().last()
    }

    // =========================================================================
    // Derivation (records are never mutated in place)
    // =========================================================================

    /// A builder pre-filled with this record's kind, message, context and cause
    ///
    /// The rebuilt record gets a fresh timestamp and a stack decision from the
    /// process-wide policy; see [`to_builder_with`](Self::to_builder_with).
    pub fn to_builder(&self) -> ErrorBuilder {
        self.prefill(ErrorBuilder::new(self.kind))
    }

    /// [`to_builder`](Self::to_builder) with an explicit stack policy
    pub fn to_builder_with(&self, policy: &StackCapturePolicy) -> ErrorBuilder {
        self.prefill(ErrorBuilder::with_policy(self.kind, policy.clone()))
    }

    fn prefill(&self, mut builder: ErrorBuilder) -> ErrorBuilder {
        builder = builder.message(self.message.clone());
        if let Some(context) = &self.context {
            builder = builder.context_map(context.clone());
        }
        if let Some(cause) = &self.cause {
            builder = builder.cause(cause.clone());
        }
        builder
    }

    /// Copy of this record with one more context entry (later wins)
    ///
    /// Stack and timestamp are kept.
    pub fn with_context_entry(&self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut next = self.clone();
        next.context
            .get_or_insert_with(Context::new)
            .insert(key.into(), value.into());
        next
    }

    /// A new record of `kind` whose cause is this record
    ///
    /// An empty `message` reuses this record's message. The stack follows the
    /// process-wide policy; see [`wrap_with`](Self::wrap_with).
    pub fn wrap(&self, kind: ErrorKind, message: impl Into<String>) -> ErrorRecord {
        self.wrap_in(ErrorBuilder::new(kind), message.into())
    }

    /// [`wrap`](Self::wrap) with an explicit stack policy
    pub fn wrap_with(
        &self,
        kind: ErrorKind,
        message: impl Into<String>,
        policy: &StackCapturePolicy,
    ) -> ErrorRecord {
        self.wrap_in(ErrorBuilder::with_policy(kind, policy.clone()), message.into())
    }

    fn wrap_in(&self, builder: ErrorBuilder, message: String) -> ErrorRecord {
        let message = if message.trim().is_empty() {
            self.message.clone()
        } else {
            message
        };
        builder.cause(self.clone()).assemble(message)
    }

    // =========================================================================
    // JSON
    // =========================================================================

    /// JSON form of this record (and its full cause chain)
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Parse a record from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl std::fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl Drop for ErrorRecord {
    fn drop(&mut self) {
        // Unlink uniquely owned causes one at a time so long chains don't
        // recurse through nested drops.
        let mut next = self.cause.take();
        while let Some(Cause::Record(record)) = next {
            next = match Arc::try_unwrap(record) {
                Ok(mut record) => record.cause.take(),
                Err(_) => None,
            };
        }
    }
}

// ============================================================================
// Depth-capped serialization
// ============================================================================

impl Serialize for ErrorRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RecordAtDepth {
            record: self,
            depth: 0,
        }
        .serialize(serializer)
    }
}

/// A record `depth` links below the record being serialized
struct RecordAtDepth<'a> {
    record: &'a ErrorRecord,
    depth: usize,
}

impl Serialize for RecordAtDepth<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let record = self.record;
        let mut state = serializer.serialize_struct("ErrorRecord", 6)?;
        state.serialize_field("kind", &record.kind)?;
        state.serialize_field("message", &record.message)?;
        match &record.context {
            Some(context) => state.serialize_field("context", context)?,
            None => state.skip_field("context")?,
        }
        match &record.cause {
            Some(cause) => state.serialize_field(
                "cause",
                &CauseAtDepth {
                    cause,
                    depth: self.depth + 1,
                },
            )?,
            None => state.skip_field("cause")?,
        }
        match &record.stack {
            Some(stack) => state.serialize_field("stack", stack)?,
            None => state.skip_field("stack")?,
        }
        match &record.timestamp {
            Some(timestamp) => state.serialize_field("timestamp", timestamp)?,
            None => state.skip_field("timestamp")?,
        }
        state.end()
    }
}

/// The `depth`-th cause link; links past the cap become a marker
struct CauseAtDepth<'a> {
    cause: &'a Cause,
    depth: usize,
}

impl Serialize for CauseAtDepth<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.depth > MAX_CAUSE_DEPTH {
            return DepthExceeded::new().serialize(serializer);
        }
        match self.cause {
            Cause::Record(record) => RecordAtDepth {
                record,
                depth: self.depth,
            }
            .serialize(serializer),
            other => other.serialize(serializer),
        }
    }
}

// ============================================================================
// Causes iterator
// ============================================================================

/// Depth-capped iterator over a cause chain
#[derive(Debug, Clone)]
pub struct Causes<'a> {
    next: Option<&'a Cause>,
    yielded: usize,
    limit: usize,
}

impl<'a> Causes<'a> {
    fn new(first: Option<&'a Cause>, limit: usize) -> Self {
        Self {
            next: first,
            yielded: 0,
            limit,
        }
    }

    /// Links yielded so far
    pub fn depth(&self) -> usize {
        self.yielded
    }

    /// True once the cap was reached with links still remaining
    pub fn is_truncated(&self) -> bool {
        self.yielded >= self.limit && self.next.is_some()
    }
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a Cause;

    fn next(&mut self) -> Option<Self::Item> {
        if self.yielded >= self.limit {
            return None;
        }
        let current = self.next?;
        self.next = match current {
            Cause::Record(record) => record.cause.as_ref(),
            Cause::Foreign(_) | Cause::DepthExceeded(_) => None,
        };
        self.yielded += 1;
        Some(current)
    }
}

// ============================================================================
// Tests
// ============================================================================
