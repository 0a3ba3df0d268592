//! Conversion between error records and foreign failures
//!
//! Inbound: anything a boundary can catch (a Rust error, an `anyhow::Error`,
//! a panic payload, a plain string or JSON value) becomes an `Unexpected`
//! record through [`from_error`]. Outbound: [`to_sentry_error`] turns a record
//! into an exception-shaped value for error monitors and other tools that
//! read arbitrary properties off exceptions.

use serde_json::Value;
use std::any::Any;
use std::error::Error as StdError;

use crate::builder::ErrorBuilder;
use crate::domain::DomainError;
use crate::kind::ErrorKind;
use crate::record::{Context, ForeignCause, ErrorRecord};
use crate::stack::{self, StackCapturePolicy};

/// Context key holding the converted value
pub const ORIGINAL_ERROR_KEY: &str = "originalError";

/// Message used when a foreign failure carries no text at all
const EMPTY_MESSAGE_FALLBACK: &str = "Unknown error";

// ============================================================================
// Thrown
// ============================================================================

/// An arbitrary failure caught at a boundary
#[derive(Debug, Clone)]
pub enum Thrown {
    /// An error object; may carry its own stack
    Exception(ForeignCause),
    /// Anything else: strings, JSON values, `null`, panic payloads
    Value(Value),
}

impl Thrown {
    /// Wrap a Rust error
    pub fn exception<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Thrown::Exception(ForeignCause::from_error(error))
    }

    /// Wrap anything that converts into a boxed error
    ///
    /// Rust errors, `Box<dyn Error + Send + Sync>` and `anyhow::Error` become
    /// exceptions. `String` and `&'static str` messages become thrown values.
    pub fn boxed<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>> + 'static,
    {
        let any: &dyn Any = &error;
        if let Some(text) = any.downcast_ref::<String>() {
            return Thrown::from(text.clone());
        }
        if let Some(text) = any.downcast_ref::<&'static str>() {
            return Thrown::from(*text);
        }
        Thrown::Exception(ForeignCause::from_boxable(error))
    }

    /// Wrap a `catch_unwind` payload
    ///
    /// `&str` and `String` payloads keep their text; anything else is
    /// described generically.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let text = match payload.downcast::<String>() {
            Ok(text) => *text,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(text) => (*text).to_string(),
                Err(_) => "panic with a non-string payload".to_string(),
            },
        };
        Thrown::Value(Value::String(text))
    }
}

impl From<ForeignCause> for Thrown {
    fn from(cause: ForeignCause) -> Self {
        Thrown::Exception(cause)
    }
}

impl From<anyhow::Error> for Thrown {
    fn from(error: anyhow::Error) -> Self {
        Thrown::Exception(ForeignCause::from_anyhow(error))
    }
}

impl From<Box<dyn StdError + Send + Sync + 'static>> for Thrown {
    fn from(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Thrown::boxed(error)
    }
}

impl From<SentryError> for Thrown {
    fn from(error: SentryError) -> Self {
        Thrown::exception(error)
    }
}

impl From<Value> for Thrown {
    fn from(value: Value) -> Self {
        Thrown::Value(value)
    }
}

impl From<&str> for Thrown {
    fn from(text: &str) -> Self {
        Thrown::Value(Value::String(text.to_string()))
    }
}

impl From<String> for Thrown {
    fn from(text: String) -> Self {
        Thrown::Value(Value::String(text))
    }
}

// ============================================================================
// Inbound
// ============================================================================

/// Normalize a caught failure into an `Unexpected` record
///
/// Uses the process-wide stack policy. See [`from_error_with`].
pub fn from_error(thrown: impl Into<Thrown>) -> ErrorRecord {
    from_error_with(thrown, &stack::global_policy())
}

/// Normalize a Rust error into an `Unexpected` record
pub fn from_std_error<E>(error: E) -> ErrorRecord
where
    E: StdError + Send + Sync + 'static,
{
    from_error(Thrown::exception(error))
}

/// Normalize a `catch_unwind` payload into an `Unexpected` record
pub fn from_panic(payload: Box<dyn Any + Send>) -> ErrorRecord {
    from_error(Thrown::from_panic(payload))
}

/// Normalize a caught failure into an `Unexpected` record
///
/// - A [`DomainError`] becomes its own record, not an `Unexpected` one.
/// - Any other exception keeps its message, is described under
///   `context.originalError`, and becomes the record's cause so the live
///   instance can be downcast later. When stacks are enabled and the
///   exception carries its own stack, that stack replaces a fresh capture so
///   the record points at the original throw site; without one, the stack
///   captured here is kept.
/// - Any other value is stringified (`null` as `"null"`, objects as compact
///   JSON), stored verbatim under `context.originalError`, and always gets a
///   stack captured here, whatever the policy says.
pub fn from_error_with(thrown: impl Into<Thrown>, policy: &StackCapturePolicy) -> ErrorRecord {
    let builder = ErrorBuilder::with_policy(ErrorKind::Unexpected, policy.clone());
    match thrown.into() {
        Thrown::Exception(foreign) => {
            if let Some(domain) = foreign.downcast_ref::<DomainError>() {
                return domain.clone().into_record_with(policy);
            }
            let message = non_empty(foreign.message())
                .or_else(|| non_empty(foreign.name()))
                .unwrap_or(EMPTY_MESSAGE_FALLBACK)
                .to_string();
            let foreign_stack = policy.capture_from_foreign_error(&foreign);
            let mut builder = builder
                .context_entry(ORIGINAL_ERROR_KEY, foreign.describe())
                .cause(foreign);
            if !foreign_stack.is_empty() {
                builder = builder.skip_stack();
            }
            let record = builder.assemble(message);
            if foreign_stack.is_empty() {
                record
            } else {
                record.with_stack(foreign_stack)
            }
        }
        Thrown::Value(value) => {
            let message = value_message(&value);
            builder
                .context_entry(ORIGINAL_ERROR_KEY, value)
                .capture_stack()
                .assemble(message)
        }
    }
}

fn non_empty(text: &str) -> Option<&str> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// String form of a thrown value
fn value_message(value: &Value) -> String {
    let text = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    if text.trim().is_empty() {
        EMPTY_MESSAGE_FALLBACK.to_string()
    } else {
        text
    }
}

// ============================================================================
// Outbound
// ============================================================================

/// Exception-shaped form of an [`ErrorRecord`]
///
/// `name` is the record's kind, `properties` holds every context entry, and
/// `stack` starts with a conventional `"{name}: {message}"` header line.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{name}: {message}")]
pub struct SentryError {
    name: String,
    message: String,
    stack: Option<String>,
    properties: Context,
}

impl SentryError {
    /// Exception name (the record's kind)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exception message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stack with header, when the record had one
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    /// All copied context entries
    pub fn properties(&self) -> &Context {
        &self.properties
    }

    /// One copied context entry
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Convert a record into an exception for error monitors
pub fn to_sentry_error(record: &ErrorRecord) -> SentryError {
    let name = record.kind().as_str().to_string();
    let message = record.message().to_string();
    let stack = record
        .stack()
        .map(|stack| format!("{}: {}\n{}", name, message, stack));
    SentryError {
        name,
        message,
        stack,
        properties: record.context().cloned().unwrap_or_default(),
    }
}

impl From<&ErrorRecord> for SentryError {
    fn from(record: &ErrorRecord) -> Self {
        to_sentry_error(record)
    }
}

// ============================================================================
// Tests
// ============================================================================
