//! Trace span attributes
//!
//! Span attribute values are scalars, so the record is flattened into
//! `error.*` keys. Scalar context values keep their type; arrays and objects
//! are attached as compact JSON text.

use serde_json::Value;

use faultline_core::{Cause, ErrorRecord};

use crate::chain::cause_chain;

/// A span attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Text
    String(String),
    /// Boolean
    Bool(bool),
    /// Signed integer
    I64(i64),
    /// Float
    F64(f64),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::String(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::I64(value)
    }
}

impl From<&Value> for AttrValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(text) => AttrValue::String(text.clone()),
            Value::Bool(flag) => AttrValue::Bool(*flag),
            Value::Number(number) => match number.as_i64() {
                Some(int) => AttrValue::I64(int),
                // u64 beyond i64 and floats
                None => AttrValue::F64(number.as_f64().unwrap_or(f64::NAN)),
            },
            other => AttrValue::String(other.to_string()),
        }
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::String(text) => f.write_str(text),
            AttrValue::Bool(flag) => write!(f, "{}", flag),
            AttrValue::I64(int) => write!(f, "{}", int),
            AttrValue::F64(float) => write!(f, "{}", float),
        }
    }
}

/// Flat `error.*` attributes for `record`
///
/// Keys: `error.kind`, `error.category`, `error.message`, `error.timestamp`,
/// `error.stack`, `error.cause.kind` / `error.cause.name`,
/// `error.cause.message`, `error.cause_depth` and `error.context.<key>`.
/// Absent fields produce no attribute.
pub fn span_attributes(record: &ErrorRecord) -> Vec<(String, AttrValue)> {
    let mut attrs: Vec<(String, AttrValue)> = vec![
        ("error.kind".into(), record.kind().as_str().into()),
        ("error.category".into(), record.category().as_str().into()),
        ("error.message".into(), record.message().into()),
    ];
    if let Some(timestamp) = record.timestamp() {
        attrs.push(("error.timestamp".into(), timestamp.to_rfc3339().into()));
    }
    if let Some(stack) = record.stack() {
        attrs.push(("error.stack".into(), stack.into()));
    }
    match record.cause() {
        Some(Cause::Record(cause)) => {
            attrs.push(("error.cause.kind".into(), cause.kind().as_str().into()));
            attrs.push(("error.cause.message".into(), cause.message().into()));
        }
        Some(Cause::Foreign(cause)) => {
            attrs.push(("error.cause.name".into(), cause.name().into()));
            attrs.push(("error.cause.message".into(), cause.message().into()));
        }
        Some(cause @ Cause::DepthExceeded(_)) => {
            attrs.push(("error.cause.message".into(), cause.message().into()));
        }
        None => {}
    }
    let chain = cause_chain(record);
    if chain.depth() > 0 {
        attrs.push(("error.cause_depth".into(), (chain.depth() as i64).into()));
    }
    if let Some(context) = record.context() {
        for (key, value) in context {
            attrs.push((format!("error.context.{}", key), AttrValue::from(value)));
        }
    }
    attrs
}
