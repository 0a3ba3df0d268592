//! Structured log context
//!
//! Renders a record (and its cause chain) as a JSON object suitable for a
//! structured logger's field map:
//!
//! ```json
//! {
//!   "kind": "MissingConfig",
//!   "category": "Config",
//!   "message": "Missing configuration: DATABASE_URL",
//!   "context": { "key": "DATABASE_URL" },
//!   "timestamp": "2023-11-14T22:13:20.123Z",
//!   "cause": { "kind": "FileNotFound", "message": "...", "cause": { ... } }
//! }
//! ```
//!
//! Nesting stops after [`MAX_CAUSE_DEPTH`] causes; the next link is replaced by
//! `{"depthExceeded": true, "maxDepth": 10}`.

use serde_json::{json, Map, Value};

use faultline_core::{Cause, DepthExceeded, ErrorRecord, MAX_CAUSE_DEPTH};

/// Marker key set on the object that replaces links past the cap
pub const DEPTH_EXCEEDED_KEY: &str = "depthExceeded";

/// Log fields for `record`, causes nested under `cause`
pub fn log_context(record: &ErrorRecord) -> Value {
    render_record(record, 0)
}

fn render_record(record: &ErrorRecord, depth: usize) -> Value {
    let mut fields = Map::new();
    fields.insert("kind".into(), json!(record.kind().as_str()));
    fields.insert("category".into(), json!(record.category().as_str()));
    fields.insert("message".into(), json!(record.message()));
    if let Some(context) = record.context() {
        fields.insert("context".into(), Value::Object(context.clone()));
    }
    if let Some(stack) = record.stack() {
        fields.insert("stack".into(), json!(stack));
    }
    if let Some(timestamp) = record.timestamp() {
        fields.insert("timestamp".into(), json!(timestamp.to_rfc3339()));
    }
    if let Some(cause) = record.cause() {
        fields.insert("cause".into(), render_cause(cause, depth + 1));
    }
    Value::Object(fields)
}

fn render_cause(cause: &Cause, depth: usize) -> Value {
    if depth > MAX_CAUSE_DEPTH {
        return DepthExceeded::new().to_json();
    }
    match cause {
        Cause::Record(record) => render_record(record, depth),
        Cause::Foreign(foreign) => foreign.describe(),
        Cause::DepthExceeded(marker) => marker.to_json(),
    }
}
