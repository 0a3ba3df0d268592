//! Metric labels
//!
//! Only low-cardinality values become labels: the kind, its category, and the
//! status code of HTTP errors. Messages and free-form context never do.

use std::collections::BTreeMap;

use faultline_core::{ErrorKind, ErrorRecord};

/// Label carrying the error kind
pub const KIND_LABEL: &str = "error_kind";
/// Label carrying the error category
pub const CATEGORY_LABEL: &str = "error_category";
/// Label carrying the HTTP status of `HTTPError` records
pub const HTTP_STATUS_LABEL: &str = "http_status";

/// Labels for counting `record` in an error metric
pub fn metric_labels(record: &ErrorRecord) -> BTreeMap<&'static str, String> {
    let mut labels = BTreeMap::new();
    labels.insert(KIND_LABEL, record.kind().as_str().to_string());
    labels.insert(CATEGORY_LABEL, record.category().as_str().to_string());
    if record.kind() == ErrorKind::HttpError {
        if let Some(status) = record.context_value("statusCode").and_then(|v| v.as_u64()) {
            labels.insert(HTTP_STATUS_LABEL, status.to_string());
        }
    }
    labels
}
