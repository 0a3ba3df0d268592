//! Validation adapter
//!
//! Turns the issue list of an external validator into a single
//! `SchemaValidation` record. Validators differ in shape, so the adapter only
//! asks for `(path, message)` pairs, optionally with a machine-readable code.

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::record::ErrorRecord;
use crate::result::DomainResult;

/// One failed check reported by a validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Dotted path of the offending field (`""` for the document root)
    pub path: String,
    /// Validator message
    pub message: String,
    /// Validator-specific code, e.g. `"too_small"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl FieldIssue {
    /// Issue without a code
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code: None,
        }
    }

    /// Attach a validator code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl<P: Into<String>, M: Into<String>> From<(P, M)> for FieldIssue {
    fn from((path, message): (P, M)) -> Self {
        FieldIssue::new(path, message)
    }
}

impl std::fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Convert validator issues into a `SchemaValidation` record
///
/// Validation records never carry a stack.
pub fn from_validation_issues<I, T>(schema: impl Into<String>, issues: I) -> ErrorRecord
where
    I: IntoIterator<Item = T>,
    T: Into<FieldIssue>,
{
    DomainError::SchemaValidation {
        schema: schema.into(),
        issues: issues.into_iter().map(Into::into).collect(),
    }
    .into_record()
}

/// Unwrap a required value or fail with `RequiredFieldMissing`
pub fn require<T>(field: &str, value: Option<T>) -> DomainResult<T> {
    value.ok_or_else(|| crate::factories::required_field_missing(field))
}
