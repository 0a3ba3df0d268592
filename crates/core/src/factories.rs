//! One-call constructors for the standard error kinds
//!
//! Each shortcut packs its arguments into the matching [`DomainError`]
//! variant, which supplies the message template and context fields. Stack
//! capture follows the category rule: validation kinds never capture, all
//! other kinds follow the process-wide policy.
//!
//! ```
//! use faultline_core::factories::{http_error, required_field_missing};
//!
//! let http = http_error("https://api.example.com/users", 503, Some("Service Unavailable"));
//! assert_eq!(http.context_value("statusCode").unwrap(), 503);
//!
//! let missing = required_field_missing("email");
//! assert!(!missing.has_stack());
//! ```

use serde_json::Value;

use crate::domain::DomainError;
use crate::record::ErrorRecord;
use crate::timestamp::Timestamp;
use crate::validation::FieldIssue;

// =============================================================================
// FileSystem
// =============================================================================

/// `FileNotFound` for `path`
pub fn file_not_found(path: impl Into<String>) -> ErrorRecord {
    DomainError::FileNotFound { path: path.into() }.into_record()
}

/// `FileReadError` for `path`
pub fn file_read_error(path: impl Into<String>, reason: impl Into<String>) -> ErrorRecord {
    DomainError::FileReadError {
        path: path.into(),
        reason: reason.into(),
    }
    .into_record()
}

/// `FileWriteError` for `path`
pub fn file_write_error(path: impl Into<String>, reason: impl Into<String>) -> ErrorRecord {
    DomainError::FileWriteError {
        path: path.into(),
        reason: reason.into(),
    }
    .into_record()
}

/// `PermissionDenied` for `operation` (e.g. `"read"`) on `path`
pub fn permission_denied(path: impl Into<String>, operation: impl Into<String>) -> ErrorRecord {
    DomainError::PermissionDenied {
        path: path.into(),
        operation: operation.into(),
    }
    .into_record()
}

// =============================================================================
// Parse
// =============================================================================

/// `InvalidJSON`; `input` names the document
pub fn invalid_json(input: impl Into<String>, reason: impl Into<String>) -> ErrorRecord {
    DomainError::InvalidJson {
        input: input.into(),
        reason: reason.into(),
    }
    .into_record()
}

/// `InvalidYAML`; `input` names the document
pub fn invalid_yaml(input: impl Into<String>, reason: impl Into<String>) -> ErrorRecord {
    DomainError::InvalidYaml {
        input: input.into(),
        reason: reason.into(),
    }
    .into_record()
}

/// `InvalidXML`; `input` names the document
pub fn invalid_xml(input: impl Into<String>, reason: impl Into<String>) -> ErrorRecord {
    DomainError::InvalidXml {
        input: input.into(),
        reason: reason.into(),
    }
    .into_record()
}

/// `InvalidTOML`; `input` names the document
pub fn invalid_toml(input: impl Into<String>, reason: impl Into<String>) -> ErrorRecord {
    DomainError::InvalidToml {
        input: input.into(),
        reason: reason.into(),
    }
    .into_record()
}

// =============================================================================
// Validation (never captures a stack)
// =============================================================================

/// `SchemaValidation` for `schema` with the validator's issues
pub fn schema_validation(schema: impl Into<String>, issues: Vec<FieldIssue>) -> ErrorRecord {
    DomainError::SchemaValidation {
        schema: schema.into(),
        issues,
    }
    .into_record()
}

/// `RequiredFieldMissing` for `field`
pub fn required_field_missing(field: impl Into<String>) -> ErrorRecord {
    DomainError::RequiredFieldMissing {
        field: field.into(),
    }
    .into_record()
}

/// `InvalidFieldValue`; the offending value is kept in context
pub fn invalid_field_value(
    field: impl Into<String>,
    value: impl Into<Value>,
    reason: impl Into<String>,
) -> ErrorRecord {
    DomainError::InvalidFieldValue {
        field: field.into(),
        value: value.into(),
        reason: reason.into(),
    }
    .into_record()
}

/// `TypeMismatch` for `field`
pub fn type_mismatch(
    field: impl Into<String>,
    expected: impl Into<String>,
    actual: impl Into<String>,
) -> ErrorRecord {
    DomainError::TypeMismatch {
        field: field.into(),
        expected: expected.into(),
        actual: actual.into(),
    }
    .into_record()
}

// =============================================================================
// Network
// =============================================================================

/// `ConnectionFailed` to `host`
pub fn connection_failed(host: impl Into<String>, reason: impl Into<String>) -> ErrorRecord {
    DomainError::ConnectionFailed {
        host: host.into(),
        reason: reason.into(),
    }
    .into_record()
}

/// `Timeout` of `operation` after `duration_ms`
pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> ErrorRecord {
    DomainError::Timeout {
        operation: operation.into(),
        duration_ms,
    }
    .into_record()
}

/// `DNSResolutionFailed` for `host`
pub fn dns_resolution_failed(host: impl Into<String>) -> ErrorRecord {
    DomainError::DnsResolutionFailed { host: host.into() }.into_record()
}

/// `HTTPError` from `url`
pub fn http_error(
    url: impl Into<String>,
    status_code: u16,
    status_text: Option<&str>,
) -> ErrorRecord {
    DomainError::HttpError {
        url: url.into(),
        status_code,
        status_text: status_text.map(str::to_string),
    }
    .into_record()
}

// =============================================================================
// Database
// =============================================================================

/// `DatabaseConnectionFailed` for `database`
pub fn database_connection_failed(
    database: impl Into<String>,
    reason: impl Into<String>,
) -> ErrorRecord {
    DomainError::DatabaseConnectionFailed {
        database: database.into(),
        reason: reason.into(),
    }
    .into_record()
}

/// `QueryFailed`; the query text is kept in context, not in the message
pub fn query_failed(query: impl Into<String>, reason: impl Into<String>) -> ErrorRecord {
    DomainError::QueryFailed {
        query: query.into(),
        reason: reason.into(),
    }
    .into_record()
}

/// `TransactionFailed`
pub fn transaction_failed(reason: impl Into<String>) -> ErrorRecord {
    DomainError::TransactionFailed {
        reason: reason.into(),
    }
    .into_record()
}

/// `ConstraintViolation` of `constraint`
pub fn constraint_violation(
    constraint: impl Into<String>,
    reason: impl Into<String>,
) -> ErrorRecord {
    DomainError::ConstraintViolation {
        constraint: constraint.into(),
        reason: reason.into(),
    }
    .into_record()
}

// =============================================================================
// Auth
// =============================================================================

/// `Unauthenticated`
pub fn unauthenticated(reason: impl Into<String>) -> ErrorRecord {
    DomainError::Unauthenticated {
        reason: reason.into(),
    }
    .into_record()
}

/// `Unauthorized` to perform `action` on `resource`
pub fn unauthorized(resource: impl Into<String>, action: impl Into<String>) -> ErrorRecord {
    DomainError::Unauthorized {
        resource: resource.into(),
        action: action.into(),
    }
    .into_record()
}

/// `TokenExpired` at `expired_at`
pub fn token_expired(expired_at: Timestamp) -> ErrorRecord {
    DomainError::TokenExpired { expired_at }.into_record()
}

/// `InvalidCredentials`, optionally naming the user
pub fn invalid_credentials(username: Option<&str>) -> ErrorRecord {
    DomainError::InvalidCredentials {
        username: username.map(str::to_string),
    }
    .into_record()
}

// =============================================================================
// Config
// =============================================================================

/// `MissingConfig` for `key`
pub fn missing_config(key: impl Into<String>) -> ErrorRecord {
    DomainError::MissingConfig { key: key.into() }.into_record()
}

/// `InvalidConfig` for `key`
pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> ErrorRecord {
    DomainError::InvalidConfig {
        key: key.into(),
        reason: reason.into(),
    }
    .into_record()
}

/// `ConfigParseError` for `file`
pub fn config_parse_error(file: impl Into<String>, reason: impl Into<String>) -> ErrorRecord {
    DomainError::ConfigParseError {
        file: file.into(),
        reason: reason.into(),
    }
    .into_record()
}

// =============================================================================
// Catch-all
// =============================================================================

/// `Unexpected`
pub fn unexpected(reason: impl Into<String>) -> ErrorRecord {
    DomainError::Unexpected {
        reason: reason.into(),
    }
    .into_record()
}
