//! Typed domain error taxonomy
//!
//! [`DomainError`] is the typed face of the taxonomy: one variant per
//! [`ErrorKind`] carrying that kind's fields. It owns the canned message
//! templates and the category stack rule, and converts into the untyped
//! [`ErrorRecord`] that actually travels through `Result`s and log
//! pipelines. [`DomainError::from_record`] recovers the typed view from a
//! record's kind and context.
//!
//! The serialized field names (camelCase) are the record's context keys, so
//! `HttpError { status_code, .. }` produces `context.statusCode`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::ErrorBuilder;
use crate::kind::ErrorKind;
use crate::record::{Context, ErrorRecord};
use crate::stack::StackCapturePolicy;
use crate::timestamp::Timestamp;
use crate::validation::FieldIssue;

/// Every standard error with its kind-specific fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all_fields = "camelCase")]
pub enum DomainError {
    // ==================== FileSystem ====================
    /// File or directory does not exist
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// File could not be read
    #[error("Failed to read file {path}: {reason}")]
    FileReadError { path: String, reason: String },

    /// File could not be written
    #[error("Failed to write file {path}: {reason}")]
    FileWriteError { path: String, reason: String },

    /// Filesystem permission denied
    #[error("Permission denied: cannot {operation} {path}")]
    PermissionDenied { path: String, operation: String },

    // ==================== Parse ====================
    /// Malformed JSON (`input` names the document, e.g. a file path)
    #[serde(rename = "InvalidJSON")]
    #[error("Invalid JSON in {input}: {reason}")]
    InvalidJson { input: String, reason: String },

    /// Malformed YAML
    #[serde(rename = "InvalidYAML")]
    #[error("Invalid YAML in {input}: {reason}")]
    InvalidYaml { input: String, reason: String },

    /// Malformed XML
    #[serde(rename = "InvalidXML")]
    #[error("Invalid XML in {input}: {reason}")]
    InvalidXml { input: String, reason: String },

    /// Malformed TOML
    #[serde(rename = "InvalidTOML")]
    #[error("Invalid TOML in {input}: {reason}")]
    InvalidToml { input: String, reason: String },

    // ==================== Validation ====================
    /// Schema validation failed
    #[error("Schema validation failed for {schema}: {} issue(s)", .issues.len())]
    SchemaValidation {
        schema: String,
        issues: Vec<FieldIssue>,
    },

    /// Required field absent
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    /// Field value outside its domain
    #[error("Invalid value for field {field}: {reason}")]
    InvalidFieldValue {
        field: String,
        value: Value,
        reason: String,
    },

    /// Field of the wrong type
    #[error("Type mismatch for field {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    // ==================== Network ====================
    /// Connection could not be established
    #[error("Connection to {host} failed: {reason}")]
    ConnectionFailed { host: String, reason: String },

    /// Deadline exceeded
    #[error("Operation {operation} timed out after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    /// Host name not resolvable
    #[serde(rename = "DNSResolutionFailed")]
    #[error("DNS resolution failed for {host}")]
    DnsResolutionFailed { host: String },

    /// Error status from a remote endpoint
    #[serde(rename = "HTTPError")]
    #[error("HTTP {status_code} from {url}")]
    HttpError {
        url: String,
        status_code: u16,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status_text: Option<String>,
    },

    // ==================== Database ====================
    /// Database unreachable
    #[error("Failed to connect to database {database}: {reason}")]
    DatabaseConnectionFailed { database: String, reason: String },

    /// Query rejected or failed
    #[error("Query failed: {reason}")]
    QueryFailed { query: String, reason: String },

    /// Transaction could not commit
    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    /// Constraint violated
    #[error("Constraint {constraint} violated: {reason}")]
    ConstraintViolation { constraint: String, reason: String },

    // ==================== Auth ====================
    /// No credentials presented
    #[error("Authentication required: {reason}")]
    Unauthenticated { reason: String },

    /// Credentials do not grant the action
    #[error("Not authorized to {action} {resource}")]
    Unauthorized { resource: String, action: String },

    /// Token past expiry
    #[error("Token expired at {expired_at}")]
    TokenExpired { expired_at: Timestamp },

    /// Credentials rejected
    #[error("Invalid credentials")]
    InvalidCredentials {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
    },

    // ==================== Config ====================
    /// Required configuration absent
    #[error("Missing configuration: {key}")]
    MissingConfig { key: String },

    /// Configuration value malformed
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// Configuration file unparsable
    #[error("Failed to parse configuration file {file}: {reason}")]
    ConfigParseError { file: String, reason: String },

    // ==================== Catch-all ====================
    /// Anything else
    #[error("Unexpected error: {reason}")]
    Unexpected { reason: String },
}

impl DomainError {
    /// Discriminator of this variant
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::FileNotFound { .. } => ErrorKind::FileNotFound,
            DomainError::FileReadError { .. } => ErrorKind::FileReadError,
            DomainError::FileWriteError { .. } => ErrorKind::FileWriteError,
            DomainError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            DomainError::InvalidJson { .. } => ErrorKind::InvalidJson,
            DomainError::InvalidYaml { .. } => ErrorKind::InvalidYaml,
            DomainError::InvalidXml { .. } => ErrorKind::InvalidXml,
            DomainError::InvalidToml { .. } => ErrorKind::InvalidToml,
            DomainError::SchemaValidation { .. } => ErrorKind::SchemaValidation,
            DomainError::RequiredFieldMissing { .. } => ErrorKind::RequiredFieldMissing,
            DomainError::InvalidFieldValue { .. } => ErrorKind::InvalidFieldValue,
            DomainError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            DomainError::ConnectionFailed { .. } => ErrorKind::ConnectionFailed,
            DomainError::Timeout { .. } => ErrorKind::Timeout,
            DomainError::DnsResolutionFailed { .. } => ErrorKind::DnsResolutionFailed,
            DomainError::HttpError { .. } => ErrorKind::HttpError,
            DomainError::DatabaseConnectionFailed { .. } => ErrorKind::DatabaseConnectionFailed,
            DomainError::QueryFailed { .. } => ErrorKind::QueryFailed,
            DomainError::TransactionFailed { .. } => ErrorKind::TransactionFailed,
            DomainError::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            DomainError::Unauthenticated { .. } => ErrorKind::Unauthenticated,
            DomainError::Unauthorized { .. } => ErrorKind::Unauthorized,
            DomainError::TokenExpired { .. } => ErrorKind::TokenExpired,
            DomainError::InvalidCredentials { .. } => ErrorKind::InvalidCredentials,
            DomainError::MissingConfig { .. } => ErrorKind::MissingConfig,
            DomainError::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            DomainError::ConfigParseError { .. } => ErrorKind::ConfigParseError,
            DomainError::Unexpected { .. } => ErrorKind::Unexpected,
        }
    }

    /// The variant's fields as a context map (camelCase keys)
    pub fn fields(&self) -> Context {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => {
                map.remove("kind");
                map
            }
            _ => Context::new(),
        }
    }

    /// Convert into a record using the process-wide stack policy
    pub fn into_record(self) -> ErrorRecord {
        let builder = ErrorBuilder::new(self.kind());
        self.assemble(builder)
    }

    /// Convert into a record using an explicit stack policy
    pub fn into_record_with(self, policy: &StackCapturePolicy) -> ErrorRecord {
        let builder = ErrorBuilder::with_policy(self.kind(), policy.clone());
        self.assemble(builder)
    }

    fn assemble(self, builder: ErrorBuilder) -> ErrorRecord {
        let mut builder = builder.context_map(self.fields());
        if self.kind().is_validation() {
            builder = builder.skip_stack();
        }
        builder.assemble(self.to_string())
    }

    /// Recover the typed view of a record
    ///
    /// Returns `None` when the record's context does not carry the fields of
    /// its kind (e.g. records built directly with [`ErrorBuilder`]).
    pub fn from_record(record: &ErrorRecord) -> Option<DomainError> {
        let mut map = record.context().cloned().unwrap_or_default();
        map.insert("kind".to_string(), Value::from(record.kind().as_str()));
        serde_json::from_value(Value::Object(map)).ok()
    }
}

impl From<DomainError> for ErrorRecord {
    fn from(error: DomainError) -> Self {
        error.into_record()
    }
}

// ============================================================================
// Tests
// ============================================================================
