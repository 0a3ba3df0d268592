//! Error kind discriminators
//!
//! Every [`ErrorRecord`](crate::ErrorRecord) is tagged with exactly one
//! [`ErrorKind`]. The set is closed: adding a kind means adding a variant
//! here, a category mapping, and a [`DomainError`](crate::DomainError)
//! variant carrying its fields.
//!
//! ## Categories
//!
//! | Category | Kinds |
//! |----------|-------|
//! | FileSystem | FileNotFound, FileReadError, FileWriteError, PermissionDenied |
//! | Parse | InvalidJSON, InvalidYAML, InvalidXML, InvalidTOML |
//! | Validation | SchemaValidation, RequiredFieldMissing, InvalidFieldValue, TypeMismatch |
//! | Network | ConnectionFailed, Timeout, DNSResolutionFailed, HTTPError |
//! | Database | DatabaseConnectionFailed, QueryFailed, TransactionFailed, ConstraintViolation |
//! | Auth | Unauthenticated, Unauthorized, TokenExpired, InvalidCredentials |
//! | Config | MissingConfig, InvalidConfig, ConfigParseError |
//! | Unexpected | Unexpected |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::UnknownKind;

/// Stable discriminator of an error record
///
/// Serializes as its literal name (e.g. `"FileNotFound"`, `"HTTPError"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    // ==================== FileSystem ====================
    /// A file or directory does not exist
    FileNotFound,
    /// A file exists but could not be read
    FileReadError,
    /// A file could not be written
    FileWriteError,
    /// The process lacks permission for a filesystem operation
    PermissionDenied,

    // ==================== Parse ====================
    /// Malformed JSON input
    #[serde(rename = "InvalidJSON")]
    InvalidJson,
    /// Malformed YAML input
    #[serde(rename = "InvalidYAML")]
    InvalidYaml,
    /// Malformed XML input
    #[serde(rename = "InvalidXML")]
    InvalidXml,
    /// Malformed TOML input
    #[serde(rename = "InvalidTOML")]
    InvalidToml,

    // ==================== Validation ====================
    /// Input failed schema validation
    SchemaValidation,
    /// A required field is absent
    RequiredFieldMissing,
    /// A field holds a value outside its allowed domain
    InvalidFieldValue,
    /// A field holds a value of the wrong type
    TypeMismatch,

    // ==================== Network ====================
    /// A connection could not be established
    ConnectionFailed,
    /// An operation exceeded its deadline
    Timeout,
    /// A host name could not be resolved
    #[serde(rename = "DNSResolutionFailed")]
    DnsResolutionFailed,
    /// A remote endpoint answered with an error status
    #[serde(rename = "HTTPError")]
    HttpError,

    // ==================== Database ====================
    /// The database could not be reached
    DatabaseConnectionFailed,
    /// A query was rejected or failed during execution
    QueryFailed,
    /// A transaction could not be committed
    TransactionFailed,
    /// A write violated a database constraint
    ConstraintViolation,

    // ==================== Auth ====================
    /// No credentials were presented
    Unauthenticated,
    /// Credentials are valid but do not grant the requested action
    Unauthorized,
    /// A token is past its expiry
    TokenExpired,
    /// Credentials were presented but rejected
    InvalidCredentials,

    // ==================== Config ====================
    /// A required configuration key is absent
    MissingConfig,
    /// A configuration value is out of range or malformed
    InvalidConfig,
    /// A configuration file could not be parsed
    ConfigParseError,

    // ==================== Catch-all ====================
    /// Anything not covered above, including converted foreign failures
    Unexpected,
}

/// Coarse grouping of error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// Filesystem access
    FileSystem,
    /// Input decoding
    Parse,
    /// Input validation
    Validation,
    /// Network transport and remote endpoints
    Network,
    /// Database access
    Database,
    /// Authentication and authorization
    Auth,
    /// Application configuration
    Config,
    /// Catch-all
    Unexpected,
}

impl ErrorCategory {
    /// All categories (for iteration)
    pub const ALL: [ErrorCategory; 8] = [
        ErrorCategory::FileSystem,
        ErrorCategory::Parse,
        ErrorCategory::Validation,
        ErrorCategory::Network,
        ErrorCategory::Database,
        ErrorCategory::Auth,
        ErrorCategory::Config,
        ErrorCategory::Unexpected,
    ];

    /// Stable name (used for metric labels)
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::FileSystem => "FileSystem",
            ErrorCategory::Parse => "Parse",
            ErrorCategory::Validation => "Validation",
            ErrorCategory::Network => "Network",
            ErrorCategory::Database => "Database",
            ErrorCategory::Auth => "Auth",
            ErrorCategory::Config => "Config",
            ErrorCategory::Unexpected => "Unexpected",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorKind {
    /// All kinds (for iteration)
    pub const ALL: [ErrorKind; 28] = [
        ErrorKind::FileNotFound,
        ErrorKind::FileReadError,
        ErrorKind::FileWriteError,
        ErrorKind::PermissionDenied,
        ErrorKind::InvalidJson,
        ErrorKind::InvalidYaml,
        ErrorKind::InvalidXml,
        ErrorKind::InvalidToml,
        ErrorKind::SchemaValidation,
        ErrorKind::RequiredFieldMissing,
        ErrorKind::InvalidFieldValue,
        ErrorKind::TypeMismatch,
        ErrorKind::ConnectionFailed,
        ErrorKind::Timeout,
        ErrorKind::DnsResolutionFailed,
        ErrorKind::HttpError,
        ErrorKind::DatabaseConnectionFailed,
        ErrorKind::QueryFailed,
        ErrorKind::TransactionFailed,
        ErrorKind::ConstraintViolation,
        ErrorKind::Unauthenticated,
        ErrorKind::Unauthorized,
        ErrorKind::TokenExpired,
        ErrorKind::InvalidCredentials,
        ErrorKind::MissingConfig,
        ErrorKind::InvalidConfig,
        ErrorKind::ConfigParseError,
        ErrorKind::Unexpected,
    ];

    /// The literal discriminator, identical to the serialized form
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::FileReadError => "FileReadError",
            ErrorKind::FileWriteError => "FileWriteError",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::InvalidJson => "InvalidJSON",
            ErrorKind::InvalidYaml => "InvalidYAML",
            ErrorKind::InvalidXml => "InvalidXML",
            ErrorKind::InvalidToml => "InvalidTOML",
            ErrorKind::SchemaValidation => "SchemaValidation",
            ErrorKind::RequiredFieldMissing => "RequiredFieldMissing",
            ErrorKind::InvalidFieldValue => "InvalidFieldValue",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::ConnectionFailed => "ConnectionFailed",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::DnsResolutionFailed => "DNSResolutionFailed",
            ErrorKind::HttpError => "HTTPError",
            ErrorKind::DatabaseConnectionFailed => "DatabaseConnectionFailed",
            ErrorKind::QueryFailed => "QueryFailed",
            ErrorKind::TransactionFailed => "TransactionFailed",
            ErrorKind::ConstraintViolation => "ConstraintViolation",
            ErrorKind::Unauthenticated => "Unauthenticated",
            ErrorKind::Unauthorized => "Unauthorized",
            ErrorKind::TokenExpired => "TokenExpired",
            ErrorKind::InvalidCredentials => "InvalidCredentials",
            ErrorKind::MissingConfig => "MissingConfig",
            ErrorKind::InvalidConfig => "InvalidConfig",
            ErrorKind::ConfigParseError => "ConfigParseError",
            ErrorKind::Unexpected => "Unexpected",
        }
    }

    /// The category this kind belongs to
    pub const fn category(&self) -> ErrorCategory {
        match self {
            ErrorKind::FileNotFound
            | ErrorKind::FileReadError
            | ErrorKind::FileWriteError
            | ErrorKind::PermissionDenied => ErrorCategory::FileSystem,
            ErrorKind::InvalidJson
            | ErrorKind::InvalidYaml
            | ErrorKind::InvalidXml
            | ErrorKind::InvalidToml => ErrorCategory::Parse,
            ErrorKind::SchemaValidation
            | ErrorKind::RequiredFieldMissing
            | ErrorKind::InvalidFieldValue
            | ErrorKind::TypeMismatch => ErrorCategory::Validation,
            ErrorKind::ConnectionFailed
            | ErrorKind::Timeout
            | ErrorKind::DnsResolutionFailed
            | ErrorKind::HttpError => ErrorCategory::Network,
            ErrorKind::DatabaseConnectionFailed
            | ErrorKind::QueryFailed
            | ErrorKind::TransactionFailed
            | ErrorKind::ConstraintViolation => ErrorCategory::Database,
            ErrorKind::Unauthenticated
            | ErrorKind::Unauthorized
            | ErrorKind::TokenExpired
            | ErrorKind::InvalidCredentials => ErrorCategory::Auth,
            ErrorKind::MissingConfig | ErrorKind::InvalidConfig | ErrorKind::ConfigParseError => {
                ErrorCategory::Config
            }
            ErrorKind::Unexpected => ErrorCategory::Unexpected,
        }
    }

    /// Validation kinds never carry a stack when built by a factory
    pub const fn is_validation(&self) -> bool {
        matches!(self.category(), ErrorCategory::Validation)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

// ============================================================================
// Tests
// ============================================================================
