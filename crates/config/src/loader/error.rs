//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for all configuration loading failures.
//! - Carry per-field schema validation issues in `ValidationError`.
//!
//! Does NOT handle:
//! - Recovery or retries. Every error surfaces to the caller unchanged.
//!
//! Invariants:
//! - All error variants include context for debugging (paths, field names, keys).
//! - Schema validation issues name fields and types; environment errors name keys only.
//! - Dotenv errors NEVER include raw .env line contents to prevent secret leakage.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use crate::format::ConfigFormat;
use crate::source::SourceKind;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config source must not be empty")]
    EmptySource,

    #[error("Operation requires a {expected} source, but the loader was created with a {actual} source")]
    SourceMismatch {
        expected: SourceKind,
        actual: SourceKind,
    },

    #[error(
        "Unsupported config file format for {path}: {extension:?} (expected .json, .yaml or .yml)"
    )]
    UnsupportedFormat {
        path: PathBuf,
        extension: Option<String>,
    },

    /// The path does not exist. Other I/O failures are `FileRead`;
    /// use [`ConfigError::is_file_access`] to match both.
    #[error("Config file not found: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path exists but could not be read (permissions, a directory, ...).
    #[error("Failed to read config file at {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config file at {path}: {message}")]
    Parse {
        path: PathBuf,
        format: ConfigFormat,
        message: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Missing required environment variable(s): {}", .keys.join(", "))]
    MissingRequiredKeys { keys: Vec<String> },

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set EZLOAD_DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set EZLOAD_DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

impl ConfigError {
    /// Whether the config file does not exist or could not be read.
    pub fn is_file_access(&self) -> bool {
        matches!(
            self,
            ConfigError::FileNotFound { .. } | ConfigError::FileRead { .. }
        )
    }
}

/// Schema validation failure, listing every offending field.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Configuration validation failed: {}", join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// Names of the fields that failed, in report order.
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }

    /// Whether `field` is among the failing fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// Field name. Empty when a deserializer could not attribute the failure.
    pub field: String,
    pub kind: IssueKind,
}

impl FieldIssue {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: IssueKind::Missing,
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind: IssueKind::TypeMismatch {
                expected: expected.into(),
                found: found.into(),
            },
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = if self.field.is_empty() {
            "<document>"
        } else {
            self.field.as_str()
        };
        match &self.kind {
            IssueKind::Missing => write!(f, "{field}: field required"),
            IssueKind::TypeMismatch { expected, found } => {
                write!(f, "{field}: expected {expected}, found {found}")
            }
            IssueKind::Invalid { message } => write!(f, "{field}: {message}"),
        }
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    Missing,
    TypeMismatch { expected: String, found: String },
    Invalid { message: String },
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
