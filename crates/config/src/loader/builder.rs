//! Configuration loader construction.
//!
//! Responsibilities:
//! - Hold the config source and optional validation schema.
//! - Provide builder-style construction and source-kind guards.
//!
//! Does NOT handle:
//! - File loading (see file.rs).
//! - Environment loading (see env.rs).
//!
//! Invariants / Assumptions:
//! - Construction performs no I/O.
//! - A loader is immutable once built; every load call is independent.

use std::path::{Path, PathBuf};

use super::error::ConfigError;
use crate::schema::Schema;
use crate::source::{ConfigSource, SourceKind};

/// Loads configuration from a JSON/YAML file or from environment variables.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_source: ConfigSource,
    config_model: Option<Schema>,
}

impl ConfigLoader {
    /// Create a loader from a source string.
    ///
    /// The literal `"env"` selects environment mode; anything else is a file path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptySource` for an empty or whitespace-only string.
    pub fn new(config_source: &str) -> Result<Self, ConfigError> {
        Ok(Self::with_source(config_source.parse()?))
    }

    /// Create a loader for a file path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::with_source(ConfigSource::File(path.into()))
    }

    /// Create a loader in environment mode.
    pub fn from_env_source() -> Self {
        Self::with_source(ConfigSource::Env)
    }

    pub fn with_source(config_source: ConfigSource) -> Self {
        Self {
            config_source,
            config_model: None,
        }
    }

    /// Validate file-based loads against `schema`.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.config_model = Some(schema);
        self
    }

    pub fn source(&self) -> &ConfigSource {
        &self.config_source
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.config_model.as_ref()
    }

    pub(crate) fn file_path(&self) -> Result<&Path, ConfigError> {
        self.config_source
            .path()
            .ok_or_else(|| self.mismatch(SourceKind::File))
    }

    pub(crate) fn ensure_env_source(&self) -> Result<(), ConfigError> {
        match self.config_source {
            ConfigSource::Env => Ok(()),
            ConfigSource::File(_) => Err(self.mismatch(SourceKind::Env)),
        }
    }

    fn mismatch(&self, expected: SourceKind) -> ConfigError {
        ConfigError::SourceMismatch {
            expected,
            actual: self.config_source.kind(),
        }
    }
}
