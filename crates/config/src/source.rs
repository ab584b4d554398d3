//! Configuration source identifiers.
//!
//! Responsibilities:
//! - Represent where configuration comes from: a file path or the environment.
//! - Parse a source string, treating the `"env"` sentinel as environment mode.
//!
//! Does NOT handle:
//! - Any I/O. Constructing a source never touches the filesystem or environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::constants::ENV_SOURCE_SENTINEL;
use crate::loader::ConfigError;

/// Where a `ConfigLoader` reads configuration from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A JSON or YAML file on disk.
    File(PathBuf),
    /// The process environment (or an injected `Environment`).
    Env,
}

/// The kind of a `ConfigSource`, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    File,
    Env,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::File => f.write_str("file"),
            SourceKind::Env => f.write_str("environment"),
        }
    }
}

impl ConfigSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            ConfigSource::File(_) => SourceKind::File,
            ConfigSource::Env => SourceKind::Env,
        }
    }

    /// The file path, if this is a file source.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::File(path) => Some(path),
            ConfigSource::Env => None,
        }
    }
}

impl FromStr for ConfigSource {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ConfigError::EmptySource);
        }
        if s == ENV_SOURCE_SENTINEL {
            Ok(ConfigSource::Env)
        } else {
            Ok(ConfigSource::File(PathBuf::from(s)))
        }
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        ConfigSource::File(path)
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        ConfigSource::File(path.to_path_buf())
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Env => f.write_str(ENV_SOURCE_SENTINEL),
        }
    }
}
