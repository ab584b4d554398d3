//! Environment capabilities for environment-variable loading.
//!
//! Responsibilities:
//! - Define the `Environment` trait through which env snapshots are taken.
//! - Provide the process environment, an injected mapping, and a `.env` overlay.
//!
//! Does NOT handle:
//! - Prefix filtering or required keys (see loader/env.rs).
//!
//! Invariants:
//! - No implementation ever mutates the process environment.
//! - Non-UTF-8 process variables are skipped, never lossily converted.
//! - In a `.env` overlay, process values take precedence over file values.
//! - The `EZLOAD_DOTENV_DISABLED` variable is checked before any `.env` file is read.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_DOTENV_FILE, DOTENV_DISABLED_VAR};
use crate::loader::ConfigError;

/// Read access to a set of environment variables.
pub trait Environment {
    /// Snapshot all variables as `(name, value)` pairs.
    fn vars(&self) -> Vec<(String, String)>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars_os()
            .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (key, _) => {
                    let name = match &key {
                        Ok(name) => name.clone(),
                        Err(raw) => raw.to_string_lossy().into_owned(),
                    };
                    tracing::debug!(key = %name, "Skipping non-UTF-8 environment variable");
                    None
                }
            })
            .collect()
    }
}

/// An in-memory environment, for tests and embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for MapEnv {
    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// A `.env` file layered beneath another environment.
///
/// The file is read once at construction; the base environment is read on
/// every snapshot.
#[derive(Debug, Clone)]
pub struct DotenvEnv<E = ProcessEnv> {
    base: E,
    overlay: BTreeMap<String, String>,
    path: PathBuf,
}

impl DotenvEnv<ProcessEnv> {
    /// Overlay `./.env` beneath the process environment.
    ///
    /// # Errors
    ///
    /// See [`DotenvEnv::with_base`].
    pub fn from_current_dir() -> Result<Self, ConfigError> {
        Self::with_base(ProcessEnv, DEFAULT_DOTENV_FILE)
    }

    /// Overlay the `.env` file at `path` beneath the process environment.
    ///
    /// # Errors
    ///
    /// See [`DotenvEnv::with_base`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::with_base(ProcessEnv, path)
    }
}

impl<E: Environment> DotenvEnv<E> {
    /// Overlay the `.env` file at `path` beneath `base`.
    ///
    /// If `EZLOAD_DOTENV_DISABLED` is set to "true" or "1" in the process
    /// environment, the file is not read and the overlay is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The file exists but cannot be read (`ConfigError::DotenvIo`)
    ///
    /// A missing file is not an error; the overlay is simply empty.
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn with_base(base: E, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();

        if dotenv_disabled() {
            return Ok(Self {
                base,
                overlay: BTreeMap::new(),
                path,
            });
        }

        let overlay = match dotenvy::from_path_iter(&path) {
            Ok(iter) => iter
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map_err(map_dotenv_error)?,
            Err(e) if is_not_found(&e) => BTreeMap::new(),
            Err(e) => return Err(map_dotenv_error(e)),
        };

        tracing::debug!(
            path = %path.display(),
            entries = overlay.len(),
            "Loaded .env overlay"
        );

        Ok(Self {
            base,
            overlay,
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries read from the `.env` file.
    pub fn overlay_len(&self) -> usize {
        self.overlay.len()
    }
}

impl<E: Environment> Environment for DotenvEnv<E> {
    fn vars(&self) -> Vec<(String, String)> {
        let mut merged = self.overlay.clone();
        merged.extend(self.base.vars());
        merged.into_iter().collect()
    }
}

/// Check if dotenv loading is disabled via environment variable.
fn dotenv_disabled() -> bool {
    matches!(
        std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Check if a dotenv error indicates the file was not found.
fn is_not_found(err: &dotenvy::Error) -> bool {
    matches!(
        err,
        dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
    )
}

fn map_dotenv_error(err: dotenvy::Error) -> ConfigError {
    match err {
        dotenvy::Error::LineParse(_, idx) => ConfigError::DotenvParse { error_index: idx },
        dotenvy::Error::Io(io_err) => ConfigError::DotenvIo {
            kind: io_err.kind(),
        },
        _ => ConfigError::DotenvUnknown,
    }
}
