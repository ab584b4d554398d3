//! Configuration loading for JSON/YAML files and environment variables.
//!
//! This crate reads a config file or the process environment into a plain
//! key/value mapping, optionally validating file contents against a schema.

pub mod constants;
pub mod environment;
pub mod format;
mod loader;
pub mod schema;
pub mod source;

use std::collections::BTreeMap;

pub use environment::{DotenvEnv, Environment, MapEnv, ProcessEnv};
pub use format::ConfigFormat;
pub use loader::{
    ConfigError, ConfigLoader, EnvOptions, FieldIssue, IssueKind, RequiredKeyScope,
    ValidationError,
};
pub use schema::{FieldSpec, FieldType, Schema};
pub use source::{ConfigSource, SourceKind};

/// A loaded configuration file: string keys to arbitrary values.
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

/// A loaded environment: string keys to string values.
pub type EnvMap = BTreeMap<String, String>;

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}
