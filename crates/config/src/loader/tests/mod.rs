//! Tests for the configuration loader.
//!
//! Responsibilities:
//! - Test file loading: format detection, read and parse failures.
//! - Test schema and typed-model validation through `ConfigLoader::load`.
//! - Test environment loading: prefixes, required keys, defaults.
//! - Test the log events emitted while loading.
//!
//! Invariants:
//! - Environment logic is tested against injected `MapEnv`s; tests that touch
//!   the real process environment use `serial_test` and `temp_env`.
//! - Temporary directories are cleaned up automatically via `tempfile`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub mod logging_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

/// Write `content` to `dir/name` and return the path.
pub fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write test config");
    path
}

pub const SAMPLE_JSON: &str = r#"{"key1": "value1", "key2": "value2"}"#;

pub const SAMPLE_YAML: &str = "
key1: value1
key2: value2
";
