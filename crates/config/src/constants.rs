//! Centralized constants for the ezload workspace.
//!
//! This module contains the sentinel tokens, file extensions, and
//! environment variable names used across modules.

// =============================================================================
// Config Sources
// =============================================================================

/// Config source string that selects environment-variable mode.
pub const ENV_SOURCE_SENTINEL: &str = "env";

// =============================================================================
// File Formats
// =============================================================================

/// File extensions recognized as JSON (compared case-insensitively).
pub const JSON_EXTENSIONS: &[&str] = &["json"];

/// File extensions recognized as YAML (compared case-insensitively).
pub const YAML_EXTENSIONS: &[&str] = &["yaml", "yml"];

// =============================================================================
// Environment Loading
// =============================================================================

/// Setting this variable to `1` or `true` disables `.env` overlays.
pub const DOTENV_DISABLED_VAR: &str = "EZLOAD_DOTENV_DISABLED";

/// Default `.env` file name used by `DotenvEnv::from_current_dir`.
pub const DEFAULT_DOTENV_FILE: &str = ".env";

/// Whether `load_from_env` fails on unresolved required keys by default.
pub const DEFAULT_RAISE_ON_MISSING: bool = true;
