//! Configuration loader for files and environment variables.
//!
//! Responsibilities:
//! - Provide `ConfigLoader`, which loads a JSON/YAML file or the environment
//!   into a plain mapping.
//! - Validate file-based loads against an optional `Schema` or typed model.
//! - Filter environment variables by prefix and resolve required keys.
//!
//! Does NOT handle:
//! - Merging multiple sources, watching files, or writing configuration back.
//!
//! Invariants / Assumptions:
//! - Every load is a single synchronous pass with no retries.
//! - Failures never yield partial results, except the documented
//!   `raise_on_missing = false` omission.

mod builder;
mod env;
mod error;
mod file;

#[cfg(test)]
mod tests;

pub use builder::ConfigLoader;
pub use env::{EnvOptions, RequiredKeyScope};
pub use error::{ConfigError, FieldIssue, IssueKind, ValidationError};
