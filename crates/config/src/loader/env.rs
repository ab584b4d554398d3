//! Environment variable loading.
//!
//! Responsibilities:
//! - Snapshot an `Environment` and filter it by key prefix.
//! - Resolve required keys, substituting defaults where provided.
//!
//! Does NOT handle:
//! - Type conversion. Environment values are always strings.
//! - `.env` file parsing (see environment.rs).
//!
//! Invariants:
//! - Values are returned verbatim except where defaults are substituted.
//! - Prefix matching is an exact `starts_with`, with no delimiter normalization.
//! - Defaults apply only to required keys that are otherwise unresolved.
//! - With `raise_on_missing`, every unresolved key is reported in one error.

use std::collections::BTreeMap;

use super::builder::ConfigLoader;
use super::error::ConfigError;
use crate::EnvMap;
use crate::constants::DEFAULT_RAISE_ON_MISSING;
use crate::environment::{Environment, ProcessEnv};

/// Which snapshot required keys are checked against when a prefix is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequiredKeyScope {
    /// Only the prefix-filtered variables. Without a prefix this is the full
    /// environment. A required key that exists but lacks the prefix counts as
    /// missing and is never replaced by its default.
    #[default]
    Filtered,
    /// The full environment. A required key found there is returned even if
    /// it lacks the prefix.
    Full,
}

/// Options for `ConfigLoader::load_from_env`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOptions {
    pub key_prefix: Option<String>,
    pub required_keys: Vec<String>,
    pub default_values: BTreeMap<String, String>,
    pub raise_on_missing: bool,
    pub required_key_scope: RequiredKeyScope,
}

impl Default for EnvOptions {
    fn default() -> Self {
        Self {
            key_prefix: None,
            required_keys: Vec::new(),
            default_values: BTreeMap::new(),
            raise_on_missing: DEFAULT_RAISE_ON_MISSING,
            required_key_scope: RequiredKeyScope::default(),
        }
    }
}

impl EnvOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only variables whose names start with `prefix`.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_required_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_values.insert(key.into(), value.into());
        self
    }

    pub fn with_default_values<I, K, V>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.default_values
            .extend(defaults.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Fail on unresolved required keys (`true`, the default) or omit them.
    pub fn raise_on_missing(mut self, raise: bool) -> Self {
        self.raise_on_missing = raise;
        self
    }

    pub fn with_required_key_scope(mut self, scope: RequiredKeyScope) -> Self {
        self.required_key_scope = scope;
        self
    }
}

impl ConfigLoader {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// - `SourceMismatch` if the loader was created for a file
    /// - `MissingRequiredKeys` if required keys are unresolved and
    ///   `raise_on_missing` is set
    pub fn load_from_env(&self, options: &EnvOptions) -> Result<EnvMap, ConfigError> {
        self.load_from_env_with(&ProcessEnv, options)
    }

    /// Load configuration from an injected environment.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load_from_env`].
    pub fn load_from_env_with(
        &self,
        env: &dyn Environment,
        options: &EnvOptions,
    ) -> Result<EnvMap, ConfigError> {
        self.ensure_env_source()?;
        resolve_env(env.vars(), options)
    }
}

/// Apply prefix filtering and required-key resolution to a snapshot.
pub(crate) fn resolve_env(
    vars: Vec<(String, String)>,
    options: &EnvOptions,
) -> Result<EnvMap, ConfigError> {
    let full: EnvMap = vars.into_iter().collect();

    let mut result: EnvMap = match options.key_prefix.as_deref() {
        Some(prefix) => full
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        None => full.clone(),
    };

    let mut missing: Vec<String> = Vec::new();
    for key in &options.required_keys {
        if result.contains_key(key) {
            continue;
        }
        if let Some(value) = full.get(key) {
            if options.required_key_scope == RequiredKeyScope::Full {
                result.insert(key.clone(), value.clone());
                continue;
            }
            // Excluded by the prefix: a default must not shadow the real value.
            tracing::debug!(key = %key, "Required key is outside the key prefix");
        } else if let Some(default) = options.default_values.get(key) {
            tracing::debug!(key = %key, "Using default value for missing required key");
            result.insert(key.clone(), default.clone());
            continue;
        }
        if !missing.contains(key) {
            missing.push(key.clone());
        }
    }

    if !missing.is_empty() {
        if options.raise_on_missing {
            return Err(ConfigError::MissingRequiredKeys { keys: missing });
        }
        tracing::warn!(
            keys = ?missing,
            "Omitting missing required environment variables"
        );
    }

    tracing::debug!(
        prefix = ?options.key_prefix,
        keys = result.len(),
        "Loaded configuration from environment"
    );

    Ok(result)
}
