//! File format detection and parsing.
//!
//! Responsibilities:
//! - Map a file extension to a supported `ConfigFormat`.
//! - Parse document text into a top-level `ConfigMap`.
//!
//! Does NOT handle:
//! - Reading files (see loader/file.rs).
//! - Schema validation (see schema.rs).
//!
//! Invariants:
//! - Extension matching is case-insensitive; no content sniffing is attempted.
//! - A document whose top-level value is not a mapping is a parse error.
//! - An empty YAML document parses to an empty mapping.
//! - Non-finite YAML floats (`.inf`, `.nan`) are parse errors; a JSON mapping
//!   cannot hold them and they are never replaced with `null`.
//! - Integer literals beyond the 64-bit range are YAML parse errors. JSON reads
//!   the same literal as a float, as `serde_json` does.

use serde_json::Value;
use std::fmt;
use std::path::Path;

use crate::constants::{JSON_EXTENSIONS, YAML_EXTENSIONS};
use crate::ConfigMap;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Json => f.write_str("JSON"),
            ConfigFormat::Yaml => f.write_str("YAML"),
        }
    }
}

impl ConfigFormat {
    /// Detect the format from a path's extension.
    ///
    /// Returns `None` for a missing or unrecognized extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        if JSON_EXTENSIONS.contains(&ext.as_str()) {
            Some(ConfigFormat::Json)
        } else if YAML_EXTENSIONS.contains(&ext.as_str()) {
            Some(ConfigFormat::Yaml)
        } else {
            None
        }
    }

    /// Parse `content` into a mapping.
    ///
    /// The error string is the underlying parser's diagnostic.
    pub fn parse(self, content: &str) -> Result<ConfigMap, String> {
        let value = match self {
            ConfigFormat::Json => {
                serde_json::from_str::<Value>(content).map_err(|e| e.to_string())?
            }
            ConfigFormat::Yaml => {
                if is_blank_yaml(content) {
                    return Ok(ConfigMap::new());
                }
                let yaml = serde_yaml::from_str::<serde_yaml::Value>(content)
                    .map_err(|e| e.to_string())?;
                if let Some(path) = non_finite_path(&yaml, String::new()) {
                    return Err(format!(
                        "non-finite float at `{path}` cannot be represented"
                    ));
                }
                serde_json::to_value(yaml).map_err(|e| e.to_string())?
            }
        };

        match value {
            Value::Object(map) => Ok(map),
            Value::Null if self == ConfigFormat::Yaml => Ok(ConfigMap::new()),
            other => Err(format!(
                "top-level value must be a mapping, found {}",
                value_kind(&other)
            )),
        }
    }
}

/// A YAML stream with nothing but whitespace, comments, or a bare document marker.
fn is_blank_yaml(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

/// Location of the first `.inf`/`.nan` in a YAML value, as a dotted path.
fn non_finite_path(value: &serde_yaml::Value, path: String) -> Option<String> {
    use serde_yaml::Value as Yaml;

    match value {
        Yaml::Number(n) if n.is_nan() || n.is_infinite() => Some(path),
        Yaml::Sequence(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| non_finite_path(item, format!("{path}[{i}]"))),
        Yaml::Mapping(map) => map.iter().find_map(|(key, item)| {
            let key = match key {
                Yaml::String(s) => s.clone(),
                other => serde_yaml::to_string(other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default(),
            };
            let child = if path.is_empty() {
                key
            } else {
                format!("{path}.{key}")
            };
            non_finite_path(item, child)
        }),
        Yaml::Tagged(tagged) => non_finite_path(&tagged.value, path),
        _ => None,
    }
}

/// Human-readable name of a JSON value's type.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
