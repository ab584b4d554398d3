//! File-based configuration loading.
//!
//! Responsibilities:
//! - Detect format, read, and parse a JSON or YAML config file.
//! - Apply the loader's schema, or a typed serde model, to the parsed mapping.
//!
//! Does NOT handle:
//! - Environment variables (see env.rs).
//! - Coercion rules (see schema.rs).
//!
//! Invariants:
//! - The format is decided from the extension before the file is opened.
//! - The file is fully read and closed before parsing begins.
//! - Results are always plain mappings (or the caller's `T`), never partial.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;

use super::builder::ConfigLoader;
use super::error::{ConfigError, FieldIssue, IssueKind, ValidationError};
use crate::ConfigMap;
use crate::format::ConfigFormat;

impl ConfigLoader {
    /// Load the config file into a mapping.
    ///
    /// With a schema attached, the mapping is validated and coerced; keys not
    /// named by the schema are passed through unchanged.
    ///
    /// # Errors
    ///
    /// - `SourceMismatch` if the loader is in environment mode
    /// - `UnsupportedFormat` for an extension other than json/yaml/yml
    /// - `FileNotFound` / `FileRead` if the file cannot be read
    /// - `Parse` for malformed content or a non-mapping top level
    /// - `Validation` if the schema rejects the mapping
    pub fn load(&self) -> Result<ConfigMap, ConfigError> {
        let path = self.file_path()?;
        let map = read_config_file(path)?;

        match self.schema() {
            None => Ok(map),
            Some(schema) => {
                let validated = schema.validate(map)?;
                tracing::debug!(
                    path = %path.display(),
                    fields = schema.len(),
                    "Validated configuration against schema"
                );
                Ok(validated)
            }
        }
    }

    /// Load the config file and deserialize it into `T`.
    ///
    /// The attached schema, if any, is applied first.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load`]; deserialization failures are reported
    /// as `ConfigError::Validation`.
    pub fn load_typed<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        let map = self.load()?;
        Ok(deserialize_model(map)?)
    }

    /// Validate the config file through the typed model `T` and return a
    /// plain mapping.
    ///
    /// The model's serialized fields are laid over the original mapping, so
    /// keys the model does not declare are kept.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load_typed`].
    pub fn load_with_model<T>(&self) -> Result<ConfigMap, ConfigError>
    where
        T: DeserializeOwned + Serialize,
    {
        let mut map = self.load()?;
        let model: T = deserialize_model(map.clone())?;

        match serde_json::to_value(&model) {
            Ok(Value::Object(fields)) => {
                map.extend(fields);
                Ok(map)
            }
            Ok(other) => Err(ValidationError::new(vec![FieldIssue {
                field: String::new(),
                kind: IssueKind::Invalid {
                    message: format!(
                        "model must serialize to a mapping, got {}",
                        crate::format::value_kind(&other)
                    ),
                },
            }])
            .into()),
            Err(e) => Err(ValidationError::new(vec![FieldIssue {
                field: String::new(),
                kind: IssueKind::Invalid {
                    message: e.to_string(),
                },
            }])
            .into()),
        }
    }
}

/// Detect the format of `path`, read it, and parse it into a mapping.
pub(crate) fn read_config_file(path: &Path) -> Result<ConfigMap, ConfigError> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
        extension: path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned()),
    })?;

    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.to_path_buf(),
                source,
            }
        } else {
            ConfigError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let map = format
        .parse(&content)
        .map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            format,
            message,
        })?;

    tracing::debug!(
        path = %path.display(),
        format = %format,
        keys = map.len(),
        "Loaded configuration file"
    );

    Ok(map)
}

fn deserialize_model<T: DeserializeOwned>(map: ConfigMap) -> Result<T, ValidationError> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| ValidationError::new(vec![issue_from_serde(&e.to_string())]))
}

/// Attribute a serde error message to a field where the message names one.
fn issue_from_serde(message: &str) -> FieldIssue {
    let backticked = |prefix: &str| {
        message
            .strip_prefix(prefix)
            .and_then(|rest| rest.split('`').next())
            .map(str::to_string)
    };

    if let Some(field) = backticked("missing field `") {
        return FieldIssue::missing(field);
    }
    let field = backticked("unknown field `").unwrap_or_default();
    FieldIssue {
        field,
        kind: IssueKind::Invalid {
            message: message.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_from_serde_missing_field() {
        let issue = issue_from_serde("missing field `key3`");
        assert_eq!(issue, FieldIssue::missing("key3"));
    }

    #[test]
    fn test_issue_from_serde_unattributed() {
        let issue = issue_from_serde("invalid type: string \"x\", expected u16");
        assert!(issue.field.is_empty());
        assert!(matches!(issue.kind, IssueKind::Invalid { .. }));
    }
}
