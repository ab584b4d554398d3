//! Declarative schemas for validating loaded configuration.
//!
//! Responsibilities:
//! - Describe expected fields: name, type, required/optional, optional default.
//! - Validate a `ConfigMap` field-by-field, coercing convertible values.
//!
//! Does NOT handle:
//! - Environment variables. Schemas apply to file-based loading only.
//! - Typed (serde) targets; see `ConfigLoader::load_with_model`.
//!
//! Invariants:
//! - Keys not declared in the schema pass through untouched.
//! - Validation never drops keys; on success the result has at least as many
//!   keys as the input.
//! - All failing fields are reported together, in schema declaration order.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::format::value_kind;
use crate::loader::{FieldIssue, ValidationError};
use crate::ConfigMap;

/// The type a schema field must convert to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    List,
    Mapping,
    Any,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::List => "list",
            FieldType::Mapping => "mapping",
            FieldType::Any => "any",
        };
        f.write_str(name)
    }
}

impl FieldType {
    /// Convert `value` to this type, or return `None` if it is not convertible.
    pub fn coerce(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (FieldType::Any, v) => Some(v.clone()),
            (FieldType::String, Value::String(_)) => Some(value.clone()),
            (FieldType::Integer, Value::Number(n)) => coerce_integer(n),
            (FieldType::Integer, Value::String(s)) => {
                s.trim().parse::<i64>().ok().map(Value::from)
            }
            (FieldType::Float, Value::Number(n)) => {
                n.as_f64().and_then(Number::from_f64).map(Value::Number)
            }
            (FieldType::Float, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            (FieldType::Boolean, Value::Bool(_)) => Some(value.clone()),
            (FieldType::Boolean, Value::Number(n)) => match n.as_i64() {
                Some(0) => Some(Value::Bool(false)),
                Some(1) => Some(Value::Bool(true)),
                _ => None,
            },
            (FieldType::Boolean, Value::String(s)) => parse_bool(s).map(Value::Bool),
            (FieldType::List, Value::Array(_)) => Some(value.clone()),
            (FieldType::Mapping, Value::Object(_)) => Some(value.clone()),
            _ => None,
        }
    }
}

fn coerce_integer(n: &Number) -> Option<Value> {
    if n.is_i64() || n.is_u64() {
        return Some(Value::Number(n.clone()));
    }
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Value::from(f as i64))
    } else {
        None
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// One declared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default = "default_required")]
    pub required: bool,
    /// Value inserted when an optional field is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

fn default_required() -> bool {
    true
}

impl FieldSpec {
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
            default: None,
        }
    }

    pub fn optional(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            default: None,
        }
    }

    /// Set the default for an optional field.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A set of named, typed fields.
///
/// Deserializes from `{"fields": {"name": {"type": "string", "required": true}}}`
/// so schemas can themselves live in JSON or YAML files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    #[serde(default)]
    fields: BTreeMap<String, FieldSpec>,
    #[serde(skip)]
    order: Vec<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Redeclaring a name replaces the earlier spec.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        let name = name.into();
        if !self.order.contains(&name) {
            self.order.push(name.clone());
        }
        self.fields.insert(name, spec);
        self
    }

    pub fn required(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(name, FieldSpec::required(field_type))
    }

    pub fn optional(self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.field(name, FieldSpec::optional(field_type))
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order; deserialized schemas fall back to name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        let declared = self
            .order
            .iter()
            .filter_map(|name| self.fields.get_key_value(name));
        let undeclared = self
            .fields
            .iter()
            .filter(|(name, _)| !self.order.contains(*name));
        declared
            .chain(undeclared)
            .map(|(name, spec)| (name.as_str(), spec))
    }

    /// Validate `map`, returning the coerced mapping.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` naming every field that is missing
    /// (required, no value) or not convertible to its declared type.
    pub fn validate(&self, mut map: ConfigMap) -> Result<ConfigMap, ValidationError> {
        let mut issues = Vec::new();

        for (name, spec) in self.fields() {
            match map.get(name) {
                None => {
                    if spec.required {
                        issues.push(FieldIssue::missing(name));
                    } else if let Some(default) = &spec.default {
                        map.insert(name.to_string(), default.clone());
                    }
                }
                Some(Value::Null) if !spec.required => {}
                Some(value) => {
                    let coerced = spec.field_type.coerce(value).ok_or(value_kind(value));
                    match coerced {
                        Ok(coerced) => {
                            map.insert(name.to_string(), coerced);
                        }
                        Err(found) => issues.push(FieldIssue::type_mismatch(
                            name,
                            spec.field_type.to_string(),
                            found,
                        )),
                    }
                }
            }
        }

        if issues.is_empty() {
            Ok(map)
        } else {
            Err(ValidationError::new(issues))
        }
    }
}
