//! The configuration record that drives step construction.
//!
//! A [`CleanerConfig`] is a plain key/value mapping. Each step reads the keys it
//! cares about and ignores the rest, so one record can configure a whole
//! pipeline:
//!
//! ```
//! use tidyframe::config::CleanerConfig;
//!
//! let config = CleanerConfig::from_json(
//!     r#"{ "type": "mean", "remove_duplicates": true, "schema": { "age": "int" } }"#,
//! )?;
//! assert!(config.flag("remove_duplicates"));
//! assert_eq!(config.get_str("type"), Some("mean"));
//! # Ok::<(), tidyframe::error::CleanError>(())
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CleanError, Result};

pub const KEY_TYPE: &str = "type";
pub const KEY_REMOVE_DUPLICATES: &str = "remove_duplicates";
pub const KEY_SCHEMA: &str = "schema";
pub const KEY_COLUMNS: &str = "columns";
pub const KEY_VALUE: &str = "value";

/// Read-only configuration record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanerConfig {
    entries: Map<String, Value>,
}

impl CleanerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a record from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::InvalidConfig`] if the text is not valid JSON or
    /// its top level is not an object.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }

    /// Serialize the record back to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::InvalidConfig`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder-style insert, mostly useful in tests and doc snippets.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The value under `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Truthiness of `key`; absent keys are false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    /// Column names listed under `key`.
    ///
    /// `None` when the key is absent or `null`, meaning "use the step's
    /// default columns".
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::InvalidConfig`] if the value is not an array of
    /// strings.
    pub fn column_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_owned).ok_or_else(|| {
                        CleanError::InvalidConfig(format!(
                            "'{key}' must list column names, found {item}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(other) => Err(CleanError::InvalidConfig(format!(
                "'{key}' must be an array of column names, found {other}"
            ))),
        }
    }

    /// The object stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError::MissingKey`] if absent and
    /// [`CleanError::InvalidConfig`] if the value is not an object.
    pub fn require_object(&self, key: &'static str) -> Result<&Map<String, Value>> {
        match self.get(key) {
            None => Err(CleanError::MissingKey(key)),
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(CleanError::InvalidConfig(format!(
                "'{key}' must be an object, found {other}"
            ))),
        }
    }
}

impl From<Map<String, Value>> for CleanerConfig {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl TryFrom<Value> for CleanerConfig {
    type Error = CleanError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(CleanError::InvalidConfig(format!(
                "configuration must be a JSON object, found {other}"
            ))),
        }
    }
}

/// Python-style truthiness: empty and zero values are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
