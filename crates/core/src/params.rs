use std::collections::{BTreeMap, btree_map::Entry};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keyed access to pre-parsed model parameters.
///
/// The host parses its parameter files and exposes the values through this
/// trait. Models read what they need while they are constructed.
pub trait ParameterSource {
    /// Returns the raw value stored under `key`, if any.
    fn value(&self, key: &str) -> Option<&ParamValue>;

    /// Returns the number stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Missing`] if there is no value for `key`, or
    /// [`ParamError::NotANumber`] if the value is text.
    fn get_f64(&self, key: &str) -> Result<f64, ParamError> {
        match self.value(key) {
            Some(ParamValue::Number(value)) => Ok(*value),
            Some(ParamValue::Text(_)) => Err(ParamError::NotANumber {
                key: key.to_string(),
            }),
            None => Err(ParamError::missing(key)),
        }
    }

    /// Returns the value stored under `key` as text.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Missing`] if there is no value for `key`, or
    /// [`ParamError::NotText`] if the value is a number.
    fn get_str(&self, key: &str) -> Result<&str, ParamError> {
        match self.value(key) {
            Some(ParamValue::Text(text)) => Ok(text),
            Some(ParamValue::Number(_)) => Err(ParamError::NotText {
                key: key.to_string(),
            }),
            None => Err(ParamError::missing(key)),
        }
    }
}

/// A single parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Errors that may occur when reading or loading parameters.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParamError {
    #[error("parameter `{key}` is not defined")]
    Missing { key: String },

    #[error("parameter `{key}` is not a number")]
    NotANumber { key: String },

    #[error("parameter `{key}` is not text")]
    NotText { key: String },

    /// Two entries flatten to the same dotted key.
    #[error("parameter `{key}` is defined more than once")]
    Duplicate { key: String },

    /// The value type cannot be stored as a parameter (arrays, booleans, dates).
    #[error("parameter `{key}` has an unsupported value type `{kind}`")]
    Unsupported { key: String, kind: &'static str },

    #[error("failed to parse parameters: {0}")]
    Parse(String),
}

impl ParamError {
    pub(crate) fn missing(key: &str) -> Self {
        Self::Missing {
            key: key.to_string(),
        }
    }
}

/// An in-memory parameter set keyed by dotted names.
///
/// # Examples
///
/// ```
/// use strut_core::{ParameterSource, Parameters};
///
/// let params = Parameters::from_toml_str(
///     r#"
///     [SFH]
///     Damp_PushFL = 1000.0
///     Damp_PullFL = 800
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(params.get_f64("SFH.Damp_PushFL"), Ok(1000.0));
/// assert_eq!(params.get_f64("SFH.Damp_PullFL"), Ok(800.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Parameters {
    values: BTreeMap<String, ParamValue>,
}

impl Parameters {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `self` with `value` stored under `key`, replacing any previous value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Stores `value` under `key`, returning the previous value if any.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Parses parameters from a TOML document.
    ///
    /// Nested tables are flattened into dotted keys, so `[SFH] Damp_PushFL = 1`
    /// and `"SFH.Damp_PushFL" = 1` both define `SFH.Damp_PushFL`.
    /// Integers are stored as numbers.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamError`] if the document is not valid TOML, if two
    /// entries flatten to the same key, or if a value is not a number or string.
    pub fn from_toml_str(text: &str) -> Result<Self, ParamError> {
        let table: toml::Table = text
            .parse()
            .map_err(|err: toml::de::Error| ParamError::Parse(err.message().to_string()))?;

        let mut params = Self::new();
        params.flatten_table(None, table)?;
        Ok(params)
    }

    /// Returns the number of stored parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no parameters are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    fn flatten_table(&mut self, prefix: Option<&str>, table: toml::Table) -> Result<(), ParamError> {
        for (name, value) in table {
            let key = match prefix {
                Some(prefix) => format!("{prefix}.{name}"),
                None => name,
            };

            let value = match value {
                toml::Value::Table(inner) => {
                    self.flatten_table(Some(&key), inner)?;
                    continue;
                }
                toml::Value::Float(number) => ParamValue::Number(number),
                #[allow(clippy::cast_precision_loss)]
                toml::Value::Integer(number) => ParamValue::Number(number as f64),
                toml::Value::String(text) => ParamValue::Text(text),
                other => {
                    return Err(ParamError::Unsupported {
                        key,
                        kind: other.type_str(),
                    });
                }
            };

            match self.values.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(slot) => {
                    return Err(ParamError::Duplicate {
                        key: slot.key().clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl ParameterSource for Parameters {
    fn value(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
