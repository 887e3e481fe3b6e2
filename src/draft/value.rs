use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Scalar stored under a draft key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl DraftValue {
    /// Convert a decoded JSON value, rejecting arrays and objects.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Null => Some(DraftValue::Null),
            Value::Bool(flag) => Some(DraftValue::Bool(flag)),
            Value::Number(number) => number.as_f64().map(DraftValue::Number),
            Value::String(text) => Some(DraftValue::String(text)),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DraftValue::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DraftValue::Null)
    }
}

impl fmt::Display for DraftValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftValue::Null => Ok(()),
            DraftValue::Bool(flag) => write!(f, "{flag}"),
            DraftValue::Number(number) => {
                if number.fract() == 0.0 && number.abs() < 1e15 {
                    write!(f, "{}", *number as i64)
                } else {
                    write!(f, "{number}")
                }
            }
            DraftValue::String(text) => f.write_str(text),
        }
    }
}

impl From<&str> for DraftValue {
    fn from(value: &str) -> Self {
        DraftValue::String(value.to_string())
    }
}

impl From<String> for DraftValue {
    fn from(value: String) -> Self {
        DraftValue::String(value)
    }
}

impl From<f64> for DraftValue {
    fn from(value: f64) -> Self {
        DraftValue::Number(value)
    }
}

impl From<bool> for DraftValue {
    fn from(value: bool) -> Self {
        DraftValue::Bool(value)
    }
}

impl<T: Into<DraftValue>> From<Option<T>> for DraftValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DraftValue::Null, Into::into)
    }
}
