//! Conversions into the typed value model
//!
//! This is the one place that looks at `serde_json::Value`'s runtime
//! variants. Everything downstream works on [`Value`].

use super::{Map, Value};
use crate::error::{FormatError, FormattingResult};

/// Default maximum nesting depth accepted when converting foreign trees
pub const DEFAULT_MAX_DEPTH: usize = 1000;

impl Value {
    /// Convert a `serde_json::Value`, failing with
    /// [`FormatError::DepthExceeded`] once nesting goes past `max_depth`.
    pub fn from_json(json: &serde_json::Value, max_depth: Option<usize>) -> FormattingResult<Self> {
        from_json_at(json, 0, max_depth)
    }
}

fn from_json_at(
    json: &serde_json::Value,
    depth: usize,
    max_depth: Option<usize>,
) -> FormattingResult<Value> {
    let value = match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            let depth = descend(depth, max_depth)?;
            let items = items
                .iter()
                .map(|item| from_json_at(item, depth, max_depth))
                .collect::<FormattingResult<Vec<_>>>()?;
            Value::Array(items)
        }
        serde_json::Value::Object(fields) => {
            let depth = descend(depth, max_depth)?;
            let mut map = Map::with_capacity(fields.len());
            for (key, field) in fields {
                map.insert(key.clone(), from_json_at(field, depth, max_depth)?);
            }
            Value::Object(map)
        }
    };
    Ok(value)
}

/// Step one composite level deeper, enforcing the nesting limit
pub(crate) fn descend(depth: usize, max_depth: Option<usize>) -> FormattingResult<usize> {
    let next = depth + 1;
    match max_depth {
        Some(limit) if next > limit => Err(FormatError::DepthExceeded { limit }),
        _ => Ok(next),
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = FormatError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Value::from_json(&json, Some(DEFAULT_MAX_DEPTH))
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = FormatError;

    fn try_from(json: &serde_json::Value) -> Result<Self, Self::Error> {
        Value::from_json(json, Some(DEFAULT_MAX_DEPTH))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}
