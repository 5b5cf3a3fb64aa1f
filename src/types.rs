use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::SqlHandleError;

/// Values bound to placeholders or read back from result rows.
///
/// ```rust
/// use sql_handle::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

/// Text layouts read back as timestamps; the first is also how timestamps are bound as text.
const TIMESTAMP_FORMATS: [&str; 2] = ["%F %T%.f", "%F %T"];

impl RowValues {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RowValues::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RowValues::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            RowValues::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Booleans come back from SQLite as 0/1 integers; both spellings are accepted.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValues::Bool(b) => Some(*b),
            RowValues::Int(0) => Some(false),
            RowValues::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Timestamps are stored as text, so text in a timestamp layout converts too.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            RowValues::Timestamp(dt) => Some(*dt),
            RowValues::Text(s) => TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok()),
            _ => None,
        }
    }

    /// Coerce this value to the data type requested by a bind call.
    ///
    /// # Errors
    ///
    /// Returns `SqlHandleError::ParameterError` when the value has no representation in the
    /// requested type (for example non-numeric text bound as [`ParamType::Int`]).
    pub fn coerce(self, param_type: ParamType) -> Result<RowValues, SqlHandleError> {
        match param_type {
            ParamType::Null => Ok(RowValues::Null),
            ParamType::Int => coerce_int(self),
            ParamType::Str => Ok(coerce_text(self)),
            ParamType::Bool => coerce_bool(self),
            ParamType::Lob => Ok(match self {
                RowValues::Null => RowValues::Null,
                RowValues::Blob(bytes) => RowValues::Blob(bytes),
                other => match coerce_text(other) {
                    RowValues::Text(text) => RowValues::Blob(text.into_bytes()),
                    passthrough => passthrough,
                },
            }),
        }
    }
}

fn coerce_int(value: RowValues) -> Result<RowValues, SqlHandleError> {
    match value {
        RowValues::Int(i) => Ok(RowValues::Int(i)),
        RowValues::Null => Ok(RowValues::Null),
        RowValues::Bool(b) => Ok(RowValues::Int(i64::from(b))),
        #[allow(clippy::cast_possible_truncation)]
        RowValues::Float(f) if f.is_finite() => Ok(RowValues::Int(f.trunc() as i64)),
        RowValues::Text(ref s) => s.trim().parse::<i64>().map(RowValues::Int).map_err(|_| {
            SqlHandleError::ParameterError(format!("cannot bind text {s:?} as an integer"))
        }),
        RowValues::JSON(JsonValue::Number(ref n)) if n.is_i64() => {
            Ok(RowValues::Int(n.as_i64().unwrap_or_default()))
        }
        other => Err(SqlHandleError::ParameterError(format!(
            "cannot bind {other:?} as an integer"
        ))),
    }
}

fn coerce_bool(value: RowValues) -> Result<RowValues, SqlHandleError> {
    match value {
        RowValues::Bool(b) => Ok(RowValues::Bool(b)),
        RowValues::Null => Ok(RowValues::Null),
        RowValues::Int(i) => Ok(RowValues::Bool(i != 0)),
        RowValues::Text(ref s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "t" | "yes" | "on" => Ok(RowValues::Bool(true)),
            "0" | "false" | "f" | "no" | "off" | "" => Ok(RowValues::Bool(false)),
            _ => Err(SqlHandleError::ParameterError(format!(
                "cannot bind text {s:?} as a boolean"
            ))),
        },
        RowValues::JSON(JsonValue::Bool(b)) => Ok(RowValues::Bool(b)),
        other => Err(SqlHandleError::ParameterError(format!(
            "cannot bind {other:?} as a boolean"
        ))),
    }
}

fn coerce_text(value: RowValues) -> RowValues {
    match value {
        RowValues::Null => RowValues::Null,
        RowValues::Text(s) => RowValues::Text(s),
        RowValues::Int(i) => RowValues::Text(i.to_string()),
        RowValues::Float(f) => RowValues::Text(f.to_string()),
        RowValues::Bool(b) => RowValues::Text(if b { "1" } else { "0" }.to_string()),
        RowValues::Timestamp(dt) => RowValues::Text(dt.format(TIMESTAMP_FORMATS[0]).to_string()),
        RowValues::JSON(jval) => RowValues::Text(jval.to_string()),
        RowValues::Blob(bytes) => match String::from_utf8(bytes) {
            Ok(text) => RowValues::Text(text),
            Err(err) => RowValues::Blob(err.into_bytes()),
        },
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Data type requested when binding a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Bind SQL NULL regardless of the value
    Null,
    /// Integer
    Int,
    /// Text
    Str,
    /// Boolean
    Bool,
    /// Large object, bound as a blob
    Lob,
}
