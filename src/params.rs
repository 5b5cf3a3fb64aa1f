use std::fmt;

use crate::error::SqlHandleError;
use crate::types::{ParamType, RowValues};

/// Prefixes `SQLite` accepts for named placeholders.
const NAMED_PREFIXES: [char; 3] = [':', '@', '$'];

/// Identifies a placeholder in a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// Question mark placeholder, 1-indexed.
    Position(usize),
    /// Named placeholder, with or without its `:` prefix.
    Named(String),
}

impl Placeholder {
    /// Candidate spellings of a named placeholder as `SQLite` reports them.
    pub(crate) fn spellings(name: &str) -> Vec<String> {
        if name.starts_with(NAMED_PREFIXES) {
            vec![name.to_string()]
        } else {
            NAMED_PREFIXES.iter().map(|p| format!("{p}{name}")).collect()
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Position(idx) => write!(f, "?{idx}"),
            Placeholder::Named(name) if name.starts_with(NAMED_PREFIXES) => f.write_str(name),
            Placeholder::Named(name) => write!(f, ":{name}"),
        }
    }
}

impl From<usize> for Placeholder {
    fn from(idx: usize) -> Self {
        Placeholder::Position(idx)
    }
}

// Integer literals default to i32; negative positions map to 0, which never resolves.
impl From<i32> for Placeholder {
    fn from(idx: i32) -> Self {
        Placeholder::Position(usize::try_from(idx).unwrap_or(0))
    }
}

impl From<&str> for Placeholder {
    fn from(name: &str) -> Self {
        Placeholder::Named(name.to_string())
    }
}

impl From<String> for Placeholder {
    fn from(name: String) -> Self {
        Placeholder::Named(name)
    }
}

/// A deferred accessor read immediately before execute.
pub type Accessor = Box<dyn Fn() -> RowValues>;

/// A value attached to one placeholder of the current statement.
pub enum Binding {
    /// Copied at bind time.
    Value(RowValues),
    /// Evaluated at execute time, then coerced to the recorded type.
    Deferred(Accessor, ParamType),
}

impl Binding {
    /// Produce the value to hand to the driver.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ParameterError` if a deferred value cannot be coerced.
    pub fn resolve(&self) -> Result<RowValues, SqlHandleError> {
        match self {
            Binding::Value(value) => Ok(value.clone()),
            Binding::Deferred(accessor, param_type) => accessor().coerce(*param_type),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Binding::Deferred(_, param_type) => f
                .debug_tuple("Deferred")
                .field(&"<accessor>")
                .field(param_type)
                .finish(),
        }
    }
}

/// A complete parameter set handed to execute, replacing earlier bindings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamSet {
    /// Values for `?` placeholders, first element binds position 1.
    Positional(Vec<RowValues>),
    /// Values for named placeholders.
    Named(Vec<(String, RowValues)>),
}

impl ParamSet {
    #[must_use]
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        ParamSet::Positional(values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        ParamSet::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ParamSet::Positional(values) => values.len(),
            ParamSet::Named(pairs) => pairs.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pair every value with its placeholder.
    #[must_use]
    pub fn into_placeholders(self) -> Vec<(Placeholder, RowValues)> {
        match self {
            ParamSet::Positional(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (Placeholder::Position(i + 1), v))
                .collect(),
            ParamSet::Named(pairs) => pairs
                .into_iter()
                .map(|(k, v)| (Placeholder::Named(k), v))
                .collect(),
        }
    }
}

impl From<Vec<RowValues>> for ParamSet {
    fn from(values: Vec<RowValues>) -> Self {
        ParamSet::Positional(values)
    }
}
