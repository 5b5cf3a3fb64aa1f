use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

use crate::types::RowValues;

/// Shape of the rows handed out by fetch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Column name to value mapping. Duplicate column names collapse into one entry
    /// holding the last value, at the position of the first occurrence.
    #[default]
    Named,
    /// Every column in result order, duplicates included.
    Positional,
}

/// Column layout shared by every row fetched from one result in one mode.
#[derive(Debug, Clone)]
pub(crate) struct RowLayout {
    column_names: Arc<Vec<String>>,
    column_index_cache: Arc<HashMap<String, usize>>,
    // source column index for each output column; `None` keeps the row as-is
    picks: Option<Vec<usize>>,
}

impl RowLayout {
    pub(crate) fn new(source_columns: &[String], mode: FetchMode) -> Self {
        match mode {
            FetchMode::Positional => {
                let column_names = Arc::new(source_columns.to_vec());
                let cache = column_names
                    .iter()
                    .enumerate()
                    .map(|(i, name)| (name.clone(), i))
                    .collect();
                Self {
                    column_names,
                    column_index_cache: Arc::new(cache),
                    picks: None,
                }
            }
            FetchMode::Named => {
                let mut names: Vec<String> = Vec::with_capacity(source_columns.len());
                let mut picks: Vec<usize> = Vec::with_capacity(source_columns.len());
                let mut cache: HashMap<String, usize> = HashMap::new();
                for (src, name) in source_columns.iter().enumerate() {
                    if let Some(&slot) = cache.get(name) {
                        picks[slot] = src;
                    } else {
                        cache.insert(name.clone(), names.len());
                        names.push(name.clone());
                        picks.push(src);
                    }
                }
                let picks = if picks.len() == source_columns.len() {
                    None
                } else {
                    Some(picks)
                };
                Self {
                    column_names: Arc::new(names),
                    column_index_cache: Arc::new(cache),
                    picks,
                }
            }
        }
    }

    pub(crate) fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    pub(crate) fn shape(&self, mut values: Vec<RowValues>) -> Row {
        let values = match &self.picks {
            None => values,
            Some(picks) => picks
                .iter()
                .map(|&src| {
                    values
                        .get_mut(src)
                        .map_or(RowValues::Null, |slot| std::mem::replace(slot, RowValues::Null))
                })
                .collect(),
        };
        Row {
            column_names: Arc::clone(&self.column_names),
            values,
            column_index_cache: Arc::clone(&self.column_index_cache),
        }
    }
}

/// One fetched result record.
///
/// Column names are shared with every other row of the same result.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    column_names: Arc<Vec<String>>,
    values: Vec<RowValues>,
    column_index_cache: Arc<HashMap<String, usize>>,
}

impl Row {
    /// Build a standalone row in [`FetchMode::Named`] shape. Columns without a value are
    /// NULL.
    #[must_use]
    pub fn new(column_names: Vec<String>, mut values: Vec<RowValues>) -> Self {
        if values.len() < column_names.len() {
            values.resize(column_names.len(), RowValues::Null);
        }
        RowLayout::new(&column_names, FetchMode::Named).shape(values)
    }

    /// Index of a column by name. With duplicate names in a positional row, the last
    /// occurrence wins.
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        self.column_index_cache.get(column_name).copied()
    }

    /// Value of a column by name.
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Value of a column by zero-based position.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<RowValues> {
        self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.column_names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// Render the row as a JSON object keyed by column name.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let map = self
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    serde_json::to_value(value).unwrap_or(JsonValue::Null),
                )
            })
            .collect();
        JsonValue::Object(map)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
