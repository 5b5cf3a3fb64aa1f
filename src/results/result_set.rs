use std::collections::VecDeque;

use super::row::{FetchMode, Row, RowLayout};
use crate::types::RowValues;

/// Buffered result of one execute: the rows still to be fetched plus the affected count.
#[derive(Debug, Clone)]
pub struct ResultSet {
    source_columns: Vec<String>,
    named: RowLayout,
    positional: RowLayout,
    pending: VecDeque<Vec<RowValues>>,
    rows_affected: u64,
}

impl ResultSet {
    /// Result of a statement that produced no columns (INSERT/UPDATE/DELETE, DDL).
    #[must_use]
    pub fn affected(rows_affected: u64) -> Self {
        Self::with_columns(Vec::new(), rows_affected)
    }

    /// Empty result with the given columns; rows are appended with [`ResultSet::push_row`].
    #[must_use]
    pub fn with_columns(column_names: Vec<String>, rows_affected: u64) -> Self {
        Self {
            named: RowLayout::new(&column_names, FetchMode::Named),
            positional: RowLayout::new(&column_names, FetchMode::Positional),
            source_columns: column_names,
            pending: VecDeque::new(),
            rows_affected,
        }
    }

    /// Append a row; each produced row also counts toward [`ResultSet::rows_affected`].
    pub fn push_row(&mut self, values: Vec<RowValues>) {
        self.pending.push_back(values);
        self.rows_affected += 1;
    }

    /// Column names as reported by the driver, duplicates included.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.source_columns
    }

    /// Column names of rows fetched in `mode`.
    #[must_use]
    pub fn column_names_for(&self, mode: FetchMode) -> &[String] {
        self.layout(mode).column_names()
    }

    #[must_use]
    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    /// Rows not yet fetched.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Take the next row, or `None` once the result is exhausted.
    pub fn next_row(&mut self, mode: FetchMode) -> Option<Row> {
        let values = self.pending.pop_front()?;
        Some(self.layout(mode).shape(values))
    }

    /// Take every remaining row, preserving result order.
    pub fn drain_rows(&mut self, mode: FetchMode) -> Vec<Row> {
        let layout = match mode {
            FetchMode::Named => &self.named,
            FetchMode::Positional => &self.positional,
        };
        self.pending.drain(..).map(|values| layout.shape(values)).collect()
    }

    fn layout(&self, mode: FetchMode) -> &RowLayout {
        match mode {
            FetchMode::Named => &self.named,
            FetchMode::Positional => &self.positional,
        }
    }
}
