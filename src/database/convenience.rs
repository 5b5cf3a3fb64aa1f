use super::Database;
use crate::error::SqlHandleError;
use crate::params::ParamSet;
use crate::results::Row;

/// What [`Database::read`] hands back.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadResult {
    /// Every matching row (`all = true`).
    Rows(Vec<Row>),
    /// The first row, or `None` when nothing matched (`all = false`).
    Row(Option<Row>),
}

impl ReadResult {
    /// All rows carried by this result; a single-row read yields zero or one.
    #[must_use]
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            ReadResult::Rows(rows) => rows,
            ReadResult::Row(row) => row.into_iter().collect(),
        }
    }

    /// The first row carried by this result.
    #[must_use]
    pub fn into_row(self) -> Option<Row> {
        match self {
            ReadResult::Rows(rows) => rows.into_iter().next(),
            ReadResult::Row(row) => row,
        }
    }
}

impl Database {
    /// Prepare, execute and fetch in one call.
    ///
    /// ```rust
    /// use sql_handle::prelude::*;
    ///
    /// # fn main() -> Result<(), SqlHandleError> {
    /// let mut db = Database::connect(ConnectOptions::in_memory())?;
    /// let rows = db.read("SELECT 1 AS one UNION ALL SELECT 2", None, true)?.into_rows();
    /// assert_eq!(rows.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    /// Returns the first error raised by [`Database::prepare`], [`Database::execute`] or the
    /// fetch, unchanged.
    pub fn read(
        &mut self,
        query: &str,
        params: Option<ParamSet>,
        all: bool,
    ) -> Result<ReadResult, SqlHandleError> {
        self.prepare(query)?;
        self.execute(params)?;
        if all {
            Ok(ReadResult::Rows(self.fetch_all()?))
        } else {
            Ok(ReadResult::Row(self.fetch()?))
        }
    }

    /// Prepare and execute a statement, returning the id of the last inserted row.
    ///
    /// # Errors
    /// Returns the first error raised by [`Database::prepare`] or [`Database::execute`],
    /// unchanged.
    pub fn write(&mut self, query: &str, params: Option<ParamSet>) -> Result<i64, SqlHandleError> {
        self.prepare(query)?;
        self.execute(params)?;
        Ok(self.last_insert_id())
    }
}
