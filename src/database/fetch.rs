use super::Database;
use crate::error::SqlHandleError;
use crate::results::{FetchMode, Row};

impl Database {
    /// Next row of the executed statement in the session's fetch mode.
    ///
    /// `Ok(None)` marks the end of the results; statements that return no rows (DML, DDL)
    /// are at the end right away.
    ///
    /// # Errors
    /// Returns `SqlHandleError::NoStatement` or `SqlHandleError::NotExecuted` if there is no
    /// executed statement.
    pub fn fetch(&mut self) -> Result<Option<Row>, SqlHandleError> {
        self.fetch_with(self.fetch_mode)
    }

    /// Like [`Database::fetch`] with an explicit row shape.
    ///
    /// # Errors
    /// See [`Database::fetch`].
    pub fn fetch_with(&mut self, mode: FetchMode) -> Result<Option<Row>, SqlHandleError> {
        Ok(self.current_mut()?.result_mut()?.next_row(mode))
    }

    /// Every remaining row, in the order the database returned them.
    ///
    /// # Errors
    /// See [`Database::fetch`].
    pub fn fetch_all(&mut self) -> Result<Vec<Row>, SqlHandleError> {
        self.fetch_all_with(self.fetch_mode)
    }

    /// Like [`Database::fetch_all`] with an explicit row shape.
    ///
    /// # Errors
    /// See [`Database::fetch`].
    pub fn fetch_all_with(&mut self, mode: FetchMode) -> Result<Vec<Row>, SqlHandleError> {
        Ok(self.current_mut()?.result_mut()?.drain_rows(mode))
    }

    /// Column names of the executed statement's result, shaped by the session fetch mode.
    ///
    /// # Errors
    /// See [`Database::fetch`].
    pub fn column_names(&self) -> Result<Vec<String>, SqlHandleError> {
        Ok(self
            .current()?
            .result()?
            .column_names_for(self.fetch_mode)
            .to_vec())
    }
}
