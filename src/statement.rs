use std::collections::BTreeMap;

use crate::error::{ErrorDetail, SqlHandleError};
use crate::params::{Binding, Placeholder};
use crate::results::ResultSet;
use crate::types::RowValues;

/// The handle's current prepared statement.
///
/// The compiled form lives in the connection's statement cache keyed by `sql`; this struct
/// keeps what must survive between calls: parameter metadata, bindings, and the buffered
/// result of the last execute.
#[derive(Debug)]
pub struct Statement {
    sql: String,
    // index i holds the name of parameter i + 1, `None` for anonymous `?`
    parameter_names: Vec<Option<String>>,
    column_count: usize,
    bindings: BTreeMap<usize, Binding>,
    result: Option<ResultSet>,
    last_error: ErrorDetail,
}

impl Statement {
    pub(crate) fn new(sql: String, stmt: &rusqlite::Statement<'_>) -> Self {
        let parameter_names = (1..=stmt.parameter_count())
            .map(|i| stmt.parameter_name(i).map(str::to_string))
            .collect();
        Self {
            sql,
            parameter_names,
            column_count: stmt.column_count(),
            bindings: BTreeMap::new(),
            result: None,
            last_error: ErrorDetail::none(),
        }
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.parameter_names.len()
    }

    /// Whether the statement produces result columns.
    #[must_use]
    pub fn returns_rows(&self) -> bool {
        self.column_count > 0
    }

    #[must_use]
    pub fn is_executed(&self) -> bool {
        self.result.is_some()
    }

    /// Map a placeholder to its 1-based parameter index.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ParameterError` if the statement has no such placeholder.
    pub fn resolve(&self, placeholder: &Placeholder) -> Result<usize, SqlHandleError> {
        match placeholder {
            Placeholder::Position(idx) if (1..=self.parameter_count()).contains(idx) => Ok(*idx),
            Placeholder::Named(name) => {
                let spellings = Placeholder::spellings(name);
                self.parameter_names
                    .iter()
                    .position(|param| {
                        param
                            .as_deref()
                            .is_some_and(|p| spellings.iter().any(|s| s == p))
                    })
                    .map(|i| i + 1)
                    .ok_or_else(|| unknown_placeholder(placeholder, self.parameter_count()))
            }
            Placeholder::Position(_) => Err(unknown_placeholder(
                placeholder,
                self.parameter_count(),
            )),
        }
    }

    /// Attach a binding, replacing any earlier binding of the same parameter.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ParameterError` if the placeholder does not exist.
    pub fn bind(&mut self, placeholder: &Placeholder, binding: Binding) -> Result<(), SqlHandleError> {
        let idx = self.resolve(placeholder)?;
        self.bindings.insert(idx, binding);
        Ok(())
    }

    /// Swap in a whole new binding set. The current bindings stay untouched unless every
    /// placeholder in `bindings` resolves.
    pub(crate) fn replace_bindings(
        &mut self,
        bindings: impl IntoIterator<Item = (Placeholder, Binding)>,
    ) -> Result<(), SqlHandleError> {
        let mut replaced = BTreeMap::new();
        for (placeholder, binding) in bindings {
            replaced.insert(self.resolve(&placeholder)?, binding);
        }
        self.bindings = replaced;
        Ok(())
    }

    /// Resolve every binding in parameter order, failing if any parameter is unbound.
    pub(crate) fn resolved_values(
        &self,
    ) -> Result<Vec<(usize, RowValues)>, SqlHandleError> {
        if let Some(missing) =
            (1..=self.parameter_count()).find(|idx| !self.bindings.contains_key(idx))
        {
            let label = self.parameter_names[missing - 1]
                .clone()
                .unwrap_or_else(|| format!("?{missing}"));
            return Err(SqlHandleError::ParameterError(format!(
                "parameter {label} was not bound"
            )));
        }
        self.bindings
            .iter()
            .map(|(idx, binding)| binding.resolve().map(|value| (*idx, value)))
            .collect()
    }

    pub(crate) fn set_result(&mut self, result: ResultSet) {
        self.result = Some(result);
    }

    pub(crate) fn reset_result(&mut self) {
        self.result = None;
    }

    pub(crate) fn result_mut(&mut self) -> Result<&mut ResultSet, SqlHandleError> {
        self.result.as_mut().ok_or(SqlHandleError::NotExecuted)
    }

    pub(crate) fn result(&self) -> Result<&ResultSet, SqlHandleError> {
        self.result.as_ref().ok_or(SqlHandleError::NotExecuted)
    }

    #[must_use]
    pub fn last_error(&self) -> &ErrorDetail {
        &self.last_error
    }

    pub(crate) fn set_last_error(&mut self, detail: ErrorDetail) {
        self.last_error = detail;
    }
}

/// Whether `sql` holds no statement at all: only whitespace, `;` and comments.
pub(crate) fn is_blank_sql(sql: &str) -> bool {
    let mut rest = sql;
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix("/*") {
            // an unterminated block comment runs to the end of the input
            rest = after.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            return rest.is_empty();
        }
    }
}

fn unknown_placeholder(placeholder: &Placeholder, count: usize) -> SqlHandleError {
    SqlHandleError::ParameterError(format!(
        "placeholder {placeholder} does not exist in a statement with {count} parameter(s)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepare(conn: &rusqlite::Connection, sql: &str) -> Statement {
        let stmt = conn.prepare(sql).unwrap();
        Statement::new(sql.to_string(), &stmt)
    }

    #[test]
    fn named_placeholders_resolve_with_or_without_prefix() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let stmt = prepare(&conn, "SELECT :a, :b");
        assert_eq!(stmt.resolve(&Placeholder::from("b")).unwrap(), 2);
        assert_eq!(stmt.resolve(&Placeholder::from(":a")).unwrap(), 1);
        assert!(stmt.resolve(&Placeholder::from("c")).is_err());
    }

    #[test]
    fn positional_placeholders_are_range_checked() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let stmt = prepare(&conn, "SELECT ?, ?");
        assert_eq!(stmt.resolve(&Placeholder::Position(2)).unwrap(), 2);
        assert!(stmt.resolve(&Placeholder::Position(0)).is_err());
        assert!(stmt.resolve(&Placeholder::Position(3)).is_err());
    }

    #[test]
    fn unbound_parameters_are_reported() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut stmt = prepare(&conn, "SELECT :a, :b");
        stmt.bind(&Placeholder::from("a"), Binding::Value(RowValues::Int(1)))
            .unwrap();
        let err = stmt.resolved_values().unwrap_err();
        assert!(err.to_string().contains(":b"));
    }

    #[test]
    fn rebinding_keeps_the_last_value() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut stmt = prepare(&conn, "SELECT :a");
        stmt.bind(&Placeholder::from("a"), Binding::Value(RowValues::Int(1)))
            .unwrap();
        stmt.bind(&Placeholder::from("a"), Binding::Value(RowValues::Int(2)))
            .unwrap();
        assert_eq!(stmt.resolved_values().unwrap(), vec![(1, RowValues::Int(2))]);
    }

    #[test]
    fn failed_replacement_keeps_existing_bindings() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut stmt = prepare(&conn, "SELECT :a");
        stmt.bind(&Placeholder::from("a"), Binding::Value(RowValues::Int(1)))
            .unwrap();
        let err = stmt
            .replace_bindings([
                (Placeholder::from("a"), Binding::Value(RowValues::Int(5))),
                (Placeholder::from("bogus"), Binding::Value(RowValues::Int(2))),
            ])
            .unwrap_err();
        assert!(matches!(err, SqlHandleError::ParameterError(_)));
        assert_eq!(stmt.resolved_values().unwrap(), vec![(1, RowValues::Int(1))]);
    }

    #[test]
    fn blank_sql_is_detected() {
        for sql in ["", " \n\t", ";;", "-- note", "/* a */ -- b\n ;", "/* open"] {
            assert!(is_blank_sql(sql), "{sql:?}");
        }
        for sql in ["SELECT 1", "-- note\nSELECT 1", "/* a */ SELECT 1;", "; VACUUM"] {
            assert!(!is_blank_sql(sql), "{sql:?}");
        }
    }

    #[test]
    fn fetching_before_execute_is_an_error() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let mut stmt = prepare(&conn, "SELECT 1");
        assert!(stmt.returns_rows());
        assert!(matches!(stmt.result_mut(), Err(SqlHandleError::NotExecuted)));
    }
}
