use rusqlite::Connection;
use tracing::{debug, warn};

use super::Database;
use crate::conversion::{row_value_to_sqlite_value, sqlite_extract_value};
use crate::error::{ErrorDetail, SqlHandleError};
use crate::params::{Binding, ParamSet};
use crate::results::ResultSet;
use crate::statement::Statement;
use crate::types::RowValues;

impl Database {
    /// Execute the current statement.
    ///
    /// A supplied `params` set replaces every earlier binding before the statement runs;
    /// with `None` the values attached by `bind_value`/`bind_param` are used. Rows of a query
    /// are buffered for `fetch`/`fetch_all`.
    ///
    /// # Errors
    /// Returns `SqlHandleError::NoStatement` if nothing is prepared,
    /// `SqlHandleError::ParameterError` if a placeholder is unknown or left unbound, and
    /// `SqlHandleError::OperationError` carrying the driver's detail if execution fails. The
    /// failure is also recorded for `error(ErrorSource::Statement)`.
    pub fn execute(&mut self, params: Option<ParamSet>) -> Result<(), SqlHandleError> {
        let Self {
            conn, statement, ..
        } = self;
        let stmt = statement.as_mut().ok_or(SqlHandleError::NoStatement)?;
        stmt.reset_result();

        let prepared_values = replace_bindings(stmt, params).and_then(|()| stmt.resolved_values());
        let values = match prepared_values {
            Ok(values) => values,
            Err(err) => {
                let detail = ErrorDetail::from_error(&err);
                warn!(sql = stmt.sql(), error = %detail, "execute rejected parameters");
                stmt.set_last_error(detail);
                return Err(err);
            }
        };

        match run_statement(conn, stmt.sql(), &values) {
            Ok(result) => {
                debug!(
                    sql = stmt.sql(),
                    rows = result.rows_affected(),
                    "statement executed"
                );
                stmt.set_result(result);
                stmt.set_last_error(ErrorDetail::none());
                Ok(())
            }
            Err(err) => {
                let detail = ErrorDetail::from_error(&err);
                warn!(sql = stmt.sql(), error = %detail, "execute failed");
                stmt.set_last_error(detail.clone());
                Err(SqlHandleError::OperationError(detail))
            }
        }
    }
}

fn replace_bindings(
    stmt: &mut Statement,
    params: Option<ParamSet>,
) -> Result<(), SqlHandleError> {
    let Some(params) = params else {
        return Ok(());
    };
    stmt.replace_bindings(
        params
            .into_placeholders()
            .into_iter()
            .map(|(placeholder, value)| (placeholder, Binding::Value(value))),
    )
}

/// Run `sql` from the statement cache with `values` bound and buffer its outcome.
fn run_statement(
    conn: &Connection,
    sql: &str,
    values: &[(usize, RowValues)],
) -> Result<ResultSet, SqlHandleError> {
    let mut stmt = conn.prepare_cached(sql)?;
    for (idx, value) in values {
        stmt.raw_bind_parameter(*idx, row_value_to_sqlite_value(value))?;
    }

    if stmt.column_count() == 0 {
        let affected = stmt.raw_execute()?;
        return Ok(ResultSet::affected(affected as u64));
    }

    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();
    let mut result_set = ResultSet::with_columns(column_names, 0);

    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value(row, i)?);
        }
        result_set.push_row(row_values);
    }

    Ok(result_set)
}
