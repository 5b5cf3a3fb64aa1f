mod bind;
mod convenience;
mod execute;
mod fetch;

use std::fmt;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::config::{ConnectOptions, DatabaseLocation};
use crate::error::{ErrorDetail, ErrorSource, SqlHandleError};
use crate::results::FetchMode;
use crate::statement::{Statement, is_blank_sql};

pub use convenience::ReadResult;

/// One open database session plus its current prepared statement.
///
/// Calls follow connect → prepare → bind → execute → fetch. Preparing a new query
/// discards the previous statement along with its bindings and unfetched rows. The
/// connection is released when the handle is dropped.
pub struct Database {
    conn: Connection,
    location: DatabaseLocation,
    statement: Option<Statement>,
    fetch_mode: FetchMode,
    last_error: ErrorDetail,
}

impl Database {
    /// Open a session described by `options`.
    ///
    /// Session defaults: failures come back as `Err` values and rows are fetched as
    /// column name to value mappings unless `options.fetch_mode` says otherwise.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConnectionError` if the database cannot be opened or the
    /// session settings cannot be applied, and `SqlHandleError::ConfigError` for options that
    /// cannot describe a database.
    pub fn connect(options: ConnectOptions) -> Result<Self, SqlHandleError> {
        let location = options.location()?;
        let flags = options.open_flags();
        let opened = match &location {
            DatabaseLocation::InMemory => Connection::open_in_memory_with_flags(flags),
            DatabaseLocation::File(path) => Connection::open_with_flags(path, flags),
        };
        let conn = opened.map_err(|e| {
            warn!(?location, error = %e, "could not connect to database");
            SqlHandleError::ConnectionError(format!("Could not connect to database: {e}"))
        })?;

        apply_session_settings(&conn, &options).map_err(|e| {
            warn!(?location, error = %e, "could not apply session settings");
            SqlHandleError::ConnectionError(format!("Could not configure session: {e}"))
        })?;

        debug!(
            ?location,
            username = %options.username,
            fetch_mode = ?options.fetch_mode,
            "database session opened"
        );

        Ok(Self {
            conn,
            location,
            statement: None,
            fetch_mode: options.fetch_mode,
            last_error: ErrorDetail::none(),
        })
    }

    /// Open a session from the four identity fields with default options.
    ///
    /// # Errors
    /// See [`Database::connect`].
    pub fn open(
        host: &str,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, SqlHandleError> {
        Self::connect(ConnectOptions::new(host, database, username, password))
    }

    /// Compile `sql` as the handle's current statement.
    ///
    /// The previous statement is discarded whether or not compilation succeeds.
    ///
    /// # Errors
    /// Returns `SqlHandleError::OperationError` with the driver's detail if the SQL does not
    /// compile or holds no statement at all; the same detail is then reported by
    /// `error(ErrorSource::Connection)`.
    pub fn prepare(&mut self, sql: &str) -> Result<(), SqlHandleError> {
        self.statement = None;
        if is_blank_sql(sql) {
            let detail = ErrorDetail::empty_query();
            warn!(sql, error = %detail, "prepare failed");
            self.last_error = detail.clone();
            return Err(SqlHandleError::OperationError(detail));
        }
        let prepared = self
            .conn
            .prepare_cached(sql)
            .map(|stmt| Statement::new(sql.to_string(), &stmt));
        match prepared {
            Ok(statement) => {
                debug!(
                    sql,
                    parameters = statement.parameter_count(),
                    "statement prepared"
                );
                self.statement = Some(statement);
                self.last_error = ErrorDetail::none();
                Ok(())
            }
            Err(err) => {
                let detail = ErrorDetail::from_driver(&err);
                warn!(sql, error = %detail, "prepare failed");
                self.last_error = detail.clone();
                Err(SqlHandleError::OperationError(detail))
            }
        }
    }

    /// Rows affected by the last execute, or rows produced when it was a query.
    ///
    /// # Errors
    /// Returns `SqlHandleError::NoStatement` or `SqlHandleError::NotExecuted` when there is no
    /// executed statement to report on.
    pub fn row_count(&self) -> Result<u64, SqlHandleError> {
        Ok(self.current()?.result()?.rows_affected())
    }

    /// Rowid of the most recent successful insert on this connection.
    #[must_use]
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    /// Last error detail recorded by the connection or by the current statement.
    ///
    /// Without a current statement, `ErrorSource::Statement` reports no error.
    #[must_use]
    pub fn error(&self, source: ErrorSource) -> ErrorDetail {
        match source {
            ErrorSource::Connection => self.last_error.clone(),
            ErrorSource::Statement => self
                .statement
                .as_ref()
                .map(|stmt| stmt.last_error().clone())
                .unwrap_or_default(),
        }
    }

    /// SQL text of the current statement.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.statement.as_ref().map(Statement::sql)
    }

    #[must_use]
    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }

    /// Change the row shape used by [`Database::fetch`] and [`Database::fetch_all`].
    pub fn set_fetch_mode(&mut self, mode: FetchMode) {
        self.fetch_mode = mode;
    }

    /// Where this session's database lives.
    #[must_use]
    pub fn location(&self) -> &DatabaseLocation {
        &self.location
    }

    /// Close the session, reporting any error the driver raises while doing so.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConnectionError` if `SQLite` refuses to close the connection.
    pub fn close(self) -> Result<(), SqlHandleError> {
        let Self { conn, location, .. } = self;
        conn.close().map_err(|(_, e)| {
            warn!(?location, error = %e, "close failed");
            SqlHandleError::ConnectionError(format!("Could not close database: {e}"))
        })?;
        debug!(?location, "database session closed");
        Ok(())
    }

    pub(crate) fn current(&self) -> Result<&Statement, SqlHandleError> {
        self.statement.as_ref().ok_or(SqlHandleError::NoStatement)
    }

    pub(crate) fn current_mut(&mut self) -> Result<&mut Statement, SqlHandleError> {
        self.statement.as_mut().ok_or(SqlHandleError::NoStatement)
    }
}

fn apply_session_settings(conn: &Connection, options: &ConnectOptions) -> rusqlite::Result<()> {
    conn.busy_timeout(options.busy_timeout())?;
    conn.set_prepared_statement_cache_capacity(options.statement_cache_capacity);
    if options.journal_mode_wal {
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        debug!(journal_mode = %mode, "journal mode applied");
    }
    Ok(())
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("location", &self.location)
            .field("statement", &self.statement)
            .field("fetch_mode", &self.fetch_mode)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}
