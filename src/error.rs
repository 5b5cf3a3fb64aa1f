use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// SQLSTATE reported when no error has occurred.
pub const SQLSTATE_NONE: &str = "00000";
/// SQLSTATE for integrity constraint violations.
pub const SQLSTATE_CONSTRAINT: &str = "23000";
/// SQLSTATE for an invalid parameter number or an unbound placeholder.
pub const SQLSTATE_INVALID_PARAMETER: &str = "HY093";
/// SQLSTATE for SQL text that cannot be run, such as an empty query.
pub const SQLSTATE_SYNTAX: &str = "42000";
/// SQLSTATE for any other driver failure.
pub const SQLSTATE_GENERAL: &str = "HY000";

#[derive(Debug, Error)]
pub enum SqlHandleError {
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Operation error: {0}")]
    OperationError(ErrorDetail),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("No statement has been prepared")]
    NoStatement,

    #[error("The prepared statement has not been executed")]
    NotExecuted,
}

impl SqlHandleError {
    /// Driver detail carried by this error, if it came from a prepare or execute.
    #[must_use]
    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            SqlHandleError::OperationError(detail) => Some(detail),
            _ => None,
        }
    }
}

/// Where [`crate::Database::error`] looks for the last error detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorSource {
    /// The connection (prepare failures land here).
    #[default]
    Connection,
    /// The current prepared statement (execute failures land here).
    Statement,
}

/// The driver's error triple: SQLSTATE, driver-specific code and message.
///
/// A detail with SQLSTATE `00000` and no code or message means the last operation succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub sqlstate: String,
    pub code: Option<i32>,
    pub message: Option<String>,
}

impl ErrorDetail {
    #[must_use]
    pub fn none() -> Self {
        Self {
            sqlstate: SQLSTATE_NONE.to_string(),
            code: None,
            message: None,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.sqlstate != SQLSTATE_NONE
    }

    /// Build a detail for parameter problems caught before reaching the driver.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self {
            sqlstate: SQLSTATE_INVALID_PARAMETER.to_string(),
            code: None,
            message: Some(message.into()),
        }
    }

    /// SQL holding nothing but whitespace, comments or semicolons.
    #[must_use]
    pub fn empty_query() -> Self {
        Self {
            sqlstate: SQLSTATE_SYNTAX.to_string(),
            code: None,
            message: Some("Query was empty".to_string()),
        }
    }

    /// Translate a `rusqlite` error into a detail triple.
    #[must_use]
    pub fn from_driver(err: &rusqlite::Error) -> Self {
        let (sqlstate, code) = match err.sqlite_error() {
            Some(ffi_err) if ffi_err.code == rusqlite::ErrorCode::ConstraintViolation => {
                (SQLSTATE_CONSTRAINT, Some(ffi_err.extended_code))
            }
            Some(ffi_err) => (SQLSTATE_GENERAL, Some(ffi_err.extended_code)),
            None => match err {
                rusqlite::Error::InvalidParameterCount(..)
                | rusqlite::Error::InvalidParameterName(_) => (SQLSTATE_INVALID_PARAMETER, None),
                _ => (SQLSTATE_GENERAL, None),
            },
        };
        Self {
            sqlstate: sqlstate.to_string(),
            code,
            message: Some(err.to_string()),
        }
    }

    /// Detail for any crate error; driver errors keep their SQLSTATE and code.
    #[must_use]
    pub fn from_error(err: &SqlHandleError) -> Self {
        match err {
            SqlHandleError::SqliteError(driver) => Self::from_driver(driver),
            SqlHandleError::OperationError(detail) => detail.clone(),
            SqlHandleError::ParameterError(message) => Self::invalid_parameter(message.clone()),
            other => Self {
                sqlstate: SQLSTATE_GENERAL.to_string(),
                code: None,
                message: Some(other.to_string()),
            },
        }
    }
}

impl Default for ErrorDetail {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQLSTATE[{}]", self.sqlstate)?;
        if let Some(code) = self.code {
            write!(f, " ({code})")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl From<ErrorDetail> for SqlHandleError {
    fn from(detail: ErrorDetail) -> Self {
        SqlHandleError::OperationError(detail)
    }
}
