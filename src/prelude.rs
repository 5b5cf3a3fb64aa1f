//! Convenient imports for common functionality.
//!
//! This module re-exports the types needed to connect, run statements and read rows.

pub use crate::config::{ConnectOptions, ConnectOptionsBuilder, DatabaseLocation};
pub use crate::database::{Database, ReadResult};
pub use crate::error::{ErrorDetail, ErrorSource, SqlHandleError};
pub use crate::params::{ParamSet, Placeholder};
pub use crate::results::{FetchMode, Row};
pub use crate::types::{ParamType, RowValues};
