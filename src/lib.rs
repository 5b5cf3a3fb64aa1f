//! Synchronous single-statement database handle over `rusqlite`.
//!
//! ```rust
//! use sql_handle::prelude::*;
//!
//! # fn main() -> Result<(), SqlHandleError> {
//! let mut db = Database::connect(ConnectOptions::in_memory())?;
//! db.write("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)", None)?;
//! let id = db.write(
//!     "INSERT INTO users (name) VALUES (:name)",
//!     Some(ParamSet::named([("name", "alice")])),
//! )?;
//! let row = db
//!     .read("SELECT name FROM users WHERE id = ?", Some(ParamSet::positional([id])), false)?
//!     .into_row();
//! assert_eq!(row.and_then(|r| r.get("name").cloned()), Some(RowValues::Text("alice".into())));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod conversion;
pub mod database;
pub mod error;
pub mod params;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod types;

pub use config::{ConnectOptions, ConnectOptionsBuilder, DatabaseLocation};
pub use database::{Database, ReadResult};
pub use error::{ErrorDetail, ErrorSource, SqlHandleError};
pub use params::{ParamSet, Placeholder};
pub use results::{FetchMode, ResultSet, Row};
pub use types::{ParamType, RowValues};
