use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use rusqlite::OpenFlags;
use serde::Deserialize;

use crate::error::SqlHandleError;
use crate::results::FetchMode;

/// Database name that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// Where a connection points once host and database name are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    InMemory,
    File(PathBuf),
}

/// Options for opening a [`crate::Database`].
///
/// `host` names the directory holding the database file; an empty host, `localhost` or `.`
/// leaves `database` as given. `database` of `:memory:` (or empty) opens an in-memory
/// database. SQLite does not authenticate, so `username` and `password` are kept for
/// callers that share configuration with other backends.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ConnectOptions {
    pub host: String,
    pub database: String,
    pub username: String,
    pub password: String,
    pub create_if_missing: bool,
    pub read_only: bool,
    pub busy_timeout_ms: u64,
    pub statement_cache_capacity: usize,
    pub journal_mode_wal: bool,
    #[serde(skip)]
    pub fetch_mode: FetchMode,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            host: String::new(),
            database: IN_MEMORY.to_string(),
            username: String::new(),
            password: String::new(),
            create_if_missing: true,
            read_only: false,
            busy_timeout_ms: 5000,
            statement_cache_capacity: 16,
            journal_mode_wal: false,
            fetch_mode: FetchMode::Named,
        }
    }
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("create_if_missing", &self.create_if_missing)
            .field("read_only", &self.read_only)
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .field("statement_cache_capacity", &self.statement_cache_capacity)
            .field("journal_mode_wal", &self.journal_mode_wal)
            .field("fetch_mode", &self.fetch_mode)
            .finish()
    }
}

impl ConnectOptions {
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn builder(
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ConnectOptionsBuilder {
        ConnectOptionsBuilder {
            opts: Self::new(host, database, username, password),
        }
    }

    /// Options for a fresh in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Resolve `host` and `database` to the location `SQLite` will open.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConfigError` if an in-memory database is requested read-only.
    pub fn location(&self) -> Result<DatabaseLocation, SqlHandleError> {
        let database = self.database.trim();
        if database.is_empty() || database == IN_MEMORY {
            if self.read_only {
                return Err(SqlHandleError::ConfigError(
                    "an in-memory database cannot be opened read-only".into(),
                ));
            }
            return Ok(DatabaseLocation::InMemory);
        }
        let host = self.host.trim();
        let path = if host.is_empty() || host == "localhost" || host == "." {
            PathBuf::from(database)
        } else {
            PathBuf::from(host).join(database)
        };
        Ok(DatabaseLocation::File(path))
    }

    pub(crate) fn open_flags(&self) -> OpenFlags {
        let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if self.create_if_missing {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
        }
        flags
    }

    #[must_use]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Fluent builder for [`ConnectOptions`].
#[derive(Debug, Clone)]
pub struct ConnectOptionsBuilder {
    opts: ConnectOptions,
}

impl ConnectOptionsBuilder {
    #[must_use]
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.opts.create_if_missing = create;
        self
    }

    #[must_use]
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.opts.read_only = read_only;
        self
    }

    #[must_use]
    pub fn busy_timeout_ms(mut self, millis: u64) -> Self {
        self.opts.busy_timeout_ms = millis;
        self
    }

    #[must_use]
    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.opts.statement_cache_capacity = capacity;
        self
    }

    #[must_use]
    pub fn journal_mode_wal(mut self, wal: bool) -> Self {
        self.opts.journal_mode_wal = wal;
        self
    }

    #[must_use]
    pub fn fetch_mode(mut self, mode: FetchMode) -> Self {
        self.opts.fetch_mode = mode;
        self
    }

    #[must_use]
    pub fn finish(self) -> ConnectOptions {
        self.opts
    }

    /// Open a [`crate::Database`] with these options.
    ///
    /// # Errors
    /// Returns `SqlHandleError::ConnectionError` if the session cannot be established.
    pub fn connect(self) -> Result<crate::Database, SqlHandleError> {
        crate::Database::connect(self.finish())
    }
}
