//! Database Engine Traits and Core Types
//!
//! This module defines the connection abstraction the shop session runs on.
//! Each engine (`PostgreSQL`, `SQLite`) provides a `ShopConnection`.
//!
//! # Session-Scoped Connections
//! Unlike a one-shot tool, the shop opens exactly one connection at startup and
//! keeps it for the lifetime of the process. Engines expose an inherent
//! `connect`/`open` constructor and implement `ShopConnection` on the result.
//!
//! # Statement Dialect
//! Statements are written in the `PostgreSQL` dialect with `$n` placeholders.
//! Integer parameters are wrapped in `CAST($n AS INTEGER)`. The `SQLite` engine
//! rewrites placeholders to its own `?n` form before preparing.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::PathBuf;

use crate::error::Result;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

/// Supported database engine types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    Postgres,
    /// `SQLite` database file
    #[value(name = "sqlite")]
    SQLite,
}

impl DatabaseType {
    /// Get the engine name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::SQLite => "sqlite",
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection configuration for database engines
///
/// Fields are engine-specific (`file` only applies to `SQLite`).
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Database engine type
    pub engine: DatabaseType,

    /// Hostname (for postgres)
    pub host: Option<String>,

    /// Port number (for postgres)
    pub port: Option<u16>,

    /// Username (for postgres)
    pub user: Option<String>,

    /// Password (for postgres)
    /// WARNING: Sensitive data, do not log or include in error messages
    pub password: Option<String>,

    /// Database name (for postgres)
    pub database: Option<String>,

    /// Database file path (for sqlite)
    pub file: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Create a new `PostgreSQL` connection config
    #[must_use]
    pub const fn postgres(
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    ) -> Self {
        Self {
            engine: DatabaseType::Postgres,
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            database: Some(database),
            file: None,
        }
    }

    /// Create a new `SQLite` connection config
    #[must_use]
    pub const fn sqlite(file: PathBuf) -> Self {
        Self {
            engine: DatabaseType::SQLite,
            host: None,
            port: None,
            user: None,
            password: None,
            database: None,
            file: Some(file),
        }
    }

    /// Human-readable location of the database, without credentials
    #[must_use]
    pub fn display_url(&self) -> String {
        match self.engine {
            DatabaseType::Postgres => format!(
                "postgresql://{}:{}/{}",
                self.host.as_deref().unwrap_or("localhost"),
                self.port.map_or_else(|| "5432".to_string(), |p| p.to_string()),
                self.database.as_deref().unwrap_or_default()
            ),
            DatabaseType::SQLite => format!(
                "sqlite://{}",
                self.file.as_ref().map(|f| f.display().to_string()).unwrap_or_default()
            ),
        }
    }
}

/// A bound statement parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// 32-bit integer, bound through `CAST($n AS INTEGER)`
    Int(i32),
    /// Text value
    Text(String),
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Query execution result
///
/// Every value is rendered to text by the engine; SQL `NULL` is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    /// Column names in result set
    pub columns: Vec<String>,

    /// Result rows, one `Option<String>` per column
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryResult {
    /// Number of rows in the result
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `row`, `column` (None for NULL or out of range)
    #[must_use]
    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(column)).and_then(|v| v.as_deref())
    }

    /// Value at `row` in the named column
    #[must_use]
    pub fn value_by_name(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.columns.iter().position(|c| c.eq_ignore_ascii_case(column))?;
        self.value(row, idx)
    }
}

/// A live database connection used by the shop session
///
/// All methods take `&mut self`: a connection serves one statement at a time.
pub trait ShopConnection {
    /// Execute a statement and discard any rows, returning the affected row count
    fn execute(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<u64>> + Send;

    /// Execute a statement and collect its result set as text
    fn query(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl Future<Output = Result<QueryResult>> + Send;

    /// Close the connection
    fn close(self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sized;
}
