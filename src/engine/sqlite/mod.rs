//! `SQLite` Database Engine Implementation
//!
//! This module implements `ShopConnection` for `SQLite` databases.
//!
//! # Features
//! - File-based connections (`/path/to/shop.db`)
//! - In-memory connections (`:memory:`), used by the test suite
//! - Placeholder translation from `$n` to `?n`
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver; calls complete before the future resolves)
//! - BLOB data is rendered as Base64
//! - The shop schema must already exist; `execute_batch` is available to load it

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, OpenFlags, Row, ToSql};
use std::path::Path;

use crate::engine::{ConnectionConfig, DatabaseType, QueryResult, ShopConnection, SqlValue};
use crate::error::{Result, ShopError};

/// A live `SQLite` session connection
pub struct SqliteConnection {
    conn: Connection,
}

impl SqliteConnection {
    /// Open the database file named in `config`
    pub fn open(config: &ConnectionConfig) -> Result<Self> {
        // Validate config is for SQLite
        if config.engine != DatabaseType::SQLite {
            return Err(ShopError::invalid_input(format!(
                "Expected SQLite engine, got {}",
                config.engine
            )));
        }

        let file_path = config
            .file
            .as_ref()
            .ok_or_else(|| ShopError::invalid_input("SQLite requires 'file' parameter"))?;

        Self::open_path(file_path)
    }

    /// Open a database file, creating it if needed
    pub fn open_path(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            ShopError::connection_failed(format!("Failed to open SQLite database: {e}"))
        })?;

        log::info!("opened sqlite database {}", path.display());
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            ShopError::connection_failed(format!("Failed to open SQLite database: {e}"))
        })?;
        Ok(Self { conn })
    }

    /// Run a batch of semicolon-separated statements without parameters
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| ShopError::query_failed(format!("Failed to execute batch: {e}")))
    }
}

impl ShopConnection for SqliteConnection {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        log::debug!("sqlite execute: {sql}");
        let sql = rewrite_placeholders(sql);

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| ShopError::query_failed(format!("Failed to prepare query: {e}")))?;

        let affected = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(|e| ShopError::query_failed(format!("Failed to execute query: {e}")))?;

        Ok(affected as u64)
    }

    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<QueryResult> {
        log::debug!("sqlite query: {sql}");
        let sql = rewrite_placeholders(sql);

        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| ShopError::query_failed(format!("Failed to prepare query: {e}")))?;

        let columns: Vec<String> = stmt.column_names().iter().map(|s| (*s).to_string()).collect();

        let rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(|e| ShopError::query_failed(format!("Failed to execute query: {e}")))?;

        let data = rows
            .mapped(|row| row_to_text(columns.len(), row))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ShopError::query_failed(format!("Failed to fetch row: {e}")))?;

        Ok(QueryResult { columns, rows: data })
    }

    async fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| {
            ShopError::connection_failed(format!("Failed to close SQLite database: {e}"))
        })
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Int(v) => ToSqlOutput::Owned(Value::Integer(i64::from(*v))),
            Self::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// Translate `$n` placeholders to `?n`, leaving quoted text untouched
fn rewrite_placeholders(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
                out.push(ch);
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    out.push(ch);
                }
                '$' if chars.peek().is_some_and(char::is_ascii_digit) => out.push('?'),
                _ => out.push(ch),
            },
        }
    }

    out
}

fn row_to_text(width: usize, row: &Row) -> rusqlite::Result<Vec<Option<String>>> {
    let mut values = Vec::with_capacity(width);

    for idx in 0..width {
        values.push(sqlite_value_to_text(row, idx)?);
    }

    Ok(values)
}

fn sqlite_value_to_text(row: &Row, idx: usize) -> rusqlite::Result<Option<String>> {
    let value_ref = row.get_ref(idx)?;

    Ok(match value_ref {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(s) => {
            let text = std::str::from_utf8(s).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Some(text.to_string())
        }
        ValueRef::Blob(b) => {
            use base64::Engine;
            Some(base64::engine::general_purpose::STANDARD.encode(b))
        }
    })
}
