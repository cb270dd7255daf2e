//! Mechanic Shop - Console Front-End for a Shop Database
//!
//! An operator-facing menu over a relational database of customers, mechanics,
//! cars, ownership records, service requests and closed requests. One
//! connection is opened per run; each menu action prompts for a few fields,
//! runs one short sequence of parameterized statements and prints the outcome.
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`config`] - Host, password source and report thresholds
//! - [`engine`] - Connection trait and the `PostgreSQL`/`SQLite` implementations
//! - [`output`] - Tab-delimited result rendering
//! - [`console`] - Line-oriented prompts over any reader/writer
//! - [`menu`] - Main menu entries
//! - [`shop`] - The session loop and its ten handlers
//!
//! # Public API
//! - Core types: [`ConnectionConfig`], [`QueryResult`], [`SqlValue`], [`ShopConfig`]
//! - Session: [`Session`], [`Console`], [`MenuChoice`]
//! - Errors: [`ShopError`]

pub mod config;
pub mod console;
pub mod engine;
pub mod error;
pub mod menu;
pub mod output;
pub mod shop;

pub use config::{ReportThresholds, ShopConfig};
pub use console::Console;
pub use engine::{ConnectionConfig, DatabaseType, QueryResult, ShopConnection, SqlValue};
pub use error::{Result, ShopError};
pub use menu::MenuChoice;
pub use shop::Session;

#[cfg(feature = "postgres")]
pub use engine::postgres::PostgresConnection;

#[cfg(feature = "sqlite")]
pub use engine::sqlite::SqliteConnection;
