//! `PostgreSQL` Database Engine Implementation
//!
//! This module implements `ShopConnection` for `PostgreSQL` databases.
//!
//! # Features
//! - Client-server connection via TCP, held for the whole session
//! - Parameterized statements (`$1`, `$2`, ...)
//! - Result values rendered as text, including domain-typed columns
//!
//! # Implementation Notes
//! - Uses `tokio-postgres` (async driver, requires tokio runtime)
//! - The connection driver runs as a spawned task and ends when the client is dropped
//! - Domain types are decoded through their base type
//! - NUMERIC is decoded through `rust_decimal`

use tokio::task::JoinHandle;
use tokio_postgres::types::{FromSql, Kind, ToSql, Type};
use tokio_postgres::{Client, Config, NoTls, Row};

use crate::engine::{ConnectionConfig, DatabaseType, QueryResult, ShopConnection, SqlValue};
use crate::error::{Result, ShopError};

type BoxError = Box<dyn std::error::Error + Sync + Send>;

/// A live `PostgreSQL` session connection
pub struct PostgresConnection {
    client: Client,
    driver: JoinHandle<()>,
}

impl PostgresConnection {
    /// Open a connection described by `config`
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        // Validate config is for PostgreSQL
        if config.engine != DatabaseType::Postgres {
            return Err(ShopError::invalid_input(format!(
                "Expected PostgreSQL engine, got {}",
                config.engine
            )));
        }

        let pg_config = build_pg_config(config)?;

        let (client, connection) = pg_config.connect(NoTls).await.map_err(|e| {
            ShopError::connection_failed(format!("Failed to connect to PostgreSQL: {e}"))
        })?;

        // Connection errors are not logged above debug to prevent credential leakage
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::debug!("postgres connection ended with error: {e}");
            }
        });

        log::info!("connected to {}", config.display_url());

        Ok(Self { client, driver })
    }
}

impl ShopConnection for PostgresConnection {
    async fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        log::debug!("postgres execute: {sql}");
        let bound = bind_params(params);

        self.client
            .execute(sql, &bound)
            .await
            .map_err(|e| ShopError::query_failed(describe(&e)))
    }

    async fn query(&mut self, sql: &str, params: &[SqlValue]) -> Result<QueryResult> {
        log::debug!("postgres query: {sql}");
        let bound = bind_params(params);

        // Prepare first so column names are known even for empty results
        let stmt = self
            .client
            .prepare(sql)
            .await
            .map_err(|e| ShopError::query_failed(describe(&e)))?;

        let columns: Vec<String> = stmt.columns().iter().map(|c| c.name().to_string()).collect();

        let rows = self
            .client
            .query(&stmt, &bound)
            .await
            .map_err(|e| ShopError::query_failed(describe(&e)))?;

        let mut data = Vec::with_capacity(rows.len());
        for row in &rows {
            data.push(row_to_text(row)?);
        }

        Ok(QueryResult { columns, rows: data })
    }

    async fn close(self) -> Result<()> {
        let Self { client, driver } = self;
        drop(client);

        if let Err(e) = driver.await {
            log::debug!("postgres driver task did not finish cleanly: {e}");
        }

        Ok(())
    }
}

/// Build `PostgreSQL` connection config from `ConnectionConfig`
fn build_pg_config(config: &ConnectionConfig) -> Result<Config> {
    let host = config
        .host
        .as_ref()
        .ok_or_else(|| ShopError::invalid_input("PostgreSQL requires 'host' parameter"))?;

    let port = config
        .port
        .ok_or_else(|| ShopError::invalid_input("PostgreSQL requires 'port' parameter"))?;

    let user = config
        .user
        .as_ref()
        .ok_or_else(|| ShopError::invalid_input("PostgreSQL requires 'user' parameter"))?;

    let database = config
        .database
        .as_ref()
        .ok_or_else(|| ShopError::invalid_input("PostgreSQL requires 'database' parameter"))?;

    let mut pg_config = Config::new();
    pg_config.host(host).port(port).user(user).dbname(database);

    // An empty password means "none": let the server's auth method decide
    if let Some(password) = config.password.as_deref().filter(|p| !p.is_empty()) {
        pg_config.password(password);
    }

    Ok(pg_config)
}

fn bind_params(params: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    params
        .iter()
        .map(|p| match p {
            SqlValue::Int(v) => v as &(dyn ToSql + Sync),
            SqlValue::Text(s) => s as &(dyn ToSql + Sync),
        })
        .collect()
}

/// Prefer the server's message over the driver's wrapper text
fn describe(err: &tokio_postgres::Error) -> String {
    match err.as_db_error() {
        Some(db) => db.message().to_string(),
        None => err.to_string(),
    }
}

fn row_to_text(row: &Row) -> Result<Vec<Option<String>>> {
    let mut values = Vec::with_capacity(row.len());

    for idx in 0..row.len() {
        let TextValue(value) = row.try_get(idx).map_err(|e| {
            ShopError::query_failed(format!(
                "Failed to convert PostgreSQL type '{}' to text: {e}",
                row.columns()[idx].type_().name()
            ))
        })?;
        values.push(value);
    }

    Ok(values)
}

/// Any column value rendered as text
struct TextValue(Option<String>);

impl<'a> FromSql<'a> for TextValue {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> std::result::Result<Self, BoxError> {
        decode_text(ty, raw).map(|text| Self(Some(text)))
    }

    fn from_sql_null(_: &Type) -> std::result::Result<Self, BoxError> {
        Ok(Self(None))
    }

    fn accepts(_: &Type) -> bool {
        true
    }
}

fn decode_text(ty: &Type, raw: &[u8]) -> std::result::Result<String, BoxError> {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
    use rust_decimal::Decimal;

    if let Kind::Domain(base) = ty.kind() {
        return decode_text(base, raw);
    }

    let text = match *ty {
        Type::BOOL => bool::from_sql(ty, raw)?.to_string(),
        Type::INT2 => i16::from_sql(ty, raw)?.to_string(),
        Type::INT4 => i32::from_sql(ty, raw)?.to_string(),
        Type::INT8 => i64::from_sql(ty, raw)?.to_string(),
        Type::OID => u32::from_sql(ty, raw)?.to_string(),
        Type::FLOAT4 => f32::from_sql(ty, raw)?.to_string(),
        Type::FLOAT8 => f64::from_sql(ty, raw)?.to_string(),
        Type::NUMERIC => Decimal::from_sql(ty, raw)?.to_string(),
        Type::DATE => NaiveDate::from_sql(ty, raw)?.format("%Y-%m-%d").to_string(),
        Type::TIME => NaiveTime::from_sql(ty, raw)?.format("%H:%M:%S").to_string(),
        Type::TIMESTAMP => {
            NaiveDateTime::from_sql(ty, raw)?.format("%Y-%m-%d %H:%M:%S").to_string()
        }
        Type::TIMESTAMPTZ => DateTime::<Utc>::from_sql(ty, raw)?.to_rfc3339(),
        // CHAR, VARCHAR, TEXT, NAME and anything else sent as text
        _ => <&str as FromSql>::from_sql(ty, raw)?.to_string(),
    };

    Ok(text)
}
