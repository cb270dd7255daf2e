//! Mechanic Shop CLI Entry Point
//!
//! Connects to the shop database named on the command line, then hands the
//! terminal to the interactive menu until the operator exits or stdin ends.
//!
//! Menu text and result tables go to stdout, handler errors to stderr. Logs
//! also go to stderr and are off below `warn` unless `MECHANIC_SHOP_LOG` says
//! otherwise.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mechanic_shop::{
    config, ConnectionConfig, Console, DatabaseType, Session, ShopConfig, ShopConnection,
};

/// Mechanic Shop - console front-end for the shop database
#[derive(Parser)]
#[command(name = "mechanic-shop")]
#[command(about = "Menu-driven console for a mechanic shop database")]
#[command(version)]
struct Cli {
    /// Database name (file path with --engine sqlite)
    database: String,

    /// Database server port
    port: u16,

    /// Database user
    user: String,

    /// Database host (overrides config files)
    #[arg(long)]
    host: Option<String>,

    /// Database engine
    #[arg(long, value_enum, default_value_t = DatabaseType::Postgres)]
    engine: DatabaseType,

    /// Read settings from this file instead of the local/global config
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("MECHANIC_SHOP_LOG", "warn"))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut shop_config =
        config::resolve(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        shop_config.host = host;
    }

    let conn_config = shop_config
        .connection_config(cli.engine, &cli.database, cli.port, &cli.user)
        .context("Failed to build connection settings")?;

    println!("Connecting to database...");
    println!("Connection URL: {}", conn_config.display_url());

    match cli.engine {
        DatabaseType::Postgres => run_postgres(&conn_config, shop_config).await,
        DatabaseType::SQLite => run_sqlite(&conn_config, shop_config).await,
    }
}

#[cfg(feature = "postgres")]
async fn run_postgres(conn_config: &ConnectionConfig, config: ShopConfig) -> anyhow::Result<ExitCode> {
    match mechanic_shop::PostgresConnection::connect(conn_config).await {
        Ok(conn) => start_session(conn, config).await,
        Err(e) => Ok(connect_failure(&e)),
    }
}

#[cfg(not(feature = "postgres"))]
async fn run_postgres(_: &ConnectionConfig, _: ShopConfig) -> anyhow::Result<ExitCode> {
    anyhow::bail!("PostgreSQL support was not compiled in (enable the `postgres` feature)")
}

#[cfg(feature = "sqlite")]
async fn run_sqlite(conn_config: &ConnectionConfig, config: ShopConfig) -> anyhow::Result<ExitCode> {
    match mechanic_shop::SqliteConnection::open(conn_config) {
        Ok(conn) => start_session(conn, config).await,
        Err(e) => Ok(connect_failure(&e)),
    }
}

#[cfg(not(feature = "sqlite"))]
async fn run_sqlite(_: &ConnectionConfig, _: ShopConfig) -> anyhow::Result<ExitCode> {
    anyhow::bail!("SQLite support was not compiled in (enable the `sqlite` feature)")
}

fn connect_failure(error: &mechanic_shop::ShopError) -> ExitCode {
    eprintln!("Error - Unable to Connect to Database: {}", error.message());
    eprintln!("Make sure you started postgres on this machine");
    ExitCode::FAILURE
}

async fn start_session<C: ShopConnection>(conn: C, config: ShopConfig) -> anyhow::Result<ExitCode> {
    println!("Done");

    let console = Console::new(io::stdin().lock(), io::stdout(), io::stderr());
    Session::new(conn, console, config).run().await.context("Console I/O failed")?;

    Ok(ExitCode::SUCCESS)
}
