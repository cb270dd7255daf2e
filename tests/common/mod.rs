//! Shared fixtures for session tests
//!
//! Every test gets a private in-memory `SQLite` database carrying the shop
//! schema, and drives a `Session` through a scripted input buffer.

#![allow(dead_code)]

use std::io::Cursor;

use mechanic_shop::{
    Console, MenuChoice, Session, ShopConfig, ShopConnection, SqliteConnection,
};

pub type ScriptSession = Session<SqliteConnection, Cursor<Vec<u8>>, Vec<u8>, Vec<u8>>;

/// Shop schema in `SQLite` types
pub const SCHEMA: &str = "
CREATE TABLE Customer (
    id INTEGER NOT NULL PRIMARY KEY,
    fname TEXT NOT NULL,
    lname TEXT NOT NULL,
    phone TEXT NOT NULL,
    address TEXT NOT NULL
);
CREATE TABLE Mechanic (
    id INTEGER NOT NULL PRIMARY KEY,
    fname TEXT NOT NULL,
    lname TEXT NOT NULL,
    experience INTEGER NOT NULL CHECK (experience >= 0 AND experience < 100)
);
CREATE TABLE Car (
    vin TEXT NOT NULL PRIMARY KEY,
    make TEXT NOT NULL,
    model TEXT NOT NULL,
    year INTEGER NOT NULL CHECK (year >= 1970)
);
CREATE TABLE Owns (
    ownership_id INTEGER NOT NULL PRIMARY KEY,
    customer_id INTEGER NOT NULL REFERENCES Customer(id),
    car_vin TEXT NOT NULL REFERENCES Car(vin)
);
CREATE TABLE Service_Request (
    rid INTEGER NOT NULL PRIMARY KEY,
    customer_id INTEGER NOT NULL REFERENCES Customer(id),
    car_vin TEXT NOT NULL REFERENCES Car(vin),
    date TEXT NOT NULL,
    odometer INTEGER NOT NULL CHECK (odometer > 0),
    complain TEXT
);
CREATE TABLE Closed_Request (
    wid INTEGER NOT NULL PRIMARY KEY,
    rid INTEGER NOT NULL REFERENCES Service_Request(rid),
    mid INTEGER NOT NULL REFERENCES Mechanic(id),
    date TEXT NOT NULL,
    comment TEXT,
    bill INTEGER NOT NULL CHECK (bill > 0)
);
";

/// Open an empty shop database
pub fn shop_db() -> SqliteConnection {
    let conn = SqliteConnection::open_in_memory().expect("Failed to open in-memory database");
    conn.execute_batch(SCHEMA).expect("Failed to create schema");
    conn
}

/// Open a shop database and run `seed` against it
pub fn seeded_db(seed: &str) -> SqliteConnection {
    let conn = shop_db();
    conn.execute_batch(seed).expect("Failed to seed database");
    conn
}

/// Build a session whose console reads `input`
pub fn session(conn: SqliteConnection, input: &str) -> ScriptSession {
    session_with_config(conn, input, ShopConfig::default())
}

pub fn session_with_config(
    conn: SqliteConnection,
    input: &str,
    config: ShopConfig,
) -> ScriptSession {
    let console = Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new(), Vec::new());
    Session::new(conn, console, config)
}

/// Captured console streams after a session step
pub struct Transcript {
    pub out: String,
    pub err: String,
}

/// Run one menu action and hand back the connection and what was printed
pub async fn run_action(
    conn: SqliteConnection,
    choice: MenuChoice,
    input: &str,
) -> (SqliteConnection, Transcript) {
    let mut session = session(conn, input);
    session.dispatch(choice).await;
    finish(session)
}

/// Split a session into its connection and captured output
pub fn finish(session: ScriptSession) -> (SqliteConnection, Transcript) {
    let (conn, console) = session.into_parts();
    let (_, out, err) = console.into_parts();
    let transcript = Transcript {
        out: String::from_utf8(out).expect("stdout is UTF-8"),
        err: String::from_utf8(err).expect("stderr is UTF-8"),
    };
    (conn, transcript)
}

/// Number of rows in `table`
pub async fn count_rows(conn: &mut SqliteConnection, table: &str) -> usize {
    let result = conn
        .query(&format!("SELECT COUNT(*) FROM {table}"), &[])
        .await
        .expect("Failed to count rows");
    result.value(0, 0).and_then(|v| v.parse().ok()).expect("COUNT(*) is an integer")
}

/// First column of the first row of `sql`
pub async fn scalar(conn: &mut SqliteConnection, sql: &str) -> Option<String> {
    let result = conn.query(sql, &[]).await.expect("Failed to run query");
    result.value(0, 0).map(str::to_string)
}
