//! # SQLite database methods
//!
//! Low-level SQLite interactions, kept as simple functions that accept a
//! `&mut SqliteConnection`. Callers obtain a connection from a pool, or open a transaction
//! when a multi-statement operation needs to be atomic, and call through without any other
//! changes.
use std::env;

use log::info;
use sqlx::{sqlite::SqlitePoolOptions, Error as SqlxError, SqlitePool};

pub mod queue;
pub mod store;

const SQLITE_DB_URL: &str = "sqlite://data/order_intake.db";

pub fn db_url() -> String {
    let result = env::var("OIP_DATABASE_URL").unwrap_or_else(|_| {
        info!("OIP_DATABASE_URL is not set. Using the default.");
        SQLITE_DB_URL.to_string()
    });
    info!("Using database URL: {result}");
    result
}

pub async fn new_pool(url: &str, max_connections: u32) -> Result<SqlitePool, SqlxError> {
    let pool = SqlitePoolOptions::new().max_connections(max_connections).connect(url).await?;
    Ok(pool)
}

/// Creates the queue and store tables if this is a fresh database.
pub async fn create_schema(pool: &SqlitePool) -> Result<(), SqlxError> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS queue_messages (
            message_id     TEXT PRIMARY KEY,
            body           TEXT NOT NULL,
            attributes     TEXT NOT NULL,
            enqueued_at    INTEGER NOT NULL,
            visible_at     INTEGER NOT NULL,
            receipt_handle TEXT,
            delivery_count INTEGER NOT NULL DEFAULT 0
        )"#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS orders (
            id         INTEGER PRIMARY KEY,
            body       TEXT NOT NULL,
            updated_at INTEGER NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS poll_runs (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            run_timestamp INTEGER NOT NULL,
            entry         TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS webhook_audits (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id    INTEGER NOT NULL,
            entry       TEXT NOT NULL,
            recorded_at INTEGER NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
