use bigcommerce_tools::Order;
use sqlx::SqliteConnection;

use crate::{
    pipeline_objects::{JobLedgerEntry, WebhookAuditEntry},
    traits::StoreError,
};

/// Last-write-wins upsert of the enriched order document, keyed by order id.
pub async fn upsert_order(order: &Order, now_ms: i64, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let body = serde_json::to_string(order).map_err(|e| StoreError::PutError(e.to_string()))?;
    sqlx::query(
        r#"INSERT INTO orders (id, body, updated_at) VALUES ($1, $2, $3)
           ON CONFLICT (id) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at"#,
    )
    .bind(order.id)
    .bind(body)
    .bind(now_ms)
    .execute(conn)
    .await
    .map_err(|e| StoreError::PutError(e.to_string()))?;
    Ok(())
}

pub async fn insert_poll_run(entry: &JobLedgerEntry, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let body = serde_json::to_string(entry).map_err(|e| StoreError::PutError(e.to_string()))?;
    sqlx::query(r#"INSERT INTO poll_runs (run_timestamp, entry) VALUES ($1, $2)"#)
        .bind(entry.timestamp)
        .bind(body)
        .execute(conn)
        .await
        .map_err(|e| StoreError::PutError(e.to_string()))?;
    Ok(())
}

pub async fn insert_webhook_audit(
    entry: &WebhookAuditEntry,
    now_ms: i64,
    conn: &mut SqliteConnection,
) -> Result<(), StoreError> {
    let body = serde_json::to_string(entry).map_err(|e| StoreError::PutError(e.to_string()))?;
    sqlx::query(r#"INSERT INTO webhook_audits (order_id, entry, recorded_at) VALUES ($1, $2, $3)"#)
        .bind(entry.order_id)
        .bind(body)
        .bind(now_ms)
        .execute(conn)
        .await
        .map_err(|e| StoreError::PutError(e.to_string()))?;
    Ok(())
}
