//! `SqliteBackend` is a concrete implementation of the pipeline's queue and store backends.
//!
//! It keeps the work queue and the document store in one SQLite database, which is all a
//! single-node deployment needs. The queue rows carry a visibility deadline so that an
//! unacknowledged message comes back for redelivery after the timeout.
use std::{fmt::Debug, time::Duration};

use bigcommerce_tools::Order;
use chrono::Utc;
use sqlx::SqlitePool;

use super::db::{create_schema, db_url, new_pool, queue, store};
use crate::{
    pipeline_objects::{JobLedgerEntry, MessageAttributes, QueueMessage, SendReceipt, WebhookAuditEntry},
    traits::{DocumentStore, QueueError, StoreError, WorkQueue},
};

const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
    visibility_timeout_ms: i64,
}

impl Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteBackend ({:?})", self.pool)
    }
}

impl SqliteBackend {
    /// Connects to the database named by `OIP_DATABASE_URL` and creates the schema if needed.
    pub async fn new_from_env() -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url).await
    }

    pub async fn new_with_url(url: &str) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, 25).await?;
        create_schema(&pool).await?;
        Ok(Self { pool, visibility_timeout_ms: DEFAULT_VISIBILITY_TIMEOUT.as_millis() as i64 })
    }

    pub fn with_visibility_timeout(mut self, timeout: Duration) -> Self {
        self.visibility_timeout_ms = timeout.as_millis() as i64;
        self
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl WorkQueue for SqliteBackend {
    async fn send_message(
        &self,
        body: String,
        attributes: &MessageAttributes,
    ) -> Result<SendReceipt, QueueError> {
        let attributes =
            serde_json::to_string(attributes).map_err(|e| QueueError::SendError(e.to_string()))?;
        let mut conn =
            self.pool.acquire().await.map_err(|e| QueueError::SendError(e.to_string()))?;
        let now = Utc::now().timestamp_millis();
        let message_id = queue::send(&body, &attributes, now, &mut conn).await?;
        Ok(SendReceipt { message_id })
    }

    async fn receive_batch(&self, max_messages: u32) -> Result<Vec<QueueMessage>, QueueError> {
        // The select and the per-message claim updates must be atomic, or two consumers could
        // claim the same delivery.
        let mut tx =
            self.pool.begin().await.map_err(|e| QueueError::ReceiveError(e.to_string()))?;
        let now = Utc::now().timestamp_millis();
        let messages = queue::receive(max_messages, self.visibility_timeout_ms, now, &mut *tx).await?;
        tx.commit().await.map_err(|e| QueueError::ReceiveError(e.to_string()))?;
        Ok(messages)
    }

    async fn delete_message(&self, receipt_handle: &str) -> Result<(), QueueError> {
        let mut conn =
            self.pool.acquire().await.map_err(|e| QueueError::DeleteError(e.to_string()))?;
        queue::delete(receipt_handle, &mut conn).await
    }
}

impl DocumentStore for SqliteBackend {
    async fn record_poll_run(&self, entry: &JobLedgerEntry) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await.map_err(|e| StoreError::PutError(e.to_string()))?;
        store::insert_poll_run(entry, &mut conn).await
    }

    async fn record_webhook_audit(&self, entry: &WebhookAuditEntry) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await.map_err(|e| StoreError::PutError(e.to_string()))?;
        let now = Utc::now().timestamp_millis();
        store::insert_webhook_audit(entry, now, &mut conn).await
    }

    async fn upsert_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await.map_err(|e| StoreError::PutError(e.to_string()))?;
        let now = Utc::now().timestamp_millis();
        store::upsert_order(order, now, &mut conn).await
    }
}
