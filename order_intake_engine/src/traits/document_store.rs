use bigcommerce_tools::Order;
use thiserror::Error;

use crate::pipeline_objects::{JobLedgerEntry, WebhookAuditEntry};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Could not write to the document store: {0}")]
    PutError(String),
}

/// Persistence for audit records and enriched orders.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Appends the ledger entry summarizing one poll run. Entries are immutable once written.
    async fn record_poll_run(&self, entry: &JobLedgerEntry) -> Result<(), StoreError>;
    /// Appends the audit record for one accepted webhook. Entries are immutable once written.
    async fn record_webhook_audit(&self, entry: &WebhookAuditEntry) -> Result<(), StoreError>;
    /// Writes the enriched order, keyed by order id. Must be an idempotent last-write-wins
    /// upsert: the consumer re-runs this for the same order under redelivery.
    async fn upsert_order(&self, order: &Order) -> Result<(), StoreError>;
}
