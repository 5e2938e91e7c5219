use bigcommerce_tools::{Order, OrderMetadata};
use chrono::Utc;
use futures_util::{future::try_join_all, StreamExt};
use log::*;

use crate::{
    enumerator::OrderEnumerator,
    pipeline_api::errors::PipelineError,
    pipeline_objects::{JobLedgerEntry, MessageAttributes, RunSummary, SendReceipt, ACTIONABLE_STATUSES},
    traits::{DocumentStore, UpstreamOrders, WorkQueue},
};

/// The poll-path intake dispatcher.
///
/// One [`Self::run_poll`] call enumerates every actionable order upstream, enqueues one message
/// per order stamped with the run's start time, and finishes by writing a single ledger entry
/// summarizing the run. A failed run may leave some orders already enqueued; that is accepted
/// and never rolled back, since the consumer's idempotent processing absorbs duplicates.
pub struct IntakeApi<U, Q, S> {
    upstream: U,
    queue: Q,
    store: S,
    store_hash: String,
}

impl<U, Q, S> IntakeApi<U, Q, S> {
    pub fn new(upstream: U, queue: Q, store: S, store_hash: String) -> Self {
        Self { upstream, queue, store, store_hash }
    }
}

impl<U, Q, S> IntakeApi<U, Q, S>
where
    U: UpstreamOrders,
    Q: WorkQueue,
    S: DocumentStore,
{
    pub async fn run_poll(&self) -> Result<RunSummary, PipelineError> {
        let started_at = Utc::now().timestamp_millis();
        info!("Starting order intake poll for store {}", self.store_hash);
        let enumerator = OrderEnumerator::new(&self.upstream);
        let enumeration = enumerator.enumerate(&ACTIONABLE_STATUSES).await?;
        let mut pages = enumeration.pages;

        let attributes = MessageAttributes::from_poll(started_at);
        let mut order_metadata: Vec<Vec<OrderMetadata>> = vec![];
        let mut messages: Vec<SendReceipt> = vec![];
        let mut page_count = 0usize;
        let mut status_count = 0usize;
        while let Some(status_pages) = pages.next().await {
            status_count += 1;
            for page in status_pages? {
                if !page.orders.is_empty() {
                    debug!(
                        "Adding {} orders from status {} page {} to the queue",
                        page.orders.len(),
                        page.status_id,
                        page.page
                    );
                    let sends = page.orders.iter().map(|order| self.enqueue_order(order, &attributes));
                    messages.extend(try_join_all(sends).await?);
                }
                order_metadata.push(page.orders.iter().map(OrderMetadata::from).collect());
                page_count += 1;
            }
        }
        drop(pages);

        let entry = JobLedgerEntry {
            timestamp: started_at,
            store: self.store_hash.clone(),
            count_data: enumeration.counts,
            order_metadata,
            messages,
        };
        info!("Storing poll run ledger entry {{ timestamp: {started_at} }}");
        self.store.record_poll_run(&entry).await?;
        let summary = RunSummary {
            timestamp: started_at,
            orders_enqueued: entry.messages.len(),
            pages: page_count,
            statuses: status_count,
        };
        info!("Finished adding {} orders to the queue", summary.orders_enqueued);
        Ok(summary)
    }

    async fn enqueue_order(
        &self,
        order: &Order,
        attributes: &MessageAttributes,
    ) -> Result<SendReceipt, PipelineError> {
        let body = serde_json::to_string(order).map_err(|e| PipelineError::InvalidPayload(e.to_string()))?;
        debug!("Adding order {} to queue", order.id);
        let receipt = self.queue.send_message(body, attributes).await?;
        debug!("Added message {} to queue for order {}", receipt.message_id, order.id);
        Ok(receipt)
    }
}
