use bigcommerce_tools::{Order, Subresource};
use log::*;

use crate::{
    pipeline_api::errors::PipelineError,
    pipeline_objects::{BatchResult, QueueMessage, AWAITING_SHIPMENT, DIGITAL_ORDER_COMPLETE},
    traits::{DocumentStore, UpstreamOrders, WorkQueue},
};

/// The queue consumer: enriches each order with its subresources, persists it, advances its
/// upstream status and only then acknowledges the message.
///
/// Messages are processed strictly in delivery order, one at a time. This bounds the load the
/// consumer puts on the upstream API and keeps the failure semantics simple: the first message
/// that fails halts the batch, the error propagates, and the queue's own redelivery re-attempts
/// the whole batch later. Everything before the final delete is idempotent (re-fetching and
/// re-upserting an order, re-setting the same status), so reprocessing an already-completed
/// message is harmless.
pub struct EnrichmentApi<U, Q, S> {
    upstream: U,
    queue: Q,
    store: S,
}

impl<U, Q, S> EnrichmentApi<U, Q, S> {
    pub fn new(upstream: U, queue: Q, store: S) -> Self {
        Self { upstream, queue, store }
    }
}

impl<U, Q, S> EnrichmentApi<U, Q, S>
where
    U: UpstreamOrders,
    Q: WorkQueue,
    S: DocumentStore,
{
    pub async fn process_batch(&self, batch: &[QueueMessage]) -> Result<BatchResult, PipelineError> {
        for message in batch {
            self.process_message(message).await?;
        }
        info!("Successfully processed {} orders from the queue", batch.len());
        Ok(BatchResult { processed: batch.len() })
    }

    async fn process_message(&self, message: &QueueMessage) -> Result<(), PipelineError> {
        let mut order: Order =
            serde_json::from_str(&message.body).map_err(|e| PipelineError::InvalidPayload(e.to_string()))?;
        debug!("Getting subresources for order {}", order.id);
        self.resolve_subresources(&mut order).await?;
        debug!("Writing order {} to the document store", order.id);
        self.store.upsert_order(&order).await?;
        let status_id = if order.order_is_digital { DIGITAL_ORDER_COMPLETE } else { AWAITING_SHIPMENT };
        debug!("Updating order {} to status {status_id} upstream", order.id);
        self.upstream.set_order_status(order.id, status_id).await?;
        // The delete must come last and complete before the next message: a message only
        // leaves the queue once every side effect for it is durably committed.
        debug!("Deleting message {}", message.message_id);
        self.queue.delete_message(&message.receipt_handle).await?;
        info!("Processed message {} for order {}", message.message_id, order.id);
        Ok(())
    }

    async fn resolve_subresources(&self, order: &mut Order) -> Result<(), PipelineError> {
        order.products = self.resolve(&order.products).await?;
        order.shipping_addresses = self.resolve(&order.shipping_addresses).await?;
        order.coupons = self.resolve(&order.coupons).await?;
        Ok(())
    }

    async fn resolve(&self, subresource: &Subresource) -> Result<Subresource, PipelineError> {
        match subresource {
            Subresource::Reference(r) => {
                let items = self.upstream.fetch_subresource(&r.resource).await?;
                Ok(Subresource::Resolved(items))
            },
            // Already resolved, e.g. a redelivered message whose body was enriched upstream of
            // us. Nothing to fetch.
            Subresource::Resolved(items) => Ok(Subresource::Resolved(items.clone())),
        }
    }
}
