use log::*;

use crate::{
    pipeline_api::errors::PipelineError,
    pipeline_objects::{CartConvertedEvent, MessageAttributes, WebhookAuditEntry},
    traits::{DocumentStore, UpstreamOrders, WorkQueue},
};

/// The one event type the intake pipeline accepts.
pub const CART_CONVERTED_SCOPE: &str = "store/cart/converted";

/// The event-path intake handler.
///
/// A valid cart-conversion event results in exactly one queue message (carrying the full order
/// body plus the raw webhook payload) and one audit entry. Events from foreign stores or of
/// unrelated types are rejected with [`PipelineError::Validation`] before any upstream or queue
/// call is made.
pub struct WebhookApi<U, Q, S> {
    upstream: U,
    queue: Q,
    store: S,
    /// Canonical producer identifier of the store this pipeline serves, e.g. `stores/abc123`.
    producer: String,
}

impl<U, Q, S> WebhookApi<U, Q, S> {
    pub fn new(upstream: U, queue: Q, store: S, producer: String) -> Self {
        Self { upstream, queue, store, producer }
    }
}

impl<U, Q, S> WebhookApi<U, Q, S>
where
    U: UpstreamOrders,
    Q: WorkQueue,
    S: DocumentStore,
{
    /// Validates and processes one inbound event; returns the queued order's id.
    pub async fn handle_cart_converted(
        &self,
        event: &CartConvertedEvent,
        raw_payload: &str,
    ) -> Result<i64, PipelineError> {
        if event.scope != CART_CONVERTED_SCOPE {
            return Err(PipelineError::Validation(format!("unexpected event scope '{}'", event.scope)));
        }
        if event.producer != self.producer {
            return Err(PipelineError::Validation(format!(
                "event producer '{}' does not match this store",
                event.producer
            )));
        }
        let order_id = event.data.order_id;
        debug!("Processing cart-converted webhook for order {order_id}");
        let order = self.upstream.fetch_order(order_id).await?;
        let body = serde_json::to_string(&order).map_err(|e| PipelineError::InvalidPayload(e.to_string()))?;
        let attributes = MessageAttributes::from_webhook(raw_payload);
        let receipt = self.queue.send_message(body, &attributes).await?;
        info!("Added order {order_id} to the queue as message {}", receipt.message_id);
        let webhook =
            serde_json::from_str(raw_payload).map_err(|e| PipelineError::InvalidPayload(e.to_string()))?;
        let entry = WebhookAuditEntry { order_id, webhook, message: receipt };
        self.store.record_webhook_audit(&entry).await?;
        debug!("Stored webhook audit entry for order {order_id}");
        Ok(order_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        pipeline_objects::SendReceipt,
        test_utils::{sample_order, MockQueue, MockStore, MockUpstream},
        traits::UpstreamApiError,
    };

    const RAW: &str = r#"{"scope":"store/cart/converted","producer":"stores/XYZ","data":{"orderId":42}}"#;

    fn event(scope: &str, producer: &str) -> CartConvertedEvent {
        CartConvertedEvent {
            scope: scope.to_string(),
            producer: producer.to_string(),
            data: crate::pipeline_objects::CartConvertedData { order_id: 42 },
        }
    }

    fn silent_mocks() -> (MockUpstream, MockQueue, MockStore) {
        let mut upstream = MockUpstream::new();
        upstream.expect_fetch_order().times(0);
        let mut queue = MockQueue::new();
        queue.expect_send_message().times(0);
        let mut store = MockStore::new();
        store.expect_record_webhook_audit().times(0);
        (upstream, queue, store)
    }

    #[tokio::test]
    async fn accepted_event_queues_and_audits_the_order() {
        let _ = env_logger::try_init();
        let mut upstream = MockUpstream::new();
        upstream.expect_fetch_order().times(1).returning(|id| Ok(sample_order(id, false)));
        let mut queue = MockQueue::new();
        queue.expect_send_message().times(1).returning(|body, attributes| {
            let order: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(order["id"], 42);
            assert_eq!(attributes.webhook.as_deref(), Some(RAW));
            assert!(attributes.poll_timestamp.is_none());
            Ok(SendReceipt { message_id: "m-42".to_string() })
        });
        let mut store = MockStore::new();
        store
            .expect_record_webhook_audit()
            .times(1)
            .withf(|entry| {
                entry.order_id == 42
                    && entry.message.message_id == "m-42"
                    && entry.webhook["data"]["orderId"] == 42
            })
            .returning(|_| Ok(()));

        let api = WebhookApi::new(upstream, queue, store, "stores/XYZ".to_string());
        let order_id =
            api.handle_cart_converted(&event(CART_CONVERTED_SCOPE, "stores/XYZ"), RAW).await.unwrap();
        assert_eq!(order_id, 42);
    }

    #[tokio::test]
    async fn foreign_producer_is_rejected_without_side_effects() {
        let _ = env_logger::try_init();
        let (upstream, queue, store) = silent_mocks();
        let api = WebhookApi::new(upstream, queue, store, "stores/XYZ".to_string());
        let err = api
            .handle_cart_converted(&event(CART_CONVERTED_SCOPE, "stores/OTHER"), RAW)
            .await
            .expect_err("expected rejection");
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn unrelated_scope_is_rejected_without_side_effects() {
        let _ = env_logger::try_init();
        let (upstream, queue, store) = silent_mocks();
        let api = WebhookApi::new(upstream, queue, store, "stores/XYZ".to_string());
        let err = api
            .handle_cart_converted(&event("store/order/updated", "stores/XYZ"), RAW)
            .await
            .expect_err("expected rejection");
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn upstream_failure_propagates_after_validation() {
        let _ = env_logger::try_init();
        let mut upstream = MockUpstream::new();
        upstream
            .expect_fetch_order()
            .times(1)
            .returning(|_| Err(UpstreamApiError::RequestFailed("timeout".to_string())));
        let mut queue = MockQueue::new();
        queue.expect_send_message().times(0);
        let mut store = MockStore::new();
        store.expect_record_webhook_audit().times(0);

        let api = WebhookApi::new(upstream, queue, store, "stores/XYZ".to_string());
        let err = api
            .handle_cart_converted(&event(CART_CONVERTED_SCOPE, "stores/XYZ"), RAW)
            .await
            .expect_err("expected failure");
        assert!(matches!(err, PipelineError::Upstream(_)));
    }
}
