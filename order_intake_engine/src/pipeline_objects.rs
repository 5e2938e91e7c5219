//! Data objects carried between the pipeline stages.

use bigcommerce_tools::{OrderMetadata, OrdersCount};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle codes the poll path considers ready for fulfillment processing.
pub const ACTIONABLE_STATUSES: [i64; 3] = [10, 11, 7];

/// Status 8 is 'Awaiting Pickup' by default; the store relabels it 'Digital Order Complete'.
pub const DIGITAL_ORDER_COMPLETE: i64 = 8;

/// Status 9 is 'Awaiting Shipment'.
pub const AWAITING_SHIPMENT: i64 = 9;

/// Metadata attached to a queue message alongside the serialized order body. Poll-sourced
/// messages carry the run's start time; event-sourced messages carry the raw webhook payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
}

impl MessageAttributes {
    pub fn from_poll(timestamp: i64) -> Self {
        Self { poll_timestamp: Some(timestamp), webhook: None }
    }

    pub fn from_webhook(raw_payload: &str) -> Self {
        Self { poll_timestamp: None, webhook: Some(raw_payload.to_string()) }
    }
}

/// Returned by the queue for every accepted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReceipt {
    pub message_id: String,
}

/// One delivered queue message. The receipt handle is specific to this delivery and single-use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueMessage {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
    pub attributes: MessageAttributes,
}

/// Immutable audit record of one poll run: the counts observed, a lightweight metadata
/// snapshot per fetched page, and the receipt of every message enqueued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobLedgerEntry {
    /// Run start time, unix milliseconds.
    pub timestamp: i64,
    pub store: String,
    pub count_data: OrdersCount,
    pub order_metadata: Vec<Vec<OrderMetadata>>,
    pub messages: Vec<SendReceipt>,
}

/// Immutable audit record of one accepted cart-conversion webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAuditEntry {
    pub order_id: i64,
    /// The webhook payload exactly as delivered.
    pub webhook: Value,
    pub message: SendReceipt,
}

/// An inbound cart-conversion event from the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConvertedEvent {
    pub scope: String,
    pub producer: String,
    pub data: CartConvertedData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartConvertedData {
    #[serde(rename = "orderId")]
    pub order_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub timestamp: i64,
    pub orders_enqueued: usize,
    pub pages: usize,
    pub statuses: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub processed: usize,
}
