//! Shared fixtures and trait mocks for the engine's unit tests.

use bigcommerce_tools::{Order, OrdersCount, StatusCount};
use mockall::mock;
use serde_json::{json, Value};

use crate::{
    pipeline_objects::{JobLedgerEntry, MessageAttributes, QueueMessage, SendReceipt, WebhookAuditEntry},
    traits::{
        AlertError,
        DocumentStore,
        OperatorAlerts,
        QueueError,
        StoreError,
        UpstreamApiError,
        UpstreamOrders,
        WorkQueue,
    },
};

mock! {
    pub Upstream {}
    impl UpstreamOrders for Upstream {
        async fn count_orders_by_status(&self) -> Result<OrdersCount, UpstreamApiError>;
        async fn fetch_orders_page(&self, status_id: i64, page: u64, limit: u64) -> Result<Vec<Order>, UpstreamApiError>;
        async fn fetch_order(&self, order_id: i64) -> Result<Order, UpstreamApiError>;
        async fn fetch_subresource(&self, resource: &str) -> Result<Vec<Value>, UpstreamApiError>;
        async fn set_order_status(&self, order_id: i64, status_id: i64) -> Result<(), UpstreamApiError>;
    }
}

mock! {
    pub Queue {}
    impl WorkQueue for Queue {
        async fn send_message(&self, body: String, attributes: &MessageAttributes) -> Result<SendReceipt, QueueError>;
        async fn receive_batch(&self, max_messages: u32) -> Result<Vec<QueueMessage>, QueueError>;
        async fn delete_message(&self, receipt_handle: &str) -> Result<(), QueueError>;
    }
}

mock! {
    pub Store {}
    impl DocumentStore for Store {
        async fn record_poll_run(&self, entry: &JobLedgerEntry) -> Result<(), StoreError>;
        async fn record_webhook_audit(&self, entry: &WebhookAuditEntry) -> Result<(), StoreError>;
        async fn upsert_order(&self, order: &Order) -> Result<(), StoreError>;
    }
}

mock! {
    pub Alerts {}
    impl OperatorAlerts for Alerts {
        async fn publish(&self, subject: &str, message: &str) -> Result<(), AlertError>;
    }
}

/// An order as the upstream lists it: subresources still unresolved references.
pub fn sample_order(id: i64, digital: bool) -> Order {
    serde_json::from_value(json!({
        "id": id,
        "status_id": 11,
        "status": "Awaiting Fulfillment",
        "date_created": "Tue, 20 Aug 2024 14:45:00 +0000",
        "date_modified": "Tue, 20 Aug 2024 14:45:00 +0000",
        "order_is_digital": digital,
        "products": {
            "url": format!("https://api.bigcommerce.com/stores/abc/v2/orders/{id}/products"),
            "resource": format!("/orders/{id}/products")
        },
        "shipping_addresses": {
            "url": format!("https://api.bigcommerce.com/stores/abc/v2/orders/{id}/shipping_addresses"),
            "resource": format!("/orders/{id}/shipping_addresses")
        },
        "coupons": {
            "url": format!("https://api.bigcommerce.com/stores/abc/v2/orders/{id}/coupons"),
            "resource": format!("/orders/{id}/coupons")
        }
    }))
    .expect("sample order is valid")
}

pub fn counts_with(statuses: &[(i64, u64, &str)]) -> OrdersCount {
    OrdersCount {
        statuses: statuses
            .iter()
            .map(|(id, count, label)| StatusCount { id: *id, count: *count, custom_label: label.to_string() })
            .collect(),
    }
}

pub fn queued_message(order: &Order, handle: &str) -> QueueMessage {
    QueueMessage {
        message_id: format!("m-{}", order.id),
        receipt_handle: handle.to_string(),
        body: serde_json::to_string(order).expect("order serializes"),
        attributes: MessageAttributes::from_poll(1_700_000_000_000),
    }
}
