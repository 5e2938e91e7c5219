use bigcommerce_tools::{Order, OrdersCount};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum UpstreamApiError {
    #[error("Upstream request failed: {0}")]
    RequestFailed(String),
    #[error("Could not decode upstream response: {0}")]
    DecodeError(String),
}

/// The slice of the storefront order-management API the pipeline consumes.
///
/// Implementations are expected to retry transient failures internally (the reference
/// implementation gives every operation a fixed three-attempt budget) and to surface the final
/// error once that budget is exhausted.
#[allow(async_fn_in_trait)]
pub trait UpstreamOrders {
    /// Per-status counts of non-deleted orders across the whole catalog.
    async fn count_orders_by_status(&self) -> Result<OrdersCount, UpstreamApiError>;
    /// One page of orders in the given status. May return fewer (or more) orders than a
    /// previously fetched count predicted; counts are not transactionally consistent.
    async fn fetch_orders_page(
        &self,
        status_id: i64,
        page: u64,
        limit: u64,
    ) -> Result<Vec<Order>, UpstreamApiError>;
    async fn fetch_order(&self, order_id: i64) -> Result<Order, UpstreamApiError>;
    /// Fetch an order sub-collection by its API-relative resource path.
    async fn fetch_subresource(&self, resource: &str) -> Result<Vec<Value>, UpstreamApiError>;
    async fn set_order_status(&self, order_id: i64, status_id: i64) -> Result<(), UpstreamApiError>;
}
