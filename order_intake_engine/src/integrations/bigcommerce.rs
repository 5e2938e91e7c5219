//! [`UpstreamOrders`] backed by the BigCommerce v2 client.
//!
//! The client owns the retry budget; by the time an error reaches this layer the budget is
//! already spent, so the mapping below is a plain translation.

use bigcommerce_tools::{BigCommerceApi, BigCommerceApiError, Order, OrdersCount};
use serde_json::Value;

use crate::traits::{UpstreamApiError, UpstreamOrders};

impl From<BigCommerceApiError> for UpstreamApiError {
    fn from(e: BigCommerceApiError) -> Self {
        match e {
            BigCommerceApiError::JsonError(m) => UpstreamApiError::DecodeError(m),
            other => UpstreamApiError::RequestFailed(other.to_string()),
        }
    }
}

impl UpstreamOrders for BigCommerceApi {
    async fn count_orders_by_status(&self) -> Result<OrdersCount, UpstreamApiError> {
        Ok(BigCommerceApi::count_orders_by_status(self).await?)
    }

    async fn fetch_orders_page(
        &self,
        status_id: i64,
        page: u64,
        limit: u64,
    ) -> Result<Vec<Order>, UpstreamApiError> {
        Ok(BigCommerceApi::fetch_orders_page(self, status_id, page, limit).await?)
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Order, UpstreamApiError> {
        Ok(self.get_order(order_id).await?)
    }

    async fn fetch_subresource(&self, resource: &str) -> Result<Vec<Value>, UpstreamApiError> {
        Ok(BigCommerceApi::fetch_subresource(self, resource).await?)
    }

    async fn set_order_status(&self, order_id: i64, status_id: i64) -> Result<(), UpstreamApiError> {
        BigCommerceApi::set_order_status(self, order_id, status_id).await?;
        Ok(())
    }
}
