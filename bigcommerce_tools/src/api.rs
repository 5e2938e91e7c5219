use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
    StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::BigCommerceConfig,
    order::{Order, OrdersCount},
    retry::{run_with_retry, RetryPolicy},
    BigCommerceApiError,
};

/// A thin client over the BigCommerce v2 order-management API.
///
/// Every public operation consumes one full retry budget ([`RetryPolicy`], default three
/// immediate attempts) and propagates the last error once the budget is exhausted.
#[derive(Clone)]
pub struct BigCommerceApi {
    config: BigCommerceConfig,
    client: Arc<Client>,
    retry: RetryPolicy,
}

impl BigCommerceApi {
    pub fn new(config: BigCommerceConfig) -> Result<Self, BigCommerceApiError> {
        Self::with_retry_policy(config, RetryPolicy::default())
    }

    pub fn with_retry_policy(
        config: BigCommerceConfig,
        retry: RetryPolicy,
    ) -> Result<Self, BigCommerceApiError> {
        let mut headers = HeaderMap::with_capacity(3);
        let token = HeaderValue::from_str(config.access_token.reveal().as_str())
            .map_err(|e| BigCommerceApiError::Initialization(e.to_string()))?;
        let client_id = HeaderValue::from_str(config.client_id.reveal().as_str())
            .map_err(|e| BigCommerceApiError::Initialization(e.to_string()))?;
        headers.insert("X-Auth-Token", token);
        headers.insert("X-Auth-Client", client_id);
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BigCommerceApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client), retry })
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "https://api.bigcommerce.com/stores/{}/{}{path}",
            self.config.store_hash, self.config.api_version
        )
    }

    pub fn config(&self) -> &BigCommerceConfig {
        &self.config
    }

    /// Issues a single REST request with no retry. Non-2xx responses become
    /// [`BigCommerceApiError::QueryError`].
    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, BigCommerceApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let response = req.send().await.map_err(|e| BigCommerceApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| BigCommerceApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message =
                response.text().await.map_err(|e| BigCommerceApiError::RestResponseError(e.to_string()))?;
            Err(BigCommerceApiError::QueryError { status, message })
        }
    }

    /// Like [`Self::rest_query`] for collection endpoints: the v2 API answers an empty page or
    /// empty subresource with `204 No Content`, which decodes here as an empty vector.
    async fn rest_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, BigCommerceApiError> {
        let url = self.url(path);
        trace!("Sending REST list query: {url}");
        let mut req = self.client.request(Method::GET, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        let response = req.send().await.map_err(|e| BigCommerceApiError::RestResponseError(e.to_string()))?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        if response.status().is_success() {
            response.json::<Vec<T>>().await.map_err(|e| BigCommerceApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message =
                response.text().await.map_err(|e| BigCommerceApiError::RestResponseError(e.to_string()))?;
            Err(BigCommerceApiError::QueryError { status, message })
        }
    }

    /// Per-status order counts for the whole store.
    pub async fn count_orders_by_status(&self) -> Result<OrdersCount, BigCommerceApiError> {
        debug!("Fetching order counts by status");
        let counts = run_with_retry(
            &self.retry,
            |_| self.rest_query::<OrdersCount, ()>(Method::GET, "/orders/count", &[("is_deleted", "false")], None),
            |_| true,
        )
        .await?;
        info!("Fetched counts for {} order statuses", counts.statuses.len());
        Ok(counts)
    }

    /// One page of non-deleted orders in the given status.
    pub async fn fetch_orders_page(
        &self,
        status_id: i64,
        page: u64,
        limit: u64,
    ) -> Result<Vec<Order>, BigCommerceApiError> {
        let page_s = page.to_string();
        let limit_s = limit.to_string();
        let status_s = status_id.to_string();
        let params = [
            ("page", page_s.as_str()),
            ("limit", limit_s.as_str()),
            ("status_id", status_s.as_str()),
            ("is_deleted", "false"),
        ];
        debug!("Fetching page {page} of orders with status {status_id}");
        let orders =
            run_with_retry(&self.retry, |_| self.rest_list::<Order>("/orders", &params), |_| true).await?;
        info!("Fetched {} orders with status {status_id} (page {page})", orders.len());
        Ok(orders)
    }

    pub async fn get_order(&self, order_id: i64) -> Result<Order, BigCommerceApiError> {
        let path = format!("/orders/{order_id}");
        debug!("Fetching order #{order_id}");
        let order = run_with_retry(
            &self.retry,
            |_| self.rest_query::<Order, ()>(Method::GET, &path, &[], None),
            |_| true,
        )
        .await?;
        info!("Fetched order #{order_id}");
        Ok(order)
    }

    /// Fetches an order sub-collection by its API-relative resource path,
    /// e.g. `/orders/129/products`.
    pub async fn fetch_subresource(&self, resource: &str) -> Result<Vec<Value>, BigCommerceApiError> {
        debug!("Fetching subresource {resource}");
        let items = run_with_retry(&self.retry, |_| self.rest_list::<Value>(resource, &[]), |_| true).await?;
        info!("Fetched {} items from {resource}", items.len());
        Ok(items)
    }

    pub async fn set_order_status(
        &self,
        order_id: i64,
        status_id: i64,
    ) -> Result<Order, BigCommerceApiError> {
        let path = format!("/orders/{order_id}");
        let payload = serde_json::json!({ "status_id": status_id });
        debug!("Updating order #{order_id} to status {status_id}");
        let order = run_with_retry(
            &self.retry,
            |_| self.rest_query::<Order, Value>(Method::PUT, &path, &[], Some(&payload)),
            |_| true,
        )
        .await?;
        info!("Order #{order_id} moved to status {status_id}");
        Ok(order)
    }
}
