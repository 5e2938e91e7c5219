use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A storefront order as returned by the v2 orders API.
///
/// Only the fields the pipeline acts on are typed; everything else the upstream sends is kept
/// in `extra` so that the full denormalized body survives a round trip through the work queue
/// and into the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub status_id: i64,
    pub status: String,
    pub date_created: String,
    pub date_modified: String,
    #[serde(default)]
    pub order_is_digital: bool,
    pub products: Subresource,
    pub shipping_addresses: Subresource,
    pub coupons: Subresource,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An order sub-collection. The upstream lists these as `{url, resource}` reference
/// descriptors; the enrichment step replaces each one in place with the resolved collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subresource {
    Reference(SubresourceRef),
    Resolved(Vec<Value>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubresourceRef {
    pub url: String,
    /// API-relative path of the collection, e.g. `/orders/123/products`.
    pub resource: String,
}

impl Subresource {
    pub fn reference(&self) -> Option<&SubresourceRef> {
        match self {
            Subresource::Reference(r) => Some(r),
            Subresource::Resolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Subresource::Resolved(_))
    }
}

/// Response of `GET /orders/count`: per-status order counts for the whole catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdersCount {
    pub statuses: Vec<StatusCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub id: i64,
    pub count: u64,
    pub custom_label: String,
}

impl OrdersCount {
    pub fn count_for(&self, status_id: i64) -> u64 {
        self.statuses.iter().find(|s| s.id == status_id).map(|s| s.count).unwrap_or(0)
    }
}

/// Lightweight per-order snapshot recorded in the poll-run ledger. Deliberately id/status/dates
/// only; the full body is persisted later by the enrichment consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMetadata {
    pub id: i64,
    pub status: String,
    pub date_created: String,
    pub date_modified: String,
}

impl From<&Order> for OrderMetadata {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            status: order.status.clone(),
            date_created: order.date_created.clone(),
            date_modified: order.date_modified.clone(),
        }
    }
}
