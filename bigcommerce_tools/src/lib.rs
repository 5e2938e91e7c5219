mod api;
mod config;
mod error;
mod order;
mod retry;

pub use api::BigCommerceApi;
pub use config::BigCommerceConfig;
pub use error::BigCommerceApiError;
pub use order::{Order, OrderMetadata, OrdersCount, StatusCount, Subresource, SubresourceRef};
pub use retry::{run_with_retry, RetryPolicy};
