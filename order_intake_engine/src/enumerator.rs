//! Walks the upstream catalog by status and page.

use bigcommerce_tools::{Order, OrdersCount, StatusCount};
use futures_util::stream::{FuturesUnordered, Stream};
use log::*;

use crate::traits::{UpstreamApiError, UpstreamOrders};

/// Orders are listed in fixed pages of 50.
pub const PAGE_SIZE: u64 = 50;

/// One listing call's worth of orders.
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub status_id: i64,
    pub page: u64,
    pub orders: Vec<Order>,
}

/// The result of one enumeration pass: the count snapshot that sized the page fan-out, plus a
/// stream yielding each status's pages as that status completes.
pub struct Enumeration<S> {
    pub counts: OrdersCount,
    pub pages: S,
}

/// Enumerates the catalog for a point in time.
///
/// Each [`Self::enumerate`] call re-issues the count query and walks every requested status
/// from page 1, so the sequence is finite and restartable. Statuses are fetched concurrently;
/// pages within one status strictly in sequence. No retry happens at this layer; the upstream
/// client owns its own attempt budget and failures propagate to the caller.
pub struct OrderEnumerator<'a, U> {
    upstream: &'a U,
    page_size: u64,
}

impl<'a, U: UpstreamOrders> OrderEnumerator<'a, U> {
    pub fn new(upstream: &'a U) -> Self {
        Self { upstream, page_size: PAGE_SIZE }
    }

    /// Starts an enumeration over every status in `status_filter` with a nonzero order count.
    ///
    /// The count snapshot is not transactionally consistent with the listing calls: a page may
    /// come back shorter or longer than the count predicted, and that is not an error.
    pub async fn enumerate(
        &self,
        status_filter: &[i64],
    ) -> Result<
        Enumeration<impl Stream<Item = Result<Vec<OrderPage>, UpstreamApiError>> + Unpin + 'a>,
        UpstreamApiError,
    > {
        let counts = self.upstream.count_orders_by_status().await?;
        let upstream = self.upstream;
        let page_size = self.page_size;
        let pages = counts
            .statuses
            .iter()
            .filter(|status| status_filter.contains(&status.id) && status.count > 0)
            .cloned()
            .map(|status| fetch_status_pages(upstream, status, page_size))
            .collect::<FuturesUnordered<_>>();
        Ok(Enumeration { counts, pages })
    }
}

async fn fetch_status_pages<U: UpstreamOrders>(
    upstream: &U,
    status: StatusCount,
    page_size: u64,
) -> Result<Vec<OrderPage>, UpstreamApiError> {
    let num_pages = status.count.div_ceil(page_size);
    let mut pages = Vec::with_capacity(num_pages as usize);
    for page in 1..=num_pages {
        debug!("Getting page {page} of {num_pages} of orders in \"{}\" state", status.custom_label);
        let orders = upstream.fetch_orders_page(status.id, page, page_size).await?;
        debug!("Fetched {} orders in \"{}\" state (page {page})", orders.len(), status.custom_label);
        pages.push(OrderPage { status_id: status.id, page, orders });
    }
    Ok(pages)
}
