use std::time::Duration;

use bigcommerce_tools::BigCommerceApi;
use log::*;
use order_intake_engine::{alerts::report_failure, IntakeApi, SqliteBackend};
use tokio::task::JoinHandle;

use crate::alert_sink::AlertSink;

/// Starts the poll worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Each tick runs one full poll sweep over the actionable order statuses. A failed sweep is
/// reported to the operator and the worker carries on; the next tick starts a fresh run.
pub fn start_poll_worker(
    upstream: BigCommerceApi,
    backend: SqliteBackend,
    alerts: AlertSink,
    store_hash: String,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        let api = IntakeApi::new(upstream, backend.clone(), backend, store_hash);
        info!("Order poll worker started, sweeping every {interval:?}");
        loop {
            timer.tick().await;
            info!("Running order poll sweep");
            match api.run_poll().await {
                Ok(summary) => {
                    info!(
                        "Poll sweep complete. {} orders enqueued over {} pages across {} statuses",
                        summary.orders_enqueued, summary.pages, summary.statuses
                    );
                },
                Err(e) => {
                    report_failure(&alerts, "poll intake", &e).await;
                },
            }
        }
    })
}
