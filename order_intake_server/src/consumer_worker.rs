use std::time::Duration;

use bigcommerce_tools::BigCommerceApi;
use log::*;
use order_intake_engine::{traits::WorkQueue, EnrichmentApi, SqliteBackend};
use tokio::task::JoinHandle;

/// Starts the enrichment consumer. Do not await the returned JoinHandle, as it will run
/// indefinitely.
///
/// The worker drains the queue in batches. A batch that fails mid-way is simply abandoned:
/// the already-acknowledged messages are gone, the rest become visible again after their
/// timeout and the redelivery is the retry. Failures here are therefore logged but never
/// alerted on.
pub fn start_consumer_worker(
    upstream: BigCommerceApi,
    backend: SqliteBackend,
    batch_size: u32,
    idle_delay: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let api = EnrichmentApi::new(upstream, backend.clone(), backend.clone());
        info!("Enrichment consumer started, claiming up to {batch_size} messages per batch");
        loop {
            let batch = match backend.receive_batch(batch_size).await {
                Ok(batch) => batch,
                Err(e) => {
                    error!("Could not receive a batch from the queue. {e}");
                    tokio::time::sleep(idle_delay).await;
                    continue;
                },
            };
            if batch.is_empty() {
                trace!("Queue is empty, idling for {idle_delay:?}");
                tokio::time::sleep(idle_delay).await;
                continue;
            }
            debug!("Processing a batch of {} messages", batch.len());
            match api.process_batch(&batch).await {
                Ok(result) => {
                    info!("Batch complete. {} orders enriched", result.processed);
                },
                Err(e) => {
                    warn!("Batch abandoned, unacknowledged messages will be redelivered. {e}");
                },
            }
        }
    })
}
