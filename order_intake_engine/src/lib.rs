//! Order Intake Engine
//!
//! The engine contains the core logic of the order intake-and-enrichment pipeline. It is
//! backend-agnostic: the work queue, the document store, the operator alert channel and the
//! upstream storefront API are all expressed as traits ([`mod@traits`]), and every pipeline API
//! is generic over them.
//!
//! The pipeline has two intake paths feeding one queue and one consumer draining it:
//! 1. The poll path ([`IntakeApi`]) enumerates all actionable orders upstream
//!    ([`enumerator::OrderEnumerator`]), enqueues one message per order and writes a ledger
//!    entry per run.
//! 2. The event path ([`WebhookApi`]) validates an inbound cart-conversion webhook, fetches the
//!    single resulting order and enqueues it.
//! 3. The consumer ([`EnrichmentApi`]) drains queue batches, resolves each order's
//!    subresources, persists the denormalized record, advances the upstream status and only
//!    then acknowledges the message.
//!
//! Delivery is at-least-once: both intake paths may race on the same order, and a failed batch
//! is redelivered whole. Correctness comes from idempotent side effects (upsert by order id,
//! re-settable status), not from ordering.
//!
//! A SQLite backend ([`SqliteBackend`]) implements the queue and store traits for local and
//! single-node deployments.

pub mod alerts;
pub mod enumerator;
mod integrations;
mod pipeline_api;
pub mod pipeline_objects;
pub mod sqlite;
pub mod traits;

#[cfg(test)]
mod test_utils;

pub use pipeline_api::{
    enrichment_api::EnrichmentApi,
    errors::PipelineError,
    intake_api::IntakeApi,
    webhook_api::{WebhookApi, CART_CONVERTED_SCOPE},
};
pub use sqlite::SqliteBackend;
