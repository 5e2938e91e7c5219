//! # Pipeline backend interfaces.
//!
//! This module defines the interface contracts between the pipeline core and the managed
//! primitives it runs against. The engine never talks to a concrete queue, store, alert channel
//! or storefront directly; every pipeline API is generic over these traits.
//!
//! * [`UpstreamOrders`] is the storefront order-management API surface the pipeline consumes.
//!   Implementations own their retry behaviour; callers treat every operation as a single
//!   fallible call.
//! * [`WorkQueue`] is the durable channel between the intake paths and the enrichment
//!   consumer. The contract is at-least-once, unordered delivery: a message may arrive more
//!   than once, but is never dropped before [`WorkQueue::delete_message`] consumes its
//!   single-use receipt handle.
//! * [`DocumentStore`] persists the audit records and the enriched orders. Order writes are an
//!   idempotent upsert by order id: the two intake paths may enqueue the same order and the
//!   consumer may reprocess one after redelivery, so last-write-wins by id is part of the
//!   contract, not an accident.
//! * [`OperatorAlerts`] is the out-of-band channel failures are reported on.
mod document_store;
mod operator_alerts;
mod upstream;
mod work_queue;

pub use document_store::{DocumentStore, StoreError};
pub use operator_alerts::{AlertError, OperatorAlerts};
pub use upstream::{UpstreamApiError, UpstreamOrders};
pub use work_queue::{QueueError, WorkQueue};
