//! The public pipeline APIs: one per invocation entrypoint.

pub mod enrichment_api;
pub mod errors;
pub mod intake_api;
pub mod webhook_api;
