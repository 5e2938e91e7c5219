//! # Order intake server
//! This module hosts the HTTP surface and the background workers of the order intake pipeline.
//! It is responsible for:
//! Listening for incoming cart-conversion webhook requests from the storefront.
//! Sweeping the upstream order catalog on a schedule and feeding the work queue.
//! Draining the work queue and enriching each order into the document store.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/webhook/cart_converted`: The webhook route for receiving cart-conversion events from the storefront.
//! * `/poll/run`: Triggers one poll sweep immediately, outside the worker's schedule.

pub mod alert_sink;
pub mod config;
pub mod consumer_worker;
pub mod data_objects;
pub mod errors;
pub mod poll_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
