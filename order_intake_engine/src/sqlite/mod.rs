//! SQLite-backed work queue and document store for local and single-node deployments.

pub mod db;
mod sqlite_impl;

pub use sqlite_impl::SqliteBackend;
