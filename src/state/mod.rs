//! State Management Module
//!
//! This module provides the key-value store the validator reads and writes.
//! Ledger entries and node reputation records share one store; keys are
//! namespaced by the validator, not here.
//! - `StateCache`: in-memory store, the default backend
//! - `SqliteStore`: durable store backed by SQLite

mod cache;
mod sqlite;
mod store;

pub use cache::StateCache;
pub use sqlite::SqliteStore;
pub use store::{StateStore, StoreError};
