//! This crate implements a reputation-gated state-transition validator for a
//! shared key/value ledger. Writes are accepted only when freshly timestamped
//! and when the submitting node claims no more reputation than the registry
//! grants it.

pub mod types; // Node records, request shapes, errors and receipts.
pub mod state; // Key-value store trait with in-memory and SQLite backends.
pub mod context; // Ambient transaction timestamp and validator clock.
pub mod validation; // Reputation registrar and transaction validator.
pub mod contract; // Function-name dispatch onto the validation core.
pub mod api; // JSON-RPC front end.
pub mod config; // Defines and loads node configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use contract::Contract;
