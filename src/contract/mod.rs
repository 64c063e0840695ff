//! Contract Module
//!
//! Demultiplexes an invocation (function name plus ordered string arguments)
//! to the registrar or the validator and returns the outcome.
//!
//! # Functions
//! - `submitTransaction`: reputation-gated write (key, value, claimedReputation, nodeId)
//! - `submitUncheckedTransaction`: degraded write without reputation context (key, value)
//! - `updateNodeReputation` / `setReputation`: register a node's reputation (nodeId, reputation)
//! - `getState`: read a ledger entry (key)
//! - `getNodeReputation`: read a node record (nodeId)

mod dispatcher;

#[cfg(test)]
mod tests;

pub use dispatcher::{Contract, functions};
