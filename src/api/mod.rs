//! API Module
//!
//! This module handles the JSON-RPC API in front of the contract.
//! It provides the HTTP endpoint clients use to register reputations,
//! submit transactions and query the ledger.

mod server;


pub use server::Server;
