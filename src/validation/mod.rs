//! Transaction Validation Module
//!
//! This module validates ledger writes before they are applied.
//! Performs freshness checking, reputation-bound checking against the node
//! registry, and value validation, then applies the write.
//!
//! The registrar is the leaf: the validator reads what it wrote, never the
//! other way round.

mod freshness;
mod keys;
mod registrar;
mod validator;


pub use freshness::FreshnessPolicy;
pub use keys::KeyNamespace;
pub use registrar::Registrar;
pub use validator::Validator;
