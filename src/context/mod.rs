//! Execution Context Module
//!
//! Supplies the two notions of time the validator compares:
//! - the ambient transaction timestamp assigned by the ordering service
//! - the validator's own wall clock

mod clock;
mod invocation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use invocation::Invocation;
