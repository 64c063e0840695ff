use crate::Timestamp;
use chrono::Utc;

pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Reads the host wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Always reports the same instant; used for replaying invocations
/// deterministically.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
