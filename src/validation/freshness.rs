use crate::{Timestamp, ValidationError};
use chrono::Duration;

/// Bounds how far an ambient transaction timestamp may drift from the
/// validator's clock. Limits the replay window for backdated or queued
/// transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshnessPolicy {
    pub window: Duration,
    pub max_future_skew: Duration,
}

impl FreshnessPolicy {
    pub fn new(window: Duration, max_future_skew: Duration) -> Self {
        Self {
            window,
            max_future_skew,
        }
    }

    /// An age equal to the window is still fresh.
    pub fn check(&self, tx_time: Timestamp, now: Timestamp) -> Result<(), ValidationError> {
        let age = now - tx_time;
        if age > self.window {
            return Err(ValidationError::StaleTransaction {
                age_secs: age.num_seconds(),
                window_secs: self.window.num_seconds(),
            });
        }

        let ahead = tx_time - now;
        if ahead > self.max_future_skew {
            return Err(ValidationError::FutureTransaction {
                ahead_secs: ahead.num_seconds(),
                skew_secs: self.max_future_skew.num_seconds(),
            });
        }

        Ok(())
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(Duration::minutes(1), Duration::minutes(1))
    }
}
