use crate::{Timestamp, ValidationError};
use chrono::DateTime;

/// A single call handed over by the dispatcher collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub function: String,
    pub args: Vec<String>,
    /// Ambient transaction timestamp in Unix seconds, if one was assigned
    pub tx_timestamp: Option<i64>,
}

impl Invocation {
    pub fn new(function: impl Into<String>, args: &[&str], tx_timestamp: Option<i64>) -> Self {
        Self {
            function: function.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            tx_timestamp,
        }
    }

    pub fn transaction_timestamp(&self) -> Result<Timestamp, ValidationError> {
        self.tx_timestamp
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or(ValidationError::TimestampUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_timestamp() {
        let inv = Invocation::new("submitTransaction", &[], Some(1_700_000_000));
        assert_eq!(inv.transaction_timestamp().unwrap().timestamp(), 1_700_000_000);

        let missing = Invocation::new("submitTransaction", &[], None);
        assert!(matches!(
            missing.transaction_timestamp(),
            Err(ValidationError::TimestampUnavailable)
        ));

        let out_of_range = Invocation::new("submitTransaction", &[], Some(i64::MAX));
        assert!(out_of_range.transaction_timestamp().is_err());
    }
}
