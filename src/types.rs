use crate::state::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wall-clock instant, second resolution for ambient transaction timestamps
pub type Timestamp = DateTime<Utc>;

/// Reputation record of a participating node
///
/// JSON field tags match the records written by the earlier Fabric contract.
/// Only the encoding is shared: records now live under a prefixed key, so
/// records stored under the bare node id are not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Reputation")]
    pub reputation: u64,
}

impl Node {
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Candidate ledger write, canonical reputation-gated form
///
/// Arguments stay as received; parsing happens stage by stage in the
/// validator so rejections surface in the documented order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub key: String,
    pub value: String,
    pub claimed_reputation: String,
    pub node_id: String,
}

impl TransactionRequest {
    pub const ARITY: usize = 4;

    pub fn from_args(args: &[String]) -> Result<Self, ValidationError> {
        match args {
            [key, value, claimed_reputation, node_id] => Ok(Self {
                key: key.clone(),
                value: value.clone(),
                claimed_reputation: claimed_reputation.clone(),
                node_id: node_id.clone(),
            }),
            _ => Err(ValidationError::InvalidArgumentCount {
                expected: Self::ARITY,
                got: args.len(),
            }),
        }
    }
}

/// Degraded write without reputation context (key, value only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncheckedTransactionRequest {
    pub key: String,
    pub value: String,
}

impl UncheckedTransactionRequest {
    pub const ARITY: usize = 2;

    pub fn from_args(args: &[String]) -> Result<Self, ValidationError> {
        match args {
            [key, value] => Ok(Self {
                key: key.clone(),
                value: value.clone(),
            }),
            _ => Err(ValidationError::InvalidArgumentCount {
                expected: Self::ARITY,
                got: args.len(),
            }),
        }
    }
}

/// Registrar input (node id, reputation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReputationUpdate {
    pub node_id: String,
    pub reputation: String,
}

impl ReputationUpdate {
    pub const ARITY: usize = 2;

    pub fn from_args(args: &[String]) -> Result<Self, ValidationError> {
        match args {
            [node_id, reputation] => Ok(Self {
                node_id: node_id.clone(),
                reputation: reputation.clone(),
            }),
            _ => Err(ValidationError::InvalidArgumentCount {
                expected: Self::ARITY,
                got: args.len(),
            }),
        }
    }
}

/// A write that passed every check and is ready to be persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerWrite {
    pub key: String,
    pub value: u64,
}

/// Parses a decimal argument that must be a non-negative integer.
///
/// Accepts an optional sign, so `"+7"` and `"-0"` are both valid.
pub fn parse_non_negative(arg: &str) -> Option<u64> {
    arg.parse::<i64>()
        .ok()
        .and_then(|v| u64::try_from(v).ok())
}

/// Progress of a single request through the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Received,
    FreshnessChecked,
    ReputationChecked,
    ValueChecked,
    Applied,
}

/// Transport-neutral tag for a rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidArgumentCount,
    InvalidReputationValue,
    InvalidReputationArgument,
    InvalidValueArgument,
    InvalidKeyArgument,
    TimestampUnavailable,
    StaleTransaction,
    FutureTransaction,
    ReputationExceeded,
    UnregisteredNode,
    LookupFailure,
    MalformedNodeRecord,
    PersistenceFailure,
    UnknownFunction,
    FunctionDisabled,
}

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("incorrect number of arguments: expecting {expected}, got {got}")]
    InvalidArgumentCount { expected: usize, got: usize },

    #[error("invalid reputation value {0:?}: value should be a non-negative integer")]
    InvalidReputationValue(String),

    #[error("invalid transaction reputation argument {0:?}")]
    InvalidReputationArgument(String),

    #[error("invalid value {0:?}: value should be a non-negative integer")]
    InvalidValueArgument(String),

    #[error("invalid key {key:?}: {reason}")]
    InvalidKeyArgument { key: String, reason: &'static str },

    #[error("error getting transaction timestamp")]
    TimestampUnavailable,

    #[error("transaction is too old: {age_secs}s exceeds freshness window of {window_secs}s")]
    StaleTransaction { age_secs: i64, window_secs: i64 },

    #[error("transaction timestamp is {ahead_secs}s ahead, allowed skew is {skew_secs}s")]
    FutureTransaction { ahead_secs: i64, skew_secs: i64 },

    #[error("claimed reputation {claimed} exceeds registered reputation {registered} of node {node_id}")]
    ReputationExceeded {
        node_id: String,
        claimed: u64,
        registered: u64,
    },

    #[error("node {0} is not registered")]
    UnregisteredNode(String),

    #[error("failed to get node reputation: {0}")]
    LookupFailure(#[source] StoreError),

    #[error("failed to unmarshal node: {0}")]
    MalformedNodeRecord(#[source] serde_json::Error),

    #[error("failed to update state: {0}")]
    PersistenceFailure(#[source] StoreError),

    #[error("invalid function name {0:?}")]
    UnknownFunction(String),

    #[error("function {0} is disabled on this validator")]
    FunctionDisabled(String),
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgumentCount { .. } => ErrorKind::InvalidArgumentCount,
            Self::InvalidReputationValue(_) => ErrorKind::InvalidReputationValue,
            Self::InvalidReputationArgument(_) => ErrorKind::InvalidReputationArgument,
            Self::InvalidValueArgument(_) => ErrorKind::InvalidValueArgument,
            Self::InvalidKeyArgument { .. } => ErrorKind::InvalidKeyArgument,
            Self::TimestampUnavailable => ErrorKind::TimestampUnavailable,
            Self::StaleTransaction { .. } => ErrorKind::StaleTransaction,
            Self::FutureTransaction { .. } => ErrorKind::FutureTransaction,
            Self::ReputationExceeded { .. } => ErrorKind::ReputationExceeded,
            Self::UnregisteredNode(_) => ErrorKind::UnregisteredNode,
            Self::LookupFailure(_) => ErrorKind::LookupFailure,
            Self::MalformedNodeRecord(_) => ErrorKind::MalformedNodeRecord,
            Self::PersistenceFailure(_) => ErrorKind::PersistenceFailure,
            Self::UnknownFunction(_) => ErrorKind::UnknownFunction,
            Self::FunctionDisabled(_) => ErrorKind::FunctionDisabled,
        }
    }

    /// Last stage the request completed before it was rejected
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidArgumentCount { .. }
            | Self::TimestampUnavailable
            | Self::StaleTransaction { .. }
            | Self::FutureTransaction { .. }
            | Self::UnknownFunction(_)
            | Self::FunctionDisabled(_)
            | Self::InvalidReputationValue(_) => Stage::Received,
            Self::InvalidReputationArgument(_)
            | Self::ReputationExceeded { .. }
            | Self::UnregisteredNode(_)
            | Self::LookupFailure(_)
            | Self::MalformedNodeRecord(_) => Stage::FreshnessChecked,
            Self::InvalidValueArgument(_) | Self::InvalidKeyArgument { .. } => {
                Stage::ReputationChecked
            }
            Self::PersistenceFailure(_) => Stage::ValueChecked,
        }
    }
}

/// Outcome of one invocation, returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub function: String,
    pub status: ReceiptStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptStatus {
    Applied,
    Rejected {
        kind: ErrorKind,
        stage: Stage,
        reason: String,
    },
}

impl Receipt {
    pub fn new(
        function: &str,
        result: &Result<Option<String>, ValidationError>,
        now: Timestamp,
    ) -> Self {
        let (status, payload) = match result {
            Ok(payload) => (ReceiptStatus::Applied, payload.clone()),
            Err(e) => (
                ReceiptStatus::Rejected {
                    kind: e.kind(),
                    stage: e.stage(),
                    reason: e.to_string(),
                },
                None,
            ),
        };
        Self {
            function: function.to_string(),
            status,
            payload,
            timestamp: now.timestamp(),
        }
    }

    pub fn is_applied(&self) -> bool {
        self.status == ReceiptStatus::Applied
    }
}
