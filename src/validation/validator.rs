use super::{FreshnessPolicy, Registrar};
use crate::{
    LedgerWrite, Stage, Timestamp, TransactionRequest, UncheckedTransactionRequest,
    ValidationError, parse_non_negative, state::StateStore,
};
use tracing::{debug, info, warn};

/// Reputation claimed by the submitting node
#[derive(Debug, Clone, Copy)]
struct Claim<'r> {
    reputation: &'r str,
    node_id: &'r str,
}

/// Validates candidate ledger writes and applies the ones that pass.
///
/// Checks run in a fixed order and the write is the very last step, so a
/// rejected request never leaves partial state behind.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    registrar: Registrar,
    freshness: FreshnessPolicy,
}

impl Validator {
    pub fn new(registrar: Registrar, freshness: FreshnessPolicy) -> Self {
        Self {
            registrar,
            freshness,
        }
    }

    pub fn registrar(&self) -> &Registrar {
        &self.registrar
    }

    /// Validate and apply a reputation-gated write
    ///
    /// # Stages
    /// 1. Freshness: `tx_time` must be within the window of `now`
    /// 2. Reputation bound: the claim may not exceed the node's registered reputation
    /// 3. Value: key must be a ledger key, value a non-negative integer
    /// 4. Apply: persist the decimal value under the key
    pub async fn submit(
        &self,
        store: &dyn StateStore,
        request: &TransactionRequest,
        tx_time: Timestamp,
        now: Timestamp,
    ) -> Result<LedgerWrite, ValidationError> {
        debug!("Validating transaction for key {:?} from {}", request.key, request.node_id);

        let claim = Claim {
            reputation: &request.claimed_reputation,
            node_id: &request.node_id,
        };
        self.process(store, &request.key, &request.value, Some(claim), tx_time, now)
            .await
    }

    /// Validate and apply a write without any reputation context.
    ///
    /// Degraded mode: only freshness and value are checked.
    pub async fn submit_unchecked(
        &self,
        store: &dyn StateStore,
        request: &UncheckedTransactionRequest,
        tx_time: Timestamp,
        now: Timestamp,
    ) -> Result<LedgerWrite, ValidationError> {
        debug!("Validating unchecked transaction for key {:?}", request.key);

        self.process(store, &request.key, &request.value, None, tx_time, now)
            .await
    }

    async fn process(
        &self,
        store: &dyn StateStore,
        key: &str,
        value: &str,
        claim: Option<Claim<'_>>,
        tx_time: Timestamp,
        now: Timestamp,
    ) -> Result<LedgerWrite, ValidationError> {
        let result = self.validate_and_apply(store, key, value, claim, tx_time, now).await;

        match &result {
            Ok(write) => info!(stage = ?Stage::Applied, "Applied {} = {}", write.key, write.value),
            Err(e) => warn!(stage = ?e.stage(), "Transaction for key {:?} rejected: {}", key, e),
        }
        result
    }

    async fn validate_and_apply(
        &self,
        store: &dyn StateStore,
        key: &str,
        value: &str,
        claim: Option<Claim<'_>>,
        tx_time: Timestamp,
        now: Timestamp,
    ) -> Result<LedgerWrite, ValidationError> {
        self.freshness.check(tx_time, now)?;
        debug!(stage = ?Stage::FreshnessChecked);

        if let Some(claim) = claim {
            self.check_reputation(store, claim.reputation, claim.node_id).await?;
        }
        debug!(stage = ?Stage::ReputationChecked);

        let write = self.check_write(key, value)?;
        debug!(stage = ?Stage::ValueChecked);

        self.apply(store, &write).await?;
        Ok(write)
    }

    /// Bound the claimed reputation by the registry
    async fn check_reputation(
        &self,
        store: &dyn StateStore,
        claimed: &str,
        node_id: &str,
    ) -> Result<(), ValidationError> {
        let claimed = parse_non_negative(claimed)
            .ok_or_else(|| ValidationError::InvalidReputationArgument(claimed.to_string()))?;

        let node = self.registrar.lookup(store, node_id).await?;
        if claimed > node.reputation {
            return Err(ValidationError::ReputationExceeded {
                node_id: node.id,
                claimed,
                registered: node.reputation,
            });
        }

        Ok(())
    }

    fn check_write(&self, key: &str, value: &str) -> Result<LedgerWrite, ValidationError> {
        let value = parse_non_negative(value)
            .ok_or_else(|| ValidationError::InvalidValueArgument(value.to_string()))?;
        self.registrar.namespace().check_ledger_key(key)?;

        Ok(LedgerWrite {
            key: key.to_string(),
            value,
        })
    }

    async fn apply(&self, store: &dyn StateStore, write: &LedgerWrite) -> Result<(), ValidationError> {
        store
            .put(&write.key, write.value.to_string().into_bytes())
            .await
            .map_err(ValidationError::PersistenceFailure)
    }
}
