use crate::{
    ReputationUpdate, Timestamp, TransactionRequest, UncheckedTransactionRequest,
    ValidationError,
    config::ValidationConfig,
    context::Invocation,
    state::{StateStore, StoreError},
    validation::{Registrar, Validator},
};
use tracing::{debug, info};

/// Function names accepted by [`Contract::invoke`]
pub mod functions {
    pub const SUBMIT_TRANSACTION: &str = "submitTransaction";
    pub const SUBMIT_UNCHECKED_TRANSACTION: &str = "submitUncheckedTransaction";
    pub const UPDATE_NODE_REPUTATION: &str = "updateNodeReputation";
    pub const SET_REPUTATION: &str = "setReputation";
    pub const GET_STATE: &str = "getState";
    pub const GET_NODE_REPUTATION: &str = "getNodeReputation";
}

/// Stateless contract front: all ledger state comes in through the store
/// handed to each call.
#[derive(Debug, Clone)]
pub struct Contract {
    validator: Validator,
    allow_unchecked_submit: bool,
    legacy_two_arg_submit: bool,
}

impl Contract {
    pub fn new(config: &ValidationConfig) -> Self {
        let registrar = Registrar::new(config.key_namespace());
        Self {
            validator: Validator::new(registrar, config.freshness_policy()),
            allow_unchecked_submit: config.allow_unchecked_submit,
            legacy_two_arg_submit: config.legacy_two_arg_submit,
        }
    }

    /// Deployment hook, no side effects
    pub fn init(&self) -> Result<(), ValidationError> {
        info!("Contract initialized");
        Ok(())
    }

    /// Route an invocation to its handler
    ///
    /// # Returns
    /// * `Ok(Some(payload))` for queries that found something
    /// * `Ok(None)` for applied writes and empty queries
    /// * `Err` with the rejection reason otherwise
    pub async fn invoke(
        &self,
        store: &dyn StateStore,
        invocation: &Invocation,
        now: Timestamp,
    ) -> Result<Option<String>, ValidationError> {
        use self::functions::*;

        debug!("Invoking {} with {} args", invocation.function, invocation.args.len());
        let args = &invocation.args;

        match invocation.function.as_str() {
            SUBMIT_TRANSACTION
                if self.legacy_two_arg_submit && args.len() == UncheckedTransactionRequest::ARITY =>
            {
                self.submit_unchecked(store, invocation, now).await
            }
            SUBMIT_TRANSACTION => {
                let request = TransactionRequest::from_args(args)?;
                let tx_time = invocation.transaction_timestamp()?;
                self.validator.submit(store, &request, tx_time, now).await?;
                Ok(None)
            }
            SUBMIT_UNCHECKED_TRANSACTION => self.submit_unchecked(store, invocation, now).await,
            UPDATE_NODE_REPUTATION | SET_REPUTATION => {
                let update = ReputationUpdate::from_args(args)?;
                self.validator.registrar().set_reputation(store, &update).await?;
                Ok(None)
            }
            GET_STATE => {
                let key = single_arg(args)?;
                self.validator.registrar().namespace().check_ledger_key(key)?;
                let bytes = store.get(key).await.map_err(ValidationError::LookupFailure)?;
                bytes
                    .map(|b| {
                        String::from_utf8(b).map_err(|e| {
                            ValidationError::LookupFailure(StoreError::Encoding(e.to_string()))
                        })
                    })
                    .transpose()
            }
            GET_NODE_REPUTATION => {
                let node_id = single_arg(args)?;
                let node = self.validator.registrar().lookup(store, node_id).await?;
                let json = serde_json::to_string(&node).map_err(|e| {
                    ValidationError::LookupFailure(StoreError::Encoding(e.to_string()))
                })?;
                Ok(Some(json))
            }
            other => Err(ValidationError::UnknownFunction(other.to_string())),
        }
    }

    async fn submit_unchecked(
        &self,
        store: &dyn StateStore,
        invocation: &Invocation,
        now: Timestamp,
    ) -> Result<Option<String>, ValidationError> {
        // Applies to the legacy two-argument overload as well
        if !self.allow_unchecked_submit {
            return Err(ValidationError::FunctionDisabled(invocation.function.clone()));
        }
        let request = UncheckedTransactionRequest::from_args(&invocation.args)?;
        let tx_time = invocation.transaction_timestamp()?;
        self.validator
            .submit_unchecked(store, &request, tx_time, now)
            .await?;
        Ok(None)
    }
}

fn single_arg(args: &[String]) -> Result<&str, ValidationError> {
    match args {
        [arg] => Ok(arg.as_str()),
        _ => Err(ValidationError::InvalidArgumentCount {
            expected: 1,
            got: args.len(),
        }),
    }
}
