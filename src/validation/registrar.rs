use super::KeyNamespace;
use crate::{
    Node, ReputationUpdate, ValidationError, parse_non_negative,
    state::{StateStore, StoreError},
};
use tracing::{debug, info, warn};

/// Creates and overwrites node reputation records.
///
/// Holds no state; every call goes through the store it is handed.
#[derive(Debug, Clone, Default)]
pub struct Registrar {
    namespace: KeyNamespace,
}

impl Registrar {
    pub fn new(namespace: KeyNamespace) -> Self {
        Self { namespace }
    }

    pub fn namespace(&self) -> &KeyNamespace {
        &self.namespace
    }

    /// Register or replace the reputation of a node (last write wins)
    pub async fn set_reputation(
        &self,
        store: &dyn StateStore,
        update: &ReputationUpdate,
    ) -> Result<Node, ValidationError> {
        let reputation = parse_non_negative(&update.reputation).ok_or_else(|| {
            warn!("Rejected reputation value {:?} for {}", update.reputation, update.node_id);
            ValidationError::InvalidReputationValue(update.reputation.clone())
        })?;
        let key = self.namespace.node_key(&update.node_id)?;

        let node = Node {
            id: update.node_id.clone(),
            reputation,
        };
        let bytes = node.to_bytes().map_err(|e| {
            ValidationError::PersistenceFailure(StoreError::Encoding(e.to_string()))
        })?;

        store
            .put(&key, bytes)
            .await
            .map_err(ValidationError::PersistenceFailure)?;

        info!("Node {} reputation set to {}", node.id, node.reputation);
        Ok(node)
    }

    /// Read the registered record of a node
    pub async fn lookup(
        &self,
        store: &dyn StateStore,
        node_id: &str,
    ) -> Result<Node, ValidationError> {
        let key = self.namespace.node_key(node_id)?;
        let bytes = store
            .get(&key)
            .await
            .map_err(ValidationError::LookupFailure)?
            .ok_or_else(|| ValidationError::UnregisteredNode(node_id.to_string()))?;

        let node = Node::from_bytes(&bytes).map_err(ValidationError::MalformedNodeRecord)?;
        debug!("Node {} has registered reputation {}", node.id, node.reputation);
        Ok(node)
    }
}
