use crate::ValidationError;

/// Separates node reputation records from ordinary ledger entries.
///
/// Node records live under `prefix + node_id`; ledger keys starting with the
/// prefix are refused so the two can never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNamespace {
    node_prefix: String,
}

impl KeyNamespace {
    pub fn new(node_prefix: impl Into<String>) -> Self {
        Self {
            node_prefix: node_prefix.into(),
        }
    }

    pub fn node_key(&self, node_id: &str) -> Result<String, ValidationError> {
        if node_id.is_empty() {
            return Err(ValidationError::InvalidKeyArgument {
                key: node_id.to_string(),
                reason: "node id must not be empty",
            });
        }
        Ok(format!("{}{}", self.node_prefix, node_id))
    }

    pub fn check_ledger_key(&self, key: &str) -> Result<(), ValidationError> {
        if key.is_empty() {
            return Err(ValidationError::InvalidKeyArgument {
                key: key.to_string(),
                reason: "key must not be empty",
            });
        }
        if key.starts_with(&self.node_prefix) {
            return Err(ValidationError::InvalidKeyArgument {
                key: key.to_string(),
                reason: "key is reserved for node reputation records",
            });
        }
        Ok(())
    }
}

impl Default for KeyNamespace {
    fn default() -> Self {
        Self::new("node~")
    }
}
