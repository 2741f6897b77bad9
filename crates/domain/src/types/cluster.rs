//! Managed cluster identity

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{KeywardError, Result};

/// Stable name of a managed cluster
///
/// Doubles as the namespace under which the cluster's key record is
/// persisted, so an empty identifier is rejected at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClusterId(String);

impl ClusterId {
    /// Create a cluster identifier
    ///
    /// # Errors
    /// Returns `KeywardError::InvalidInput` when the name is empty or only
    /// whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(KeywardError::InvalidInput("cluster identifier must not be empty".into()));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace holding this cluster's key record.
    pub fn namespace(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClusterId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClusterId {
    type Err = KeywardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClusterId {
    type Error = KeywardError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ClusterId {
    type Error = KeywardError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ClusterId> for String {
    fn from(value: ClusterId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_id_is_its_own_namespace() {
        let cluster = ClusterId::new("local-cluster").unwrap();
        assert_eq!(cluster.as_str(), "local-cluster");
        assert_eq!(cluster.namespace(), "local-cluster");
        assert_eq!(cluster.to_string(), "local-cluster");
    }

    #[test]
    fn test_empty_cluster_id_rejected() {
        assert!(matches!(ClusterId::new(""), Err(KeywardError::InvalidInput(_))));
        assert!(matches!("   ".parse::<ClusterId>(), Err(KeywardError::InvalidInput(_))));
    }

    #[test]
    fn test_serde_validates_on_deserialize() {
        let cluster: ClusterId = serde_json::from_str("\"managed-1\"").unwrap();
        assert_eq!(cluster.as_str(), "managed-1");
        assert_eq!(serde_json::to_string(&cluster).unwrap(), "\"managed-1\"");
        assert!(serde_json::from_str::<ClusterId>("\"\"").is_err());
    }
}
