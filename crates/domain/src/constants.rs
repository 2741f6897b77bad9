//! Domain constants
//!
//! Names shared by the provisioner, the store adapters and the metadata
//! boundary with the templating engine.

/// Name of the persisted key record inside each cluster namespace.
pub const DEFAULT_KEY_SECRET_NAME: &str = "policy-encryption-key";

/// Data field of the persisted record that holds the raw key bytes.
pub const KEY_DATA_FIELD: &str = "key";

/// Annotation carrying the base64 encoded initialization vector of a policy.
pub const IV_ANNOTATION: &str = "policy.open-cluster-management.io/encryption-iv";

// Store call bound applied when the caller supplies no configuration
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_LOG_FILTER: &str = "info";
