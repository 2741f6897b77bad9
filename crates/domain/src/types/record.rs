//! Persisted key record
//!
//! The durable, store-backed representation of a cluster's key. Shaped like a
//! namespaced secret object: an identity plus a map of named binary fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ClusterId;

/// Identity of a record inside a namespaced object store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId {
    pub namespace: String,
    pub name: String,
}

impl RecordId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), name: name.into() }
    }

    /// Location of the key record for `cluster`.
    pub fn for_cluster(cluster: &ClusterId, name: impl Into<String>) -> Self {
        Self::new(cluster.namespace(), name)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Named object holding a cluster's raw key bytes
///
/// Created at most once per cluster and never mutated afterwards. Binary
/// field values serialize as standard base64 strings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedKeyRecord {
    pub namespace: String,
    pub name: String,
    #[serde(default, with = "base64_data")]
    pub data: BTreeMap<String, Vec<u8>>,
}

impl PersistedKeyRecord {
    /// Create an empty record at `id`.
    pub fn new(id: RecordId) -> Self {
        Self { namespace: id.namespace, name: id.name, data: BTreeMap::new() }
    }

    /// Add a binary field (builder style).
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    pub fn id(&self) -> RecordId {
        RecordId::new(self.namespace.clone(), self.name.clone())
    }

    /// Raw bytes of `field`, if present.
    pub fn field(&self, field: &str) -> Option<&[u8]> {
        self.data.get(field).map(Vec::as_slice)
    }
}

impl fmt::Debug for PersistedKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lengths: BTreeMap<&str, usize> =
            self.data.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        f.debug_struct("PersistedKeyRecord")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("data_lengths", &lengths)
            .finish()
    }
}

mod base64_data {
    use std::collections::BTreeMap;

    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(data: &BTreeMap<String, Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(data.len()))?;
        for (field, value) in data {
            map.serialize_entry(field, &BASE64.encode(value))?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = BTreeMap::<String, String>::deserialize(deserializer)?;
        encoded
            .into_iter()
            .map(|(field, value)| {
                BASE64
                    .decode(value.as_bytes())
                    .map(|bytes| (field, bytes))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
