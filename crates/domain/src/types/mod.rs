//! Domain types and models

pub mod cluster;
pub mod record;

use std::collections::BTreeMap;

pub use cluster::ClusterId;
pub use record::{PersistedKeyRecord, RecordId};

/// Caller-owned document metadata (annotations) carrying the pinned IV
pub type Annotations = BTreeMap<String, String>;
