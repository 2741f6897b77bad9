//! Shared test helpers for `keyward-core` integration tests.
//!
//! These helpers provide in-memory store doubles with call accounting and
//! scripted failures so provisioning tests can focus on behaviour instead of
//! boilerplate.

#![allow(dead_code)]

pub mod stores;

use keyward_domain::ClusterId;

pub const CLUSTER_NAME: &str = "local-cluster";
pub const POLICY_NAME: &str = "test-policy";
pub const SECRET_NAME: &str = "policy-encryption-key";

pub fn cluster() -> ClusterId {
    ClusterId::new(CLUSTER_NAME).unwrap()
}
