//! Initialization vector pinning
//!
//! An IV is generated once per (policy, cluster) pair and stored as base64 in
//! the document's own metadata. Re-encrypting the same plaintext with the same
//! key and the pinned IV then reproduces the same ciphertext.

pub mod manager;

pub use manager::{InitializationVectorManager, IvResolution};
