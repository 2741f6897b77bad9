//! # Keyward Domain
//!
//! Domain types for per-cluster policy encryption key custody.
//!
//! This crate contains:
//! - Cluster identity and persisted key record types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (record names, annotation keys)
//!
//! ## Architecture
//! - No dependencies on other Keyward crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use constants::*;
pub use errors::*;
pub use types::*;
