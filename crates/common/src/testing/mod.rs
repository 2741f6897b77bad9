//! Testing utilities and helpers
//!
//! - **[`mocks`]**: Entropy sources with scripted behaviour
//!
//! ## Usage
//!
//! ```rust
//! use keyward_common::testing::{FailingEntropy, SequentialEntropy};
//! use keyward_common::{EncryptionKey, InitializationVector};
//!
//! let iv = InitializationVector::generate(&SequentialEntropy::new()).unwrap();
//! assert_eq!(iv.as_bytes()[0], 0);
//!
//! assert!(EncryptionKey::generate(&FailingEntropy::new()).is_err());
//! ```

pub mod mocks;

pub use mocks::{FailingEntropy, SequentialEntropy};
