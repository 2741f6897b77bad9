//! Security primitives
//!
//! Key custody building blocks: fixed-size key material, the entropy source
//! it is drawn from, and the in-process key cache.

pub mod encryption;
