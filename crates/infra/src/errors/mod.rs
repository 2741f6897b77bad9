//! Infrastructure error mapping

pub mod conversions;

pub use conversions::IntoStoreError;
