//! Conversions from external infrastructure errors into store errors.

use std::io::{Error as IoError, ErrorKind};

use keyward_domain::{RecordId, StoreError};
use serde_json::Error as JsonError;

/// Maps an infrastructure failure to the store error for one record.
///
/// The record identity is needed because `NotFound` and `AlreadyExists`
/// carry it.
pub trait IntoStoreError {
    fn into_store_error(self, id: &RecordId) -> StoreError;
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → StoreError */
/* -------------------------------------------------------------------------- */

impl IntoStoreError for IoError {
    fn into_store_error(self, id: &RecordId) -> StoreError {
        match self.kind() {
            ErrorKind::NotFound => StoreError::not_found(&id.namespace, &id.name),
            ErrorKind::AlreadyExists => StoreError::already_exists(&id.namespace, &id.name),
            ErrorKind::PermissionDenied => {
                StoreError::permission_denied(format!("{id}: {self}"))
            }
            ErrorKind::TimedOut
            | ErrorKind::Interrupted
            | ErrorKind::WouldBlock
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted => StoreError::unavailable(format!("{id}: {self}")),
            _ => StoreError::backend(format!("{id}: {self}")),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → StoreError */
/* -------------------------------------------------------------------------- */

impl IntoStoreError for JsonError {
    fn into_store_error(self, id: &RecordId) -> StoreError {
        if self.is_io() {
            return StoreError::unavailable(format!("{id}: {self}"));
        }
        StoreError::backend(format!("corrupt key record {id}: {self}"))
    }
}

#[cfg(test)]
mod tests {
    use keyward_domain::KeywardError;

    use super::*;

    fn id() -> RecordId {
        RecordId::new("local-cluster", "policy-encryption-key")
    }

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = IoError::from(ErrorKind::NotFound).into_store_error(&id());
        assert_eq!(err, StoreError::not_found("local-cluster", "policy-encryption-key"));
    }

    #[test]
    fn io_already_exists_maps_to_already_exists() {
        let err = IoError::from(ErrorKind::AlreadyExists).into_store_error(&id());
        assert!(err.is_already_exists());
    }

    #[test]
    fn io_permission_denied_keeps_record_in_message() {
        let err = IoError::from(ErrorKind::PermissionDenied).into_store_error(&id());
        match err {
            StoreError::PermissionDenied { message } => {
                assert!(message.contains("local-cluster/policy-encryption-key"));
            }
            other => panic!("unexpected mapping: {other:?}"),
        }
    }

    #[test]
    fn io_interrupted_is_retryable() {
        let err = IoError::from(ErrorKind::Interrupted).into_store_error(&id());
        assert!(KeywardError::from(err).is_retryable());
    }

    #[test]
    fn json_syntax_error_maps_to_backend() {
        let parse = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let err = parse.into_store_error(&id());
        assert!(matches!(err, StoreError::Backend { .. }));
        assert!(err.to_string().contains("corrupt key record"));
    }
}
