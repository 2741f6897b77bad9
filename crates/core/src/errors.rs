//! Conversions from key material errors into domain errors.

use keyward_common::KeyMaterialError;
use keyward_domain::KeywardError;

/// Map a key material failure raised while generating new material.
///
/// Entropy exhaustion keeps its own variant so callers never mistake it for a
/// store problem; any other material error here is a programming error.
pub(crate) fn from_material(err: KeyMaterialError) -> KeywardError {
    match err {
        KeyMaterialError::EntropyUnavailable(message) => KeywardError::Entropy(message),
        other => KeywardError::Internal(other.to_string()),
    }
}
