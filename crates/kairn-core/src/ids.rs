//! ID prefixes and random ID generation.
//!
//! IDs have the form `{prefix}_{32 hex chars}`: sixteen bytes from the
//! operating system random source, hex-encoded. Generation holds no shared
//! state, so it is safe to call from any thread.

use crate::errors::StorageError;

pub const PREFIX_UNIT: &str = "unit";
pub const PREFIX_VERSION: &str = "ver";
pub const PREFIX_EVENT: &str = "evt";

const ID_BYTES: usize = 16;

/// Generate a fresh ID with the given prefix.
///
/// # Errors
///
/// Returns `StorageError::Entropy` if the operating system random source fails.
pub fn new_id(prefix: &str) -> Result<String, StorageError> {
    let mut bytes = [0u8; ID_BYTES];
    getrandom::fill(&mut bytes).map_err(|e| StorageError::Entropy(e.to_string()))?;
    Ok(format!("{prefix}_{}", hex::encode(bytes)))
}
