//! Audit verification and journal tail settings.

use serde::{Deserialize, Serialize};

/// Default number of events shown by `krn audit tail`.
const fn default_tail_limit() -> usize {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Rehash stored sidecars and compare version content hashes on every
    /// `krn audit verify`, as if `--strict` were given.
    #[serde(default)]
    pub strict_hash: bool,

    #[serde(default = "default_tail_limit")]
    pub tail_limit: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            strict_hash: false,
            tail_limit: default_tail_limit(),
        }
    }
}
