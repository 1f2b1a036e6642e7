//! Use case results returned by the kernel and rendered as JSON by `krn`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{AuditEvent, Unit, Version};
use crate::enums::SidecarKind;

/// Result of attaching a meaning, claim set, or uncertainty document.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SidecarSetResponse {
    pub unit_id: String,
    pub version_id: String,
    pub kind: SidecarKind,
    pub hash: String,
}

/// Read-only projection of a unit, regenerated on every export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitSnapshot {
    pub unit: Unit,
    pub versions: Vec<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit: Option<Vec<AuditEvent>>,
    pub snapshot_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_hash: Option<String>,
}

// ---------------------------------------------------------------------------
// Audit verification report
// ---------------------------------------------------------------------------

/// An expected journal event that was never appended.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MissingEvent {
    pub unit_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    pub event_type: String,
}

/// An event that appears more than once for the same target.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DuplicateEvent {
    pub event_type: String,
    pub target_id: String,
    pub count: usize,
}

/// Where a hash disagreement was found.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MismatchSource {
    /// The hash recorded in the journal event.
    Journal,
    /// The sidecar document currently stored, rehashed.
    Sidecar,
}

/// A stored hash that disagrees with the journal or the current sidecar.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HashMismatch {
    pub unit_id: String,
    pub version_id: String,
    pub event_type: String,
    /// Hash stored on the version.
    pub expected_hash: String,
    /// Hash found in the journal or computed from the sidecar. `None` when
    /// the event carried no hash or the sidecar is absent or unreadable.
    pub found_hash: Option<String>,
    pub source: MismatchSource,
}

/// Outcome of cross-checking the journal against the repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VerifyAuditReport {
    pub ok: bool,
    pub total_units: usize,
    pub total_versions: usize,
    pub missing: Vec<MissingEvent>,
    pub duplicates: Vec<DuplicateEvent>,
    pub hash_mismatches: Vec<HashMismatch>,
}

impl VerifyAuditReport {
    /// Set `ok` from the finding lists.
    pub fn finish(&mut self) {
        self.ok =
            self.missing.is_empty() && self.duplicates.is_empty() && self.hash_mismatches.is_empty();
    }
}
