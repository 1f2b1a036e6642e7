use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SidecarKind;
use crate::errors::KernelError;
use crate::hashing::compute_version_content_hash;

/// Inputs for a new version, before an id is assigned.
#[derive(Debug, Clone, Copy)]
pub struct VersionDraft<'a> {
    pub unit_id: &'a str,
    /// Head of the unit at creation time. `None` for the first version.
    pub prev_version_id: Option<&'a str>,
    pub label: &'a str,
    pub content: &'a str,
    pub actor_id: &'a str,
    pub created_at_unix: i64,
}

/// One immutable entry in a unit's lineage.
///
/// Only the three sidecar hash fields change after persistence, each at most
/// once.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Version {
    pub id: String,
    pub unit_id: String,
    pub label: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_version_id: Option<String>,
    pub content_hash: String,
    pub created_at_unix: i64,
    pub actor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claim_set_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty_hash: Option<String>,
}

impl Version {
    /// Build a validated version and compute its content hash.
    ///
    /// Label and content are trimmed before hashing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidVersionLabel` or `EmptyContent` when the trimmed value
    /// is empty.
    pub fn new(id: impl Into<String>, draft: VersionDraft<'_>) -> Result<Self, KernelError> {
        let label = draft.label.trim();
        let content = draft.content.trim();
        if label.is_empty() {
            return Err(KernelError::InvalidVersionLabel);
        }
        if content.is_empty() {
            return Err(KernelError::EmptyContent);
        }
        let prev = draft.prev_version_id.filter(|p| !p.is_empty());
        let content_hash =
            compute_version_content_hash(draft.unit_id, prev.unwrap_or_default(), label, content);

        Ok(Self {
            id: id.into(),
            unit_id: draft.unit_id.to_owned(),
            label: label.to_owned(),
            content: content.to_owned(),
            prev_version_id: prev.map(str::to_owned),
            content_hash,
            created_at_unix: draft.created_at_unix,
            actor_id: draft.actor_id.to_owned(),
            meaning_hash: None,
            claim_set_hash: None,
            uncertainty_hash: None,
        })
    }

    /// Previous version id, or `""` for the first version.
    #[must_use]
    pub fn prev(&self) -> &str {
        self.prev_version_id.as_deref().unwrap_or_default()
    }

    /// Hash of the attached sidecar of `kind`, if any.
    #[must_use]
    pub fn sidecar_hash(&self, kind: SidecarKind) -> Option<&str> {
        let hash = match kind {
            SidecarKind::Meaning => self.meaning_hash.as_deref(),
            SidecarKind::ClaimSet => self.claim_set_hash.as_deref(),
            SidecarKind::Uncertainty => self.uncertainty_hash.as_deref(),
        };
        hash.filter(|h| !h.is_empty())
    }

    /// Record the hash of a newly attached sidecar.
    pub fn set_sidecar_hash(&mut self, kind: SidecarKind, hash: impl Into<String>) {
        let slot = match kind {
            SidecarKind::Meaning => &mut self.meaning_hash,
            SidecarKind::ClaimSet => &mut self.claim_set_hash,
            SidecarKind::Uncertainty => &mut self.uncertainty_hash,
        };
        *slot = Some(hash.into());
    }
}
