//! Hash functions over versions, sidecar documents, snapshots, and audit
//! events.
//!
//! All digests are lowercase hex SHA-256. Structured documents are hashed
//! through [`crate::canonical`]; snapshots and audit trails are hashed over a
//! fixed line format so the construction can be checked by eye:
//!
//! ```text
//! UNIT|<id>|<key>|<title>|<description>|<head_version_id>
//! VER|<id>|<label>|<prev_version_id>|<content_hash>|<actor_id>|<created_at_unix>
//! AUD|<id>|<type>|<at_unix>|<actor_id>|<unit_id>|<version_id>|<canonical data>
//! ```
//!
//! Lines are joined with `\n` and terminated by a trailing `\n`. An empty
//! list hashes as a single `\n`.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical::{canonicalize, canonicalize_json_bytes, canonicalize_value};
use crate::entities::{AuditEvent, ClaimSet, Meaning, Uncertainty, Unit, Version};

/// Hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(bytes.as_ref()))
}

/// Content hash of a version: the four fields joined by `\n`.
#[must_use]
pub fn compute_version_content_hash(
    unit_id: &str,
    prev_version_id: &str,
    label: &str,
    content: &str,
) -> String {
    sha256_hex(format!("{unit_id}\n{prev_version_id}\n{label}\n{content}"))
}

/// Hash of any serializable document via its canonical encoding.
///
/// # Errors
///
/// Returns an error if the document cannot be represented as JSON.
pub fn compute_document_hash<T: Serialize + ?Sized>(doc: &T) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(canonicalize(doc)?))
}

/// Hash of raw JSON bytes via their canonical encoding. Whitespace and key
/// order do not affect the result.
///
/// # Errors
///
/// Returns an error if `bytes` is not valid JSON.
pub fn compute_json_hash(bytes: &[u8]) -> Result<String, serde_json::Error> {
    Ok(sha256_hex(canonicalize_json_bytes(bytes)?))
}

/// # Errors
///
/// Returns an error if the document cannot be represented as JSON.
pub fn compute_meaning_hash(meaning: &Meaning) -> Result<String, serde_json::Error> {
    compute_document_hash(meaning)
}

/// # Errors
///
/// Returns an error if the document cannot be represented as JSON.
pub fn compute_claim_set_hash(claim_set: &ClaimSet) -> Result<String, serde_json::Error> {
    compute_document_hash(claim_set)
}

/// # Errors
///
/// Returns an error if the document cannot be represented as JSON.
pub fn compute_uncertainty_hash(uncertainty: &Uncertainty) -> Result<String, serde_json::Error> {
    compute_document_hash(uncertainty)
}

// ---------------------------------------------------------------------------
// Snapshot and audit lines
// ---------------------------------------------------------------------------

#[must_use]
pub fn unit_line(unit: &Unit) -> String {
    format!(
        "UNIT|{}|{}|{}|{}|{}",
        unit.id,
        unit.key,
        unit.title,
        unit.description.as_deref().unwrap_or_default(),
        unit.head()
    )
}

#[must_use]
pub fn version_line(version: &Version) -> String {
    format!(
        "VER|{}|{}|{}|{}|{}|{}",
        version.id,
        version.label,
        version.prev(),
        version.content_hash,
        version.actor_id,
        version.created_at_unix
    )
}

#[must_use]
pub fn audit_line(event: &AuditEvent) -> String {
    format!(
        "AUD|{}|{}|{}|{}|{}|{}|{}",
        event.id,
        event.event_type(),
        event.at_unix,
        event.actor_id,
        event.unit_id.as_deref().unwrap_or_default(),
        event.version_id.as_deref().unwrap_or_default(),
        canonicalize_value(&event.payload.to_value())
    )
}

fn hash_lines<I>(lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut hasher = Sha256::new();
    let mut written = 0usize;
    for line in lines {
        if written > 0 {
            hasher.update(b"\n");
        }
        hasher.update(line.as_bytes());
        written += 1;
    }
    hasher.update(b"\n");
    hex::encode(hasher.finalize())
}

/// Hash of a unit and its versions, in the order given.
#[must_use]
pub fn compute_snapshot_hash(unit: &Unit, versions: &[Version]) -> String {
    hash_lines(std::iter::once(unit_line(unit)).chain(versions.iter().map(version_line)))
}

/// Hash of audit events, in the order given.
#[must_use]
pub fn compute_audit_hash(events: &[AuditEvent]) -> String {
    hash_lines(events.iter().map(audit_line))
}
