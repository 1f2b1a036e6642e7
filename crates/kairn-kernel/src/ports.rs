//! Collaborator contracts consumed by the kernel.
//!
//! Adapters implement these traits; use cases only ever see `dyn` ports.
//! Not-found cases on lookups are `Ok(None)`. On writes they are
//! `UnitNotFound` / `VersionNotFound`. Everything else is `Storage`.

use kairn_core::entities::{AuditEvent, ClaimSet, Meaning, Uncertainty, Unit, Version};
use kairn_core::errors::KernelError;

/// Persistent store for units, versions, and sidecar documents.
///
/// Implementations must return a unit's versions in creation order and must
/// never append audit events themselves.
pub trait UnitRepository: Send + Sync {
    fn exists_by_key(&self, key: &str) -> Result<bool, KernelError>;

    /// Insert or replace a unit by id.
    ///
    /// # Errors
    ///
    /// Returns `UnitAlreadyExists` if another unit already holds the key.
    fn save_unit(&self, unit: &Unit) -> Result<(), KernelError>;

    fn find_unit_by_key(&self, key: &str) -> Result<Option<Unit>, KernelError>;

    fn find_unit_by_id(&self, id: &str) -> Result<Option<Unit>, KernelError>;

    /// All units, in a stable order.
    fn list_units(&self) -> Result<Vec<Unit>, KernelError>;

    /// Append a version to its unit's list.
    ///
    /// # Errors
    ///
    /// Returns `UnitNotFound` if the owning unit does not exist.
    fn save_version(&self, version: &Version) -> Result<(), KernelError>;

    /// Append `version` and make it the head, in one exclusive step.
    ///
    /// The unit's head at the time of the write must equal
    /// `version.prev_version_id` (both absent for a first version).
    ///
    /// # Errors
    ///
    /// - `UnitNotFound` if the owning unit does not exist
    /// - `Conflict` if the head moved since `version` was drafted
    fn append_version(&self, version: &Version) -> Result<(), KernelError>;

    /// Versions of a unit, oldest first.
    fn list_versions_by_unit_id(&self, unit_id: &str) -> Result<Vec<Version>, KernelError>;

    /// # Errors
    ///
    /// Returns `UnitNotFound` if the unit does not exist.
    fn update_unit_head(&self, unit_id: &str, version_id: &str) -> Result<(), KernelError>;

    fn find_version_by_id(&self, id: &str) -> Result<Option<Version>, KernelError>;

    /// Store a meaning document and record its hash on the version.
    ///
    /// # Errors
    ///
    /// Returns `VersionNotFound` if the version does not exist.
    fn save_meaning(
        &self,
        unit_id: &str,
        version_id: &str,
        meaning: &Meaning,
        hash: &str,
    ) -> Result<(), KernelError>;

    fn load_meaning(&self, unit_id: &str, version_id: &str) -> Result<Option<Meaning>, KernelError>;

    /// # Errors
    ///
    /// Returns `VersionNotFound` if the version does not exist.
    fn save_claim_set(
        &self,
        unit_id: &str,
        version_id: &str,
        claim_set: &ClaimSet,
        hash: &str,
    ) -> Result<(), KernelError>;

    fn load_claim_set(
        &self,
        unit_id: &str,
        version_id: &str,
    ) -> Result<Option<ClaimSet>, KernelError>;

    /// # Errors
    ///
    /// Returns `VersionNotFound` if the version does not exist.
    fn save_uncertainty(
        &self,
        unit_id: &str,
        version_id: &str,
        uncertainty: &Uncertainty,
        hash: &str,
    ) -> Result<(), KernelError>;

    fn load_uncertainty(
        &self,
        unit_id: &str,
        version_id: &str,
    ) -> Result<Option<Uncertainty>, KernelError>;
}

/// Append-only audit journal.
pub trait AuditLog: Send + Sync {
    fn append(&self, event: &AuditEvent) -> Result<(), KernelError>;
}

/// Callback invoked once per event during [`AuditReader::scan`]. Returning an
/// error stops the scan and propagates the error.
pub type AuditVisitor<'a> = dyn FnMut(&AuditEvent) -> Result<(), KernelError> + 'a;

/// Sequential reader over the whole journal.
pub trait AuditReader: Send + Sync {
    /// Visit every event in append order.
    fn scan(&self, visit: &mut AuditVisitor<'_>) -> Result<(), KernelError>;
}

/// Per-unit reader over the journal.
pub trait AuditByUnitReader: Send + Sync {
    /// Events whose `unit_id` matches, in append order.
    fn list_by_unit_id(&self, unit_id: &str) -> Result<Vec<AuditEvent>, KernelError>;
}

/// Source of the current time in whole seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> i64;
}
