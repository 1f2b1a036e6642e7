use kairn_core::errors::KernelError;
use kairn_core::hashing::{compute_audit_hash, compute_snapshot_hash};
use kairn_core::responses::UnitSnapshot;

use crate::Kernel;

#[derive(Debug, Clone, Default)]
pub struct ExportSnapshotRequest {
    pub unit_key: String,
    pub include_audit: bool,
}

impl Kernel {
    /// Project a unit, its versions, and optionally its audit events into a
    /// hashed snapshot. Versions are taken in repository order, never
    /// re-sorted.
    ///
    /// # Errors
    ///
    /// - `UnitNotFound` if no unit has the key
    /// - `AuditNotConfigured` if audit is requested without a per-unit reader
    /// - any repository or journal failure
    pub fn export_unit_snapshot(
        &self,
        req: &ExportSnapshotRequest,
    ) -> Result<UnitSnapshot, KernelError> {
        let unit = self.resolve_unit(&req.unit_key)?;
        let versions = self.repo().list_versions_by_unit_id(&unit.id)?;
        let snapshot_hash = compute_snapshot_hash(&unit, &versions);

        let (audit, audit_hash) = if req.include_audit {
            let events = self.audit_by_unit()?.list_by_unit_id(&unit.id)?;
            let hash = compute_audit_hash(&events);
            (Some(events), Some(hash))
        } else {
            (None, None)
        };

        Ok(UnitSnapshot {
            unit,
            versions,
            audit,
            snapshot_hash,
            audit_hash,
        })
    }
}
