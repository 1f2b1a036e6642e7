use kairn_core::audit_detail::VersionCreatedData;
use kairn_core::entities::{AuditEvent, AuditPayload, Version, VersionDraft, actor_or_unknown};
use kairn_core::errors::KernelError;
use kairn_core::ids::{PREFIX_EVENT, PREFIX_VERSION, new_id};

use crate::Kernel;

#[derive(Debug, Clone, Default)]
pub struct CreateVersionRequest {
    pub unit_key: String,
    pub label: String,
    pub content: String,
    /// Optimistic-lock token: the head the caller based this version on.
    pub base_version_id: Option<String>,
    pub actor_id: String,
}

impl Kernel {
    /// Append a version to a unit's lineage and advance its head.
    ///
    /// The version and the new head are written in one repository step that
    /// fails with `Conflict` if the head moved after it was read. The
    /// `version.created` event follows.
    ///
    /// # Errors
    ///
    /// - `AuditNotConfigured` / `ClockNotConfigured` if collaborators are missing
    /// - `UnitNotFound` if no unit has the key
    /// - `Conflict` if `base_version_id` is set and is not the current head, or
    ///   if another writer advanced the head first
    /// - `InvalidVersionLabel` / `EmptyContent` for blank label or content
    /// - any repository or audit failure
    pub fn create_version(&self, req: &CreateVersionRequest) -> Result<Version, KernelError> {
        let (audit, clock) = self.mutation_ports()?;

        let unit = self.resolve_unit(&req.unit_key)?;
        let head = unit.head();
        if let Some(base) = req.base_version_id.as_deref().map(str::trim) {
            if !base.is_empty() && base != head {
                return Err(KernelError::Conflict {
                    base: base.to_owned(),
                    head: head.to_owned(),
                });
            }
        }

        let version = Version::new(
            new_id(PREFIX_VERSION)?,
            VersionDraft {
                unit_id: &unit.id,
                prev_version_id: unit.head_version_id.as_deref(),
                label: &req.label,
                content: &req.content,
                actor_id: actor_or_unknown(&req.actor_id),
                created_at_unix: clock.now_unix(),
            },
        )?;

        self.repo().append_version(&version)?;

        let event = AuditEvent::new(
            new_id(PREFIX_EVENT)?,
            version.created_at_unix,
            &req.actor_id,
            AuditPayload::VersionCreated(VersionCreatedData {
                prev_version_id: version.prev_version_id.clone(),
                content_hash: version.content_hash.clone(),
                label: version.label.clone(),
            }),
        )
        .for_unit(&unit.id)
        .for_version(&version.id);
        Self::record(audit, &event)?;

        tracing::debug!(
            unit_id = %unit.id,
            version_id = %version.id,
            prev = version.prev(),
            "kernel: version created"
        );
        Ok(version)
    }
}
