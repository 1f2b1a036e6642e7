use kairn_core::audit_detail::UnitCreatedData;
use kairn_core::entities::{AuditEvent, AuditPayload, Unit};
use kairn_core::errors::KernelError;
use kairn_core::ids::{PREFIX_EVENT, PREFIX_UNIT, new_id};

use crate::Kernel;

#[derive(Debug, Clone, Default)]
pub struct CreateUnitRequest {
    pub key: String,
    pub title: String,
    pub description: Option<String>,
    pub actor_id: String,
}

impl Kernel {
    /// Create a unit and record `unit.created`.
    ///
    /// # Errors
    ///
    /// - `AuditNotConfigured` / `ClockNotConfigured` if collaborators are missing
    /// - `InvalidUnitKey` / `InvalidUnitTitle` for short key or title
    /// - `UnitAlreadyExists` if the key is taken
    /// - any repository or audit failure; the unit may already be saved when
    ///   the audit append fails
    pub fn create_unit(&self, req: &CreateUnitRequest) -> Result<Unit, KernelError> {
        let (audit, clock) = self.mutation_ports()?;

        let unit = Unit::new(
            new_id(PREFIX_UNIT)?,
            &req.key,
            &req.title,
            req.description.as_deref(),
        )?;
        if self.repo().exists_by_key(&unit.key)? {
            return Err(KernelError::UnitAlreadyExists(unit.key));
        }
        self.repo().save_unit(&unit)?;

        let event = AuditEvent::new(
            new_id(PREFIX_EVENT)?,
            clock.now_unix(),
            &req.actor_id,
            AuditPayload::UnitCreated(UnitCreatedData {
                key: unit.key.clone(),
                title: unit.title.clone(),
            }),
        )
        .for_unit(&unit.id);
        Self::record(audit, &event)?;

        tracing::debug!(unit_id = %unit.id, key = %unit.key, "kernel: unit created");
        Ok(unit)
    }
}
