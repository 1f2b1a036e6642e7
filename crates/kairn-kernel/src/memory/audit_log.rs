use std::sync::RwLock;

use kairn_core::entities::AuditEvent;
use kairn_core::errors::KernelError;

use super::poisoned;
use crate::ports::{AuditByUnitReader, AuditLog, AuditReader, AuditVisitor};

/// Audit journal held in a vector, in append order.
#[derive(Default)]
pub struct MemoryAuditLog {
    events: RwLock<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events appended so far.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::LockPoisoned` if a writer panicked.
    pub fn len(&self) -> Result<usize, KernelError> {
        Ok(self.events.read().map_err(poisoned("memory audit log"))?.len())
    }

    /// # Errors
    ///
    /// Returns `StorageError::LockPoisoned` if a writer panicked.
    pub fn is_empty(&self) -> Result<bool, KernelError> {
        Ok(self.len()? == 0)
    }
}

impl AuditLog for MemoryAuditLog {
    fn append(&self, event: &AuditEvent) -> Result<(), KernelError> {
        self.events
            .write()
            .map_err(poisoned("memory audit log"))?
            .push(event.clone());
        Ok(())
    }
}

impl AuditReader for MemoryAuditLog {
    fn scan(&self, visit: &mut AuditVisitor<'_>) -> Result<(), KernelError> {
        // Visitors may append; the lock must not be held while visiting.
        let events = self.events.read().map_err(poisoned("memory audit log"))?.clone();
        for event in &events {
            visit(event)?;
        }
        Ok(())
    }
}

impl AuditByUnitReader for MemoryAuditLog {
    fn list_by_unit_id(&self, unit_id: &str) -> Result<Vec<AuditEvent>, KernelError> {
        let events = self.events.read().map_err(poisoned("memory audit log"))?;
        Ok(events
            .iter()
            .filter(|e| e.unit_id.as_deref() == Some(unit_id))
            .cloned()
            .collect())
    }
}
