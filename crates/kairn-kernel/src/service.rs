//! The kernel: stateless orchestration over the repository, audit, and clock
//! ports.
//!
//! `Kernel` holds only shared handles to its collaborators. Every use case is
//! implemented as `impl Kernel` in `usecases/`.

use std::sync::Arc;

use kairn_core::entities::{AuditEvent, Unit};
use kairn_core::errors::KernelError;

use crate::ports::{AuditByUnitReader, AuditLog, AuditReader, Clock, UnitRepository};

/// Orchestrates use cases over injected ports.
///
/// Every mutating use case follows this protocol:
/// 1. Refuse to run without an audit log and a clock
/// 2. Validate input and resolve the target unit or version
/// 3. Write durable state through the repository
/// 4. Append exactly one audit event
///
/// If step 4 fails the use case fails, even though step 3 already
/// succeeded. Audit verification reports the resulting gap as missing.
#[derive(Clone)]
pub struct Kernel {
    repo: Arc<dyn UnitRepository>,
    audit: Option<Arc<dyn AuditLog>>,
    reader: Option<Arc<dyn AuditReader>>,
    by_unit: Option<Arc<dyn AuditByUnitReader>>,
    clock: Option<Arc<dyn Clock>>,
}

impl Kernel {
    /// A kernel with only a repository. Queries work; mutations fail with
    /// `AuditNotConfigured` until an audit log and clock are attached.
    #[must_use]
    pub fn new(repo: Arc<dyn UnitRepository>) -> Self {
        Self {
            repo,
            audit: None,
            reader: None,
            by_unit: None,
            clock: None,
        }
    }

    /// A fully wired kernel whose journal serves as log and both readers.
    #[must_use]
    pub fn with_journal<J>(repo: Arc<dyn UnitRepository>, journal: Arc<J>, clock: Arc<dyn Clock>) -> Self
    where
        J: AuditLog + AuditReader + AuditByUnitReader + 'static,
    {
        Self::new(repo)
            .with_audit_log(journal.clone())
            .with_audit_reader(journal.clone())
            .with_audit_by_unit(journal)
            .with_clock(clock)
    }

    #[must_use]
    pub fn with_audit_log(mut self, audit: Arc<dyn AuditLog>) -> Self {
        self.audit = Some(audit);
        self
    }

    #[must_use]
    pub fn with_audit_reader(mut self, reader: Arc<dyn AuditReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    #[must_use]
    pub fn with_audit_by_unit(mut self, by_unit: Arc<dyn AuditByUnitReader>) -> Self {
        self.by_unit = Some(by_unit);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Access the repository.
    #[must_use]
    pub fn repo(&self) -> &dyn UnitRepository {
        self.repo.as_ref()
    }

    // -- collaborator guards -------------------------------------------------

    pub(crate) fn audit_log(&self) -> Result<&dyn AuditLog, KernelError> {
        self.audit.as_deref().ok_or(KernelError::AuditNotConfigured)
    }

    pub(crate) fn audit_reader(&self) -> Result<&dyn AuditReader, KernelError> {
        self.reader.as_deref().ok_or(KernelError::AuditNotConfigured)
    }

    pub(crate) fn audit_by_unit(&self) -> Result<&dyn AuditByUnitReader, KernelError> {
        self.by_unit.as_deref().ok_or(KernelError::AuditNotConfigured)
    }

    pub(crate) fn clock(&self) -> Result<&dyn Clock, KernelError> {
        self.clock.as_deref().ok_or(KernelError::ClockNotConfigured)
    }

    /// Both collaborators every mutation needs, audit checked first.
    pub(crate) fn mutation_ports(&self) -> Result<(&dyn AuditLog, &dyn Clock), KernelError> {
        Ok((self.audit_log()?, self.clock()?))
    }

    // -- shared steps --------------------------------------------------------

    /// Resolve a unit by its (trimmed) key.
    pub(crate) fn resolve_unit(&self, key: &str) -> Result<Unit, KernelError> {
        let key = key.trim();
        self.repo
            .find_unit_by_key(key)?
            .ok_or_else(|| KernelError::UnitNotFound(key.to_owned()))
    }

    /// Append an event after state was written. Failures are logged and
    /// returned.
    pub(crate) fn record(audit: &dyn AuditLog, event: &AuditEvent) -> Result<(), KernelError> {
        audit.append(event).inspect_err(|e| {
            tracing::warn!(
                event_type = event.event_type(),
                unit_id = event.unit_id.as_deref().unwrap_or_default(),
                version_id = event.version_id.as_deref().unwrap_or_default(),
                "kernel: audit append failed after state write: {e}"
            );
        })
    }
}
