//! Shared fixtures for kernel integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use kairn_core::entities::{AuditEvent, Unit, Version};
use kairn_core::errors::{KernelError, StorageError};
use kairn_kernel::Kernel;
use kairn_kernel::clock::FixedClock;
use kairn_kernel::memory::{MemoryAuditLog, MemoryUnitRepo};
use kairn_kernel::ports::AuditLog;
use kairn_kernel::usecases::{CreateUnitRequest, CreateVersionRequest, SetSidecarRequest};

pub const T0: i64 = 1_700_000_000;

pub struct Fixture {
    pub kernel: Kernel,
    pub repo: Arc<MemoryUnitRepo>,
    pub journal: Arc<MemoryAuditLog>,
    pub clock: Arc<FixedClock>,
}

pub fn fixture() -> Fixture {
    let repo = Arc::new(MemoryUnitRepo::new());
    let journal = Arc::new(MemoryAuditLog::new());
    let clock = Arc::new(FixedClock::new(T0));
    let kernel = Kernel::with_journal(repo.clone(), journal.clone(), clock.clone());
    Fixture {
        kernel,
        repo,
        journal,
        clock,
    }
}

impl Fixture {
    pub fn unit(&self, key: &str) -> Unit {
        self.kernel
            .create_unit(&CreateUnitRequest {
                key: key.into(),
                title: "Title".into(),
                description: None,
                actor_id: "alice".into(),
            })
            .unwrap()
    }

    pub fn version(&self, key: &str, label: &str, content: &str) -> Version {
        self.clock.advance(1);
        self.kernel
            .create_version(&CreateVersionRequest {
                unit_key: key.into(),
                label: label.into(),
                content: content.into(),
                base_version_id: None,
                actor_id: "alice".into(),
            })
            .unwrap()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        let mut out = Vec::new();
        kairn_kernel::ports::AuditReader::scan(self.journal.as_ref(), &mut |e| {
            out.push(e.clone());
            Ok(())
        })
        .unwrap();
        out
    }
}

pub fn sidecar(key: &str, body: serde_json::Value) -> SetSidecarRequest {
    SetSidecarRequest {
        unit_key: key.into(),
        version_id: None,
        body: serde_json::to_vec(&body).unwrap(),
        actor_id: "alice".into(),
    }
}

pub fn meaning_doc() -> serde_json::Value {
    serde_json::json!({
        "schema_version": "meaning/v1",
        "title": "Deposit rules",
        "purpose": "When a deposit must be returned"
    })
}

pub fn claims_doc(version_id: &str) -> serde_json::Value {
    serde_json::json!({
        "schema_version": "claimset/v0",
        "version_id": version_id,
        "claims": [
            {"id": "c1", "text": "Due within 14 days"},
            {"id": "c2", "text": "Due within 30 days"}
        ],
        "relations": [{"type": "CONTRADICTS", "from_claim_id": "c1", "to_claim_id": "c2"}]
    })
}

pub fn uncertainty_doc() -> serde_json::Value {
    serde_json::json!({
        "schema_version": "uncertainty/v0",
        "id": "u1",
        "type": "interpretative",
        "level": "medium",
        "applies_to": {"scope": "claim", "claim_id": "c1"}
    })
}

/// Audit log that rejects every append.
pub struct FailingAuditLog;

impl AuditLog for FailingAuditLog {
    fn append(&self, _event: &AuditEvent) -> Result<(), KernelError> {
        Err(StorageError::Io(std::io::Error::other("journal offline")).into())
    }
}
