//! Attaching meaning, claim set, and uncertainty documents to a version.
//!
//! The three document kinds share one flow, parameterized by
//! [`SidecarDocument`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use kairn_core::audit_detail::{ClaimSetData, InlinePreview, MeaningSetData, UncertaintySetData};
use kairn_core::entities::{AuditEvent, AuditPayload, ClaimSet, Meaning, Uncertainty};
use kairn_core::enums::SidecarKind;
use kairn_core::errors::KernelError;
use kairn_core::hashing::{compute_claim_set_hash, compute_meaning_hash, compute_uncertainty_hash};
use kairn_core::ids::{PREFIX_EVENT, new_id};
use kairn_core::responses::SidecarSetResponse;

use crate::Kernel;
use crate::ports::UnitRepository;

/// Size ceiling for a sidecar payload, in bytes.
pub const MAX_SIDECAR_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Default)]
pub struct SetSidecarRequest {
    pub unit_key: String,
    /// Target version. Defaults to the unit's head.
    pub version_id: Option<String>,
    /// Raw JSON document.
    pub body: Vec<u8>,
    pub actor_id: String,
}

/// A document kind that can be attached to a version.
pub trait SidecarDocument: Serialize + DeserializeOwned + Sized {
    const KIND: SidecarKind;

    /// Schema version and kind-specific checks.
    ///
    /// # Errors
    ///
    /// Returns the kind's validation error.
    fn validate(&self) -> Result<(), KernelError>;

    /// # Errors
    ///
    /// Returns an error if the document cannot be canonicalized.
    fn canonical_hash(&self) -> Result<String, KernelError>;

    /// # Errors
    ///
    /// Propagates repository failures.
    fn save(
        &self,
        repo: &dyn UnitRepository,
        unit_id: &str,
        version_id: &str,
        hash: &str,
    ) -> Result<(), KernelError>;

    /// # Errors
    ///
    /// Propagates repository failures, including undecodable documents.
    fn load(
        repo: &dyn UnitRepository,
        unit_id: &str,
        version_id: &str,
    ) -> Result<Option<Self>, KernelError>;

    fn audit_payload(&self, unit_id: &str, version_id: &str, hash: &str) -> AuditPayload;
}

impl SidecarDocument for Meaning {
    const KIND: SidecarKind = SidecarKind::Meaning;

    fn validate(&self) -> Result<(), KernelError> {
        Self::validate(self)
    }

    fn canonical_hash(&self) -> Result<String, KernelError> {
        Ok(compute_meaning_hash(self)?)
    }

    fn save(
        &self,
        repo: &dyn UnitRepository,
        unit_id: &str,
        version_id: &str,
        hash: &str,
    ) -> Result<(), KernelError> {
        repo.save_meaning(unit_id, version_id, self, hash)
    }

    fn load(
        repo: &dyn UnitRepository,
        unit_id: &str,
        version_id: &str,
    ) -> Result<Option<Self>, KernelError> {
        repo.load_meaning(unit_id, version_id)
    }

    fn audit_payload(&self, unit_id: &str, version_id: &str, hash: &str) -> AuditPayload {
        AuditPayload::MeaningSet(MeaningSetData {
            meaning_hash: hash.to_owned(),
            meaning_path: Self::KIND.file_name(unit_id, version_id),
            schema_version: self.schema_version.clone(),
            inline_preview: Some(InlinePreview {
                title: self.title.clone(),
                purpose: self.purpose.clone(),
            }),
        })
    }
}

impl SidecarDocument for ClaimSet {
    const KIND: SidecarKind = SidecarKind::ClaimSet;

    fn validate(&self) -> Result<(), KernelError> {
        Self::validate(self)
    }

    fn canonical_hash(&self) -> Result<String, KernelError> {
        Ok(compute_claim_set_hash(self)?)
    }

    fn save(
        &self,
        repo: &dyn UnitRepository,
        unit_id: &str,
        version_id: &str,
        hash: &str,
    ) -> Result<(), KernelError> {
        repo.save_claim_set(unit_id, version_id, self, hash)
    }

    fn load(
        repo: &dyn UnitRepository,
        unit_id: &str,
        version_id: &str,
    ) -> Result<Option<Self>, KernelError> {
        repo.load_claim_set(unit_id, version_id)
    }

    fn audit_payload(&self, unit_id: &str, version_id: &str, hash: &str) -> AuditPayload {
        AuditPayload::ClaimSet(ClaimSetData {
            unit_id: unit_id.to_owned(),
            version_id: version_id.to_owned(),
            claimset_hash: hash.to_owned(),
            claimset_path: Self::KIND.file_name(unit_id, version_id),
        })
    }
}

impl SidecarDocument for Uncertainty {
    const KIND: SidecarKind = SidecarKind::Uncertainty;

    fn validate(&self) -> Result<(), KernelError> {
        Self::validate(self)
    }

    fn canonical_hash(&self) -> Result<String, KernelError> {
        Ok(compute_uncertainty_hash(self)?)
    }

    fn save(
        &self,
        repo: &dyn UnitRepository,
        unit_id: &str,
        version_id: &str,
        hash: &str,
    ) -> Result<(), KernelError> {
        repo.save_uncertainty(unit_id, version_id, self, hash)
    }

    fn load(
        repo: &dyn UnitRepository,
        unit_id: &str,
        version_id: &str,
    ) -> Result<Option<Self>, KernelError> {
        repo.load_uncertainty(unit_id, version_id)
    }

    fn audit_payload(&self, unit_id: &str, version_id: &str, hash: &str) -> AuditPayload {
        AuditPayload::UncertaintySet(UncertaintySetData {
            unit_id: unit_id.to_owned(),
            version_id: version_id.to_owned(),
            uncertainty_hash: hash.to_owned(),
            uncertainty_path: Self::KIND.file_name(unit_id, version_id),
        })
    }
}

impl Kernel {
    /// Attach a `meaning/v1` document and record `MEANING_SET`.
    ///
    /// # Errors
    ///
    /// See [`Kernel::set_sidecar`].
    pub fn set_meaning(&self, req: &SetSidecarRequest) -> Result<SidecarSetResponse, KernelError> {
        self.set_sidecar::<Meaning>(req)
    }

    /// Attach a `claimset/v0` document and record `CLAIM_SET`.
    ///
    /// # Errors
    ///
    /// See [`Kernel::set_sidecar`].
    pub fn set_claims(&self, req: &SetSidecarRequest) -> Result<SidecarSetResponse, KernelError> {
        self.set_sidecar::<ClaimSet>(req)
    }

    /// Attach an `uncertainty/v0` document and record `UNCERTAINTY_SET`.
    ///
    /// # Errors
    ///
    /// See [`Kernel::set_sidecar`].
    pub fn set_uncertainty(
        &self,
        req: &SetSidecarRequest,
    ) -> Result<SidecarSetResponse, KernelError> {
        self.set_sidecar::<Uncertainty>(req)
    }

    /// Shared flow for all sidecar kinds.
    ///
    /// # Errors
    ///
    /// - `AuditNotConfigured` / `ClockNotConfigured` if collaborators are missing
    /// - `UnitNotFound` if no unit has the key
    /// - `VersionNotFound` if neither the given id nor the head resolves to a
    ///   version of this unit
    /// - `SidecarAlreadySet` if the version already carries this kind
    /// - `PayloadTooLarge`, `InvalidDocument`, `InvalidSchemaVersion`, or the
    ///   kind's validation error
    /// - any repository or audit failure
    pub fn set_sidecar<D: SidecarDocument>(
        &self,
        req: &SetSidecarRequest,
    ) -> Result<SidecarSetResponse, KernelError> {
        let (audit, clock) = self.mutation_ports()?;
        let kind = D::KIND;

        let unit = self.resolve_unit(&req.unit_key)?;
        let version_id = req
            .version_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| unit.head());
        if version_id.is_empty() {
            return Err(KernelError::VersionNotFound(format!("{} (no head)", unit.key)));
        }
        let version = self
            .repo()
            .find_version_by_id(version_id)?
            .filter(|v| v.unit_id == unit.id)
            .ok_or_else(|| KernelError::VersionNotFound(version_id.to_owned()))?;
        if version.sidecar_hash(kind).is_some() {
            return Err(KernelError::SidecarAlreadySet {
                kind,
                version_id: version.id,
            });
        }

        if req.body.len() > MAX_SIDECAR_BYTES {
            return Err(KernelError::PayloadTooLarge {
                kind,
                size: req.body.len(),
                limit: MAX_SIDECAR_BYTES,
            });
        }
        let doc: D = serde_json::from_slice(&req.body).map_err(|e| KernelError::InvalidDocument {
            kind,
            reason: e.to_string(),
        })?;
        doc.validate()?;
        let hash = doc.canonical_hash()?;

        doc.save(self.repo(), &unit.id, &version.id, &hash)?;

        let event = AuditEvent::new(
            new_id(PREFIX_EVENT)?,
            clock.now_unix(),
            &req.actor_id,
            doc.audit_payload(&unit.id, &version.id, &hash),
        )
        .for_unit(&unit.id)
        .for_version(&version.id);
        Self::record(audit, &event)?;

        tracing::debug!(
            unit_id = %unit.id,
            version_id = %version.id,
            kind = %kind,
            hash = %hash,
            "kernel: sidecar attached"
        );
        Ok(SidecarSetResponse {
            unit_id: unit.id,
            version_id: version.id,
            kind,
            hash,
        })
    }
}
