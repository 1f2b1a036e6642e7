//! Cross-checking the audit journal against repository state.
//!
//! Expectations per unit in scope:
//!
//! ```text
//! unit.created       exactly once per unit
//! version.created    exactly once per version
//! MEANING_SET        exactly once per version with a meaning hash
//! CLAIM_SET          exactly once per version with a claim set hash
//! UNCERTAINTY_SET    exactly once per version with an uncertainty hash
//! ```
//!
//! The journal is scanned once. Findings are listed in expectation order:
//! repository unit order, then version order, then sidecar kind order.

use std::collections::HashMap;

use kairn_core::entities::{ClaimSet, Meaning, Uncertainty, Unit, Version};
use kairn_core::enums::{EventType, SidecarKind};
use kairn_core::errors::{KernelError, StorageError};
use kairn_core::responses::{
    DuplicateEvent, HashMismatch, MismatchSource, MissingEvent, VerifyAuditReport,
};

use crate::Kernel;
use crate::usecases::SidecarDocument;

#[derive(Debug, Clone, Default)]
pub struct VerifyAuditRequest {
    /// Restrict verification to one unit. `None` checks every unit.
    pub unit_key: Option<String>,
    /// Also compare `version.created` hashes and rehash stored sidecars.
    pub strict_hash: bool,
}

/// One event the journal should contain.
struct Expectation<'a> {
    event_type: EventType,
    unit: &'a Unit,
    version: Option<&'a Version>,
}

impl Expectation<'_> {
    fn target_id(&self) -> &str {
        self.version.map_or(self.unit.id.as_str(), |v| v.id.as_str())
    }

    /// The hash the repository holds for this target, if any.
    fn stored_hash(&self) -> Option<&str> {
        let version = self.version?;
        match self.event_type {
            EventType::UnitCreated => None,
            EventType::VersionCreated => Some(version.content_hash.as_str()),
            EventType::MeaningSet => version.sidecar_hash(SidecarKind::Meaning),
            EventType::ClaimSet => version.sidecar_hash(SidecarKind::ClaimSet),
            EventType::UncertaintySet => version.sidecar_hash(SidecarKind::Uncertainty),
        }
    }

    fn sidecar_kind(&self) -> Option<SidecarKind> {
        SidecarKind::ALL
            .into_iter()
            .find(|k| k.event_type() == self.event_type)
    }
}

#[derive(Default)]
struct Tally {
    count: usize,
    /// Hash carried by the most recent matching event.
    last_hash: Option<String>,
}

impl Kernel {
    /// Verify that the journal faithfully records repository state.
    ///
    /// Integrity problems are reported, not returned as errors.
    ///
    /// # Errors
    ///
    /// - `AuditNotConfigured` without an audit reader
    /// - `UnitNotFound` if `unit_key` is given and unknown
    /// - any repository or journal failure other than an undecodable sidecar
    pub fn verify_audit(&self, req: &VerifyAuditRequest) -> Result<VerifyAuditReport, KernelError> {
        let reader = self.audit_reader()?;

        let units = match req.unit_key.as_deref() {
            Some(key) => vec![self.resolve_unit(key)?],
            None => self.repo().list_units()?,
        };
        let mut versions_by_unit = Vec::with_capacity(units.len());
        for unit in &units {
            versions_by_unit.push(self.repo().list_versions_by_unit_id(&unit.id)?);
        }

        let mut expectations = Vec::new();
        for (unit, versions) in units.iter().zip(&versions_by_unit) {
            expectations.push(Expectation {
                event_type: EventType::UnitCreated,
                unit,
                version: None,
            });
            for version in versions {
                expectations.push(Expectation {
                    event_type: EventType::VersionCreated,
                    unit,
                    version: Some(version),
                });
                for kind in SidecarKind::ALL {
                    if version.sidecar_hash(kind).is_some() {
                        expectations.push(Expectation {
                            event_type: kind.event_type(),
                            unit,
                            version: Some(version),
                        });
                    }
                }
            }
        }

        let mut tallies: HashMap<(EventType, String), Tally> = expectations
            .iter()
            .map(|e| ((e.event_type, e.target_id().to_owned()), Tally::default()))
            .collect();
        reader.scan(&mut |event| {
            let (Some(kind), Some(target)) = (event.kind(), event.target_id()) else {
                return Ok(());
            };
            if let Some(tally) = tallies.get_mut(&(kind, target.to_owned())) {
                tally.count += 1;
                tally.last_hash = event.recorded_hash().map(str::to_owned);
            }
            Ok(())
        })?;

        let mut report = VerifyAuditReport {
            total_units: units.len(),
            total_versions: versions_by_unit.iter().map(Vec::len).sum(),
            ..VerifyAuditReport::default()
        };
        for exp in &expectations {
            let tally = tallies
                .remove(&(exp.event_type, exp.target_id().to_owned()))
                .unwrap_or_default();
            self.classify(exp, &tally, req.strict_hash, &mut report)?;
        }
        report.finish();

        tracing::debug!(
            ok = report.ok,
            units = report.total_units,
            versions = report.total_versions,
            missing = report.missing.len(),
            duplicates = report.duplicates.len(),
            mismatches = report.hash_mismatches.len(),
            "kernel: audit verified"
        );
        Ok(report)
    }

    fn classify(
        &self,
        exp: &Expectation<'_>,
        tally: &Tally,
        strict_hash: bool,
        report: &mut VerifyAuditReport,
    ) -> Result<(), KernelError> {
        let event_type = exp.event_type.as_str().to_owned();
        match tally.count {
            0 => report.missing.push(MissingEvent {
                unit_id: exp.unit.id.clone(),
                version_id: exp.version.map(|v| v.id.clone()),
                event_type: event_type.clone(),
            }),
            1 => {}
            n => report.duplicates.push(DuplicateEvent {
                event_type: event_type.clone(),
                target_id: exp.target_id().to_owned(),
                count: n,
            }),
        }

        let (Some(version), Some(expected)) = (exp.version, exp.stored_hash()) else {
            return Ok(());
        };
        let mismatch = |found_hash: Option<String>, source: MismatchSource| HashMismatch {
            unit_id: exp.unit.id.clone(),
            version_id: version.id.clone(),
            event_type: event_type.clone(),
            expected_hash: expected.to_owned(),
            found_hash,
            source,
        };

        // The journal hash is always checked for sidecars, and only under
        // strict mode for version content.
        let check_journal = tally.count > 0 && (strict_hash || exp.sidecar_kind().is_some());
        if check_journal && tally.last_hash.as_deref() != Some(expected) {
            report
                .hash_mismatches
                .push(mismatch(tally.last_hash.clone(), MismatchSource::Journal));
        }

        if strict_hash {
            if let Some(kind) = exp.sidecar_kind() {
                let current = self.rehash_sidecar(kind, &exp.unit.id, &version.id)?;
                if current.as_deref() != Some(expected) {
                    report
                        .hash_mismatches
                        .push(mismatch(current, MismatchSource::Sidecar));
                }
            }
        }
        Ok(())
    }

    /// Reload the stored sidecar and hash it. `None` when it is absent or
    /// cannot be decoded.
    fn rehash_sidecar(
        &self,
        kind: SidecarKind,
        unit_id: &str,
        version_id: &str,
    ) -> Result<Option<String>, KernelError> {
        match kind {
            SidecarKind::Meaning => self.rehash::<Meaning>(unit_id, version_id),
            SidecarKind::ClaimSet => self.rehash::<ClaimSet>(unit_id, version_id),
            SidecarKind::Uncertainty => self.rehash::<Uncertainty>(unit_id, version_id),
        }
    }

    fn rehash<D: SidecarDocument>(
        &self,
        unit_id: &str,
        version_id: &str,
    ) -> Result<Option<String>, KernelError> {
        match D::load(self.repo(), unit_id, version_id) {
            Ok(Some(doc)) => doc.canonical_hash().map(Some),
            Ok(None) => Ok(None),
            Err(KernelError::Storage(StorageError::Corrupt { location, reason })) => {
                tracing::warn!(%location, "kernel: unreadable sidecar during verification: {reason}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
