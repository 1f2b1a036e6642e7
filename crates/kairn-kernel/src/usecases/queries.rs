//! Read-side queries. None of these touch the audit log except `tail_audit`,
//! and none require a clock.

use std::collections::VecDeque;

use kairn_core::entities::{AuditEvent, Unit, Version};
use kairn_core::errors::KernelError;

use crate::Kernel;

/// Default number of events returned by [`Kernel::tail_audit`].
pub const DEFAULT_TAIL_LIMIT: usize = 50;

/// Filters for [`Kernel::tail_audit`]. Empty filters match everything.
#[derive(Debug, Clone)]
pub struct TailAuditRequest {
    pub limit: usize,
    pub event_type: Option<String>,
    pub unit_id: Option<String>,
    pub version_id: Option<String>,
}

impl Default for TailAuditRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TAIL_LIMIT,
            event_type: None,
            unit_id: None,
            version_id: None,
        }
    }
}

impl TailAuditRequest {
    fn matches(&self, event: &AuditEvent) -> bool {
        fn accepts(filter: Option<&String>, value: Option<&str>) -> bool {
            match filter.map(|f| f.trim()).filter(|f| !f.is_empty()) {
                Some(wanted) => value == Some(wanted),
                None => true,
            }
        }
        accepts(self.event_type.as_ref(), Some(event.event_type()))
            && accepts(self.unit_id.as_ref(), event.unit_id.as_deref())
            && accepts(self.version_id.as_ref(), event.version_id.as_deref())
    }
}

impl Kernel {
    /// # Errors
    ///
    /// Returns `UnitNotFound` if no unit has the key.
    pub fn get_unit(&self, unit_key: &str) -> Result<Unit, KernelError> {
        self.resolve_unit(unit_key)
    }

    /// Units whose key starts with the trimmed prefix, in repository order.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub fn list_units(&self, key_prefix: Option<&str>) -> Result<Vec<Unit>, KernelError> {
        let prefix = key_prefix.map(str::trim).unwrap_or_default();
        let mut units = self.repo().list_units()?;
        if !prefix.is_empty() {
            units.retain(|u| u.key.starts_with(prefix));
        }
        Ok(units)
    }

    /// Versions of a unit, oldest first unless `newest_first`.
    ///
    /// # Errors
    ///
    /// Returns `UnitNotFound` if no unit has the key.
    pub fn list_versions(
        &self,
        unit_key: &str,
        newest_first: bool,
    ) -> Result<Vec<Version>, KernelError> {
        let unit = self.resolve_unit(unit_key)?;
        let mut versions = self.repo().list_versions_by_unit_id(&unit.id)?;
        if newest_first {
            versions.reverse();
        }
        Ok(versions)
    }

    /// The version the unit's head points at.
    ///
    /// # Errors
    ///
    /// - `UnitNotFound` if no unit has the key
    /// - `NoVersions` if the unit has no head or no versions
    /// - `InconsistentHead` if the head is not among the unit's versions
    pub fn get_head_version(&self, unit_key: &str) -> Result<Version, KernelError> {
        let unit = self.resolve_unit(unit_key)?;
        let head = unit.head();
        if head.is_empty() {
            return Err(KernelError::NoVersions(unit.key));
        }
        let versions = self.repo().list_versions_by_unit_id(&unit.id)?;
        if versions.is_empty() {
            return Err(KernelError::NoVersions(unit.key));
        }
        versions
            .into_iter()
            .find(|v| v.id == head)
            .ok_or_else(|| KernelError::InconsistentHead {
                unit_id: unit.id.clone(),
                head_version_id: head.to_owned(),
            })
    }

    /// # Errors
    ///
    /// Returns `VersionNotFound` if no version has the id.
    pub fn get_version(&self, version_id: &str) -> Result<Version, KernelError> {
        let version_id = version_id.trim();
        self.repo()
            .find_version_by_id(version_id)?
            .ok_or_else(|| KernelError::VersionNotFound(version_id.to_owned()))
    }

    /// The last `limit` journal events matching the filters, in append order.
    ///
    /// # Errors
    ///
    /// - `AuditNotConfigured` without an audit reader
    /// - any journal failure
    pub fn tail_audit(&self, req: &TailAuditRequest) -> Result<Vec<AuditEvent>, KernelError> {
        let reader = self.audit_reader()?;
        let limit = if req.limit == 0 {
            DEFAULT_TAIL_LIMIT
        } else {
            req.limit
        };

        let mut ring = VecDeque::with_capacity(limit);
        reader.scan(&mut |event| {
            if req.matches(event) {
                if ring.len() == limit {
                    ring.pop_front();
                }
                ring.push_back(event.clone());
            }
            Ok(())
        })?;
        Ok(ring.into())
    }
}
