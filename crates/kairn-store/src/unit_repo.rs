//! `UnitRepository` over JSON files.
//!
//! Each unit is one record file holding the unit and its versions in creation
//! order. Sidecar documents sit next to it, one file per version and kind.
//! A process-wide `RwLock` serializes writers; each write replaces whole
//! files through a rename so readers never see a half-written record.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use kairn_core::entities::{ClaimSet, Meaning, Uncertainty, Unit, Version};
use kairn_core::enums::SidecarKind;
use kairn_core::errors::KernelError;
use kairn_kernel::ports::UnitRepository;

use crate::fs_util::{is_safe_id, poisoned, read_json, write_json_atomic};
use crate::index::{KeyIndex, Lookup};
use crate::{INDEX_DIR, UNITS_DIR};

/// On-disk shape of `units/<unit_id>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRecord {
    #[serde(flatten)]
    pub unit: Unit,
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl UnitRecord {
    /// Unit record files are `<id>.json`; sidecars carry extra dots.
    pub(crate) fn is_record_path(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "json")
            && path
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|stem| !stem.contains('.'))
    }
}

pub struct FsUnitRepo {
    units_dir: PathBuf,
    index: KeyIndex,
    lock: RwLock<()>,
}

impl FsUnitRepo {
    /// Open (and create if needed) the unit store under `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if `units/` cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self, KernelError> {
        let units_dir = data_dir.join(UNITS_DIR);
        fs::create_dir_all(&units_dir)?;
        Ok(Self {
            index: KeyIndex::new(&data_dir.join(INDEX_DIR), units_dir.clone()),
            units_dir,
            lock: RwLock::new(()),
        })
    }

    /// Where the sidecar of `kind` for a version is stored.
    #[must_use]
    pub fn sidecar_path(&self, unit_id: &str, version_id: &str, kind: SidecarKind) -> PathBuf {
        self.units_dir.join(kind.file_name(unit_id, version_id))
    }

    #[must_use]
    pub fn record_path(&self, unit_id: &str) -> PathBuf {
        self.units_dir.join(format!("{unit_id}.json"))
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, ()>, KernelError> {
        self.lock.read().map_err(poisoned("fs unit repo"))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, ()>, KernelError> {
        self.lock.write().map_err(poisoned("fs unit repo"))
    }

    // -- unlocked helpers; callers hold the lock ------------------------------

    fn read_record(&self, unit_id: &str) -> Result<Option<UnitRecord>, KernelError> {
        if !is_safe_id(unit_id) {
            return Ok(None);
        }
        Ok(read_json(&self.record_path(unit_id))?)
    }

    fn require_record(&self, unit_id: &str) -> Result<UnitRecord, KernelError> {
        self.read_record(unit_id)?
            .ok_or_else(|| KernelError::UnitNotFound(unit_id.to_owned()))
    }

    fn write_record(&self, record: &UnitRecord) -> Result<(), KernelError> {
        if !is_safe_id(&record.unit.id) {
            return Err(KernelError::UnitNotFound(record.unit.id.clone()));
        }
        write_json_atomic(&self.record_path(&record.unit.id), record)?;
        Ok(())
    }

    /// Every unit record, sorted by unit id.
    fn scan_records(&self) -> Result<Vec<UnitRecord>, KernelError> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.units_dir)? {
            let path = entry?.path();
            if !UnitRecord::is_record_path(&path) {
                continue;
            }
            if let Some(record) = read_json::<UnitRecord>(&path)? {
                records.push(record);
            }
        }
        records.sort_by(|a, b| a.unit.id.cmp(&b.unit.id));
        Ok(records)
    }

    /// Index first. A stale entry, or a miss the index cannot vouch for,
    /// falls back to a scan that also brings the index up to date.
    fn find_record_by_key(&self, key: &str) -> Result<Option<UnitRecord>, KernelError> {
        match self.index.lookup(key)? {
            Lookup::Hit(id) => {
                if let Some(record) = self.read_record(&id)? {
                    if record.unit.key == key {
                        return Ok(Some(record));
                    }
                }
            }
            Lookup::Absent => return Ok(None),
            Lookup::Unknown => {}
        }
        let records = self.scan_records()?;
        self.index.reconcile(&records)?;
        Ok(records.into_iter().find(|r| r.unit.key == key))
    }

    fn save_sidecar<T: Serialize>(
        &self,
        unit_id: &str,
        version_id: &str,
        kind: SidecarKind,
        document: &T,
        hash: &str,
    ) -> Result<(), KernelError> {
        let _guard = self.write_guard()?;
        let mut record = self.require_record(unit_id)?;
        let version = record
            .versions
            .iter_mut()
            .find(|v| v.id == version_id)
            .filter(|_| is_safe_id(version_id))
            .ok_or_else(|| KernelError::VersionNotFound(version_id.to_owned()))?;

        write_json_atomic(&self.sidecar_path(unit_id, version_id, kind), document)?;
        version.set_sidecar_hash(kind, hash);
        self.write_record(&record)?;
        tracing::debug!(unit_id, version_id, %kind, "store: sidecar written");
        Ok(())
    }

    fn load_sidecar<T: DeserializeOwned>(
        &self,
        unit_id: &str,
        version_id: &str,
        kind: SidecarKind,
    ) -> Result<Option<T>, KernelError> {
        if !is_safe_id(unit_id) || !is_safe_id(version_id) {
            return Ok(None);
        }
        let _guard = self.read_guard()?;
        Ok(read_json(&self.sidecar_path(unit_id, version_id, kind))?)
    }
}

impl UnitRepository for FsUnitRepo {
    fn exists_by_key(&self, key: &str) -> Result<bool, KernelError> {
        let _guard = self.read_guard()?;
        Ok(self.find_record_by_key(key)?.is_some())
    }

    fn save_unit(&self, unit: &Unit) -> Result<(), KernelError> {
        let _guard = self.write_guard()?;
        if let Some(holder) = self.find_record_by_key(&unit.key)? {
            if holder.unit.id != unit.id {
                return Err(KernelError::UnitAlreadyExists(unit.key.clone()));
            }
        }

        let existing = self.read_record(&unit.id)?;
        let old_key = existing
            .as_ref()
            .map(|r| r.unit.key.clone())
            .filter(|k| *k != unit.key);
        let record = UnitRecord {
            unit: unit.clone(),
            versions: existing.map(|r| r.versions).unwrap_or_default(),
        };
        self.write_record(&record)?;

        if let Some(old_key) = old_key {
            self.index.remove(&old_key)?;
        }
        self.index.upsert(&unit.key, &unit.id)?;
        tracing::debug!(unit_id = %unit.id, key = %unit.key, "store: unit written");
        Ok(())
    }

    fn find_unit_by_key(&self, key: &str) -> Result<Option<Unit>, KernelError> {
        let _guard = self.read_guard()?;
        Ok(self.find_record_by_key(key)?.map(|r| r.unit))
    }

    fn find_unit_by_id(&self, id: &str) -> Result<Option<Unit>, KernelError> {
        let _guard = self.read_guard()?;
        Ok(self.read_record(id)?.map(|r| r.unit))
    }

    fn list_units(&self) -> Result<Vec<Unit>, KernelError> {
        let _guard = self.read_guard()?;
        Ok(self.scan_records()?.into_iter().map(|r| r.unit).collect())
    }

    fn save_version(&self, version: &Version) -> Result<(), KernelError> {
        let _guard = self.write_guard()?;
        let mut record = self.require_record(&version.unit_id)?;
        match record.versions.iter_mut().find(|v| v.id == version.id) {
            Some(existing) => *existing = version.clone(),
            None => record.versions.push(version.clone()),
        }
        self.write_record(&record)
    }

    fn append_version(&self, version: &Version) -> Result<(), KernelError> {
        let _guard = self.write_guard()?;
        let mut record = self.require_record(&version.unit_id)?;
        let head = record.unit.head();
        if head != version.prev() {
            return Err(KernelError::Conflict {
                base: version.prev().to_owned(),
                head: head.to_owned(),
            });
        }
        record.versions.push(version.clone());
        record.unit.head_version_id = Some(version.id.clone());
        self.write_record(&record)?;
        tracing::debug!(unit_id = %version.unit_id, version_id = %version.id, "store: version appended");
        Ok(())
    }

    fn list_versions_by_unit_id(&self, unit_id: &str) -> Result<Vec<Version>, KernelError> {
        let _guard = self.read_guard()?;
        Ok(self
            .read_record(unit_id)?
            .map(|r| r.versions)
            .unwrap_or_default())
    }

    fn update_unit_head(&self, unit_id: &str, version_id: &str) -> Result<(), KernelError> {
        let _guard = self.write_guard()?;
        let mut record = self.require_record(unit_id)?;
        record.unit.head_version_id = Some(version_id.to_owned());
        self.write_record(&record)
    }

    fn find_version_by_id(&self, id: &str) -> Result<Option<Version>, KernelError> {
        let _guard = self.read_guard()?;
        Ok(self
            .scan_records()?
            .into_iter()
            .flat_map(|r| r.versions)
            .find(|v| v.id == id))
    }

    fn save_meaning(
        &self,
        unit_id: &str,
        version_id: &str,
        meaning: &Meaning,
        hash: &str,
    ) -> Result<(), KernelError> {
        self.save_sidecar(unit_id, version_id, SidecarKind::Meaning, meaning, hash)
    }

    fn load_meaning(&self, unit_id: &str, version_id: &str) -> Result<Option<Meaning>, KernelError> {
        self.load_sidecar(unit_id, version_id, SidecarKind::Meaning)
    }

    fn save_claim_set(
        &self,
        unit_id: &str,
        version_id: &str,
        claim_set: &ClaimSet,
        hash: &str,
    ) -> Result<(), KernelError> {
        self.save_sidecar(unit_id, version_id, SidecarKind::ClaimSet, claim_set, hash)
    }

    fn load_claim_set(
        &self,
        unit_id: &str,
        version_id: &str,
    ) -> Result<Option<ClaimSet>, KernelError> {
        self.load_sidecar(unit_id, version_id, SidecarKind::ClaimSet)
    }

    fn save_uncertainty(
        &self,
        unit_id: &str,
        version_id: &str,
        uncertainty: &Uncertainty,
        hash: &str,
    ) -> Result<(), KernelError> {
        self.save_sidecar(
            unit_id,
            version_id,
            SidecarKind::Uncertainty,
            uncertainty,
            hash,
        )
    }

    fn load_uncertainty(
        &self,
        unit_id: &str,
        version_id: &str,
    ) -> Result<Option<Uncertainty>, KernelError> {
        self.load_sidecar(unit_id, version_id, SidecarKind::Uncertainty)
    }
}
