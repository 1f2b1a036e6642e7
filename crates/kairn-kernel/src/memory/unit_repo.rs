use std::collections::HashMap;
use std::sync::RwLock;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use kairn_core::entities::{ClaimSet, Meaning, Uncertainty, Unit, Version};
use kairn_core::enums::SidecarKind;
use kairn_core::errors::{KernelError, StorageError};

use super::poisoned;
use crate::ports::UnitRepository;

type SidecarKey = (String, String, SidecarKind);

#[derive(Default)]
struct State {
    /// Units in creation order.
    units: Vec<Unit>,
    unit_by_id: HashMap<String, usize>,
    unit_by_key: HashMap<String, usize>,
    /// Version lists per unit id, in creation order.
    versions: HashMap<String, Vec<Version>>,
    /// Version id to owning unit id.
    version_owner: HashMap<String, String>,
    sidecars: HashMap<SidecarKey, Value>,
}

impl State {
    fn version_mut(&mut self, version_id: &str) -> Option<&mut Version> {
        let owner = self.version_owner.get(version_id)?;
        self.versions
            .get_mut(owner)?
            .iter_mut()
            .find(|v| v.id == version_id)
    }
}

/// `UnitRepository` backed by process memory.
///
/// Writers take the lock exclusively for the whole read-modify-write; lookups
/// share it.
#[derive(Default)]
pub struct MemoryUnitRepo {
    state: RwLock<State>,
}

impl MemoryUnitRepo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a stored sidecar document without touching the hash recorded on
    /// its version. This is how out-of-band edits look to the kernel, and is
    /// what strict audit verification is meant to catch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::LockPoisoned` if a writer panicked.
    pub fn replace_sidecar_raw(
        &self,
        unit_id: &str,
        version_id: &str,
        kind: SidecarKind,
        document: Value,
    ) -> Result<(), KernelError> {
        let mut state = self.state.write().map_err(poisoned("memory unit repo"))?;
        state
            .sidecars
            .insert((unit_id.to_owned(), version_id.to_owned(), kind), document);
        Ok(())
    }

    fn save_sidecar<T: Serialize>(
        &self,
        unit_id: &str,
        version_id: &str,
        kind: SidecarKind,
        document: &T,
        hash: &str,
    ) -> Result<(), KernelError> {
        let value = serde_json::to_value(document)?;
        let mut state = self.state.write().map_err(poisoned("memory unit repo"))?;
        let version = state
            .version_mut(version_id)
            .filter(|v| v.unit_id == unit_id)
            .ok_or_else(|| KernelError::VersionNotFound(version_id.to_owned()))?;
        version.set_sidecar_hash(kind, hash);
        state
            .sidecars
            .insert((unit_id.to_owned(), version_id.to_owned(), kind), value);
        Ok(())
    }

    fn load_sidecar<T: DeserializeOwned>(
        &self,
        unit_id: &str,
        version_id: &str,
        kind: SidecarKind,
    ) -> Result<Option<T>, KernelError> {
        let state = self.state.read().map_err(poisoned("memory unit repo"))?;
        let Some(value) = state
            .sidecars
            .get(&(unit_id.to_owned(), version_id.to_owned(), kind))
        else {
            return Ok(None);
        };
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| {
                StorageError::Corrupt {
                    location: kind.file_name(unit_id, version_id),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

impl UnitRepository for MemoryUnitRepo {
    fn exists_by_key(&self, key: &str) -> Result<bool, KernelError> {
        let state = self.state.read().map_err(poisoned("memory unit repo"))?;
        Ok(state.unit_by_key.contains_key(key))
    }

    fn save_unit(&self, unit: &Unit) -> Result<(), KernelError> {
        let mut state = self.state.write().map_err(poisoned("memory unit repo"))?;
        if let Some(&idx) = state.unit_by_key.get(&unit.key) {
            if state.units[idx].id != unit.id {
                return Err(KernelError::UnitAlreadyExists(unit.key.clone()));
            }
        }
        if let Some(&idx) = state.unit_by_id.get(&unit.id) {
            let old_key = std::mem::replace(&mut state.units[idx], unit.clone()).key;
            state.unit_by_key.remove(&old_key);
            state.unit_by_key.insert(unit.key.clone(), idx);
            return Ok(());
        }
        let idx = state.units.len();
        state.units.push(unit.clone());
        state.unit_by_id.insert(unit.id.clone(), idx);
        state.unit_by_key.insert(unit.key.clone(), idx);
        state.versions.entry(unit.id.clone()).or_default();
        Ok(())
    }

    fn find_unit_by_key(&self, key: &str) -> Result<Option<Unit>, KernelError> {
        let state = self.state.read().map_err(poisoned("memory unit repo"))?;
        Ok(state.unit_by_key.get(key).map(|&idx| state.units[idx].clone()))
    }

    fn find_unit_by_id(&self, id: &str) -> Result<Option<Unit>, KernelError> {
        let state = self.state.read().map_err(poisoned("memory unit repo"))?;
        Ok(state.unit_by_id.get(id).map(|&idx| state.units[idx].clone()))
    }

    fn list_units(&self) -> Result<Vec<Unit>, KernelError> {
        let state = self.state.read().map_err(poisoned("memory unit repo"))?;
        Ok(state.units.clone())
    }

    fn save_version(&self, version: &Version) -> Result<(), KernelError> {
        let mut state = self.state.write().map_err(poisoned("memory unit repo"))?;
        if !state.unit_by_id.contains_key(&version.unit_id) {
            return Err(KernelError::UnitNotFound(version.unit_id.clone()));
        }
        let list = state.versions.entry(version.unit_id.clone()).or_default();
        match list.iter_mut().find(|v| v.id == version.id) {
            Some(existing) => *existing = version.clone(),
            None => list.push(version.clone()),
        }
        state
            .version_owner
            .insert(version.id.clone(), version.unit_id.clone());
        Ok(())
    }

    fn append_version(&self, version: &Version) -> Result<(), KernelError> {
        let mut state = self.state.write().map_err(poisoned("memory unit repo"))?;
        let idx = *state
            .unit_by_id
            .get(&version.unit_id)
            .ok_or_else(|| KernelError::UnitNotFound(version.unit_id.clone()))?;
        let head = state.units[idx].head();
        if head != version.prev() {
            return Err(KernelError::Conflict {
                base: version.prev().to_owned(),
                head: head.to_owned(),
            });
        }
        state
            .versions
            .entry(version.unit_id.clone())
            .or_default()
            .push(version.clone());
        state
            .version_owner
            .insert(version.id.clone(), version.unit_id.clone());
        state.units[idx].head_version_id = Some(version.id.clone());
        Ok(())
    }

    fn list_versions_by_unit_id(&self, unit_id: &str) -> Result<Vec<Version>, KernelError> {
        let state = self.state.read().map_err(poisoned("memory unit repo"))?;
        Ok(state.versions.get(unit_id).cloned().unwrap_or_default())
    }

    fn update_unit_head(&self, unit_id: &str, version_id: &str) -> Result<(), KernelError> {
        let mut state = self.state.write().map_err(poisoned("memory unit repo"))?;
        let idx = *state
            .unit_by_id
            .get(unit_id)
            .ok_or_else(|| KernelError::UnitNotFound(unit_id.to_owned()))?;
        state.units[idx].head_version_id = Some(version_id.to_owned());
        Ok(())
    }

    fn find_version_by_id(&self, id: &str) -> Result<Option<Version>, KernelError> {
        let state = self.state.read().map_err(poisoned("memory unit repo"))?;
        let found = state
            .version_owner
            .get(id)
            .and_then(|owner| state.versions.get(owner))
            .and_then(|list| list.iter().find(|v| v.id == id))
            .cloned();
        Ok(found)
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
