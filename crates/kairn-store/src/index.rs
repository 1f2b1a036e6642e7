//! Persistent key -> unit id index.
//!
//! The index is a cache over the unit records. Loading it never fails: a
//! missing, empty, or malformed index file is rebuilt by scanning
//! `units/`, skipping unreadable records, and the result is saved back
//! best-effort.
//!
//! Once the index has been checked against a full scan (a rebuild or a
//! reconcile), it is complete for the life of the process: every later write
//! goes through [`KeyIndex::upsert`], so a miss is a definite "no such key".
//! An index loaded from disk is only trusted for hits until then.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use kairn_core::errors::{KernelError, StorageError};

use crate::fs_util::{poisoned, read_json, write_json_atomic};
use crate::unit_repo::UnitRecord;

pub const INDEX_SCHEMA: &str = "kairn.index.units_by_key.v1";
const INDEX_FILE: &str = "units_by_key.json";

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    schema: String,
    keys: Option<BTreeMap<String, String>>,
}

struct Entries {
    keys: BTreeMap<String, String>,
    /// Matches a full scan of `units/` taken by this process.
    complete: bool,
}

pub struct KeyIndex {
    path: PathBuf,
    units_dir: PathBuf,
    /// `None` until first use.
    entries: Mutex<Option<Entries>>,
}

impl KeyIndex {
    pub fn new(index_dir: &Path, units_dir: PathBuf) -> Self {
        Self {
            path: index_dir.join(INDEX_FILE),
            units_dir,
            entries: Mutex::new(None),
        }
    }

    pub fn lookup(&self, key: &str) -> Result<Lookup, KernelError> {
        self.with_entries(|entries| match entries.keys.get(key) {
            Some(id) => Lookup::Hit(id.clone()),
            None if entries.complete => Lookup::Absent,
            None => Lookup::Unknown,
        })
    }

    /// Point `key` at `unit_id` and persist, best-effort.
    pub fn upsert(&self, key: &str, unit_id: &str) -> Result<(), KernelError> {
        self.with_entries(|entries| {
            entries.keys.insert(key.to_owned(), unit_id.to_owned());
            self.persist(&entries.keys);
        })
    }

    pub fn remove(&self, key: &str) -> Result<(), KernelError> {
        self.with_entries(|entries| {
            if entries.keys.remove(key).is_some() {
                self.persist(&entries.keys);
            }
        })
    }

    /// Replace the index with the keys of a full scan and mark it complete.
    pub fn reconcile(&self, records: &[UnitRecord]) -> Result<(), KernelError> {
        let scanned: BTreeMap<_, _> = records.iter().filter_map(entry_of).collect();
        self.with_entries(|entries| {
            if entries.keys != scanned {
                entries.keys = scanned;
                self.persist(&entries.keys);
            }
            entries.complete = true;
        })
    }

    fn with_entries<R>(&self, f: impl FnOnce(&mut Entries) -> R) -> Result<R, KernelError> {
        let mut guard = self.entries.lock().map_err(poisoned("key index"))?;
        Ok(f(guard.get_or_insert_with(|| self.load_or_rebuild())))
    }

    fn load_or_rebuild(&self) -> Entries {
        match self.load() {
            Ok(keys) => Entries {
                keys,
                complete: false,
            },
            Err(reason) => {
                tracing::warn!(path = %self.path.display(), "store: rebuilding key index: {reason}");
                let keys = rebuild(&self.units_dir);
                self.persist(&keys);
                Entries {
                    keys,
                    complete: true,
                }
            }
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, String> {
        let file: IndexFile = read_json(&self.path)
            .map_err(|e| e.to_string())?
            .ok_or_else(|| "index file missing".to_owned())?;
        if file.schema != INDEX_SCHEMA {
            return Err(format!("index schema mismatch: {}", file.schema));
        }
        let keys = file.keys.ok_or_else(|| "index keys missing".to_owned())?;

        let mut out = BTreeMap::new();
        for (key, id) in keys {
            let (key, id) = (key.trim(), id.trim());
            if key.is_empty() || id.is_empty() {
                return Err("index contains an empty key or id".to_owned());
            }
            out.insert(key.to_owned(), id.to_owned());
        }
        Ok(out)
    }

    fn persist(&self, keys: &BTreeMap<String, String>) {
        let file = IndexFile {
            schema: INDEX_SCHEMA.to_owned(),
            keys: Some(keys.clone()),
        };
        let written = self
            .path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .map_err(StorageError::from)
            .and_then(|()| write_json_atomic(&self.path, &file));
        if let Err(e) = written {
            tracing::warn!(path = %self.path.display(), "store: key index not saved: {e}");
        }
    }
}

/// Outcome of an index lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Hit(String),
    /// The index is complete and has no such key.
    Absent,
    /// Not in the index, which has not been checked against a scan yet.
    Unknown,
}

fn entry_of(record: &UnitRecord) -> Option<(String, String)> {
    let (key, id) = (record.unit.key.trim(), record.unit.id.trim());
    (!key.is_empty() && !id.is_empty()).then(|| (key.to_owned(), id.to_owned()))
}

/// Scan unit records for their keys, skipping anything unreadable.
fn rebuild(units_dir: &Path) -> BTreeMap<String, String> {
    let mut keys = BTreeMap::new();
    let entries = match fs::read_dir(units_dir) {
        Ok(entries) => entries,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(dir = %units_dir.display(), "store: cannot scan units: {e}");
            }
            return keys;
        }
    };
    for path in entries.filter_map(Result::ok).map(|e| e.path()) {
        if !UnitRecord::is_record_path(&path) {
            continue;
        }
        match read_json::<UnitRecord>(&path) {
            Ok(Some(rec)) => {
                if let Some((key, id)) = entry_of(&rec) {
                    keys.insert(key, id);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!(path = %path.display(), "store: skipped during index rebuild: {e}"),
        }
    }
    keys
}
