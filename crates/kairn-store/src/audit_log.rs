//! Append-only JSONL audit journal.
//!
//! One event per line, appended with `serde_jsonlines::append_json_lines`.
//! A missing journal reads as empty. Blank lines are skipped; any other line
//! that does not decode fails the scan as `Corrupt`.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use kairn_core::entities::AuditEvent;
use kairn_core::errors::{KernelError, StorageError};
use kairn_kernel::ports::{AuditByUnitReader, AuditLog, AuditReader, AuditVisitor};

use crate::AUDIT_FILE;
use crate::fs_util::poisoned;

pub struct FsAuditLog {
    path: PathBuf,
    /// Serializes appends from this process.
    append_lock: Mutex<()>,
}

impl FsAuditLog {
    /// Open the journal at `<data_dir>/audit.jsonl`, creating `data_dir` if
    /// needed. The file itself is created on first append.
    ///
    /// # Errors
    ///
    /// Returns a storage error if `data_dir` cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self, KernelError> {
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            path: data_dir.join(AUDIT_FILE),
            append_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupt(&self, line: usize, reason: impl ToString) -> KernelError {
        StorageError::Corrupt {
            location: format!("{}:{line}", self.path.display()),
            reason: reason.to_string(),
        }
        .into()
    }
}

impl AuditLog for FsAuditLog {
    fn append(&self, event: &AuditEvent) -> Result<(), KernelError> {
        let _guard = self.append_lock.lock().map_err(poisoned("fs audit log"))?;
        serde_jsonlines::append_json_lines(&self.path, [event])?;
        Ok(())
    }
}

impl AuditReader for FsAuditLog {
    fn scan(&self, visit: &mut AuditVisitor<'_>) -> Result<(), KernelError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let event: AuditEvent =
                serde_json::from_str(&line).map_err(|e| self.corrupt(idx + 1, e))?;
            visit(&event)?;
        }
        Ok(())
    }
}

impl AuditByUnitReader for FsAuditLog {
    fn list_by_unit_id(&self, unit_id: &str) -> Result<Vec<AuditEvent>, KernelError> {
        let mut out = Vec::new();
        self.scan(&mut |event| {
            if event.unit_id.as_deref() == Some(unit_id) {
                out.push(event.clone());
            }
            Ok(())
        })?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairn_core::audit_detail::UnitCreatedData;
    use kairn_core::entities::AuditPayload;
    use pretty_assertions::assert_eq;

    fn event(id: &str, unit_id: &str) -> AuditEvent {
        AuditEvent::new(
            id,
            1_700_000_000,
            "tester",
            AuditPayload::UnitCreated(UnitCreatedData {
                key: "abc".into(),
                title: "Title".into(),
            }),
        )
        .for_unit(unit_id)
    }

    fn ids(log: &FsAuditLog) -> Vec<String> {
        let mut out = Vec::new();
        log.scan(&mut |e| {
            out.push(e.id.clone());
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn missing_journal_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = FsAuditLog::open(&dir.path().join("fresh")).unwrap();
        assert!(ids(&log).is_empty());
        assert!(log.list_by_unit_id("unit_1").unwrap().is_empty());
    }

    #[test]
    fn appends_in_order_and_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let log = FsAuditLog::open(dir.path()).unwrap();
        log.append(&event("evt_1", "unit_1")).unwrap();
        log.append(&event("evt_2", "unit_2")).unwrap();
        log.append(&event("evt_3", "unit_1")).unwrap();

        let reopened = FsAuditLog::open(dir.path()).unwrap();
        assert_eq!(ids(&reopened), vec!["evt_1", "evt_2", "evt_3"]);

        let unit_1: Vec<_> = reopened
            .list_by_unit_id("unit_1")
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(unit_1, vec!["evt_1", "evt_3"]);
    }

    #[test]
    fn one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let log = FsAuditLog::open(dir.path()).unwrap();
        log.append(&event("evt_1", "unit_1")).unwrap();
        log.append(&event("evt_2", "unit_1")).unwrap();

        let raw = fs::read_to_string(log.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.lines().all(|l| l.contains(r#""type":"unit.created""#)));
    }

    #[test]
    fn blank_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let log = FsAuditLog::open(dir.path()).unwrap();
        log.append(&event("evt_1", "unit_1")).unwrap();
        let mut raw = fs::read_to_string(log.path()).unwrap();
        raw.push_str("\n   \n");
        fs::write(log.path(), raw).unwrap();
        log.append(&event("evt_2", "unit_1")).unwrap();

        assert_eq!(ids(&log), vec!["evt_1", "evt_2"]);
    }

    #[test]
    fn garbage_line_is_corrupt_with_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let log = FsAuditLog::open(dir.path()).unwrap();
        log.append(&event("evt_1", "unit_1")).unwrap();
        let mut raw = fs::read_to_string(log.path()).unwrap();
        raw.push_str("{truncated\n");
        fs::write(log.path(), raw).unwrap();

        let err = log.scan(&mut |_| Ok(())).unwrap_err();
        match err {
            KernelError::Storage(StorageError::Corrupt { location, .. }) => {
                assert!(location.ends_with("audit.jsonl:2"), "{location}");
            }
            other => panic!("expected corrupt journal, got {other:?}"),
        }
    }

    #[test]
    fn visitor_error_stops_scan() {
        let dir = tempfile::tempdir().unwrap();
        let log = FsAuditLog::open(dir.path()).unwrap();
        log.append(&event("evt_1", "unit_1")).unwrap();
        log.append(&event("evt_2", "unit_1")).unwrap();

        let mut seen = 0;
        let err = log
            .scan(&mut |_| {
                seen += 1;
                Err(KernelError::AuditNotConfigured)
            })
            .unwrap_err();
        assert!(matches!(err, KernelError::AuditNotConfigured));
        assert_eq!(seen, 1);
    }
}
