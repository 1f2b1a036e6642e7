//! # kairn-store
//!
//! File-backed adapters for the Kairn kernel ports.
//!
//! Everything lives under one data directory:
//!
//! ```text
//! <data>/units/<unit_id>.json                        unit record with embedded versions
//! <data>/units/<unit_id>.<version_id>.<kind>.json    meaning, claimset, uncertainty sidecars
//! <data>/index/units_by_key.json                     key -> unit id cache, rebuilt on demand
//! <data>/audit.jsonl                                 append-only audit journal
//! ```
//!
//! Record and sidecar writes go through a temporary file and a rename. The
//! key index is a cache: when it is missing or unreadable it is rebuilt from
//! the unit records.

mod fs_util;
mod index;

pub mod audit_log;
pub mod unit_repo;

pub use audit_log::FsAuditLog;
pub use unit_repo::FsUnitRepo;

use std::path::Path;
use std::sync::Arc;

use kairn_core::errors::KernelError;
use kairn_kernel::Kernel;
use kairn_kernel::clock::SystemClock;

/// Directory holding unit records and sidecars.
pub const UNITS_DIR: &str = "units";
/// Directory holding the key index.
pub const INDEX_DIR: &str = "index";
/// Audit journal file name.
pub const AUDIT_FILE: &str = "audit.jsonl";

/// Open a kernel over a data directory, creating the layout if needed.
///
/// # Errors
///
/// Returns a storage error if the directories cannot be created.
pub fn open_kernel(data_dir: &Path) -> Result<Kernel, KernelError> {
    let repo = Arc::new(FsUnitRepo::open(data_dir)?);
    let journal = Arc::new(FsAuditLog::open(data_dir)?);
    tracing::debug!(data_dir = %data_dir.display(), "store: opened");
    Ok(Kernel::with_journal(repo, journal, Arc::new(SystemClock)))
}
