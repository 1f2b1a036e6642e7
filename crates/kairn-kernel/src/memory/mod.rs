//! In-memory adapters.
//!
//! Both adapters keep their state behind a lock and are safe to share across
//! threads through an `Arc`. Nothing survives the process.

mod audit_log;
mod unit_repo;

pub use audit_log::MemoryAuditLog;
pub use unit_repo::MemoryUnitRepo;

use std::sync::PoisonError;

use kairn_core::errors::{KernelError, StorageError};

fn poisoned<T>(what: &'static str) -> impl FnOnce(PoisonError<T>) -> KernelError {
    move |_| StorageError::LockPoisoned(what.to_owned()).into()
}
