//! # kairn-kernel
//!
//! Ports, use cases, and in-memory adapters for Kairn.
//!
//! - Repository, audit log, and clock ports (`ports`)
//! - System and fixed clocks (`clock`)
//! - `Kernel`, the stateless orchestrator every use case hangs off
//! - Use cases: create unit/version, attach sidecars, export snapshots,
//!   verify the audit journal, and read-side queries
//! - Lock-guarded in-memory repository and audit log (`memory`)

pub mod clock;
pub mod memory;
pub mod ports;
pub mod service;
pub mod usecases;

pub use service::Kernel;
