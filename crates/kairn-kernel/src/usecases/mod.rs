//! Use cases, each implemented as `impl Kernel`.
//!
//! Request types live beside the use case that consumes them.

mod create_unit;
mod create_version;
mod export;
mod queries;
mod sidecar;
mod verify;

pub use create_unit::CreateUnitRequest;
pub use create_version::CreateVersionRequest;
pub use export::ExportSnapshotRequest;
pub use queries::{DEFAULT_TAIL_LIMIT, TailAuditRequest};
pub use sidecar::{MAX_SIDECAR_BYTES, SetSidecarRequest, SidecarDocument};
pub use verify::VerifyAuditRequest;
