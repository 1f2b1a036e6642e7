mod audit;
mod export;
mod sidecar;
mod unit;
mod version;

pub use audit::AuditCommands;
pub use export::ExportCommands;
pub use sidecar::SidecarCommands;
pub use unit::UnitCommands;
pub use version::VersionCommands;
