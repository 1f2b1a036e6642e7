use clap::Subcommand;

use crate::cli::subcommands::{
    AuditCommands, ExportCommands, SidecarCommands, UnitCommands, VersionCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Knowledge units.
    Unit {
        #[command(subcommand)]
        action: UnitCommands,
    },
    /// Versions of a unit.
    Version {
        #[command(subcommand)]
        action: VersionCommands,
    },
    /// Attach a `meaning/v1` document to a version.
    Meaning {
        #[command(subcommand)]
        action: SidecarCommands,
    },
    /// Attach a `claimset/v0` document to a version.
    Claims {
        #[command(subcommand)]
        action: SidecarCommands,
    },
    /// Attach an `uncertainty/v0` document to a version.
    Uncertainty {
        #[command(subcommand)]
        action: SidecarCommands,
    },
    /// Hashed snapshots.
    Export {
        #[command(subcommand)]
        action: ExportCommands,
    },
    /// Audit journal verification and inspection.
    Audit {
        #[command(subcommand)]
        action: AuditCommands,
    },
}
