use kairn_core::enums::SidecarKind;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Unit { action } => commands::unit::handle(&action, ctx, flags),
        Commands::Version { action } => commands::version::handle(&action, ctx, flags),
        Commands::Meaning { action } => {
            commands::sidecar::handle(SidecarKind::Meaning, &action, ctx, flags)
        }
        Commands::Claims { action } => {
            commands::sidecar::handle(SidecarKind::ClaimSet, &action, ctx, flags)
        }
        Commands::Uncertainty { action } => {
            commands::sidecar::handle(SidecarKind::Uncertainty, &action, ctx, flags)
        }
        Commands::Export { action } => commands::export::handle(&action, ctx, flags),
        Commands::Audit { action } => commands::audit::handle(&action, ctx, flags),
    }
}
