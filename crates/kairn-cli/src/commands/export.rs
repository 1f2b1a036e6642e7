use kairn_kernel::usecases::ExportSnapshotRequest;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::ExportCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `krn export`.
pub fn handle(
    action: &ExportCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let ExportCommands::Unit { unit, audit } = action;
    let snapshot = ctx.kernel.export_unit_snapshot(&ExportSnapshotRequest {
        unit_key: unit.clone(),
        include_audit: *audit,
    })?;
    output(&snapshot, flags.format)
}
