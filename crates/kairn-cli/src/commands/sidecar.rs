use kairn_core::enums::SidecarKind;
use kairn_kernel::usecases::SetSidecarRequest;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SidecarCommands;
use crate::commands::shared::read_input;
use crate::context::AppContext;
use crate::output::output;

/// Handle `krn meaning|claims|uncertainty`.
pub fn handle(
    kind: SidecarKind,
    action: &SidecarCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let SidecarCommands::Set {
        unit,
        version,
        file,
    } = action;
    let req = SetSidecarRequest {
        unit_key: unit.clone(),
        version_id: version.clone(),
        body: read_input(file)?,
        actor_id: ctx.actor.clone(),
    };
    let response = match kind {
        SidecarKind::Meaning => ctx.kernel.set_meaning(&req)?,
        SidecarKind::ClaimSet => ctx.kernel.set_claims(&req)?,
        SidecarKind::Uncertainty => ctx.kernel.set_uncertainty(&req)?,
    };
    output(&response, flags.format)
}
