use kairn_kernel::usecases::CreateUnitRequest;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UnitCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `krn unit`.
pub fn handle(action: &UnitCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        UnitCommands::Create {
            key,
            title,
            description,
        } => {
            let unit = ctx.kernel.create_unit(&CreateUnitRequest {
                key: key.clone(),
                title: title.clone(),
                description: description.clone(),
                actor_id: ctx.actor.clone(),
            })?;
            output(&unit, flags.format)
        }
        UnitCommands::Get { key } => output(&ctx.kernel.get_unit(key)?, flags.format),
        UnitCommands::List { prefix } => {
            output(&ctx.kernel.list_units(prefix.as_deref())?, flags.format)
        }
    }
}
