use kairn_kernel::usecases::CreateVersionRequest;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::VersionCommands;
use crate::commands::shared::read_input;
use crate::context::AppContext;
use crate::output::output;

/// Handle `krn version`.
pub fn handle(
    action: &VersionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        VersionCommands::Create {
            unit,
            label,
            content,
            file,
            base,
        } => {
            let content = match (content, file) {
                (Some(content), _) => content.clone(),
                (None, Some(path)) => String::from_utf8(read_input(path)?)
                    .map_err(|_| anyhow::anyhow!("{} is not valid UTF-8", path.display()))?,
                (None, None) => anyhow::bail!("either --content or --file is required"),
            };
            let version = ctx.kernel.create_version(&CreateVersionRequest {
                unit_key: unit.clone(),
                label: label.clone(),
                content,
                base_version_id: base.clone(),
                actor_id: ctx.actor.clone(),
            })?;
            output(&version, flags.format)
        }
        VersionCommands::List { unit, newest_first } => output(
            &ctx.kernel.list_versions(unit, *newest_first)?,
            flags.format,
        ),
        VersionCommands::Head { unit } => output(&ctx.kernel.get_head_version(unit)?, flags.format),
        VersionCommands::Get { id } => output(&ctx.kernel.get_version(id)?, flags.format),
    }
}
