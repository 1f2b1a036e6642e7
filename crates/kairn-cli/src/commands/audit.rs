use kairn_kernel::usecases::{TailAuditRequest, VerifyAuditRequest};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuditCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `krn audit`.
pub fn handle(action: &AuditCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuditCommands::Verify { unit, strict } => {
            let report = ctx.kernel.verify_audit(&VerifyAuditRequest {
                unit_key: unit.clone(),
                strict_hash: *strict || ctx.config.audit.strict_hash,
            })?;
            output(&report, flags.format)?;
            if !report.ok {
                anyhow::bail!(
                    "audit verification failed: {} missing, {} duplicate, {} hash mismatch(es)",
                    report.missing.len(),
                    report.duplicates.len(),
                    report.hash_mismatches.len()
                );
            }
            Ok(())
        }
        AuditCommands::Tail {
            limit,
            event_type,
            unit_id,
            version_id,
        } => {
            let events = ctx.kernel.tail_audit(&TailAuditRequest {
                limit: limit.unwrap_or(ctx.config.audit.tail_limit),
                event_type: event_type.clone(),
                unit_id: unit_id.clone(),
                version_id: version_id.clone(),
            })?;
            output(&events, flags.format)
        }
    }
}
