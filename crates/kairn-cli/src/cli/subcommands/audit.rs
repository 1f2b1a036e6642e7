use clap::Subcommand;

/// Audit commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuditCommands {
    /// Cross-check the journal against stored units. Exits 1 when problems
    /// are found.
    Verify {
        /// Restrict to one unit key.
        #[arg(long)]
        unit: Option<String>,
        /// Also compare version content hashes and rehash stored sidecars.
        #[arg(long)]
        strict: bool,
    },
    /// Show the most recent journal events.
    Tail {
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Event type, e.g. `version.created` or `CLAIM_SET`.
        #[arg(long = "type")]
        event_type: Option<String>,
        #[arg(long)]
        unit_id: Option<String>,
        #[arg(long)]
        version_id: Option<String>,
    },
}
