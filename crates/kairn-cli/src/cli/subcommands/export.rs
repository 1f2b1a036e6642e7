use clap::Subcommand;

/// Export commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ExportCommands {
    /// Snapshot a unit and its versions with a deterministic hash.
    Unit {
        #[arg(long)]
        unit: String,
        /// Include the unit's audit events and their hash.
        #[arg(long)]
        audit: bool,
    },
}
