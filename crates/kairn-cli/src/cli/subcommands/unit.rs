use clap::Subcommand;

/// Unit commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UnitCommands {
    /// Create a unit.
    Create {
        #[arg(long)]
        key: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Get a unit by key.
    Get { key: String },
    /// List units.
    List {
        /// Only keys starting with this prefix.
        #[arg(long)]
        prefix: Option<String>,
    },
}
