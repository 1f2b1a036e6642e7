use std::path::PathBuf;

use clap::Subcommand;

/// Commands shared by `meaning`, `claims`, and `uncertainty`.
#[derive(Clone, Debug, Subcommand)]
pub enum SidecarCommands {
    /// Attach a JSON document to a version. Each kind can be set once per
    /// version.
    Set {
        /// Unit key.
        #[arg(long)]
        unit: String,
        /// Target version ID (defaults to the unit's head).
        #[arg(long)]
        version: Option<String>,
        /// JSON document path (`-` for stdin).
        #[arg(long)]
        file: PathBuf,
    },
}
