use std::path::PathBuf;

use clap::Subcommand;

/// Version commands.
#[derive(Clone, Debug, Subcommand)]
pub enum VersionCommands {
    /// Append a version and advance the unit's head.
    Create {
        /// Unit key.
        #[arg(long)]
        unit: String,
        #[arg(long)]
        label: String,
        /// Inline content.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        content: Option<String>,
        /// Read content from a file (`-` for stdin).
        #[arg(long)]
        file: Option<PathBuf>,
        /// Head this version is based on; rejected if the head has moved.
        #[arg(long)]
        base: Option<String>,
    },
    /// List versions of a unit.
    List {
        #[arg(long)]
        unit: String,
        #[arg(long)]
        newest_first: bool,
    },
    /// Show the head version of a unit.
    Head {
        #[arg(long)]
        unit: String,
    },
    /// Get a version by ID.
    Get { id: String },
}
