use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `krn` binary.
#[derive(Debug, Parser)]
#[command(
    name = "krn",
    version,
    about = "Kairn - versioned knowledge units with a verifiable audit journal"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data directory (overrides `storage.data_dir`)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Actor recorded on audit events (overrides `general.actor_id`)
    #[arg(long, global = true)]
    pub actor: Option<String>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            data: self.data.clone(),
            actor: self.actor.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{AuditCommands, SidecarCommands, UnitCommands, VersionCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "krn", "--format", "raw", "--data", "/tmp/kb", "--actor", "alice", "unit", "list",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert_eq!(cli.data.as_deref(), Some(std::path::Path::new("/tmp/kb")));
        assert_eq!(cli.actor.as_deref(), Some("alice"));
        assert!(matches!(
            cli.command,
            Commands::Unit {
                action: UnitCommands::List { prefix: None }
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["krn", "audit", "verify", "--strict", "-q"])
            .expect("cli should parse");
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Audit {
                action: AuditCommands::Verify {
                    unit: None,
                    strict: true
                }
            }
        ));
    }

    #[test]
    fn version_create_needs_content_or_file() {
        let missing = Cli::try_parse_from(["krn", "version", "create", "--unit", "abc", "--label", "v1"]);
        assert!(missing.is_err());

        let both = Cli::try_parse_from([
            "krn", "version", "create", "--unit", "abc", "--label", "v1", "--content", "x",
            "--file", "body.md",
        ]);
        assert!(both.is_err());

        let cli = Cli::try_parse_from([
            "krn", "version", "create", "--unit", "abc", "--label", "v1", "--content", "x",
            "--base", "ver_1",
        ])
        .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Version {
                action: VersionCommands::Create { base: Some(_), .. }
            }
        ));
    }

    #[test]
    fn sidecar_commands_share_shape() {
        for kind in ["meaning", "claims", "uncertainty"] {
            let cli = Cli::try_parse_from(["krn", kind, "set", "--unit", "abc", "--file", "-"])
                .expect("cli should parse");
            let action = match cli.command {
                Commands::Meaning { action }
                | Commands::Claims { action }
                | Commands::Uncertainty { action } => action,
                other => panic!("unexpected command {other:?}"),
            };
            let SidecarCommands::Set { unit, version, file } = action;
            assert_eq!(unit, "abc");
            assert_eq!(version, None);
            assert_eq!(file.to_str(), Some("-"));
        }
    }

    #[test]
    fn tail_flags_parse() {
        let cli = Cli::try_parse_from([
            "krn", "audit", "tail", "-n", "5", "--type", "MEANING_SET", "--unit-id", "unit_1",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Audit {
                action:
                    AuditCommands::Tail {
                        limit,
                        event_type,
                        unit_id,
                        version_id,
                    },
            } => {
                assert_eq!(limit, Some(5));
                assert_eq!(event_type.as_deref(), Some("MEANING_SET"));
                assert_eq!(unit_id.as_deref(), Some("unit_1"));
                assert_eq!(version_id, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
