//! Command-line interface for instat.
//!
//! This module provides the CLI structure for the `instat` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{AddCommand, ConfigCommand, DeleteCommand, EditCommand, JsonOutput, ListCommand};

use crate::logging::Verbosity;

/// instat - Keep institutional statistics in plain CSV files
///
/// Records enrollment, staff, hostels, programmes, placements and
/// scholarships. Each collection lives in its own `<collection>.csv` file.
#[derive(Debug, Parser)]
#[command(name = "instat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the CSV files (overrides configuration)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the records of a collection with their positions
    List(ListCommand),

    /// Add a record to a collection
    Add(AddCommand),

    /// Replace the record at a position
    Edit(EditCommand),

    /// Delete the record at a position
    Delete(DeleteCommand),

    /// Show headline counts
    Dashboard(JsonOutput),

    /// Show record counts and file sizes per collection
    Status(JsonOutput),

    /// List collections and their fields
    Collections(JsonOutput),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Collection;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "instat");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_from(["instat", "-q", "dashboard"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["instat", "-vv", "dashboard"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["instat", "list", "hostels", "--json"]).unwrap();
        match cli.command {
            Command::List(cmd) => {
                assert_eq!(cmd.collection, Collection::Hostels);
                assert!(cmd.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_collection() {
        let result = Cli::try_parse_from(["instat", "list", "canteens"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_add_fields() {
        let cli = Cli::try_parse_from([
            "instat",
            "add",
            "departments",
            "-f",
            "sno=1",
            "--field",
            "department_name=Physics",
        ])
        .unwrap();
        match cli.command {
            Command::Add(cmd) => {
                assert_eq!(cmd.collection, Collection::Departments);
                assert_eq!(cmd.fields.len(), 2);
                assert_eq!(cmd.form().get("department_name"), Some("Physics"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_bad_field() {
        let result = Cli::try_parse_from(["instat", "add", "departments", "-f", "sno"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_edit() {
        let cli =
            Cli::try_parse_from(["instat", "edit", "hostels", "2", "-f", "capacity=90"]).unwrap();
        match cli.command {
            Command::Edit(cmd) => {
                assert_eq!(cmd.index, 2);
                assert_eq!(cmd.form().get("capacity"), Some("90"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_delete_negative_index() {
        let cli = Cli::try_parse_from(["instat", "delete", "hostels", "-1"]).unwrap();
        match cli.command {
            Command::Delete(cmd) => assert_eq!(cmd.index, -1),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_data_dir() {
        let cli = Cli::try_parse_from(["instat", "-d", "/srv/instat", "status"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/instat")));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["instat", "-c", "/custom/config.toml", "dashboard"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = Cli::try_parse_from(["instat", "config", "validate"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: None })
        ));
    }
}
