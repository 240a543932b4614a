//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::forms::{parse_assignment, FormData};
use crate::schema::Collection;

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Collection to list (e.g. hostels, staff_info)
    pub collection: Collection,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Collection to add to
    pub collection: Collection,

    /// Field value, repeatable (e.g. -f name=Ganga -f capacity=100)
    #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Collection holding the record
    pub collection: Collection,

    /// Position of the record, as shown by `list`
    #[arg(allow_negative_numbers = true)]
    pub index: i64,

    /// Replacement field value, repeatable
    #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Collection holding the record
    pub collection: Collection,

    /// Position of the record, as shown by `list`
    #[arg(allow_negative_numbers = true)]
    pub index: i64,
}

/// Commands that only take a `--json` switch.
#[derive(Debug, Args)]
pub struct JsonOutput {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print the default configuration file path
    Path,

    /// Validate a configuration file
    Validate {
        /// File to validate (defaults to the standard location)
        file: Option<PathBuf>,
    },
}

impl AddCommand {
    /// The submitted fields as a form.
    #[must_use]
    pub fn form(&self) -> FormData {
        self.fields.iter().cloned().collect()
    }
}

impl EditCommand {
    /// The submitted fields as a form.
    #[must_use]
    pub fn form(&self) -> FormData {
        self.fields.iter().cloned().collect()
    }
}
