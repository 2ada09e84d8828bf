//! CLI argument definitions using clap
//!
//! Commands:
//! - recordscope init
//! - recordscope define <schema.json>
//! - recordscope insert <collection>         (document on stdin)
//! - recordscope collections
//! - recordscope records <collection>
//! - recordscope show <collection> <index>
//! - recordscope set <collection> <index> <field> <value>
//! - recordscope browse                      (JSON-lines session)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// recordscope - browse and edit schema-described records
#[derive(Parser, Debug)]
#[command(name = "recordscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./recordscope.json")]
    pub config: PathBuf,

    /// Data directory (overrides the configuration file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Initialize a new data directory
    Init,

    /// Define a collection from a schema file
    Define {
        /// Path to a collection schema JSON file
        schema: PathBuf,
    },

    /// Insert one JSON document read from stdin
    Insert {
        collection: String,
    },

    /// List collections with their record counts
    Collections,

    /// List the records of a collection
    Records {
        collection: String,
    },

    /// Show the fields of one record
    Show {
        collection: String,
        /// Position of the record in the records view
        index: usize,
    },

    /// Edit one field of one record
    Set {
        collection: String,
        index: usize,
        field: String,
        /// Raw text, coerced to the field's type
        value: String,
    },

    /// Interactive session: one JSON action per stdin line
    Browse,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
