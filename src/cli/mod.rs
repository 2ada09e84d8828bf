//! CLI module for recordscope
//!
//! Provides command-line interface for:
//! - init / define / insert: set up a file store
//! - collections / records / show: print one view
//! - set: edit one field
//! - browse: JSON-lines browsing session

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    browse_session, collections, define, init, insert, records, run, run_command, set, show,
    Action,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_requests, write_error, write_response};
