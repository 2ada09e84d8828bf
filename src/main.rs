//! recordscope CLI entry point
//!
//! Parses nothing and opens nothing itself: everything is delegated to
//! `cli::run`. Errors go to stderr (the JSON error line has already been
//! written to stdout) and the process exits non-zero.

use recordscope::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
