//! This is the iwyu_wrapper package's binary executable.

use std::env;
use std::process::exit;

// project specific modules/crates
use iwyu_wrapper::run::main as run_main;

/// This takes the CLI arguments, passes them to [`iwyu_wrapper::run::main`], and
/// exits with the code it returns.
pub fn main() {
    exit(run_main(env::args().collect::<Vec<String>>()));
}
