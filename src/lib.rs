//! The root module for the iwyu_wrapper package when compiled as a library.
//! This module mainly holds the declarations of this package's other modules.
//!
//! The wrapper runs include-what-you-use on a known-good reference file to learn
//! its baseline exit code, then runs it on each given file and fails on the first
//! file whose exit code differs from that baseline.

// project specific modules/crates
pub mod cli;
pub mod error;
pub mod iwyu;
pub mod logger;
pub mod run;
