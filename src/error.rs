//! The error kinds that terminate the wrapper before or during analysis.
//!
//! A file whose analyzer status differs from the baseline is not an error here;
//! that is reported through [`crate::run::Outcome`].

use std::io;
use std::path::PathBuf;

// non-std crates
use clap::error::ContextKind;
use thiserror::Error;

/// Exit code used for malformed command lines.
pub const USAGE_EXIT_CODE: i32 = 10;

/// Exit code used when the baseline cannot be established or the analyzer cannot
/// be started.
pub const UNAVAILABLE_EXIT_CODE: i32 = 11;

/// Everything that can stop the wrapper with a fatal status.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Found more than one instance of --")]
    MultipleSeparators,

    #[error("invalid wrapper option {option}: {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("reference file {} does not exist", .0.display())]
    ReferenceFileMissing(PathBuf),

    #[error("could not find include-what-you-use {0}")]
    AnalyzerNotFound(String),

    #[error("failed to launch {}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not determine the wrapper's own location")]
    CurrentExe(#[source] io::Error),
}

impl Error {
    /// The process exit code this error should terminate the wrapper with.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::MultipleSeparators | Error::InvalidOption { .. } => USAGE_EXIT_CODE,
            Error::ReferenceFileMissing(_)
            | Error::AnalyzerNotFound(_)
            | Error::Launch { .. }
            | Error::CurrentExe(_) => UNAVAILABLE_EXIT_CODE,
        }
    }
}

/// clap renders its own usage line (`--name <value>`), which is not a form the
/// wrapper accepts; only the offending `--name=value` and the kind are kept.
impl From<clap::Error> for Error {
    fn from(e: clap::Error) -> Self {
        let name = e
            .get(ContextKind::InvalidArg)
            .and_then(|arg| arg.to_string().split_whitespace().next().map(String::from));
        let value = e.get(ContextKind::InvalidValue).map(|value| value.to_string());
        let option = match (name, value) {
            (Some(name), Some(value)) => format!("{name}={value}"),
            (Some(name), None) => name,
            (None, _) => String::from("(unknown)"),
        };
        let reason = match e.get(ContextKind::ValidValue) {
            Some(valid) => format!("expected one of {valid}"),
            None => e.kind().as_str().unwrap_or("invalid usage").to_string(),
        };
        Error::InvalidOption { option, reason }
    }
}
