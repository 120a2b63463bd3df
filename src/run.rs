//! This module is the entry point of the wrapper's pipeline.
//!
//! The command line is partitioned, the baseline is probed once, and then every
//! file is analyzed and gated against that baseline.

use std::path::Path;

// project specific modules/crates
use crate::cli::{split_args, SplitArgs};
use crate::error::Error;
use crate::iwyu::{default_reference_file, get_iwyu_exe, probe_baseline, Analyzer, IwyuCommand};
use crate::logger;

/// How the list of files ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every file matched the baseline, or mismatches were suppressed.
    Passed,

    /// The first file whose exit status differed from the baseline. Files after
    /// it were not analyzed.
    Mismatch { file: String, exit_code: i32 },
}

impl Outcome {
    /// The exit code the wrapper should finish with.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Passed => 0,
            Outcome::Mismatch { exit_code, .. } => *exit_code,
        }
    }
}

/// Analyzes each of `args.files` in order and compares the exit status with the
/// `baseline`.
///
/// Without `--no-error`, the first mismatch stops the loop. With it, mismatches
/// are only logged.
pub fn check_files<A: Analyzer>(
    analyzer: &mut A,
    baseline: i32,
    args: &SplitArgs,
) -> Result<Outcome, Error> {
    for file in &args.files {
        let exit_code = analyzer.analyze(&args.analyzer_args, Path::new(file))?;
        if exit_code == baseline {
            continue;
        }
        if args.no_error {
            log::warn!("{file}: exit code {exit_code} differs from baseline {baseline}");
        } else {
            log::debug!("{file}: exit code {exit_code} differs from baseline {baseline}; stopping");
            return Ok(Outcome::Mismatch {
                file: file.clone(),
                exit_code,
            });
        }
    }
    Ok(Outcome::Passed)
}

/// Probes the baseline with the `reference_file`, then checks all files.
///
/// The baseline is computed exactly once, before any file is analyzed, even if
/// there are no files.
pub fn run<A: Analyzer>(
    analyzer: &mut A,
    reference_file: &Path,
    args: &SplitArgs,
) -> Result<Outcome, Error> {
    let baseline = probe_baseline(analyzer, reference_file)?;
    log::info!(
        "Baseline exit code from {} is {baseline}",
        reference_file.to_string_lossy()
    );
    if args.files.is_empty() {
        log::info!("No files given after --");
    }
    check_files(analyzer, baseline, args)
}

fn try_main(args: &[String]) -> Result<i32, Error> {
    let split = split_args(args)?;
    if logger::init(split.options.verbosity).is_err() {
        log::debug!("logger was already initialized");
    }

    let exe = get_iwyu_exe(&split.options.iwyu_path)?;
    let reference_file = match &split.options.reference_file {
        Some(path) => path.clone(),
        None => default_reference_file()?,
    };
    let mut analyzer = IwyuCommand::new(exe, split.options.filter_output);
    log::debug!("Using {}", analyzer.exe().to_string_lossy());
    analyzer.log_version();

    Ok(run(&mut analyzer, &reference_file, &split)?.exit_code())
}

/// This is the backend entry point for console applications.
///
/// `args` is the full argument vector, including the program name as its first
/// element (like [`std::env::args`]). Returns the process exit code:
///
/// - `0` when every file matched the baseline (or `--no-error` was given)
/// - `10` for a malformed command line
/// - `11` when the baseline cannot be established or the analyzer cannot start
/// - otherwise, the exit status of the first mismatching file
pub fn main(args: Vec<String>) -> i32 {
    match try_main(args.get(1..).unwrap_or_default()) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            match std::error::Error::source(&e) {
                Some(source) => eprintln!("{e}: {source}"),
                None => eprintln!("{e}"),
            }
            e.exit_code()
        }
    }
}
