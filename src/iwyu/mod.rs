//! This module holds the functionality related to finding and running
//! include-what-you-use.

use std::env::{current_dir, current_exe};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

// non-std crates
use which::{which, which_in};

// project-specific modules/crates
use crate::error::Error;
pub mod output;
use output::forward_output;

/// The executable names include-what-you-use is installed under, in order of
/// preference.
pub const IWYU_NAMES: [&str; 2] = ["iwyu", "include-what-you-use"];

/// The name of the known-good source file installed next to the wrapper.
pub const REFERENCE_FILE_NAME: &str = "test_iwyu.cpp";

/// Fetch the path to include-what-you-use.
///
/// The specified `path` can be either
///
/// - a blank string, to search the `PATH` environment variable
/// - a path to the executable itself
/// - a path to a directory containing the executable
///
/// Each of [`IWYU_NAMES`] is tried in a search.
pub fn get_iwyu_exe(path: &str) -> Result<PathBuf, Error> {
    if path.is_empty() {
        for name in IWYU_NAMES {
            if let Ok(cmd) = which(name) {
                return Ok(cmd);
            }
        }
        return Err(Error::AnalyzerNotFound(String::from("in PATH")));
    }
    let hint = Path::new(path);
    if hint.is_file() {
        return Ok(hint.to_path_buf());
    }
    if hint.is_dir() {
        let cwd = current_dir().unwrap_or_else(|_| PathBuf::from("."));
        for name in IWYU_NAMES {
            if let Ok(cmd) = which_in(name, Some(hint), &cwd) {
                return Ok(cmd);
            }
        }
    }
    Err(Error::AnalyzerNotFound(format!("at {path}")))
}

/// The `share` directory of this package's source tree, for binaries run from
/// the build directory.
const SOURCE_SHARE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/share");

/// Finds the reference file for a wrapper installed in `exe_dir`.
///
/// The candidates, in order:
///
/// - `<exe_dir>/test_iwyu.cpp`
/// - `<exe_dir>/../share/test_iwyu.cpp` (a `bin/` + `share/` install prefix)
/// - `share/test_iwyu.cpp` in the source tree the wrapper was built from
///
/// If none exist, the error names the first candidate.
pub fn find_reference_file(exe_dir: &Path) -> Result<PathBuf, Error> {
    let next_to_exe = exe_dir.join(REFERENCE_FILE_NAME);
    let candidates = [
        next_to_exe.clone(),
        exe_dir.join("..").join("share").join(REFERENCE_FILE_NAME),
        Path::new(SOURCE_SHARE_DIR).join(REFERENCE_FILE_NAME),
    ];
    for candidate in candidates {
        if candidate.is_file() {
            log::debug!("Found reference file {}", candidate.to_string_lossy());
            return Ok(candidate);
        }
    }
    Err(Error::ReferenceFileMissing(next_to_exe))
}

/// The reference file for the wrapper's own (symlink resolved) executable.
/// See [`find_reference_file()`].
pub fn default_reference_file() -> Result<PathBuf, Error> {
    let exe = current_exe()
        .and_then(|exe| exe.canonicalize())
        .map_err(Error::CurrentExe)?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("."));
    find_reference_file(dir)
}

/// Something that can analyze one file and report an exit status.
///
/// [`IwyuCommand`] is the real thing; tests substitute their own.
pub trait Analyzer {
    /// Analyze `file` with the given analyzer `args`.
    fn analyze(&mut self, args: &[String], file: &Path) -> Result<i32, Error>;

    /// Analyze the reference file. Only the exit status is of interest here.
    fn probe(&mut self, reference_file: &Path) -> Result<i32, Error> {
        self.analyze(&[], reference_file)
    }
}

/// Runs an include-what-you-use executable as a child process.
#[derive(Debug, Clone)]
pub struct IwyuCommand {
    exe: PathBuf,
    filter_output: bool,
}

impl IwyuCommand {
    /// When `filter_output` is true, the child's output is captured and passed
    /// through [`output::format_output()`]. Otherwise the child inherits the
    /// wrapper's streams.
    pub fn new(exe: PathBuf, filter_output: bool) -> Self {
        IwyuCommand { exe, filter_output }
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    /// Show the executable's version info as debugging output.
    pub fn log_version(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        match Command::new(&self.exe).arg("--version").output() {
            Ok(output) => log::debug!(
                "{} --version\n{}",
                self.exe.to_string_lossy(),
                String::from_utf8_lossy(&output.stdout).trim_end()
            ),
            Err(e) => log::debug!("{} --version failed: {e}", self.exe.to_string_lossy()),
        }
    }

    fn command(&self, args: &[String], file: &Path) -> Command {
        let mut cmd = Command::new(&self.exe);
        cmd.args(args).arg(file);
        log::info!(
            "Running \"{} {}\"",
            cmd.get_program().to_string_lossy(),
            cmd.get_args()
                .map(|x| x.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        cmd
    }

    fn launch_error(&self) -> impl FnOnce(io::Error) -> Error + '_ {
        move |source| Error::Launch {
            program: self.exe.clone(),
            source,
        }
    }
}

impl Analyzer for IwyuCommand {
    fn analyze(&mut self, args: &[String], file: &Path) -> Result<i32, Error> {
        let mut cmd = self.command(args, file);
        if self.filter_output {
            let output = cmd.output().map_err(self.launch_error())?;
            let forwarded = forward_output(
                &output.stdout,
                &output.stderr,
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            );
            if let Err(e) = forwarded {
                log::warn!("Could not forward output for {}: {e}", file.to_string_lossy());
            }
            Ok(exit_code(output.status))
        } else {
            let status = cmd.status().map_err(self.launch_error())?;
            Ok(exit_code(status))
        }
    }

    fn probe(&mut self, reference_file: &Path) -> Result<i32, Error> {
        if self.filter_output {
            return self.analyze(&[], reference_file);
        }
        let status = self
            .command(&[], reference_file)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(self.launch_error())?;
        Ok(exit_code(status))
    }
}

/// Converts a child's [`ExitStatus`] into the integer the wrapper compares and
/// exits with.
///
/// A child killed by a signal reports `128 + signal`, like a shell would.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

/// Runs the `analyzer` once on the `reference_file` and returns the baseline exit
/// status every other file is compared against.
pub fn probe_baseline<A: Analyzer>(analyzer: &mut A, reference_file: &Path) -> Result<i32, Error> {
    if !reference_file.is_file() {
        return Err(Error::ReferenceFileMissing(reference_file.to_path_buf()));
    }
    analyzer.probe(reference_file)
}
