//! This module holds the Command Line Interface design.
//!
//! Most of the command line belongs to include-what-you-use, so the wrapper only
//! claims a few tokens for itself: the `--no-error` flag (anywhere) and a handful
//! of `--name=value` options (before the `--` separator). Everything else is
//! split at the separator into analyzer flags and target files.

use std::path::PathBuf;

// non-std crates
use clap::builder::FalseyValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;

// project specific modules/crates
use crate::error::Error;

/// The flag that disables failing on a mismatched exit code.
pub const NO_ERROR_FLAG: &str = "--no-error";

/// The token that separates analyzer flags from the list of files.
pub const SEPARATOR: &str = "--";

/// Wrapper options that take a value. These are only recognized in the
/// `--name=value` form.
const VALUED_OPTIONS: [&str; 4] = ["iwyu-path", "reference-file", "filter-output", "verbosity"];

/// Builds and returns the argument parser for the wrapper's own options.
///
/// The parser never sees analyzer flags or file names; [`split_args()`] feeds it
/// only the tokens claimed by the wrapper.
pub fn get_arg_parser() -> Command {
    Command::new("iwyu-wrapper")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
        .arg(
            Arg::new("no-error")
                .long("no-error")
                .action(ArgAction::SetTrue)
                .long_help(
                    "Keep going when a file's include-what-you-use exit code differs
from the baseline. The wrapper then exits with 0 after all files are
analyzed. This flag may appear anywhere on the command line, even after
the ``--`` separator.
",
                ),
        )
        .arg(
            Arg::new("iwyu-path")
                .long("iwyu-path")
                .default_value("")
                .long_help(
                    "The include-what-you-use executable, or a directory containing it.

- Set this option to a blank string (``''``) to search the ``PATH``
  for ``iwyu`` and then ``include-what-you-use``.
- A directory is searched for the same two names and nothing else.
",
                ),
        )
        .arg(
            Arg::new("reference-file")
                .long("reference-file")
                .long_help(
                    "The known-good source file used to measure the baseline exit code.
Defaults to ``test_iwyu.cpp`` next to the wrapper's executable, then
``../share/test_iwyu.cpp`` relative to the executable's directory.
",
                ),
        )
        .arg(
            Arg::new("filter-output")
                .long("filter-output")
                .value_parser(FalseyValueParser::new())
                .default_value("true")
                .long_help(
                    "Set this option to false to let include-what-you-use write directly
to the terminal. When true, its output is captured, trimmed, and
dropped if it only reports correct includes.
",
                ),
        )
        .arg(
            Arg::new("verbosity")
                .long("verbosity")
                .value_parser(["debug", "info", "warn"])
                .default_value("warn")
                .long_help("The wrapper's own log level. Logs are written to stderr.
"),
        )
}

/// The wrapper's own settings, parsed from the tokens it claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct WrapperOptions {
    /// Where to look for include-what-you-use. Blank means the `PATH`.
    pub iwyu_path: String,

    /// An explicit reference file, if one was given.
    pub reference_file: Option<PathBuf>,

    /// Capture and filter the analyzer's output instead of inheriting streams.
    pub filter_output: bool,

    /// The max level passed to the logger.
    pub verbosity: LevelFilter,
}

impl WrapperOptions {
    fn from_matches(matches: &ArgMatches) -> Self {
        let verbosity = match matches.get_one::<String>("verbosity").map(String::as_str) {
            Some("debug") => LevelFilter::Debug,
            Some("info") => LevelFilter::Info,
            _ => LevelFilter::Warn,
        };
        WrapperOptions {
            iwyu_path: matches
                .get_one::<String>("iwyu-path")
                .cloned()
                .unwrap_or_default(),
            reference_file: matches.get_one::<String>("reference-file").map(PathBuf::from),
            filter_output: matches.get_flag("filter-output"),
            verbosity,
        }
    }
}

impl Default for WrapperOptions {
    fn default() -> Self {
        WrapperOptions {
            iwyu_path: String::new(),
            reference_file: None,
            filter_output: true,
            verbosity: LevelFilter::Warn,
        }
    }
}

/// The partitioned command line.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitArgs {
    /// Was `--no-error` given (at least once)?
    pub no_error: bool,

    /// Flags forwarded verbatim to every analyzer invocation.
    pub analyzer_args: Vec<String>,

    /// The files to analyze, in the order given.
    pub files: Vec<String>,

    /// The remaining wrapper settings.
    pub options: WrapperOptions,
}

/// Is `arg` one of the wrapper's `--name=value` options?
fn is_valued_option(arg: &str) -> bool {
    let Some(name_value) = arg.strip_prefix("--") else {
        return false;
    };
    VALUED_OPTIONS.iter().any(|name| {
        name_value
            .strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('='))
    })
}

/// Partitions the command line (without the program name) into wrapper options,
/// analyzer flags, and files.
///
/// `--no-error` is removed first, wherever it appears. What remains is split at
/// the `--` separator:
///
/// - no separator: everything is an analyzer flag and there are no files
/// - one separator: the prefix is flags, the suffix is files
/// - more than one: [`Error::MultipleSeparators`]
///
/// The wrapper's `--name=value` options are then taken out of the flags only;
/// everything after the separator is a file.
pub fn split_args(args: &[String]) -> Result<SplitArgs, Error> {
    let (no_error_flags, remaining): (Vec<&String>, Vec<&String>) =
        args.iter().partition(|arg| arg.as_str() == NO_ERROR_FLAG);

    let separators = remaining
        .iter()
        .enumerate()
        .filter(|(_, arg)| arg.as_str() == SEPARATOR)
        .map(|(index, _)| index)
        .collect::<Vec<_>>();
    let (flags, files) = match separators.as_slice() {
        [] => (remaining, vec![]),
        [index] => {
            let files = remaining[index + 1..].to_vec();
            let mut flags = remaining;
            flags.truncate(*index);
            (flags, files)
        }
        _ => return Err(Error::MultipleSeparators),
    };

    let (mut claimed, analyzer_args): (Vec<&String>, Vec<&String>) =
        flags.into_iter().partition(|arg| is_valued_option(arg));
    claimed.extend(no_error_flags);
    let matches = get_arg_parser().try_get_matches_from(claimed)?;
    Ok(SplitArgs {
        no_error: matches.get_flag("no-error"),
        analyzer_args: analyzer_args.into_iter().cloned().collect(),
        files: files.into_iter().cloned().collect(),
        options: WrapperOptions::from_matches(&matches),
    })
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use log::LevelFilter;

    use super::{get_arg_parser, split_args, SplitArgs, WrapperOptions, SEPARATOR};
    use crate::error::Error;

    fn split(input: &[&str]) -> Result<SplitArgs, Error> {
        let args = input.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        split_args(&args)
    }

    /// Puts the pieces back together the way they were given (minus wrapper options).
    fn rejoin(split: &SplitArgs, had_separator: bool) -> Vec<String> {
        let mut joined = split.analyzer_args.clone();
        if had_separator {
            joined.push(SEPARATOR.to_string());
        }
        joined.extend(split.files.iter().cloned());
        joined
    }

    #[test]
    fn flags_and_files() {
        let args = split(&["-Ifoo", "--", "a.cpp", "b.cpp"]).unwrap();
        assert!(!args.no_error);
        assert_eq!(args.analyzer_args, ["-Ifoo"]);
        assert_eq!(args.files, ["a.cpp", "b.cpp"]);
        assert_eq!(args.options, WrapperOptions::default());
    }

    #[test]
    fn no_separator_means_no_files() {
        let args = split(&["-Ifoo", "-Xiwyu", "--verbose=3"]).unwrap();
        assert_eq!(args.analyzer_args, ["-Ifoo", "-Xiwyu", "--verbose=3"]);
        assert!(args.files.is_empty());
    }

    #[test]
    fn empty_command_line() {
        let args = split(&[]).unwrap();
        assert!(args.analyzer_args.is_empty());
        assert!(args.files.is_empty());
        assert!(!args.no_error);
    }

    #[test]
    fn lone_separator() {
        let args = split(&["--"]).unwrap();
        assert!(args.analyzer_args.is_empty());
        assert!(args.files.is_empty());
    }

    #[test]
    fn no_error_anywhere() {
        for input in [
            vec!["--no-error", "-Ifoo", "--", "a.cpp"],
            vec!["-Ifoo", "--no-error", "--", "a.cpp"],
            vec!["-Ifoo", "--", "--no-error", "a.cpp"],
            vec!["-Ifoo", "--", "a.cpp", "--no-error"],
        ] {
            let args = split(&input).unwrap();
            assert!(args.no_error, "not detected in {input:?}");
            assert_eq!(args.analyzer_args, ["-Ifoo"]);
            assert_eq!(args.files, ["a.cpp"]);
        }
    }

    #[test]
    fn repeated_no_error_collapses() {
        let args = split(&["--no-error", "--", "a.cpp", "--no-error", "--no-error"]).unwrap();
        assert!(args.no_error);
        assert!(args.analyzer_args.is_empty());
        assert_eq!(args.files, ["a.cpp"]);
    }

    #[test]
    fn multiple_separators() {
        let err = split(&["--", "x", "--", "y"]).unwrap_err();
        assert!(matches!(err, Error::MultipleSeparators));
        assert_eq!(err.exit_code(), 10);
        assert!(matches!(
            split(&["-Ifoo", "--", "--", "a.cpp"]),
            Err(Error::MultipleSeparators)
        ));
    }

    #[test]
    fn no_error_is_stripped_before_separator_search() {
        // `--no-error` must not be mistaken for, or hide, a separator
        let args = split(&["--no-error", "--"]).unwrap();
        assert!(args.no_error);
        assert!(args.analyzer_args.is_empty());
        assert!(args.files.is_empty());
    }

    #[test]
    fn rejoined_parts_match_input() {
        let cases: [(&[&str], bool); 4] = [
            (&["-Ifoo", "-DBAR=1", "--", "a.cpp", "b.cpp"], true),
            (&["-Ifoo", "-DBAR=1"], false),
            (&["--", "a.cpp"], true),
            (&["-std=c++17", "--"], true),
        ];
        for (input, had_separator) in cases {
            let args = split(input).unwrap();
            assert_eq!(rejoin(&args, had_separator), input);
        }
    }

    #[test]
    fn wrapper_options() {
        let args = split(&[
            "--iwyu-path=/opt/iwyu/bin",
            "-Ifoo",
            "--verbosity=debug",
            "--filter-output=false",
            "--reference-file=ref.cpp",
            "--",
            "a.cpp",
        ])
        .unwrap();
        assert_eq!(args.analyzer_args, ["-Ifoo"]);
        assert_eq!(args.files, ["a.cpp"]);
        assert_eq!(
            args.options,
            WrapperOptions {
                iwyu_path: String::from("/opt/iwyu/bin"),
                reference_file: Some(PathBuf::from("ref.cpp")),
                filter_output: false,
                verbosity: LevelFilter::Debug,
            }
        );
    }

    #[test]
    fn options_after_separator_are_files() {
        let args = split(&["--", "--verbosity=debug"]).unwrap();
        assert!(args.analyzer_args.is_empty());
        assert_eq!(args.files, ["--verbosity=debug"]);
        assert_eq!(args.options, WrapperOptions::default());

        let input = ["-Ifoo", "--", "--reference-file=odd.cpp", "a.cpp", "--iwyu-path=x"];
        let args = split(&input).unwrap();
        assert_eq!(args.files, ["--reference-file=odd.cpp", "a.cpp", "--iwyu-path=x"]);
        assert_eq!(args.options.reference_file, None);
        assert_eq!(rejoin(&args, true), input);
    }

    #[test]
    fn invalid_value_after_separator_is_a_file() {
        let args = split(&["--", "--verbosity=loud"]).unwrap();
        assert_eq!(args.files, ["--verbosity=loud"]);
    }

    #[test]
    fn unjoined_option_names_are_analyzer_flags() {
        // only the `--name=value` form belongs to the wrapper
        let args = split(&["--verbosity", "--iwyu-path-extra=1", "--", "a.cpp"]).unwrap();
        assert_eq!(args.analyzer_args, ["--verbosity", "--iwyu-path-extra=1"]);
        assert_eq!(args.options, WrapperOptions::default());
    }

    #[test]
    fn invalid_option_value() {
        let err = split(&["--verbosity=loud", "--", "a.cpp"]).unwrap_err();
        assert!(matches!(err, Error::InvalidOption { .. }));
        assert_eq!(err.exit_code(), 10);
        let message = err.to_string();
        assert!(message.contains("--verbosity=loud"), "{message}");
        assert!(!message.contains("<verbosity>"), "{message}");
    }

    #[test]
    fn parser_defaults() {
        let matches = get_arg_parser().get_matches_from(Vec::<String>::new());
        assert!(!matches.get_flag("no-error"));
        assert!(matches.get_flag("filter-output"));
        assert_eq!(matches.get_one::<String>("iwyu-path").unwrap(), "");
        assert!(matches.get_one::<String>("reference-file").is_none());
    }
}
