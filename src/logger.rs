//! A module to initialize and customize the logger object.
//!
//! Log lines go to stderr; stdout is reserved for what include-what-you-use
//! reports.

// non-std crates
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// A private constant to manage the application's logger object.
static LOGGER: SimpleLogger = SimpleLogger;

/// A function to initialize the private `LOGGER` with the given max `level`.
///
/// If a logger is already installed (the library may be driven more than once in
/// one process), only the max level is updated and the [`SetLoggerError`] is
/// returned.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let result = log::set_logger(&LOGGER);
    log::set_max_level(level);
    result
}
