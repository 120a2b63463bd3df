//! This module holds functionality specific to filtering include-what-you-use's
//! output before it is forwarded.

use std::io::{self, Write};

/// The phrase include-what-you-use prints for a file that needs no changes.
pub const CORRECT_INCLUDES_MARKER: &str = " has correct #includes/fwd-decls";

/// Decodes and trims a captured stream.
///
/// Returns [`None`] if there is nothing worth showing: the text is blank or it is
/// only the analyzer's report of correct includes.
pub fn format_output(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    if text.is_empty() || text.contains(CORRECT_INCLUDES_MARKER) {
        None
    } else {
        Some(text.to_string())
    }
}

/// Writes the captured streams that survive [`format_output()`] to `out` and
/// `err` respectively (normally the wrapper's own stdout and stderr).
pub fn forward_output(
    stdout: &[u8],
    stderr: &[u8],
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    if let Some(text) = format_output(stdout) {
        writeln!(out, "{text}")?;
        out.flush()?;
    }
    if let Some(text) = format_output(stderr) {
        writeln!(err, "{text}")?;
        err.flush()?;
    }
    Ok(())
}
