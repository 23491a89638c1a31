//! Terminal reporting for `qtcli new`.
//!
//! Created files and notices go to stdout, generator failures to stderr. In
//! console mode the rendered files are echoed to stdout by the generator
//! itself; only the summary lines come through here. `anstream` drops the
//! `anstyle` colors when the stream is not a terminal, so piped output stays
//! plain.

mod styles;

use std::io::Write;

pub(crate) use styles::clap_styles;

use styles::{ERROR, HINT, SUCCESS, WARNING};

/// Report one file written under the output directory.
pub(crate) fn success(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{SUCCESS}✓{SUCCESS:#} {msg}").ok();
}

/// Report a failed generation on stderr.
pub(crate) fn error(msg: impl std::fmt::Display) {
    let mut out = anstream::stderr().lock();
    writeln!(out, "{ERROR}✗ error:{ERROR:#} {msg}").ok();
}

/// A run that finished without producing anything.
pub(crate) fn warning(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{WARNING}! {msg}{WARNING:#}").ok();
}

/// Dimmed follow-up line explaining the preceding warning.
pub(crate) fn hint(msg: impl std::fmt::Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "  {HINT}{msg}{HINT:#}").ok();
}
