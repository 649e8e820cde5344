//! Helpers for classifying clap errors.

use clap::{Error as ClapError, error::ErrorKind};

/// Returns `true` when a [`clap::Error`] corresponds to `--help` or
/// `--version`.
///
/// Clap surfaces these requests as errors so that callers using
/// `try_parse_from` can still print the output and exit with status zero.
#[must_use]
pub fn is_display_request(err: &ClapError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}
