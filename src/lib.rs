//! Core library entry for the `pkgdelta` CLI.
//!
//! `pkgdelta` reports what changed in a versioned component since a
//! reference point: which files were added, modified, or removed, and
//! whether the project manifest changed along with its parsed contents.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod context;
pub mod delta;
pub mod error;
pub mod files;
pub mod logging;
pub mod manifest;
pub mod model;
pub mod ports;
pub mod scan;

pub use delta::engine::compute_diff;
pub use delta::{DiffReport, ManifestDetails};
pub use error::DeltaError;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// Help and version requests print to stdout and succeed.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or the selected mode
/// fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            err.print().map_err(|e| e.to_string())?;
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    logging::init(if cli.verbose { logging::Profile::Verbose } else { logging::Profile::Quiet });
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_prints_help() {
        assert!(run(["pkgdelta", "--help"]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_flag() {
        let err = run(["pkgdelta", "--bogus"]).unwrap_err();
        assert!(err.contains("--bogus"));
    }

    #[test]
    fn run_errors_on_missing_root() {
        let err = run(["pkgdelta", "-C", "/definitely/not/a/component"]).unwrap_err();
        assert!(err.contains("cannot access component root"));
    }
}
