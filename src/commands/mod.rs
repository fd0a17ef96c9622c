//! Command dispatch and handlers.

pub mod diff;
pub mod init;

use std::env;
use std::path::{Path, PathBuf};

use crate::cassette::session::RecordingSession;
use crate::cli::Cli;
use crate::context::ServiceContext;

/// Environment variable naming a directory to record port interactions into.
pub const RECORD_ENV: &str = "PKGDELTA_RECORD";

/// Dispatch parsed arguments to the selected mode.
///
/// When `PKGDELTA_RECORD` is set to a directory path, all port interactions
/// are recorded to per-port cassette files below that directory.
///
/// # Errors
///
/// Returns an error string if the component root is inaccessible or the
/// selected mode fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let root = resolve_root(cli.root.as_deref())?;
    let (ctx, session) = if let Ok(path) = env::var(RECORD_ENV) {
        let (ctx, session) = ServiceContext::recording_at(Path::new(&path), &root)?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(), None)
    };

    let result = dispatch_with_context(cli, &ctx, &root);

    // Finish recording even when the mode failed
    if let Some(session) = session {
        // Release the recorders' Arc references first
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

fn dispatch_with_context(cli: &Cli, ctx: &ServiceContext, root: &Path) -> Result<(), String> {
    if cli.init {
        init::run(ctx, root)
    } else {
        diff::run(ctx, &diff::DiffOptions::from_cli(cli, root))
    }
}

/// Resolve the component root, defaulting to the current directory.
///
/// # Errors
///
/// Returns an error string if the directory does not exist.
pub fn resolve_root(root: Option<&Path>) -> Result<PathBuf, String> {
    let root = match root {
        Some(root) => root.to_path_buf(),
        None => env::current_dir().map_err(|e| format!("cannot read current directory: {e}"))?,
    };
    std::fs::canonicalize(&root)
        .map_err(|e| format!("cannot access component root {}: {e}", root.display()))
}

/// Finish a recording session and print the output directory.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}
