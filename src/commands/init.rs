//! `--init` mode: reset version-control history for a new component.

use std::path::Path;

use tracing::info;

use crate::context::ServiceContext;
use crate::error::{DeltaError, Result};
use crate::files::IGNORE_FILE;

/// Commit message of the fresh snapshot.
pub const INITIAL_COMMIT_MESSAGE: &str = "Initial commit";

/// Ignore rules seeded into a component that has no `.gitignore`.
pub const DEFAULT_IGNORE_RULES: &str = "\
/node_modules
/.pnp
.pnp.*
.yarn/*
!.yarn/patches
!.yarn/plugins
!.yarn/releases
!.yarn/versions

# testing
/coverage

# next.js
/.next/
/out/

# production
/build

# misc
.DS_Store
*.pem

# debug
npm-debug.log*
yarn-debug.log*
yarn-error.log*

# env files
.env*

# vercel
.vercel

# typescript
*.tsbuildinfo
next-env.d.ts
";

/// What [`bootstrap`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOutcome {
    /// Whether a default `.gitignore` was written.
    pub created_ignore_file: bool,
    /// Whether existing history was discarded.
    pub removed_history: bool,
}

/// Print progress while bootstrapping `root`.
///
/// # Errors
///
/// Returns an error string if any step fails.
pub fn run(ctx: &ServiceContext, root: &Path) -> std::result::Result<(), String> {
    println!("Initializing git repository for new component");
    let outcome = bootstrap(ctx, root).map_err(|e| e.to_string())?;
    if outcome.created_ignore_file {
        println!("{IGNORE_FILE} file created with default rules.");
    } else {
        println!("{IGNORE_FILE} file already exists.");
    }
    Ok(())
}

/// Seed the ignore file, discard any existing history, then record the
/// whole working tree as the first snapshot.
///
/// The ignore file is written first so the snapshot honors it.
///
/// # Errors
///
/// Returns [`DeltaError::Collaborator`] if a file operation or a git step
/// fails.
pub fn bootstrap(ctx: &ServiceContext, root: &Path) -> Result<InitOutcome> {
    let created_ignore_file = ensure_ignore_file(ctx, root)?;

    let history = root.join(".git");
    let removed_history = ctx.fs.exists(&history);
    if removed_history {
        ctx.fs.remove_dir_all(&history).map_err(|e| DeltaError::collaborator("init", e))?;
    }

    ctx.git
        .reinitialize(root, INITIAL_COMMIT_MESSAGE)
        .map_err(|e| DeltaError::collaborator("init", e))?;
    info!(root = %root.display(), created_ignore_file, removed_history, "component initialized");

    Ok(InitOutcome { created_ignore_file, removed_history })
}

/// Write [`DEFAULT_IGNORE_RULES`] unless `root` already has an ignore file.
/// Returns whether the file was written.
///
/// # Errors
///
/// Returns [`DeltaError::Collaborator`] if the file cannot be written.
pub fn ensure_ignore_file(ctx: &ServiceContext, root: &Path) -> Result<bool> {
    let path = root.join(IGNORE_FILE);
    if ctx.fs.exists(&path) {
        return Ok(false);
    }
    ctx.fs.write(&path, DEFAULT_IGNORE_RULES).map_err(|e| DeltaError::collaborator("init", e))?;
    Ok(true)
}
