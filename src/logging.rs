//! Logging initialization.
//!
//! Diagnostics go to stderr so that stdout carries only the report.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "PKGDELTA_LOG";

/// Logging verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Warnings and errors only.
    Quiet,
    /// Debug events from every pipeline stage.
    Verbose,
}

impl Profile {
    fn default_directive(self) -> &'static str {
        match self {
            Self::Quiet => "pkgdelta=warn",
            Self::Verbose => "pkgdelta=debug",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility.
///
/// `PKGDELTA_LOG` overrides the profile's default filter. Later calls are
/// no-ops, as is a call made after another subscriber was installed.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(profile.default_directive()));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
