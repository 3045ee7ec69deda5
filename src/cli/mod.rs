//! cli
//!
//! Command-line interface layer for girder.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the tracing subscriber
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers that drive the [`crate::provider`] and [`crate::tracker`]
//! modules; no tracker access happens outside those modules.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Per-invocation context shared by command handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context {
    /// Debug logging enabled
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.debug);

    let ctx = Context {
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}

/// Install the tracing subscriber.
///
/// `--debug` forces crate-level debug output; otherwise `RUST_LOG`
/// controls filtering. Diagnostics go to stderr so command output stays
/// pipeable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("girder=debug")
    } else {
        EnvFilter::from_default_env()
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
