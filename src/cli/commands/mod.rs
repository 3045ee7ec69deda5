//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Resolves configuration and builds a provider
//! 3. Runs the async query and formats the output
//!
//! Tracker-facing commands are async because they involve network I/O.
//! Handlers create a tokio runtime and `block_on` within the sync
//! dispatch, keeping `main` free of async plumbing.

mod completion;
mod structures;
mod tags;
mod tree;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use structures::structures;
pub use tags::tags;
pub use tree::tree;

use anyhow::{Context as _, Result};

use super::args::Command;
use super::Context;
use crate::core::config::{Config, TrackerConfig};
use crate::provider::StructureRequirementsProvider;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Structures => structures::structures(ctx),
        Command::Tree { structure, json } => tree::tree(ctx, structure, json),
        Command::Tags { keys } => tags::tags(ctx, &keys),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Resolve tracker configuration from the standard sources.
pub(crate) fn tracker_config() -> Result<TrackerConfig> {
    Config::load()
        .context("failed to load configuration")?
        .tracker()
        .context("tracker is not configured (set tracker.url and tracker.project, or JIRA_URL and JIRA_PROJECT)")
}

/// Build a provider from the standard configuration sources.
pub(crate) fn provider() -> Result<StructureRequirementsProvider> {
    Ok(StructureRequirementsProvider::from_config(&tracker_config()?))
}
