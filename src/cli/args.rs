//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};

/// Girder - requirements traceability from JIRA Structure boards
#[derive(Parser, Debug)]
#[command(name = "girder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the Structure boards available on the tracker
    #[command(
        name = "structures",
        long_about = "List the Structure boards available on the tracker.\n\n\
            The first board in this listing is the one `tree` loads when no \
            explicit structure id is configured.",
        after_help = "\
EXAMPLES:
    # Show available boards
    girder structures"
    )]
    Structures,

    /// Print the resolved requirements tree
    #[command(
        name = "tree",
        long_about = "Print the resolved requirements tree.\n\n\
            Fetches the board's forest formula, rebuilds the hierarchy, and \
            resolves every node into a requirement via the tracker. Nodes \
            whose issues no longer exist are dropped (run with --debug to \
            see them).",
        after_help = "\
EXAMPLES:
    # Resolve the default (configured or first) board
    girder tree

    # Resolve a specific board
    girder tree --structure 171

    # Machine-readable output
    girder tree --json"
    )]
    Tree {
        /// Structure id to load (overrides configuration)
        #[arg(long, value_name = "ID")]
        structure: Option<i64>,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve traceability tags for issue keys
    #[command(
        name = "tags",
        long_about = "Resolve traceability tags for one or more issue keys, \
            as a reporting run would for a test outcome carrying them.\n\n\
            Keys may be fully qualified (SHOP-42), bare numeric (42), or \
            hash-prefixed (#42); bare numbers are qualified with the \
            configured project key.",
        after_help = "\
EXAMPLES:
    # Tags for a single story
    girder tags SHOP-42

    # Union of tags across several issues
    girder tags SHOP-42 '#17'"
    )]
    Tags {
        /// Issue keys as they appear on test outcomes
        #[arg(required = true, value_name = "KEY")]
        keys: Vec<String>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for girder.",
        after_help = "\
EXAMPLES:
    # Bash
    girder completion bash > /etc/bash_completion.d/girder

    # Zsh
    girder completion zsh > ~/.zfunc/_girder"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
