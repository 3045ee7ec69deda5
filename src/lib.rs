//! Girder - requirements traceability from JIRA Structure boards
//!
//! Girder rebuilds the hierarchical requirements tree (epics, stories,
//! sub-tasks) that a JIRA Structure board describes, and resolves which
//! requirements and tags apply to a given test result. The Structure
//! plugin serializes a board as a flat, depth-annotated token string;
//! girder turns that back into a forest and enriches every node from the
//! tracker.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to handlers)
//! - [`provider`] - Orchestrates fetch → parse → materialize → query, with a
//!   once-per-instance forest cache
//! - [`core`] - Domain types, formula parsing, requirement records, configuration
//! - [`tracker`] - Single interface for all tracker access (JIRA + Structure REST)
//!
//! # Correctness Invariants
//!
//! Girder maintains the following invariants:
//!
//! 1. The rebuilt forest preserves the formula's document order at every level
//! 2. The resolved forest is computed at most once per provider instance
//! 3. A missing issue is an expected outcome; every other tracker failure
//!    propagates to the caller
//!
//! # Library use
//!
//! The host reporting framework consumes the
//! [`provider::RequirementsTagProvider`] capability:
//!
//! ```ignore
//! use girder::core::config::Config;
//! use girder::core::types::TestOutcome;
//! use girder::provider::{RequirementsTagProvider, StructureRequirementsProvider};
//!
//! let provider = StructureRequirementsProvider::from_config(&Config::load()?.tracker()?);
//! let outcome = TestOutcome::named("checking out as guest").with_issue_keys(["#42"]);
//! let tags = provider.tags_for(&outcome).await?;
//! ```

pub mod cli;
pub mod core;
pub mod provider;
pub mod tracker;
