//! tracker
//!
//! Abstraction for the remote issue tracker.
//!
//! # Architecture
//!
//! The core consumes two narrow async traits - [`IssueLookup`] and
//! [`StructureSource`] - and never names a concrete client. The
//! [`jira`] module implements both against JIRA's REST API and the
//! Structure plugin; [`mock`] provides a deterministic in-memory
//! implementation for tests.
//!
//! # Modules
//!
//! - `traits`: the service traits, [`IssueSummary`] DTO, and [`TrackerError`]
//! - [`jira`]: reqwest-backed JIRA implementation
//! - [`mock`]: mock implementation for deterministic testing
//! - `factory`: tracker construction from configuration
//!
//! # Example
//!
//! ```ignore
//! use girder::core::config::Config;
//! use girder::tracker::create_tracker;
//!
//! let tracker = create_tracker(&Config::load()?.tracker()?);
//! let ids = tracker.list_structure_ids().await?;
//! println!("{} structures", ids.len());
//! ```

mod factory;
pub mod jira;
pub mod mock;
mod traits;

pub use factory::create_tracker;
pub use traits::*;
