//! tracker::traits
//!
//! Service traits for the remote issue tracker.
//!
//! # Design
//!
//! The core never talks HTTP directly; it consumes two narrow async
//! traits. [`IssueLookup`] resolves issue keys and queries into flat
//! [`IssueSummary`] records; [`StructureSource`] lists the tracker's
//! Structure boards and fetches their flat forest formulas. Both are async
//! because implementations involve network I/O, and `Send + Sync` so a
//! provider can be shared across tasks.
//!
//! # "Not found" vs. faults
//!
//! A missing issue is an expected outcome, not an error: implementations
//! must render the tracker's "no such issue" responses as `Ok(None)` /
//! `Ok(vec![])`. Every [`TrackerError`] is a genuine fault and is never
//! swallowed by callers.

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{IssueKey, StructureId};

/// Errors from tracker operations.
///
/// These map to common failure modes when talking to a remote tracker.
/// "Not found" is deliberately absent: it is an `Option`/empty-list result,
/// not an error.
#[derive(Debug, Clone, Error)]
pub enum TrackerError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid credentials, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// The tracker returned an error response.
    #[error("tracker error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the tracker
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// The tracker's response could not be interpreted.
    #[error("malformed tracker response: {0}")]
    Malformed(String),
}

/// A flat issue record as returned by the tracker.
///
/// This is the only shape the core consumes; requirement records are built
/// from it during materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    /// Fully qualified issue key (e.g. `SHOP-12`)
    pub key: IssueKey,
    /// Issue type name (e.g. `epic`, `story`)
    pub issue_type: String,
    /// One-line summary
    pub summary: String,
    /// Rendered description; empty when the issue has none
    pub description: String,
    /// Fix-version labels
    pub fix_versions: Vec<String>,
}

/// Resolve issue keys and queries into flat issue summaries.
///
/// # Errors
///
/// Implementations return `Ok(None)` / `Ok(vec![])` for issues the tracker
/// does not know, and a [`TrackerError`] for every other failure.
#[async_trait]
pub trait IssueLookup: Send + Sync {
    /// Resolve one issue by key or internal id.
    ///
    /// `Ok(None)` means the tracker has no such issue.
    async fn find_by_key(&self, key: &IssueKey) -> Result<Option<IssueSummary>, TrackerError>;

    /// Resolve a query expression (e.g. `key=SHOP-12`) to zero or more
    /// summaries.
    ///
    /// A query the tracker rejects as referencing a nonexistent issue is a
    /// legal "no result" outcome and yields an empty list.
    async fn find_by_query(&self, query: &str) -> Result<Vec<IssueSummary>, TrackerError>;
}

/// List Structure boards and fetch their forest formulas.
#[async_trait]
pub trait StructureSource: Send + Sync {
    /// Available structure ids; the order defines the default selection.
    async fn list_structure_ids(&self) -> Result<Vec<StructureId>, TrackerError>;

    /// The flat depth-annotated token string for one structure's forest.
    async fn formula(&self, structure_id: StructureId) -> Result<String, TrackerError>;
}

/// Combined tracker capability the provider depends on.
///
/// Blanket-implemented for anything that offers both halves, so a single
/// client (or a single mock) satisfies it.
pub trait Tracker: IssueLookup + StructureSource {}

impl<T: IssueLookup + StructureSource> Tracker for T {}
