//! provider::traits
//!
//! The requirements-tag-provider capability consumed by the host
//! reporting framework.
//!
//! # Design
//!
//! The host framework asks one question per report pass: which
//! requirements and tags apply to this test outcome? Modeling that as a
//! small trait lets alternative backends (a different tracker, a flat
//! file, a fixture) satisfy the same capability without inheritance;
//! [`StructureRequirementsProvider`] is the Structure-backed
//! implementation.
//!
//! [`StructureRequirementsProvider`]: crate::provider::StructureRequirementsProvider

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use super::ProviderError;
use crate::core::requirement::Requirement;
use crate::core::types::{TestOutcome, TestTag};

/// Traceability queries over a reconstructed requirements forest.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; report generation fans out
/// across async tasks.
///
/// # Error handling
///
/// "Not found" outcomes are `None`/empty values. Every `Err` is a genuine
/// fault (tracker unreachable, malformed structure) and aborts the query
/// that triggered it.
#[async_trait]
pub trait RequirementsTagProvider: Send + Sync {
    /// The resolved requirements forest, computed at most once per
    /// provider instance.
    async fn requirements(&self) -> Result<Arc<Vec<Requirement>>, ProviderError>;

    /// The first requirement in document order whose (type, name) match
    /// the tag's.
    async fn requirement_for(&self, tag: &TestTag) -> Result<Option<Requirement>, ProviderError>;

    /// The requirement behind the outcome's first associated issue, looked
    /// up directly on the tracker.
    async fn parent_requirement_of(
        &self,
        outcome: &TestOutcome,
    ) -> Result<Option<Requirement>, ProviderError>;

    /// The union of traceability tags for every issue key on the outcome.
    async fn tags_for(&self, outcome: &TestOutcome) -> Result<HashSet<TestTag>, ProviderError>;
}
