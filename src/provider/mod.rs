//! provider
//!
//! The Structure-backed requirements provider.
//!
//! # Architecture
//!
//! [`StructureRequirementsProvider`] orchestrates the pipeline: select a
//! structure board, fetch its formula, parse it
//! ([`crate::core::formula`]), materialize it ([`materialize()`]), and
//! cache the resolved forest for the life of the instance. The
//! traceability queries of the [`RequirementsTagProvider`] capability run
//! against that cache.
//!
//! # Caching
//!
//! The forest is computed at most once per provider. The cache cell has
//! single-flight semantics: concurrent first callers serialize on the
//! initializer and share its result; later callers get the cached `Arc`
//! without touching the tracker.
//!
//! # Example
//!
//! ```ignore
//! use girder::core::config::Config;
//! use girder::provider::{RequirementsTagProvider, StructureRequirementsProvider};
//!
//! let provider = StructureRequirementsProvider::from_config(&Config::load()?.tracker()?);
//! let forest = provider.requirements().await?;
//! println!("{} top-level requirements", forest.len());
//! ```

pub mod materialize;
pub mod tags;
mod traits;

pub use materialize::{materialize, requirement_from};
pub use tags::VERSION_TAG_TYPE;
pub use traits::RequirementsTagProvider;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::core::config::TrackerConfig;
use crate::core::formula::{parse_formula, FormulaError};
use crate::core::requirement::{flatten, Requirement};
use crate::core::types::{StructureId, TestOutcome, TestTag};
use crate::tracker::{create_tracker, IssueLookup, Tracker, TrackerError};

/// Errors from provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No structure id was configured and the tracker lists no boards.
    #[error("no structure available: none configured and the tracker lists none")]
    NoStructure,

    /// The structure's formula could not be parsed into a forest.
    #[error(transparent)]
    Formula(#[from] FormulaError),

    /// A tracker operation failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Requirements provider backed by a tracker's Structure board.
///
/// Holds the service handle, the project key used to qualify bare issue
/// references, an optional explicit structure id, and the once-computed
/// requirements forest.
pub struct StructureRequirementsProvider {
    tracker: Arc<dyn Tracker>,
    project_key: String,
    structure_id: Option<StructureId>,
    requirements: OnceCell<Arc<Vec<Requirement>>>,
}

impl StructureRequirementsProvider {
    /// Create a provider over an existing tracker handle.
    pub fn new(
        tracker: Arc<dyn Tracker>,
        project_key: impl Into<String>,
        structure_id: Option<StructureId>,
    ) -> Self {
        Self {
            tracker,
            project_key: project_key.into(),
            structure_id,
            requirements: OnceCell::new(),
        }
    }

    /// Create a provider from resolved configuration.
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(
            create_tracker(config),
            config.project.clone(),
            config.structure_id,
        )
    }

    /// The project key bare numeric issue references are qualified with.
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// The structure id to load: the configured one, or the first board
    /// in the tracker's index.
    async fn select_structure(&self) -> Result<StructureId, ProviderError> {
        if let Some(id) = self.structure_id {
            return Ok(id);
        }
        let ids = self.tracker.list_structure_ids().await?;
        ids.first().copied().ok_or(ProviderError::NoStructure)
    }

    /// Fetch, parse, and materialize the forest. Runs at most once.
    async fn load_requirements(&self) -> Result<Arc<Vec<Requirement>>, ProviderError> {
        let structure_id = self.select_structure().await?;
        debug!(%structure_id, "loading requirements structure");
        let formula = self.tracker.formula(structure_id).await?;
        let forest = parse_formula(&formula)?;
        let lookup: &dyn IssueLookup = self.tracker.as_ref();
        let requirements = materialize(lookup, &forest).await?;
        debug!(
            %structure_id,
            roots = requirements.len(),
            "requirements structure loaded"
        );
        Ok(Arc::new(requirements))
    }

    /// Derive the tag set for one raw issue key.
    async fn tags_from_issue(&self, raw_key: &str) -> Result<Vec<TestTag>, ProviderError> {
        let requirements = self.requirements().await?;
        let flattened = flatten(&requirements);
        let lookup: &dyn IssueLookup = self.tracker.as_ref();
        let tags =
            tags::tags_from_issue(lookup, &flattened, &self.project_key, raw_key).await?;
        Ok(tags)
    }
}

#[async_trait]
impl RequirementsTagProvider for StructureRequirementsProvider {
    async fn requirements(&self) -> Result<Arc<Vec<Requirement>>, ProviderError> {
        self.requirements
            .get_or_try_init(|| self.load_requirements())
            .await
            .cloned()
    }

    async fn requirement_for(&self, tag: &TestTag) -> Result<Option<Requirement>, ProviderError> {
        let requirements = self.requirements().await?;
        // First match in document order wins when names repeat.
        Ok(flatten(&requirements)
            .into_iter()
            .find(|requirement| {
                requirement.requirement_type() == tag.tag_type()
                    && requirement.name() == tag.name()
            })
            .cloned())
    }

    async fn parent_requirement_of(
        &self,
        outcome: &TestOutcome,
    ) -> Result<Option<Requirement>, ProviderError> {
        let Some(first_key) = outcome.issue_keys().first() else {
            return Ok(None);
        };
        let issues = self
            .tracker
            .find_by_query(&format!("key={}", first_key))
            .await?;
        Ok(issues.first().map(requirement_from))
    }

    async fn tags_for(&self, outcome: &TestOutcome) -> Result<HashSet<TestTag>, ProviderError> {
        let mut tags = HashSet::new();
        for raw_key in outcome.issue_keys() {
            tags.extend(self.tags_from_issue(raw_key).await?);
        }
        Ok(tags)
    }
}
