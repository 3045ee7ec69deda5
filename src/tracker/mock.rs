//! tracker::mock
//!
//! Mock tracker implementation for deterministic testing.
//!
//! # Design
//!
//! The mock tracker serves seeded issues and structures from memory,
//! records every operation for verification (the provider's caching
//! behavior is asserted by counting calls), and injects failures
//! per-method to exercise error paths.
//!
//! # Example
//!
//! ```
//! use girder::core::types::{IssueKey, StructureId};
//! use girder::tracker::mock::MockTracker;
//! use girder::tracker::{IssueLookup, IssueSummary, StructureSource};
//!
//! # tokio_test::block_on(async {
//! let tracker = MockTracker::new()
//!     .with_issue(IssueSummary {
//!         key: IssueKey::new("SHOP-1").unwrap(),
//!         issue_type: "epic".to_string(),
//!         summary: "Checkout".to_string(),
//!         description: String::new(),
//!         fix_versions: vec![],
//!     })
//!     .with_structure(StructureId::new(171).unwrap(), "101:0");
//!
//! let found = tracker
//!     .find_by_key(&IssueKey::new("SHOP-1").unwrap())
//!     .await
//!     .unwrap();
//! assert_eq!(found.unwrap().summary, "Checkout");
//!
//! assert_eq!(tracker.list_structure_ids().await.unwrap().len(), 1);
//! assert_eq!(tracker.operations().len(), 2);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{IssueLookup, IssueSummary, StructureSource, TrackerError};
use crate::core::types::{IssueKey, StructureId};

/// Mock tracker for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state,
/// so a test can keep a handle for assertions after moving a clone into
/// the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockTracker {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockTrackerInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockTrackerInner {
    /// Issues by lookup key.
    issues: HashMap<String, IssueSummary>,
    /// Structures in index order.
    structures: Vec<(StructureId, String)>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail find_by_key with the given error.
    FindByKey(TrackerError),
    /// Fail find_by_query with the given error.
    FindByQuery(TrackerError),
    /// Fail list_structure_ids with the given error.
    ListStructureIds(TrackerError),
    /// Fail formula with the given error.
    Formula(TrackerError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    FindByKey { key: String },
    FindByQuery { query: String },
    ListStructureIds,
    Formula { structure_id: StructureId },
}

impl MockTracker {
    /// Create an empty mock tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an issue, registered under its own key.
    pub fn with_issue(self, issue: IssueSummary) -> Self {
        {
            let mut inner = self.lock();
            inner.issues.insert(issue.key.as_str().to_string(), issue);
        }
        self
    }

    /// Seed an issue under an arbitrary lookup key (e.g. the tracker's
    /// internal numeric id, which structure formulas reference).
    pub fn with_issue_under(self, lookup_key: impl Into<String>, issue: IssueSummary) -> Self {
        {
            let mut inner = self.lock();
            inner.issues.insert(lookup_key.into(), issue);
        }
        self
    }

    /// Seed a structure board with its formula. Index order follows
    /// insertion order.
    pub fn with_structure(self, id: StructureId, formula: impl Into<String>) -> Self {
        {
            let mut inner = self.lock();
            inner.structures.push((id, formula.into()));
        }
        self
    }

    /// Configure one operation to fail.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.lock();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// All recorded operations, in call order.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Total number of service calls issued against this tracker.
    pub fn call_count(&self) -> usize {
        self.lock().operations.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockTrackerInner> {
        self.inner.lock().expect("mock tracker lock poisoned")
    }
}

#[async_trait]
impl IssueLookup for MockTracker {
    async fn find_by_key(&self, key: &IssueKey) -> Result<Option<IssueSummary>, TrackerError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::FindByKey {
            key: key.as_str().to_string(),
        });
        if let Some(FailOn::FindByKey(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(inner.issues.get(key.as_str()).cloned())
    }

    async fn find_by_query(&self, query: &str) -> Result<Vec<IssueSummary>, TrackerError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::FindByQuery {
            query: query.to_string(),
        });
        if let Some(FailOn::FindByQuery(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        // Only `key=<K>` queries are understood, matching how the core
        // uses the lookup service.
        let result = query
            .strip_prefix("key=")
            .and_then(|key| inner.issues.get(key).cloned());
        Ok(result.into_iter().collect())
    }
}

#[async_trait]
impl StructureSource for MockTracker {
    async fn list_structure_ids(&self) -> Result<Vec<StructureId>, TrackerError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::ListStructureIds);
        if let Some(FailOn::ListStructureIds(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(inner.structures.iter().map(|(id, _)| *id).collect())
    }

    async fn formula(&self, structure_id: StructureId) -> Result<String, TrackerError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::Formula { structure_id });
        if let Some(FailOn::Formula(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        inner
            .structures
            .iter()
            .find(|(id, _)| *id == structure_id)
            .map(|(_, formula)| formula.clone())
            .ok_or_else(|| TrackerError::Api {
                status: 404,
                message: format!("no structure {}", structure_id),
            })
    }
}
