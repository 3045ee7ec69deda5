//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`IssueKey`] - Validated tracker issue key (`PROJ-42` or a numeric id)
//! - [`StructureId`] - Identifier of a Structure board on the tracker
//! - [`TestTag`] - A (name, type) label attached to a test outcome
//! - [`TestOutcome`] - A single test execution result with its issue keys
//!
//! # Validation
//!
//! `IssueKey` enforces validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use girder::core::types::{IssueKey, TestTag};
//!
//! // Valid constructions
//! let key = IssueKey::new("PROJ-42").unwrap();
//! assert_eq!(key.as_str(), "PROJ-42");
//!
//! // Raw outcome keys are normalized against a project key
//! let normalized = IssueKey::normalized("#42", "PROJ").unwrap();
//! assert_eq!(normalized.as_str(), "PROJ-42");
//!
//! // Invalid constructions fail at creation time
//! assert!(IssueKey::new("").is_err());
//! assert!(IssueKey::new("has space").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid issue key: {0}")]
    InvalidIssueKey(String),

    #[error("invalid structure id: {0}")]
    InvalidStructureId(String),
}

/// A validated tracker issue key.
///
/// Issue keys are either fully qualified (`PROJ-42`) or a bare numeric
/// internal id (`10234`), which trackers accept interchangeably in issue
/// endpoints. Keys must be non-empty and free of whitespace.
///
/// # Example
///
/// ```
/// use girder::core::types::IssueKey;
///
/// let key = IssueKey::new("PROJ-42").unwrap();
/// assert_eq!(key.as_str(), "PROJ-42");
///
/// let by_id = IssueKey::new("10234").unwrap();
/// assert_eq!(by_id.as_str(), "10234");
///
/// assert!(IssueKey::new("").is_err());
/// assert!(IssueKey::new("PROJ 42").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IssueKey(String);

impl IssueKey {
    /// Create a new validated issue key.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidIssueKey` if the key is empty or contains
    /// whitespace.
    pub fn new(key: impl Into<String>) -> Result<Self, TypeError> {
        let key = key.into();
        Self::validate(&key)?;
        Ok(Self(key))
    }

    /// Create an issue key from a tracker-internal numeric id.
    ///
    /// Structure formulas reference issues by internal id; trackers resolve
    /// those ids through the same issue endpoints as qualified keys.
    pub fn from_id(id: u64) -> Self {
        Self(id.to_string())
    }

    /// Normalize a raw key as it appears on a test outcome.
    ///
    /// Strips a leading `#`, then qualifies a purely numeric remainder with
    /// the project key and a `-` separator.
    ///
    /// # Example
    ///
    /// ```
    /// use girder::core::types::IssueKey;
    ///
    /// assert_eq!(IssueKey::normalized("#42", "PROJ").unwrap().as_str(), "PROJ-42");
    /// assert_eq!(IssueKey::normalized("42", "PROJ").unwrap().as_str(), "PROJ-42");
    /// assert_eq!(IssueKey::normalized("PROJ-42", "PROJ").unwrap().as_str(), "PROJ-42");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidIssueKey` if the normalized key is still
    /// invalid (e.g. the raw key was `"#"` alone).
    pub fn normalized(raw: &str, project_key: &str) -> Result<Self, TypeError> {
        let stripped = raw.strip_prefix('#').unwrap_or(raw);
        if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
            Self::new(format!("{}-{}", project_key, stripped))
        } else {
            Self::new(stripped)
        }
    }

    fn validate(key: &str) -> Result<(), TypeError> {
        if key.is_empty() {
            return Err(TypeError::InvalidIssueKey(
                "issue key cannot be empty".into(),
            ));
        }
        if key.chars().any(|c| c.is_whitespace()) {
            return Err(TypeError::InvalidIssueKey(format!(
                "issue key '{}' contains whitespace",
                key
            )));
        }
        Ok(())
    }

    /// Get the issue key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for IssueKey {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<IssueKey> for String {
    fn from(key: IssueKey) -> Self {
        key.0
    }
}

impl AsRef<str> for IssueKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IssueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a Structure board on the tracker.
///
/// The Structure plugin numbers its boards with positive integers; the
/// index endpoint defines their natural order.
///
/// # Example
///
/// ```
/// use girder::core::types::StructureId;
///
/// let id = StructureId::new(171).unwrap();
/// assert_eq!(id.get(), 171);
///
/// assert!(StructureId::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct StructureId(i64);

impl StructureId {
    /// Create a new structure id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidStructureId` if the id is not positive.
    pub fn new(id: i64) -> Result<Self, TypeError> {
        if id <= 0 {
            return Err(TypeError::InvalidStructureId(format!(
                "structure id must be positive, got {}",
                id
            )));
        }
        Ok(Self(id))
    }

    /// Get the raw id.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for StructureId {
    type Error = TypeError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<StructureId> for i64 {
    fn from(id: StructureId) -> Self {
        id.0
    }
}

impl std::fmt::Display for StructureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (name, type) label attached to a test outcome for filtering and
/// reporting.
///
/// Tags are value types: two tags are equal when both name and type match.
///
/// # Example
///
/// ```
/// use girder::core::types::TestTag;
///
/// let tag = TestTag::new("User registration", "epic");
/// assert_eq!(tag.name(), "User registration");
/// assert_eq!(tag.tag_type(), "epic");
///
/// let same = TestTag::new("User registration", "epic");
/// assert_eq!(tag, same);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestTag {
    name: String,
    #[serde(rename = "type")]
    tag_type: String,
}

impl TestTag {
    /// Create a tag from a name and a type.
    pub fn new(name: impl Into<String>, tag_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag_type: tag_type.into(),
        }
    }

    /// The tag name (typically an issue summary or version label).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag type (typically an issue type, or `"version"`).
    pub fn tag_type(&self) -> &str {
        &self.tag_type
    }
}

impl std::fmt::Display for TestTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tag_type, self.name)
    }
}

/// A single test execution result, carrying zero or more associated issue
/// keys.
///
/// The host reporting framework owns the full outcome record; this carrier
/// holds only what tag resolution consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestOutcome {
    name: String,
    issue_keys: Vec<String>,
}

impl TestOutcome {
    /// Create an outcome with no associated issues.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            issue_keys: Vec::new(),
        }
    }

    /// Attach issue keys as they appear in the test source (raw, possibly
    /// `#`-prefixed or bare numeric).
    pub fn with_issue_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issue_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// The test name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw issue keys associated with this outcome, in declaration
    /// order.
    pub fn issue_keys(&self) -> &[String] {
        &self.issue_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_key_rejects_empty_and_whitespace() {
        assert!(IssueKey::new("").is_err());
        assert!(IssueKey::new("PROJ 42").is_err());
        assert!(IssueKey::new("PROJ\t42").is_err());
        assert!(IssueKey::new("PROJ-42").is_ok());
    }

    #[test]
    fn issue_key_from_id_renders_decimal() {
        assert_eq!(IssueKey::from_id(10234).as_str(), "10234");
    }

    #[test]
    fn normalization_strips_hash_and_qualifies_numeric() {
        assert_eq!(
            IssueKey::normalized("#42", "PROJ").unwrap().as_str(),
            "PROJ-42"
        );
        assert_eq!(
            IssueKey::normalized("42", "PROJ").unwrap().as_str(),
            "PROJ-42"
        );
    }

    #[test]
    fn normalization_leaves_qualified_keys_alone() {
        assert_eq!(
            IssueKey::normalized("PROJ-42", "PROJ").unwrap().as_str(),
            "PROJ-42"
        );
        assert_eq!(
            IssueKey::normalized("#OTHER-7", "PROJ").unwrap().as_str(),
            "OTHER-7"
        );
    }

    #[test]
    fn normalization_rejects_bare_hash() {
        assert!(IssueKey::normalized("#", "PROJ").is_err());
    }

    #[test]
    fn structure_id_must_be_positive() {
        assert!(StructureId::new(0).is_err());
        assert!(StructureId::new(-3).is_err());
        assert_eq!(StructureId::new(171).unwrap().get(), 171);
    }

    #[test]
    fn test_tag_equality_is_by_name_and_type() {
        let a = TestTag::new("Checkout", "story");
        let b = TestTag::new("Checkout", "story");
        let c = TestTag::new("Checkout", "epic");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn tags_collapse_into_sets_by_value() {
        let set: std::collections::HashSet<TestTag> = [
            TestTag::new("Checkout", "story"),
            TestTag::new("Checkout", "story"),
            TestTag::new("1.2.0", "version"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn issue_key_serde_round_trip() {
        let key = IssueKey::new("PROJ-42").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"PROJ-42\"");
        let parsed: IssueKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn issue_key_serde_rejects_invalid() {
        assert!(serde_json::from_str::<IssueKey>("\"\"").is_err());
    }

    #[test]
    fn outcome_defaults_to_no_issues() {
        let outcome = TestOutcome::named("registering a new user");
        assert_eq!(outcome.name(), "registering a new user");
        assert!(outcome.issue_keys().is_empty());
    }
}
