//! provider::tags
//!
//! Derivation of traceability tags for a single issue key.
//!
//! One raw key from a test outcome produces up to three families of tags:
//! the issue's own behaviour tag, one tag per requirement ancestor in the
//! structure, and one tag per release version on the issue. A key the
//! tracker does not know contributes nothing; it never fails the
//! derivation.

use tracing::{debug, warn};

use crate::core::requirement::Requirement;
use crate::core::types::{IssueKey, TestTag};
use crate::tracker::{IssueLookup, TrackerError};

/// Tag type for release-version tags.
pub const VERSION_TAG_TYPE: &str = "version";

/// Derive the tags for one raw issue key.
///
/// `flattened` is the depth-first linearization of the resolved
/// requirement forest; it supplies the ancestor chain. Returned tags may
/// repeat across families (the caller unions them).
///
/// # Errors
///
/// Propagates any lookup fault other than "not found".
pub(super) async fn tags_from_issue<L>(
    lookup: &L,
    flattened: &[&Requirement],
    project_key: &str,
    raw_key: &str,
) -> Result<Vec<TestTag>, TrackerError>
where
    L: IssueLookup + ?Sized,
{
    debug!(raw_key, "reading tags from issue");

    let key = match IssueKey::normalized(raw_key, project_key) {
        Ok(key) => key,
        Err(err) => {
            // An unusable reference is treated like a missing issue.
            warn!(raw_key, %err, "ignoring unusable issue reference");
            return Ok(Vec::new());
        }
    };

    let mut tags = Vec::new();

    // Behaviour tag from the issue itself; also the source of version tags.
    let issues = lookup.find_by_query(&format!("key={}", key)).await?;
    if let Some(issue) = issues.first() {
        tags.push(TestTag::new(&issue.summary, &issue.issue_type));
        for version in &issue.fix_versions {
            tags.push(TestTag::new(version, VERSION_TAG_TYPE));
        }
    }

    tags.extend(ancestor_tags(flattened, key.as_str()));
    Ok(tags)
}

/// Walk upward through the structure, nearest ancestor first.
///
/// Each step finds the requirement whose direct children include the
/// current card number, then continues from that requirement's own card
/// number. Card numbers can repeat across branches; a number seen twice
/// ends the walk.
fn ancestor_tags(flattened: &[&Requirement], card_number: &str) -> Vec<TestTag> {
    let mut tags = Vec::new();
    let mut seen: Vec<&str> = vec![card_number];
    let mut current = card_number.to_string();

    while let Some(parent) = parent_of(flattened, &current) {
        tags.push(TestTag::new(parent.name(), parent.requirement_type()));
        let Some(next) = parent.card_number() else {
            break;
        };
        if seen.contains(&next) {
            break;
        }
        seen.push(next);
        current = next.to_string();
    }
    tags
}

/// The first requirement in document order with a direct child carrying
/// the card number.
pub(super) fn parent_of<'a>(
    flattened: &[&'a Requirement],
    card_number: &str,
) -> Option<&'a Requirement> {
    flattened
        .iter()
        .find(|requirement| requirement.has_child_with_card_number(card_number))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::requirement::flatten;
    use crate::core::types::IssueKey;
    use crate::tracker::mock::MockTracker;
    use crate::tracker::IssueSummary;

    fn forest() -> Vec<Requirement> {
        vec![Requirement::named("Checkout")
            .with_card_number("SHOP-1")
            .with_type("epic")
            .with_children(vec![Requirement::named("Guest checkout")
                .with_card_number("SHOP-12")
                .with_type("story")
                .with_children(vec![Requirement::named("Validate address")
                    .with_card_number("SHOP-13")
                    .with_type("sub-task")])])]
    }

    fn issue(key: &str, issue_type: &str, summary: &str, versions: &[&str]) -> IssueSummary {
        IssueSummary {
            key: IssueKey::new(key).unwrap(),
            issue_type: issue_type.to_string(),
            summary: summary.to_string(),
            description: String::new(),
            fix_versions: versions.iter().map(|v| v.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn issue_ancestor_and_version_tags_are_emitted() {
        let tracker = MockTracker::new().with_issue(issue(
            "SHOP-13",
            "sub-task",
            "Validate address",
            &["1.2.0"],
        ));
        let forest = forest();
        let flattened = flatten(&forest);

        let tags = tags_from_issue(&tracker, &flattened, "SHOP", "SHOP-13")
            .await
            .unwrap();

        assert!(tags.contains(&TestTag::new("Validate address", "sub-task")));
        assert!(tags.contains(&TestTag::new("1.2.0", VERSION_TAG_TYPE)));
        // Nearest ancestor first.
        let ancestor_names: Vec<&str> = tags
            .iter()
            .filter(|tag| tag.tag_type() == "story" || tag.tag_type() == "epic")
            .map(|tag| tag.name())
            .collect();
        assert_eq!(ancestor_names, vec!["Guest checkout", "Checkout"]);
    }

    #[tokio::test]
    async fn numeric_keys_are_qualified_with_the_project() {
        let tracker =
            MockTracker::new().with_issue(issue("SHOP-13", "sub-task", "Validate address", &[]));
        let forest = forest();
        let flattened = flatten(&forest);

        let tags = tags_from_issue(&tracker, &flattened, "SHOP", "#13")
            .await
            .unwrap();

        assert!(tags.contains(&TestTag::new("Validate address", "sub-task")));
    }

    #[tokio::test]
    async fn unknown_issue_still_gets_ancestor_tags() {
        // SHOP-13 is in the structure but not resolvable on the tracker.
        let tracker = MockTracker::new();
        let forest = forest();
        let flattened = flatten(&forest);

        let tags = tags_from_issue(&tracker, &flattened, "SHOP", "SHOP-13")
            .await
            .unwrap();

        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&TestTag::new("Guest checkout", "story")));
        assert!(tags.contains(&TestTag::new("Checkout", "epic")));
    }

    #[tokio::test]
    async fn issue_outside_the_structure_gets_only_its_own_tags() {
        let tracker = MockTracker::new().with_issue(issue("OPS-9", "task", "Rotate keys", &[]));
        let forest = forest();
        let flattened = flatten(&forest);

        let tags = tags_from_issue(&tracker, &flattened, "SHOP", "OPS-9")
            .await
            .unwrap();

        assert_eq!(tags, vec![TestTag::new("Rotate keys", "task")]);
    }

    #[tokio::test]
    async fn unusable_reference_yields_no_tags() {
        let tracker = MockTracker::new();
        let forest = forest();
        let flattened = flatten(&forest);

        let tags = tags_from_issue(&tracker, &flattened, "SHOP", "#")
            .await
            .unwrap();

        assert!(tags.is_empty());
    }

    #[test]
    fn self_referential_card_numbers_terminate() {
        // A requirement that lists itself as a child would loop forever
        // without the seen guard.
        let forest = vec![Requirement::named("Loop")
            .with_card_number("SHOP-1")
            .with_type("epic")
            .with_children(vec![Requirement::named("Loop")
                .with_card_number("SHOP-1")
                .with_type("epic")])];
        let flattened = flatten(&forest);

        let tags = ancestor_tags(&flattened, "SHOP-1");
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn parent_lookup_is_first_in_document_order() {
        let forest = vec![
            Requirement::named("First")
                .with_card_number("A-1")
                .with_type("epic")
                .with_children(vec![Requirement::named("Shared")
                    .with_card_number("A-2")
                    .with_type("story")]),
            Requirement::named("Second")
                .with_card_number("B-1")
                .with_type("epic")
                .with_children(vec![Requirement::named("Shared")
                    .with_card_number("A-2")
                    .with_type("story")]),
        ];
        let flattened = flatten(&forest);
        assert_eq!(parent_of(&flattened, "A-2").unwrap().name(), "First");
    }
}
