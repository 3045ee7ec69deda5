//! provider::materialize
//!
//! Resolution of a raw formula forest into requirement records.
//!
//! Every node id is resolved through the issue lookup service in
//! pre-order. A node whose id the tracker does not know is dropped along
//! with its (already resolved) children - descendants are never promoted
//! to the missing node's level. Drops are reported through `tracing` so a
//! shrinking report has a trail; any fault other than "not found"
//! propagates immediately.

use std::future::Future;
use std::pin::Pin;

use tracing::warn;

use crate::core::formula::FormulaNode;
use crate::core::requirement::Requirement;
use crate::core::types::IssueKey;
use crate::tracker::{IssueLookup, IssueSummary, TrackerError};

/// Build a requirement record from a flat issue summary.
///
/// Children are attached separately; a freshly mapped requirement is a
/// leaf.
pub fn requirement_from(issue: &IssueSummary) -> Requirement {
    Requirement::named(&issue.summary)
        .with_card_number(issue.key.as_str())
        .with_type(&issue.issue_type)
        .with_narrative_text(&issue.description)
        .with_release_versions(issue.fix_versions.iter().cloned())
}

/// Resolve a raw forest into requirement records.
///
/// Sibling order is preserved at every level. Lookups run sequentially;
/// results do not depend on resolution order.
///
/// # Errors
///
/// Propagates any [`TrackerError`] from the lookup service. "Not found"
/// is not an error: the node is omitted from the result.
pub async fn materialize<L>(
    lookup: &L,
    forest: &[FormulaNode],
) -> Result<Vec<Requirement>, TrackerError>
where
    L: IssueLookup + ?Sized,
{
    let mut requirements = Vec::with_capacity(forest.len());
    for node in forest {
        if let Some(requirement) = materialize_node(lookup, node).await? {
            requirements.push(requirement);
        }
    }
    Ok(requirements)
}

/// Resolve one node and its subtree.
///
/// Children are resolved before the node's own lookup result is
/// inspected, mirroring the traversal the formula encodes; when the node
/// itself is unknown the resolved children are discarded with it.
fn materialize_node<'a, L>(
    lookup: &'a L,
    node: &'a FormulaNode,
) -> Pin<Box<dyn Future<Output = Result<Option<Requirement>, TrackerError>> + Send + 'a>>
where
    L: IssueLookup + ?Sized,
{
    Box::pin(async move {
        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            if let Some(requirement) = materialize_node(lookup, child).await? {
                children.push(requirement);
            }
        }

        let key = IssueKey::from_id(node.id);
        match lookup.find_by_key(&key).await? {
            Some(issue) => Ok(Some(requirement_from(&issue).with_children(children))),
            None => {
                warn!(
                    id = node.id,
                    dropped_children = children.len(),
                    "structure node does not resolve to an issue; dropping subtree"
                );
                Ok(None)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formula::parse_formula;
    use crate::tracker::mock::{FailOn, MockOperation, MockTracker};

    fn issue(key: &str, issue_type: &str, summary: &str) -> IssueSummary {
        IssueSummary {
            key: IssueKey::new(key).unwrap(),
            issue_type: issue_type.to_string(),
            summary: summary.to_string(),
            description: format!("About {}", summary),
            fix_versions: vec![],
        }
    }

    #[tokio::test]
    async fn resolves_a_forest_in_document_order() {
        let tracker = MockTracker::new()
            .with_issue_under("1", issue("SHOP-1", "epic", "Checkout"))
            .with_issue_under("2", issue("SHOP-12", "story", "Guest checkout"))
            .with_issue_under("3", issue("SHOP-14", "story", "Saved cards"))
            .with_issue_under("4", issue("SHOP-2", "epic", "Search"));
        let forest = parse_formula("1:0,2:1,3:1,4:0").unwrap();

        let requirements = materialize(&tracker, &forest).await.unwrap();

        assert_eq!(requirements.len(), 2);
        assert_eq!(requirements[0].name(), "Checkout");
        assert_eq!(requirements[0].card_number(), Some("SHOP-1"));
        assert_eq!(requirements[0].requirement_type(), "epic");
        let children: Vec<&str> = requirements[0]
            .children()
            .iter()
            .map(|child| child.name())
            .collect();
        assert_eq!(children, vec!["Guest checkout", "Saved cards"]);
        assert_eq!(requirements[1].name(), "Search");
    }

    #[tokio::test]
    async fn unresolved_node_drops_its_resolved_children() {
        // 2 is unknown; its child 3 resolves but must not be promoted.
        let tracker = MockTracker::new()
            .with_issue_under("1", issue("SHOP-1", "epic", "Checkout"))
            .with_issue_under("3", issue("SHOP-13", "sub-task", "Validate address"));
        let forest = parse_formula("1:0,2:1,3:2").unwrap();

        let requirements = materialize(&tracker, &forest).await.unwrap();

        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].name(), "Checkout");
        assert!(requirements[0].children().is_empty());

        // The dropped child's lookup was still attempted.
        assert!(tracker.operations().contains(&MockOperation::FindByKey {
            key: "3".to_string()
        }));
    }

    #[tokio::test]
    async fn unresolved_root_is_omitted() {
        let tracker = MockTracker::new().with_issue_under("2", issue("SHOP-2", "epic", "Search"));
        let forest = parse_formula("1:0,2:0").unwrap();

        let requirements = materialize(&tracker, &forest).await.unwrap();

        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].name(), "Search");
    }

    #[tokio::test]
    async fn lookup_faults_propagate() {
        let tracker = MockTracker::new().fail_on(FailOn::FindByKey(TrackerError::Network(
            "connection refused".into(),
        )));
        let forest = parse_formula("1:0").unwrap();

        assert!(materialize(&tracker, &forest).await.is_err());
    }

    #[test]
    fn requirement_mapping_carries_all_fields() {
        let summary = IssueSummary {
            key: IssueKey::new("SHOP-12").unwrap(),
            issue_type: "story".to_string(),
            summary: "Guest checkout".to_string(),
            description: "<p>rendered</p>".to_string(),
            fix_versions: vec!["1.2.0".to_string()],
        };
        let requirement = requirement_from(&summary);
        assert_eq!(requirement.name(), "Guest checkout");
        assert_eq!(requirement.card_number(), Some("SHOP-12"));
        assert_eq!(requirement.requirement_type(), "story");
        assert_eq!(requirement.narrative_text(), "<p>rendered</p>");
        assert_eq!(requirement.release_versions(), ["1.2.0"]);
        assert!(requirement.children().is_empty());
    }
}
