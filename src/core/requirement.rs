//! core::requirement
//!
//! The resolved requirement record and its depth-first linearization.
//!
//! A [`Requirement`] is one node of the reconstructed hierarchy: an epic,
//! story, or sub-task with the descriptive metadata traceability reporting
//! needs. The forest is immutable once materialized; queries work against
//! the [`flatten`] linearization.

use serde::Serialize;

/// A node in the reconstructed requirements hierarchy.
///
/// Children mirror the raw forest's child order. The tree is acyclic by
/// construction: it derives from a strictly nested depth encoding.
///
/// # Example
///
/// ```
/// use girder::core::requirement::Requirement;
///
/// let story = Requirement::named("Guest checkout")
///     .with_card_number("SHOP-12")
///     .with_type("story");
/// let epic = Requirement::named("Checkout")
///     .with_card_number("SHOP-1")
///     .with_type("epic")
///     .with_children(vec![story]);
///
/// assert_eq!(epic.children()[0].name(), "Guest checkout");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_number: Option<String>,
    #[serde(rename = "type")]
    requirement_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    narrative_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    release_versions: Vec<String>,
    children: Vec<Requirement>,
}

impl Requirement {
    /// Start a requirement with a display name and empty metadata.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            card_number: None,
            requirement_type: String::new(),
            narrative_text: String::new(),
            release_versions: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set the tracker card number (issue key).
    pub fn with_card_number(mut self, card_number: impl Into<String>) -> Self {
        self.card_number = Some(card_number.into());
        self
    }

    /// Set the requirement type (e.g. `"epic"`, `"story"`).
    pub fn with_type(mut self, requirement_type: impl Into<String>) -> Self {
        self.requirement_type = requirement_type.into();
        self
    }

    /// Set the narrative text (rendered issue description).
    pub fn with_narrative_text(mut self, narrative_text: impl Into<String>) -> Self {
        self.narrative_text = narrative_text.into();
        self
    }

    /// Set the release-version labels.
    pub fn with_release_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.release_versions = versions.into_iter().map(Into::into).collect();
        self
    }

    /// Attach child requirements in document order.
    pub fn with_children(mut self, children: Vec<Requirement>) -> Self {
        self.children = children;
        self
    }

    /// The display name (issue summary).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tracker card number, if the requirement maps to an issue.
    pub fn card_number(&self) -> Option<&str> {
        self.card_number.as_deref()
    }

    /// The requirement type.
    pub fn requirement_type(&self) -> &str {
        &self.requirement_type
    }

    /// The narrative text; may be empty.
    pub fn narrative_text(&self) -> &str {
        &self.narrative_text
    }

    /// Release-version labels attached to the underlying issue.
    pub fn release_versions(&self) -> &[String] {
        &self.release_versions
    }

    /// Child requirements in document order.
    pub fn children(&self) -> &[Requirement] {
        &self.children
    }

    /// True if any direct child carries the given card number.
    pub fn has_child_with_card_number(&self, card_number: &str) -> bool {
        self.children
            .iter()
            .any(|child| child.card_number() == Some(card_number))
    }
}

/// Depth-first pre-order linearization of a requirement forest.
///
/// The returned order is the document order of the original formula, so
/// "first match wins" searches resolve to the first occurrence in the
/// structure.
///
/// Iterative with an explicit stack; tree depth from tracker data never
/// grows the call stack.
pub fn flatten(forest: &[Requirement]) -> Vec<&Requirement> {
    let mut flattened = Vec::new();
    let mut stack: Vec<&Requirement> = forest.iter().rev().collect();
    while let Some(requirement) = stack.pop() {
        flattened.push(requirement);
        stack.extend(requirement.children().iter().rev());
    }
    flattened
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_forest() -> Vec<Requirement> {
        vec![
            Requirement::named("Checkout")
                .with_card_number("SHOP-1")
                .with_type("epic")
                .with_children(vec![
                    Requirement::named("Guest checkout")
                        .with_card_number("SHOP-12")
                        .with_type("story")
                        .with_children(vec![Requirement::named("Validate address")
                            .with_card_number("SHOP-13")
                            .with_type("sub-task")]),
                    Requirement::named("Saved cards")
                        .with_card_number("SHOP-14")
                        .with_type("story"),
                ]),
            Requirement::named("Search")
                .with_card_number("SHOP-2")
                .with_type("epic"),
        ]
    }

    #[test]
    fn flatten_is_pre_order_document_order() {
        let forest = sample_forest();
        let names: Vec<&str> = flatten(&forest).iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            vec![
                "Checkout",
                "Guest checkout",
                "Validate address",
                "Saved cards",
                "Search"
            ]
        );
    }

    #[test]
    fn flatten_of_empty_forest_is_empty() {
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn child_card_number_lookup() {
        let forest = sample_forest();
        assert!(forest[0].has_child_with_card_number("SHOP-12"));
        assert!(!forest[0].has_child_with_card_number("SHOP-13"));
        assert!(!forest[1].has_child_with_card_number("SHOP-12"));
    }

    #[test]
    fn builder_defaults_are_empty() {
        let requirement = Requirement::named("Unplanned work");
        assert_eq!(requirement.name(), "Unplanned work");
        assert!(requirement.card_number().is_none());
        assert!(requirement.requirement_type().is_empty());
        assert!(requirement.narrative_text().is_empty());
        assert!(requirement.release_versions().is_empty());
        assert!(requirement.children().is_empty());
    }

    #[test]
    fn serializes_without_empty_fields() {
        let json = serde_json::to_value(Requirement::named("Search").with_type("epic")).unwrap();
        assert_eq!(json["name"], "Search");
        assert_eq!(json["type"], "epic");
        assert!(json.get("card_number").is_none());
        assert!(json.get("narrative_text").is_none());
    }
}
