//! Element and relationship types for the architecture model.
//!
//! A snapshot is a typed graph: [`Element`] values are the nodes (people,
//! software systems, containers, components, deployment nodes, container
//! instances) and [`Relationship`] values are the directed edges between
//! them. Both carry a stable string id assigned at load time; everything
//! downstream compares by id equality only.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// The kind of an architecture element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Person,
    System,
    Container,
    Component,
    DeploymentNode,
    ContainerInstance,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ElementKind::Person => "Person",
            ElementKind::System => "Software System",
            ElementKind::Container => "Container",
            ElementKind::Component => "Component",
            ElementKind::DeploymentNode => "Deployment Node",
            ElementKind::ContainerInstance => "Container Instance",
        };
        write!(f, "{label}")
    }
}

/// A typed node in the architecture graph.
///
/// The `relationships` set holds the ids of relationships originating at
/// this element. It is bookkeeping only: a relationship change never makes
/// its source element count as updated, because every relationship is its
/// own entry in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    id: String,
    kind: ElementKind,
    name: String,
    description: String,
    tags: BTreeSet<String>,
    parent_id: Option<String>,
    relationships: BTreeSet<String>,
}

impl Element {
    /// Create a new element. The id must already be assigned; a finalized
    /// snapshot never contains an element without one.
    pub fn new(
        id: String,
        kind: ElementKind,
        name: String,
        description: String,
        tags: BTreeSet<String>,
        parent_id: Option<String>,
    ) -> Self {
        Self {
            id,
            kind,
            name,
            description,
            tags,
            parent_id,
            relationships: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Id of the owning element: a container's system, a component's
    /// container. `None` for top-level elements.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Ids of relationships originating at this element.
    pub fn relationships(&self) -> &BTreeSet<String> {
        &self.relationships
    }

    pub(crate) fn add_relationship(&mut self, relationship_id: String) {
        self.relationships.insert(relationship_id);
    }
}

/// The action a relationship expresses.
///
/// The action constrains which destination kinds are legal: `Delivers` and
/// `InteractsWith` target people, `Uses` targets anything but a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Uses,
    Delivers,
    InteractsWith,
}

impl Action {
    /// Whether this action permits a destination of the given kind.
    pub fn allows_destination(&self, kind: ElementKind) -> bool {
        match self {
            Action::Uses => kind != ElementKind::Person,
            Action::Delivers | Action::InteractsWith => kind == ElementKind::Person,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Uses => "uses",
            Action::Delivers => "delivers",
            Action::InteractsWith => "interacts with",
        };
        write!(f, "{label}")
    }
}

/// A directed, typed edge between two elements.
///
/// The id is a deterministic function of the relationship's semantic
/// content, so the same logical edge hashes to the same id across
/// independent loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    id: String,
    source_id: String,
    destination_id: String,
    action: Action,
    description: String,
    technology: Option<String>,
}

impl Relationship {
    pub fn new(
        id: String,
        source_id: String,
        destination_id: String,
        action: Action,
        description: String,
        technology: Option<String>,
    ) -> Self {
        Self {
            id,
            source_id,
            destination_id,
            action,
            description,
            technology,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn destination_id(&self) -> &str {
        &self.destination_id
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn technology(&self) -> Option<&str> {
        self.technology.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_kind_labels() {
        assert_eq!(ElementKind::Person.to_string(), "Person");
        assert_eq!(ElementKind::System.to_string(), "Software System");
        assert_eq!(ElementKind::Container.to_string(), "Container");
        assert_eq!(ElementKind::Component.to_string(), "Component");
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::Uses.to_string(), "uses");
        assert_eq!(Action::Delivers.to_string(), "delivers");
        assert_eq!(Action::InteractsWith.to_string(), "interacts with");
    }

    #[test]
    fn test_action_destination_legality() {
        assert!(Action::Uses.allows_destination(ElementKind::System));
        assert!(Action::Uses.allows_destination(ElementKind::Container));
        assert!(!Action::Uses.allows_destination(ElementKind::Person));

        assert!(Action::Delivers.allows_destination(ElementKind::Person));
        assert!(!Action::Delivers.allows_destination(ElementKind::System));

        assert!(Action::InteractsWith.allows_destination(ElementKind::Person));
        assert!(!Action::InteractsWith.allows_destination(ElementKind::Component));
    }

    #[test]
    fn test_element_accessors() {
        let mut element = Element::new(
            "shop/web".to_string(),
            ElementKind::Container,
            "web".to_string(),
            "Storefront".to_string(),
            BTreeSet::from(["rust".to_string()]),
            Some("shop".to_string()),
        );
        element.add_relationship("abc123".to_string());

        assert_eq!(element.id(), "shop/web");
        assert_eq!(element.kind(), ElementKind::Container);
        assert_eq!(element.name(), "web");
        assert_eq!(element.parent_id(), Some("shop"));
        assert!(element.tags().contains("rust"));
        assert!(element.relationships().contains("abc123"));
    }

    #[test]
    fn test_element_equality_includes_relationship_set() {
        // Plain equality sees the relationship set; diff-time equality
        // deliberately does not, which is exercised in the engine crate.
        let make = || {
            Element::new(
                "a".to_string(),
                ElementKind::System,
                "a".to_string(),
                String::new(),
                BTreeSet::new(),
                None,
            )
        };
        let plain = make();
        let mut with_rel = make();
        with_rel.add_relationship("r1".to_string());

        assert_ne!(plain, with_rel);
    }
}
