//! Granularity-scoped subsets of a diff set.
//!
//! A full [`DiffSet`] covers every identifier in both snapshots. Rendering
//! happens one granularity at a time: the system landscape, one system's
//! containers, or one container's components. Each scope keeps the element
//! diffs at its level, the relationship diffs connecting them, and the
//! diffs for relationship endpoints outside the level so context nodes
//! still appear in the rendered subgraph.
//!
//! At the coarser levels a relationship is suppressed unless both endpoints
//! resolve to an equal-or-coarser kind; at the component level every
//! connection is shown. An endpoint id with no diff in the set is omitted
//! from pull-ins — never an error — and the renderer falls back to the raw
//! id for its tooltip.

use std::collections::BTreeSet;

use log::debug;

use pentimento_core::ElementKind;

use crate::diff::{Diff, DiffSet};

/// One granularity level's view of a diff set.
#[derive(Debug)]
pub struct Scope<'a> {
    diffs: Vec<&'a Diff>,
    parent: Option<&'a Diff>,
}

impl<'a> Scope<'a> {
    /// Assemble a scope from an explicit diff collection.
    ///
    /// The extraction methods on [`DiffSet`] are the usual way to obtain a
    /// scope; this constructor lets callers render a hand-picked subset.
    pub fn from_parts(diffs: Vec<&'a Diff>, parent: Option<&'a Diff>) -> Self {
        Self { diffs, parent }
    }

    pub fn diffs(&self) -> &[&'a Diff] {
        &self.diffs
    }

    /// The enclosing element's diff, when scoping below the landscape.
    /// Used by the renderer to cluster the parent's own children.
    pub fn parent(&self) -> Option<&'a Diff> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

/// Accumulates scope members, deduplicating by id in insertion order.
struct ScopeBuilder<'a> {
    diffs: Vec<&'a Diff>,
    seen: BTreeSet<&'a str>,
}

impl<'a> ScopeBuilder<'a> {
    fn new() -> Self {
        Self {
            diffs: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    fn push(&mut self, diff: &'a Diff) {
        if self.seen.insert(diff.id()) {
            self.diffs.push(diff);
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    fn finish(self, parent: Option<&'a Diff>) -> Scope<'a> {
        Scope {
            diffs: self.diffs,
            parent,
        }
    }
}

impl DiffSet {
    /// The coarsest scope: systems and people, plus relationships whose
    /// endpoints both resolve to a system or person.
    pub fn system_landscape(&self) -> Scope<'_> {
        let mut scope = ScopeBuilder::new();

        for diff in self.iter() {
            if matches!(
                diff.current().element_kind(),
                Some(ElementKind::System | ElementKind::Person)
            ) {
                scope.push(diff);
            }
        }

        for diff in self.iter() {
            let Some((source, destination)) = diff.current().endpoints() else {
                continue;
            };
            if self.resolves_to(source, LANDSCAPE_KINDS) && self.resolves_to(destination, LANDSCAPE_KINDS)
            {
                scope.push(diff);
            }
        }

        debug!(diffs_count = scope.diffs.len(); "Extracted system landscape scope");
        scope.finish(None)
    }

    /// One system's containers, the relationships touching them whose other
    /// endpoint is a person, system, or container, and those endpoints.
    pub fn container_view(&self, system_id: &str) -> Scope<'_> {
        let mut scope = ScopeBuilder::new();

        for diff in self.iter() {
            if diff.current().element_kind() == Some(ElementKind::Container)
                && diff.current().parent_id() == Some(system_id)
            {
                scope.push(diff);
            }
        }

        self.pull_in_connections(&mut scope, Some(CONTAINER_CONTEXT_KINDS));

        debug!(system_id, diffs_count = scope.diffs.len(); "Extracted container scope");
        scope.finish(self.get(system_id))
    }

    /// One container's components and every relationship touching them —
    /// at the finest granularity no endpoint filter applies.
    pub fn component_view(&self, container_id: &str) -> Scope<'_> {
        let mut scope = ScopeBuilder::new();

        for diff in self.iter() {
            if diff.current().element_kind() == Some(ElementKind::Component)
                && diff.current().parent_id() == Some(container_id)
            {
                scope.push(diff);
            }
        }

        self.pull_in_connections(&mut scope, None);

        debug!(container_id, diffs_count = scope.diffs.len(); "Extracted component scope");
        scope.finish(self.get(container_id))
    }

    /// Add relationships touching the elements already in scope, plus the
    /// other-endpoint diffs. `allowed_kinds` filters what the other
    /// endpoint may resolve to; `None` admits everything.
    fn pull_in_connections<'a>(
        &'a self,
        scope: &mut ScopeBuilder<'a>,
        allowed_kinds: Option<&[ElementKind]>,
    ) {
        let mut relationships = Vec::new();
        for diff in self.iter() {
            let Some((source, destination)) = diff.current().endpoints() else {
                continue;
            };

            let other = if scope.contains(source) {
                destination
            } else if scope.contains(destination) {
                source
            } else {
                continue;
            };

            match allowed_kinds {
                // Both-ends-in-scope passes regardless of the filter.
                _ if scope.contains(other) => {}
                Some(kinds) if !self.resolves_to(other, kinds) => continue,
                None if self.get(other).is_none() => {
                    // Unresolvable context endpoint: keep the relationship,
                    // nothing to pull in.
                    relationships.push((diff, None));
                    continue;
                }
                _ => {}
            }
            relationships.push((diff, self.get(other)));
        }

        for (relationship, endpoint) in relationships {
            scope.push(relationship);
            if let Some(endpoint) = endpoint {
                scope.push(endpoint);
            }
        }
    }

    fn resolves_to(&self, id: &str, kinds: &[ElementKind]) -> bool {
        self.get(id)
            .and_then(|diff| diff.current().element_kind())
            .is_some_and(|kind| kinds.contains(&kind))
    }
}

const LANDSCAPE_KINDS: &[ElementKind] = &[ElementKind::Person, ElementKind::System];
const CONTAINER_CONTEXT_KINDS: &[ElementKind] = &[
    ElementKind::Person,
    ElementKind::System,
    ElementKind::Container,
];

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet as Tags;

    use pentimento_core::{Action, PathCatalog, Snapshot, SnapshotBuilder};

    use super::*;
    use crate::diff::DiffStatus;

    fn catalog() -> PathCatalog {
        let mut catalog = PathCatalog::new();
        catalog.add_person("Clerk");
        catalog.add_system("shop");
        catalog.add_system("warehouse");
        catalog.add_container("shop", "web");
        catalog.add_container("shop", "db");
        catalog.add_container("warehouse", "sorter");
        catalog.add_component("shop", "web", "cart");
        catalog.add_component("shop", "web", "checkout");
        catalog
    }

    struct Model {
        with_checkout: bool,
    }

    impl Model {
        fn build(&self) -> Snapshot {
            let mut builder = SnapshotBuilder::new(catalog());
            builder
                .add_person("Clerk", "Handles orders", Tags::new())
                .expect("person");
            builder
                .add_system("shop", "Online shop", Tags::new())
                .expect("system");
            builder
                .add_system("warehouse", "Fulfilment", Tags::new())
                .expect("system");
            builder
                .add_container("shop", "web", "Storefront", Tags::new())
                .expect("container");
            builder
                .add_container("shop", "db", "Orders database", Tags::new())
                .expect("container");
            builder
                .add_container("warehouse", "sorter", "Sorting service", Tags::new())
                .expect("container");
            builder
                .add_component("shop", "web", "cart", "Shopping cart", Tags::new())
                .expect("component");
            if self.with_checkout {
                builder
                    .add_component("shop", "web", "checkout", "Checkout flow", Tags::new())
                    .expect("component");
                builder
                    .add_relationship(
                        "shop/web/checkout",
                        "warehouse",
                        Action::Uses,
                        "requests dispatch",
                        Some("https"),
                    )
                    .expect("relationship");
            }
            builder
                .add_relationship("@Clerk", "shop", Action::Uses, "manages orders", None)
                .expect("relationship");
            builder
                .add_relationship("shop/web", "shop/db", Action::Uses, "reads and writes", None)
                .expect("relationship");
            builder
                .add_relationship("shop/web/cart", "shop/db", Action::Uses, "persists carts", None)
                .expect("relationship");
            builder.finish()
        }
    }

    fn unchanged_diffs() -> DiffSet {
        let model = Model { with_checkout: true };
        DiffSet::between(&model.build(), &model.build()).expect("diff")
    }

    fn scope_ids<'a>(scope: &Scope<'a>) -> Vec<&'a str> {
        scope.diffs().iter().map(|diff| diff.id()).collect()
    }

    #[test]
    fn test_landscape_keeps_people_and_systems_only() {
        let diffs = unchanged_diffs();
        let scope = diffs.system_landscape();

        let ids = scope_ids(&scope);
        assert!(ids.contains(&"@Clerk"));
        assert!(ids.contains(&"shop"));
        assert!(ids.contains(&"warehouse"));
        assert!(!ids.iter().any(|id| id.contains('/')));
        assert!(scope.parent().is_none());
    }

    #[test]
    fn test_landscape_suppresses_finer_grained_relationships() {
        let diffs = unchanged_diffs();
        let scope = diffs.system_landscape();

        // Clerk -> shop is person-to-system and survives; the container and
        // component relationships must not.
        let relationship_count = scope
            .diffs()
            .iter()
            .filter(|diff| diff.current().is_relationship())
            .count();
        assert_eq!(relationship_count, 1);
    }

    #[test]
    fn test_container_view_members_and_context() {
        let diffs = unchanged_diffs();
        let scope = diffs.container_view("shop");

        let ids = scope_ids(&scope);
        assert!(ids.contains(&"shop/web"));
        assert!(ids.contains(&"shop/db"));
        // Containers of other systems stay out unless pulled in as context.
        assert!(!ids.contains(&"warehouse/sorter"));
        assert_eq!(scope.parent().map(Diff::id), Some("shop"));

        // web -> db is in-scope on both ends.
        let relationship_ids: Vec<&str> = scope
            .diffs()
            .iter()
            .filter(|diff| diff.current().is_relationship())
            .map(|diff| diff.id())
            .collect();
        assert_eq!(relationship_ids.len(), 1);

        let endpoints = scope.diffs()[scope
            .diffs()
            .iter()
            .position(|diff| diff.id() == relationship_ids[0])
            .expect("relationship present")]
        .current()
        .endpoints()
        .expect("relationship endpoints");
        assert_eq!(endpoints, ("shop/web", "shop/db"));
    }

    #[test]
    fn test_container_view_scope_containment() {
        let diffs = unchanged_diffs();
        let scope = diffs.container_view("shop");

        for diff in scope.diffs() {
            let diffable = diff.current();
            if let Some((source, destination)) = diffable.endpoints() {
                let touches_scope_container = [source, destination].iter().any(|id| {
                    diffs.get(id).is_some_and(|d| {
                        d.current().element_kind() == Some(ElementKind::Container)
                            && d.current().parent_id() == Some("shop")
                    })
                });
                assert!(touches_scope_container, "unrelated relationship in scope");
            } else {
                let kind = diffable.element_kind().expect("element");
                let in_level = kind == ElementKind::Container
                    && diffable.parent_id() == Some("shop");
                let is_context = matches!(
                    kind,
                    ElementKind::Person | ElementKind::System | ElementKind::Container
                );
                assert!(in_level || is_context, "unrelated element in scope");
            }
        }
    }

    #[test]
    fn test_component_view_shows_all_connections() {
        let diffs = unchanged_diffs();
        let scope = diffs.component_view("shop/web");

        let ids = scope_ids(&scope);
        assert!(ids.contains(&"shop/web/cart"));
        assert!(ids.contains(&"shop/web/checkout"));
        // cart -> db pulls the database container in as context, and
        // checkout -> warehouse pulls in the other system.
        assert!(ids.contains(&"shop/db"));
        assert!(ids.contains(&"warehouse"));
        assert_eq!(scope.parent().map(Diff::id), Some("shop/web"));
    }

    #[test]
    fn test_deleted_component_stays_in_scope_with_its_relationships() {
        let before = Model { with_checkout: true }.build();
        let after = Model { with_checkout: false }.build();
        let diffs = DiffSet::between(&before, &after).expect("diff");

        let scope = diffs.component_view("shop/web");
        let checkout = scope
            .diffs()
            .iter()
            .find(|diff| diff.id() == "shop/web/checkout")
            .expect("deleted component in scope");
        assert_eq!(checkout.status(), DiffStatus::Deleted);

        let deleted_relationship = scope
            .diffs()
            .iter()
            .find(|diff| {
                diff.current()
                    .endpoints()
                    .is_some_and(|(source, _)| source == "shop/web/checkout")
            })
            .expect("deleted relationship in scope");
        assert_eq!(deleted_relationship.status(), DiffStatus::Deleted);

        // The unchanged other endpoint comes along as context.
        let warehouse = scope
            .diffs()
            .iter()
            .find(|diff| diff.id() == "warehouse")
            .expect("other endpoint in scope");
        assert_eq!(warehouse.status(), DiffStatus::Unchanged);
    }

    #[test]
    fn test_scope_is_deduplicated() {
        let diffs = unchanged_diffs();
        let scope = diffs.component_view("shop/web");

        let mut ids = scope_ids(&scope);
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
