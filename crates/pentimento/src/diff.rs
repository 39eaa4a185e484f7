//! Diff calculation between two snapshots.
//!
//! For every identifier present in either snapshot, a [`Diff`] pairs the
//! before and after view of that identifier with the descendant set on each
//! side and a status derived at construction. The result is a [`DiffSet`]:
//! an immutable, id-keyed collection with deterministic iteration order,
//! fully self-contained — no borrows back into the source snapshots.
//!
//! Relationships are their own diff entries. Element equality deliberately
//! ignores the element's relationship set: folding edge changes into the
//! owning element would double-count the change and obscure which edge it
//! was. Descendant sets therefore contain elements only, and a
//! relationship-only change shows up as exactly one created or deleted
//! relationship diff.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;
use thiserror::Error;

use pentimento_core::{Action, Element, ElementKind, Relationship, Snapshot};

/// Traceability annotations keyed by identifier. Rendering-only input:
/// annotations never participate in status computation.
pub type AnnotationMap = BTreeMap<String, Vec<String>>;

/// Errors raised while computing a diff.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiffError {
    /// An identifier had neither a before nor an after side. The identifier
    /// universe must be the union of both snapshots, so this is a caller
    /// bug and is surfaced rather than skipped.
    #[error("diff entry \"{id}\" has neither a before nor an after side")]
    MissingBothSides { id: String },
}

/// Classification of one identifier across the two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffStatus {
    Created,
    Deleted,
    Updated,
    /// The element itself is unchanged, but its descendant set is not.
    ChildrenUpdated,
    Unchanged,
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiffStatus::Created => "created",
            DiffStatus::Deleted => "deleted",
            DiffStatus::Updated => "updated",
            DiffStatus::ChildrenUpdated => "children updated",
            DiffStatus::Unchanged => "unchanged",
        };
        write!(f, "{label}")
    }
}

/// The comparable content of a diffable: either an element or a
/// relationship. Derived equality on this payload is the diff-time equality
/// rule — note the absence of the element's relationship set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DiffablePayload {
    Element {
        id: String,
        kind: ElementKind,
        name: String,
        description: String,
        tags: BTreeSet<String>,
        parent_id: Option<String>,
    },
    Relationship {
        id: String,
        source_id: String,
        destination_id: String,
        action: Action,
        description: String,
        technology: Option<String>,
    },
}

/// Uniform view over an element or relationship for diff purposes.
///
/// Annotations ride alongside the payload so they can be rendered without
/// ever influencing the payload comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diffable {
    payload: DiffablePayload,
    annotations: Vec<String>,
}

impl Diffable {
    pub fn from_element(element: &Element) -> Self {
        Self {
            payload: DiffablePayload::Element {
                id: element.id().to_owned(),
                kind: element.kind(),
                name: element.name().to_owned(),
                description: element.description().to_owned(),
                tags: element.tags().clone(),
                parent_id: element.parent_id().map(str::to_owned),
            },
            annotations: Vec::new(),
        }
    }

    pub fn from_relationship(relationship: &Relationship) -> Self {
        Self {
            payload: DiffablePayload::Relationship {
                id: relationship.id().to_owned(),
                source_id: relationship.source_id().to_owned(),
                destination_id: relationship.destination_id().to_owned(),
                action: relationship.action(),
                description: relationship.description().to_owned(),
                technology: relationship.technology().map(str::to_owned),
            },
            annotations: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        match &self.payload {
            DiffablePayload::Element { id, .. } | DiffablePayload::Relationship { id, .. } => id,
        }
    }

    /// Display name: the element's name, or the relationship's description.
    pub fn name(&self) -> &str {
        match &self.payload {
            DiffablePayload::Element { name, .. } => name,
            DiffablePayload::Relationship { description, .. } => description,
        }
    }

    pub fn element_kind(&self) -> Option<ElementKind> {
        match &self.payload {
            DiffablePayload::Element { kind, .. } => Some(*kind),
            DiffablePayload::Relationship { .. } => None,
        }
    }

    pub fn is_relationship(&self) -> bool {
        matches!(self.payload, DiffablePayload::Relationship { .. })
    }

    pub fn parent_id(&self) -> Option<&str> {
        match &self.payload {
            DiffablePayload::Element { parent_id, .. } => parent_id.as_deref(),
            DiffablePayload::Relationship { .. } => None,
        }
    }

    /// Source and destination ids, for relationship payloads.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        match &self.payload {
            DiffablePayload::Relationship {
                source_id,
                destination_id,
                ..
            } => Some((source_id, destination_id)),
            DiffablePayload::Element { .. } => None,
        }
    }

    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }

    pub fn payload(&self) -> &DiffablePayload {
        &self.payload
    }

    /// Content equality: payloads only, annotations ignored.
    pub fn same_content(&self, other: &Diffable) -> bool {
        self.payload == other.payload
    }

    fn with_annotations(mut self, annotations: &AnnotationMap) -> Self {
        if let Some(notes) = annotations.get(self.id()) {
            self.annotations = notes.clone();
        }
        self
    }
}

/// Immutable pairing of one identifier's before and after sides.
///
/// The status is computed at construction and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    before: Option<Diffable>,
    after: Option<Diffable>,
    descendants_before: Vec<Diffable>,
    descendants_after: Vec<Diffable>,
    status: DiffStatus,
}

impl Diff {
    /// Pair the two sides of `id` and classify the change.
    ///
    /// # Errors
    ///
    /// [`DiffError::MissingBothSides`] when both sides are absent.
    pub fn new(
        id: &str,
        before: Option<Diffable>,
        after: Option<Diffable>,
        descendants_before: Vec<Diffable>,
        descendants_after: Vec<Diffable>,
    ) -> Result<Self, DiffError> {
        let status = match (&before, &after) {
            (None, None) => {
                return Err(DiffError::MissingBothSides { id: id.to_owned() });
            }
            (None, Some(_)) => DiffStatus::Created,
            (Some(_), None) => DiffStatus::Deleted,
            (Some(b), Some(a)) if !b.same_content(a) => DiffStatus::Updated,
            _ if !same_payload_set(&descendants_before, &descendants_after) => {
                DiffStatus::ChildrenUpdated
            }
            _ => DiffStatus::Unchanged,
        };

        Ok(Self {
            before,
            after,
            descendants_before,
            descendants_after,
            status,
        })
    }

    pub fn status(&self) -> DiffStatus {
        self.status
    }

    pub fn before(&self) -> Option<&Diffable> {
        self.before.as_ref()
    }

    pub fn after(&self) -> Option<&Diffable> {
        self.after.as_ref()
    }

    /// The side to show: after, falling back to before for deletions.
    pub fn current(&self) -> &Diffable {
        self.after
            .as_ref()
            .or(self.before.as_ref())
            .expect("a diff always has at least one side")
    }

    pub fn id(&self) -> &str {
        self.current().id()
    }

    pub fn descendants_before(&self) -> &[Diffable] {
        &self.descendants_before
    }

    pub fn descendants_after(&self) -> &[Diffable] {
        &self.descendants_after
    }

    /// Annotations from whichever sides carry them, after first.
    pub fn annotations(&self) -> &[String] {
        let current = self.current().annotations();
        if current.is_empty() {
            self.before
                .as_ref()
                .map(|diffable| diffable.annotations())
                .unwrap_or_default()
        } else {
            current
        }
    }

    /// Whether a deeper diagram plausibly exists for this identifier:
    /// a container or component descendant on either side.
    pub fn has_nested_view(&self) -> bool {
        self.descendants_before
            .iter()
            .chain(&self.descendants_after)
            .any(|diffable| {
                matches!(
                    diffable.element_kind(),
                    Some(ElementKind::Container | ElementKind::Component)
                )
            })
    }
}

/// Order-insensitive payload-set equality, the descendant comparison rule.
fn same_payload_set(left: &[Diffable], right: &[Diffable]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .all(|l| right.iter().any(|r| l.same_content(r)))
}

/// The complete result of comparing two snapshots: one [`Diff`] per
/// identifier, keyed and iterated in deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSet {
    diffs: IndexMap<String, Diff>,
}

impl DiffSet {
    /// Compare two snapshots without annotations.
    pub fn between(before: &Snapshot, after: &Snapshot) -> Result<Self, DiffError> {
        Self::between_with_annotations(before, after, &AnnotationMap::new())
    }

    /// Compare two snapshots, attaching traceability annotations by id.
    ///
    /// For every identifier in the union of both snapshots, the element or
    /// relationship is looked up on each side, descendant sets are taken
    /// from each side, and the status is classified. Identifiers only in
    /// `before` sort first (in `before` order), then identifiers new in
    /// `after` (in `after` order).
    pub fn between_with_annotations(
        before: &Snapshot,
        after: &Snapshot,
        annotations: &AnnotationMap,
    ) -> Result<Self, DiffError> {
        let mut diffs = IndexMap::new();

        for id in union(before.element_ids(), after.element_ids()) {
            let before_side = before
                .element(id)
                .map(|element| Diffable::from_element(element).with_annotations(annotations));
            let after_side = after
                .element(id)
                .map(|element| Diffable::from_element(element).with_annotations(annotations));
            let diff = Diff::new(
                id,
                before_side,
                after_side,
                descendant_views(before, id),
                descendant_views(after, id),
            )?;
            trace!(id, status:? = diff.status(); "Classified element");
            diffs.insert(id.to_owned(), diff);
        }

        for id in union(before.relationship_ids(), after.relationship_ids()) {
            let before_side = before
                .relationship(id)
                .map(|rel| Diffable::from_relationship(rel).with_annotations(annotations));
            let after_side = after
                .relationship(id)
                .map(|rel| Diffable::from_relationship(rel).with_annotations(annotations));
            let diff = Diff::new(id, before_side, after_side, Vec::new(), Vec::new())?;
            trace!(id, status:? = diff.status(); "Classified relationship");
            diffs.insert(id.to_owned(), diff);
        }

        debug!(diffs_count = diffs.len(); "Diff set computed");
        Ok(Self { diffs })
    }

    pub fn get(&self, id: &str) -> Option<&Diff> {
        self.diffs.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diff> {
        self.diffs.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.diffs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

impl<'a> IntoIterator for &'a DiffSet {
    type Item = &'a Diff;
    type IntoIter = indexmap::map::Values<'a, String, Diff>;

    fn into_iter(self) -> Self::IntoIter {
        self.diffs.values()
    }
}

/// Ids from `first`, then ids from `second` not already seen.
fn union<'a>(
    first: impl Iterator<Item = &'a str>,
    second: impl Iterator<Item = &'a str>,
) -> Vec<&'a str> {
    let mut ids: Vec<&'a str> = first.collect();
    let seen: BTreeSet<&str> = ids.iter().copied().collect();
    ids.extend(second.filter(|id| !seen.contains(id)));
    ids
}

fn descendant_views(snapshot: &Snapshot, id: &str) -> Vec<Diffable> {
    snapshot
        .descendants_of(id)
        .into_iter()
        .map(Diffable::from_element)
        .collect()
}
