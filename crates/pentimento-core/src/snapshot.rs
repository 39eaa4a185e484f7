//! One snapshot of the architecture model, and the builder that assembles it.
//!
//! A [`Snapshot`] is the in-memory graph for one version of the model:
//! elements keyed by id, relationships keyed by id, addressable by id or by
//! canonical path. Iteration order is insertion order, which keeps every
//! downstream computation deterministic.
//!
//! [`SnapshotBuilder`] drives the identity protocol from [`crate::identity`]
//! one element at a time: resolve the canonical path, stage it, construct
//! the element (which takes the id from the slot), insert. Relationships
//! are added after their endpoints and validated against the action's
//! destination rules.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    error::{IdentityError, ModelError},
    identity::{IdSlot, PathCatalog, relationship_id},
    model::{Action, Element, ElementKind, Relationship},
};

/// An immutable snapshot of the architecture model.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    elements: IndexMap<String, Element>,
    relationships: IndexMap<String, Relationship>,
}

impl Snapshot {
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    /// Look an element up by canonical path. Ids are derived from paths, so
    /// this is the same index viewed through the path form.
    pub fn element_by_path(&self, path: &str) -> Option<&Element> {
        self.elements.get(path)
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.get(id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn element_ids(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn relationship_ids(&self) -> impl Iterator<Item = &str> {
        self.relationships.keys().map(String::as_str)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// All elements transitively owned by `id` via `parent_id`, in
    /// depth-first order. The element itself is not included.
    pub fn descendants_of(&self, id: &str) -> Vec<&Element> {
        let mut result = Vec::new();
        self.collect_descendants(id, &mut result);
        result
    }

    fn collect_descendants<'a>(&'a self, id: &str, into: &mut Vec<&'a Element>) {
        for element in self.elements.values() {
            if element.parent_id() == Some(id) {
                into.push(element);
                self.collect_descendants(element.id(), into);
            }
        }
    }
}

/// Assembles a [`Snapshot`], assigning ids through the staged-slot protocol.
#[derive(Debug)]
pub struct SnapshotBuilder {
    catalog: PathCatalog,
    slot: IdSlot,
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    /// Start building against a catalog of every declared element.
    ///
    /// The catalog must cover the whole snapshot up front: ambiguity is
    /// defined over the full set of declarations, not the part built so far.
    pub fn new(catalog: PathCatalog) -> Self {
        Self {
            catalog,
            slot: IdSlot::new(),
            snapshot: Snapshot::default(),
        }
    }

    /// Add a person. Returns the assigned id.
    pub fn add_person(
        &mut self,
        name: &str,
        description: &str,
        tags: BTreeSet<String>,
    ) -> Result<String, ModelError> {
        let path = self.catalog.resolve(ElementKind::Person, name, &[])?;
        self.slot.stage(path.as_str());
        self.insert_element(ElementKind::Person, name, description, tags, None)
    }

    /// Add a top-level software system. Returns the assigned id.
    pub fn add_system(
        &mut self,
        name: &str,
        description: &str,
        tags: BTreeSet<String>,
    ) -> Result<String, ModelError> {
        let path = self.catalog.resolve(ElementKind::System, name, &[])?;
        self.slot.stage(path.as_str());
        self.insert_element(ElementKind::System, name, description, tags, None)
    }

    /// Add a container owned by the named system. Returns the assigned id.
    pub fn add_container(
        &mut self,
        system: &str,
        name: &str,
        description: &str,
        tags: BTreeSet<String>,
    ) -> Result<String, ModelError> {
        let path = self.catalog.resolve(ElementKind::Container, name, &[system])?;
        self.slot.stage(path.as_str());
        let parent = self.catalog.resolve(ElementKind::System, system, &[])?.clone();
        self.insert_element(
            ElementKind::Container,
            name,
            description,
            tags,
            Some(parent.into_string()),
        )
    }

    /// Add a component owned by the named container. Returns the assigned id.
    pub fn add_component(
        &mut self,
        system: &str,
        container: &str,
        name: &str,
        description: &str,
        tags: BTreeSet<String>,
    ) -> Result<String, ModelError> {
        let path = self
            .catalog
            .resolve(ElementKind::Component, name, &[system, container])?;
        self.slot.stage(path.as_str());
        let parent = self
            .catalog
            .resolve(ElementKind::Container, container, &[system])?
            .clone();
        self.insert_element(
            ElementKind::Component,
            name,
            description,
            tags,
            Some(parent.into_string()),
        )
    }

    /// Construct the element, taking its id from the slot.
    ///
    /// This is the consuming side of the staged-id protocol: it knows
    /// nothing about paths and simply requests the next id.
    fn insert_element(
        &mut self,
        kind: ElementKind,
        name: &str,
        description: &str,
        tags: BTreeSet<String>,
        parent_id: Option<String>,
    ) -> Result<String, ModelError> {
        let id = self.slot.take()?;
        if self.snapshot.elements.contains_key(&id) {
            return Err(IdentityError::DuplicateId { id }.into());
        }

        trace!(id, kind:?; "Adding element");
        let element = Element::new(
            id.clone(),
            kind,
            name.to_owned(),
            description.to_owned(),
            tags,
            parent_id,
        );
        self.snapshot.elements.insert(id.clone(), element);
        Ok(id)
    }

    /// Add a relationship between two elements identified by id/path.
    /// Returns the content-derived relationship id.
    pub fn add_relationship(
        &mut self,
        source_id: &str,
        destination_id: &str,
        action: Action,
        description: &str,
        technology: Option<&str>,
    ) -> Result<String, ModelError> {
        if !self.snapshot.elements.contains_key(source_id) {
            return Err(ModelError::UnknownEndpoint {
                id: source_id.to_owned(),
            });
        }
        let destination =
            self.snapshot
                .elements
                .get(destination_id)
                .ok_or_else(|| ModelError::UnknownEndpoint {
                    id: destination_id.to_owned(),
                })?;
        if !action.allows_destination(destination.kind()) {
            return Err(ModelError::IllegalDestination {
                action,
                kind: destination.kind(),
                id: destination_id.to_owned(),
            });
        }

        let id = relationship_id(source_id, destination_id, action, description, technology);
        if self.snapshot.relationships.contains_key(&id) {
            // Same semantic content means the same logical edge.
            debug!(id; "Relationship already present, skipping");
            return Ok(id);
        }

        trace!(id, source_id, destination_id; "Adding relationship");
        let relationship = Relationship::new(
            id.clone(),
            source_id.to_owned(),
            destination_id.to_owned(),
            action,
            description.to_owned(),
            technology.map(str::to_owned),
        );
        self.snapshot.relationships.insert(id.clone(), relationship);
        self.snapshot
            .elements
            .get_mut(source_id)
            .expect("source element checked above")
            .add_relationship(id.clone());
        Ok(id)
    }

    /// Finish the build and hand the snapshot to the caller.
    pub fn finish(self) -> Snapshot {
        debug!(
            elements_count = self.snapshot.element_count(),
            relationships_count = self.snapshot.relationship_count();
            "Snapshot finalized"
        );
        self.snapshot
    }
}
