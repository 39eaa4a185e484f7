//! Stable identity assignment for elements and relationships.
//!
//! Elements get their canonical path as their id, resolved through a
//! [`PathCatalog`] built from the declared element tree. Resolution filters
//! by `(kind, name)` and, for containers and components, by ancestor name
//! equality; anything other than exactly one match is fatal.
//!
//! The hand-off between resolution and element construction goes through an
//! [`IdSlot`]: the construction pass stages the resolved id, the element
//! constructor takes it, and taking clears the slot immediately so an id can
//! never leak onto a sibling element. The slot is an owned value passed down
//! the construction stack, so independent snapshot loads never share state.
//!
//! Relationship ids skip the catalog entirely: they are the lowercase-hex
//! SHA-256 digest of the relationship's semantic content, so the same
//! logical edge hashes to the same id in every load.

use sha2::{Digest, Sha256};

use crate::{
    error::IdentityError,
    model::{Action, ElementKind},
    path::CanonicalPath,
};

/// One declared element: what the catalog filters on.
#[derive(Debug, Clone)]
struct CatalogEntry {
    kind: ElementKind,
    name: String,
    ancestors: Vec<String>,
    path: CanonicalPath,
}

/// Index of every declared element's `(kind, name, ancestors)` triple,
/// used to derive canonical paths before any ids exist.
#[derive(Debug, Clone, Default)]
pub struct PathCatalog {
    entries: Vec<CatalogEntry>,
}

impl PathCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_person(&mut self, name: &str) {
        self.entries.push(CatalogEntry {
            kind: ElementKind::Person,
            name: name.to_owned(),
            ancestors: Vec::new(),
            path: CanonicalPath::for_person(name),
        });
    }

    pub fn add_system(&mut self, name: &str) {
        self.entries.push(CatalogEntry {
            kind: ElementKind::System,
            name: name.to_owned(),
            ancestors: Vec::new(),
            path: CanonicalPath::for_system(name),
        });
    }

    pub fn add_container(&mut self, system: &str, name: &str) {
        self.entries.push(CatalogEntry {
            kind: ElementKind::Container,
            name: name.to_owned(),
            ancestors: vec![system.to_owned()],
            path: CanonicalPath::for_container(system, name),
        });
    }

    pub fn add_component(&mut self, system: &str, container: &str, name: &str) {
        self.entries.push(CatalogEntry {
            kind: ElementKind::Component,
            name: name.to_owned(),
            ancestors: vec![system.to_owned(), container.to_owned()],
            path: CanonicalPath::for_component(system, container, name),
        });
    }

    /// Resolve the unique canonical path for `(kind, name)`, additionally
    /// constrained by ancestor names for containers and components.
    ///
    /// # Errors
    ///
    /// [`IdentityError::Ambiguous`] when zero or more than one catalog
    /// entry matches.
    pub fn resolve(
        &self,
        kind: ElementKind,
        name: &str,
        ancestors: &[&str],
    ) -> Result<&CanonicalPath, IdentityError> {
        let mut matches = self.entries.iter().filter(|entry| {
            entry.kind == kind
                && entry.name == name
                && match kind {
                    ElementKind::Container | ElementKind::Component => {
                        entry.ancestors.iter().map(String::as_str).eq(ancestors.iter().copied())
                    }
                    _ => true,
                }
        });

        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(&entry.path),
            (first, _) => {
                let found = first.map_or(0, |_| 2 + matches.count());
                Err(IdentityError::Ambiguous {
                    kind,
                    name: name.to_owned(),
                    matches: found,
                })
            }
        }
    }
}

/// Single-slot staging channel for the next element id.
///
/// Staging replaces any pending id; taking clears the slot before the id is
/// returned, so each staged id can be consumed exactly once.
#[derive(Debug, Default)]
pub struct IdSlot {
    next: Option<String>,
}

impl IdSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the id for the next construction request.
    pub fn stage(&mut self, id: impl Into<String>) {
        self.next = Some(id.into());
    }

    /// Consume the staged id, clearing the slot.
    ///
    /// # Errors
    ///
    /// [`IdentityError::NoneStaged`] when no id is pending.
    pub fn take(&mut self) -> Result<String, IdentityError> {
        self.next.take().ok_or(IdentityError::NoneStaged)
    }

    pub fn is_staged(&self) -> bool {
        self.next.is_some()
    }
}

/// Derive the content-addressed id for a relationship.
///
/// The digest input length-prefixes every field so field boundaries can
/// never alias: `("a|b", "c")` and `("a", "b|c")` hash differently.
pub fn relationship_id(
    source_id: &str,
    destination_id: &str,
    action: Action,
    description: &str,
    technology: Option<&str>,
) -> String {
    let mut hasher = Sha256::new();
    for field in [
        source_id,
        destination_id,
        &action.to_string(),
        description,
        technology.unwrap_or(""),
    ] {
        hasher.update(field.len().to_string().as_bytes());
        hasher.update(b":");
        hasher.update(field.as_bytes());
        hasher.update(b";");
    }
    hex::encode(hasher.finalize())
}
