//! Snapshot definition documents.
//!
//! A definition is the serialized form of one model version: the element
//! tree by name (people, systems with their containers and components),
//! relationships addressed by canonical path, and optional traceability
//! annotations per path. Loading a definition assembles a
//! [`pentimento::Snapshot`] through the identity-assignment machinery, so
//! the same document always yields the same ids.

use std::collections::BTreeSet;

use serde::Deserialize;

use pentimento::{
    Action, AnnotationMap, PathCatalog, PentimentoError, Snapshot, SnapshotBuilder,
};

/// One model version as declared on disk.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotDefinition {
    #[serde(default)]
    pub people: Vec<PersonDefinition>,

    #[serde(default)]
    pub systems: Vec<SystemDefinition>,

    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,

    /// Traceability annotations keyed by canonical path — which is the
    /// element id, so these attach directly to diff entries.
    #[serde(default)]
    pub annotations: AnnotationMap,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub containers: Vec<ContainerDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,

    #[serde(default)]
    pub components: Vec<ComponentDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub tags: BTreeSet<String>,
}

/// A relationship between two elements addressed by canonical path.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipDefinition {
    pub source: String,
    pub destination: String,
    pub action: Action,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub technology: Option<String>,
}

impl SnapshotDefinition {
    /// Parse a definition from its JSON form.
    pub fn from_json(content: &str) -> Result<Self, PentimentoError> {
        serde_json::from_str(content)
            .map_err(|err| PentimentoError::Definition(err.to_string()))
    }

    /// Assemble the snapshot this definition describes.
    pub fn build(&self) -> Result<Snapshot, PentimentoError> {
        let mut builder = SnapshotBuilder::new(self.catalog());

        for person in &self.people {
            builder.add_person(&person.name, &person.description, person.tags.clone())?;
        }
        for system in &self.systems {
            builder.add_system(&system.name, &system.description, system.tags.clone())?;
            for container in &system.containers {
                builder.add_container(
                    &system.name,
                    &container.name,
                    &container.description,
                    container.tags.clone(),
                )?;
                for component in &container.components {
                    builder.add_component(
                        &system.name,
                        &container.name,
                        &component.name,
                        &component.description,
                        component.tags.clone(),
                    )?;
                }
            }
        }
        for relationship in &self.relationships {
            builder.add_relationship(
                &relationship.source,
                &relationship.destination,
                relationship.action,
                &relationship.description,
                relationship.technology.as_deref(),
            )?;
        }

        Ok(builder.finish())
    }

    fn catalog(&self) -> PathCatalog {
        let mut catalog = PathCatalog::new();
        for person in &self.people {
            catalog.add_person(&person.name);
        }
        for system in &self.systems {
            catalog.add_system(&system.name);
            for container in &system.containers {
                catalog.add_container(&system.name, &container.name);
                for component in &container.components {
                    catalog.add_component(&system.name, &container.name, &component.name);
                }
            }
        }
        catalog
    }
}
