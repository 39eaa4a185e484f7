//! Core types and snapshot machinery for Pentimento.
//!
//! This crate defines the vocabulary of an architecture snapshot — people,
//! software systems, containers, components, and the directed relationships
//! between them — together with the identity assignment that makes two
//! independently loaded snapshots comparable by id equality alone.

pub mod error;
pub mod identity;
pub mod model;
pub mod path;
pub mod snapshot;

pub use error::{IdentityError, ModelError};
pub use identity::{IdSlot, PathCatalog};
pub use model::{Action, Element, ElementKind, Relationship};
pub use path::CanonicalPath;
pub use snapshot::{Snapshot, SnapshotBuilder};
