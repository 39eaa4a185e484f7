//! Error types for snapshot construction and identity assignment.

use thiserror::Error;

use crate::model::{Action, ElementKind};

/// Errors raised while deriving or handing out stable identifiers.
///
/// All variants are fatal to the construction pass that triggered them:
/// identity derivation is deterministic, so retrying with unchanged input
/// would reproduce the same error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// Canonical-path derivation matched zero or more than one candidate.
    #[error("expected exactly one canonical path for {kind} \"{name}\", found {matches}")]
    Ambiguous {
        kind: ElementKind,
        name: String,
        matches: usize,
    },

    /// An identifier was requested with none staged in the slot.
    #[error("an identifier was requested but none is staged")]
    NoneStaged,

    /// Two distinct elements resolved to the same identifier.
    #[error("duplicate identifier \"{id}\" in snapshot")]
    DuplicateId { id: String },
}

/// Errors raised while assembling a snapshot from its declared elements
/// and relationships.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// A relationship references an element that is not in the snapshot.
    #[error("relationship endpoint \"{id}\" is not defined in the snapshot")]
    UnknownEndpoint { id: String },

    /// The relationship action does not permit the destination's kind.
    #[error("a \"{action}\" relationship cannot target {kind} \"{id}\"")]
    IllegalDestination {
        action: Action,
        kind: ElementKind,
        id: String,
    },
}
