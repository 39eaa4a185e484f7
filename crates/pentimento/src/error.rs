//! Error types for Pentimento operations.
//!
//! This module provides the main error type [`PentimentoError`] which wraps
//! the error conditions that can occur while loading snapshots, computing a
//! diff, and writing output.

use std::io;

use thiserror::Error;

use pentimento_core::{IdentityError, ModelError};

use crate::diff::DiffError;

/// The main error type for Pentimento operations.
#[derive(Debug, Error)]
pub enum PentimentoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Identity derivation failed during snapshot construction.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Snapshot assembly failed (bad endpoint, illegal destination, ...).
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Diff computation was handed inconsistent input.
    #[error("Diff error: {0}")]
    Diff(#[from] DiffError),

    /// A snapshot definition could not be read or understood.
    #[error("Definition error: {0}")]
    Definition(String),
}
