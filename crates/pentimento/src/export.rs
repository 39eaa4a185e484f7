//! Export functionality for diff scopes.
//!
//! This module provides the [`Exporter`] trait that defines the interface
//! for converting a scoped diff into an output format. It is the final
//! stage of the pipeline:
//!
//! ```text
//! Two snapshots
//!     ↓ diff
//! DiffSet
//!     ↓ scope
//! Scope (one granularity level)
//!     ↓ export (this module)
//! Graph description text
//! ```
//!
//! # Available Backends
//!
//! - [`dot`] — Graphviz DOT output via [`dot::DotExporter`]

pub mod dot;

use crate::scope::Scope;

/// Abstraction for scope export backends.
///
/// Implementors convert a [`Scope`] into a textual graph description for an
/// external layout/rendering tool. See the [`dot`] module for the built-in
/// Graphviz implementation.
pub trait Exporter {
    /// Exports a scoped diff to the backend's textual format.
    fn export_scope(&self, title: &str, scope: &Scope<'_>) -> String;
}
