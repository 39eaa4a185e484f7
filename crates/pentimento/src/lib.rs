//! Pentimento - architecture model diffing and scoped visualization.
//!
//! Pentimento compares two snapshots of a hierarchical architecture model
//! (people, software systems, containers, components, and the directed
//! relationships between them) and renders the change at a chosen
//! granularity as an annotated Graphviz DOT graph. The name is borrowed
//! from painting: a pentimento is the visible trace of an earlier
//! composition beneath the current surface.

pub mod config;

mod diff;
mod error;
mod export;
mod scope;

pub use pentimento_core::{
    Action, CanonicalPath, Element, ElementKind, IdSlot, IdentityError, ModelError, PathCatalog,
    Relationship, Snapshot, SnapshotBuilder,
};

pub use diff::{AnnotationMap, Diff, DiffError, DiffSet, DiffStatus, Diffable, DiffablePayload};
pub use error::PentimentoError;
pub use export::{Exporter, dot::DotExporter};
pub use scope::Scope;

use log::{debug, info};

use config::AppConfig;

/// Facade for diffing snapshots and rendering scoped views.
///
/// # Examples
///
/// ```rust,no_run
/// use pentimento::{DiffEngine, PathCatalog, SnapshotBuilder, config::AppConfig};
/// use std::collections::BTreeSet;
///
/// let mut catalog = PathCatalog::new();
/// catalog.add_system("shop");
///
/// let mut builder = SnapshotBuilder::new(catalog.clone());
/// builder.add_system("shop", "Online shop", BTreeSet::new()).expect("system");
/// let before = builder.finish();
///
/// let mut builder = SnapshotBuilder::new(catalog);
/// builder.add_system("shop", "Web shop", BTreeSet::new()).expect("system");
/// let after = builder.finish();
///
/// let engine = DiffEngine::new(AppConfig::default());
/// let diffs = engine.diff(&before, &after).expect("diff");
/// let dot = engine.render_system_landscape(&diffs, "landscape");
/// println!("{dot}");
/// ```
#[derive(Default)]
pub struct DiffEngine {
    config: AppConfig,
}

impl DiffEngine {
    /// Create a new engine with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Compare two snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`PentimentoError::Diff`] when the comparison is handed an
    /// identifier with no side in either snapshot.
    pub fn diff(
        &self,
        before: &Snapshot,
        after: &Snapshot,
    ) -> Result<DiffSet, PentimentoError> {
        self.diff_with_annotations(before, after, &AnnotationMap::new())
    }

    /// Compare two snapshots, attaching traceability annotations by id.
    pub fn diff_with_annotations(
        &self,
        before: &Snapshot,
        after: &Snapshot,
        annotations: &AnnotationMap,
    ) -> Result<DiffSet, PentimentoError> {
        info!(
            before_elements = before.element_count(),
            after_elements = after.element_count();
            "Comparing snapshots"
        );
        let diffs = DiffSet::between_with_annotations(before, after, annotations)?;
        debug!(diffs_count = diffs.len(); "Comparison complete");
        Ok(diffs)
    }

    /// Render the system landscape: people, systems, and the relationships
    /// between them.
    pub fn render_system_landscape(&self, diffs: &DiffSet, title: &str) -> String {
        info!(title; "Rendering system landscape");
        self.exporter().export_scope(title, &diffs.system_landscape())
    }

    /// Render one system's containers with their connected context.
    pub fn render_container_view(&self, diffs: &DiffSet, system_id: &str, title: &str) -> String {
        info!(title, system_id; "Rendering container view");
        self.exporter()
            .export_scope(title, &diffs.container_view(system_id))
    }

    /// Render one container's components with every connection shown.
    pub fn render_component_view(
        &self,
        diffs: &DiffSet,
        container_id: &str,
        title: &str,
    ) -> String {
        info!(title, container_id; "Rendering component view");
        self.exporter()
            .export_scope(title, &diffs.component_view(container_id))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    fn exporter(&self) -> DotExporter {
        DotExporter::new().with_style(self.config.style())
    }
}
