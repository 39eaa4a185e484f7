//! CLI logic for the Pentimento diff tool.
//!
//! This module contains the core CLI logic: load the two snapshot
//! definitions, diff them, and write one DOT graph per view into the
//! output directory — the system landscape, a container view per system,
//! and a component view per container.

pub mod error_adapter;

mod args;
mod config;
mod definition;

pub use args::Args;
pub use definition::SnapshotDefinition;

use std::{fs, path::Path};

use log::{debug, info};

use pentimento::{DiffEngine, DiffSet, ElementKind, PentimentoError};

/// Run the Pentimento CLI application
///
/// # Errors
///
/// Returns `PentimentoError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Definition parsing or snapshot construction errors
/// - Diff computation errors
pub fn run(args: &Args) -> Result<(), PentimentoError> {
    info!(
        before_path = args.before,
        after_path = args.after,
        output_dir = args.output;
        "Comparing model snapshots"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    // Load both snapshot definitions
    let before_definition = SnapshotDefinition::from_json(&fs::read_to_string(&args.before)?)?;
    let after_definition = SnapshotDefinition::from_json(&fs::read_to_string(&args.after)?)?;

    let before = before_definition.build()?;
    let after = after_definition.build()?;

    // Annotations from both sides; the after side wins per id.
    let mut annotations = before_definition.annotations.clone();
    annotations.extend(after_definition.annotations.clone());

    // Diff and render each granularity level
    let engine = DiffEngine::new(app_config);
    let diffs = engine.diff_with_annotations(&before, &after, &annotations)?;

    let output_dir = Path::new(&args.output);
    fs::create_dir_all(output_dir)?;

    let mut written = 0usize;

    let landscape = engine.render_system_landscape(&diffs, "System landscape");
    fs::write(output_dir.join("system-landscape.dot"), landscape)?;
    written += 1;

    written += write_level_views(&engine, &diffs, output_dir)?;

    info!(files_count = written, output_dir = args.output; "Graphs written");
    Ok(())
}

/// Write a container view per system and a component view per container.
/// Views with nothing at their level are skipped.
fn write_level_views(
    engine: &DiffEngine,
    diffs: &DiffSet,
    output_dir: &Path,
) -> Result<usize, PentimentoError> {
    let mut written = 0usize;

    for diff in diffs.iter() {
        let diffable = diff.current();
        match diffable.element_kind() {
            Some(ElementKind::System) => {
                let scope = diffs.container_view(diffable.id());
                if scope.is_empty() {
                    debug!(id = diffable.id(); "No containers at this level, skipping view");
                    continue;
                }
                let title = format!("Containers of {}", diffable.name());
                let dot = engine.render_container_view(diffs, diffable.id(), &title);
                let file = format!("container-{}.dot", file_stem(diffable.id()));
                fs::write(output_dir.join(file), dot)?;
                written += 1;
            }
            Some(ElementKind::Container) => {
                let scope = diffs.component_view(diffable.id());
                if scope.is_empty() {
                    debug!(id = diffable.id(); "No components at this level, skipping view");
                    continue;
                }
                let title = format!("Components of {}", diffable.name());
                let dot = engine.render_component_view(diffs, diffable.id(), &title);
                let file = format!("component-{}.dot", file_stem(diffable.id()));
                fs::write(output_dir.join(file), dot)?;
                written += 1;
            }
            _ => {}
        }
    }

    Ok(written)
}

/// Turn an element id into a filesystem-safe file stem.
fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
