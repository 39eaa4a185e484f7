//! Graphviz DOT rendering of a scoped diff.
//!
//! The output grammar is fixed: a `digraph` header, a left-to-right
//! ranking hint, zero or one filled cluster for the scope's parent, one
//! statement per element node, one statement per relationship edge, and a
//! closing brace. The consuming layout tool parses these statements
//! verbatim, so attribute spelling and quoting must not drift.

use std::fmt::{self, Write};

use log::debug;

use crate::{
    config::StyleConfig,
    diff::Diff,
    export::Exporter,
    scope::Scope,
};

/// Maximum characters of a traceability annotation shown in a tooltip.
const TOOLTIP_LIMIT: usize = 50;

/// Renders a [`Scope`] as an annotated Graphviz DOT graph.
#[derive(Debug, Clone, Default)]
pub struct DotExporter {
    style: StyleConfig,
    link_prefix: Option<String>,
}

impl DotExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given style (status palette and default link prefix).
    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// Override the drill-down link prefix for this exporter.
    pub fn with_link_prefix(mut self, prefix: &str) -> Self {
        self.link_prefix = Some(prefix.to_owned());
        self
    }

    fn link_prefix(&self) -> &str {
        self.link_prefix
            .as_deref()
            .unwrap_or_else(|| self.style.link_prefix())
    }

    fn write_graph(&self, out: &mut String, title: &str, scope: &Scope<'_>) -> fmt::Result {
        writeln!(out, "digraph \"{}\" {{", escape(title))?;
        writeln!(out, "  rankdir=LR;")?;

        if let Some(parent) = scope.parent() {
            self.write_cluster(out, parent, scope)?;
        }

        for diff in scope.diffs() {
            if !diff.current().is_relationship() {
                self.write_node(out, diff)?;
            }
        }
        for diff in scope.diffs() {
            if diff.current().is_relationship() {
                self.write_edge(out, diff, scope)?;
            }
        }

        writeln!(out, "}}")
    }

    /// Wrap the parent's own children in a filled, labeled sub-cluster.
    fn write_cluster(&self, out: &mut String, parent: &Diff, scope: &Scope<'_>) -> fmt::Result {
        let members: Vec<&str> = scope
            .diffs()
            .iter()
            .filter(|diff| !diff.current().is_relationship())
            .map(|diff| diff.id())
            .filter(|id| {
                parent
                    .descendants_before()
                    .iter()
                    .chain(parent.descendants_after())
                    .any(|descendant| descendant.id() == *id)
            })
            .collect();

        if members.is_empty() {
            return Ok(());
        }

        writeln!(out, "  subgraph \"cluster_{}\" {{", escape(parent.id()))?;
        writeln!(out, "    label=\"{}\";", escape(parent.current().name()))?;
        writeln!(out, "    style=filled;")?;
        writeln!(out, "    color=lightgrey;")?;
        for id in members {
            writeln!(out, "    \"{}\";", escape(id))?;
        }
        writeln!(out, "  }}")
    }

    fn write_node(&self, out: &mut String, diff: &Diff) -> fmt::Result {
        let diffable = diff.current();
        let kind = diffable
            .element_kind()
            .expect("relationships are rendered as edges");
        let color = self.style.status_color(diff.status());

        write!(
            out,
            "  \"{id}\" [label=\"{name}\\n[{kind}]\\n{path}\", color={color}, fontcolor={color}, shape=plaintext",
            id = escape(diffable.id()),
            name = escape(diffable.name()),
            path = escape(diffable.id()),
        )?;

        // A drill-down link only makes sense where a deeper diagram
        // plausibly exists.
        if !diff.annotations().is_empty() || diff.has_nested_view() {
            write!(
                out,
                ", URL=\"{}/{}.svg\"",
                escape(self.link_prefix()),
                escape(diffable.id())
            )?;
        }

        if !diff.annotations().is_empty() {
            let lines: Vec<String> = diff
                .annotations()
                .iter()
                .map(|annotation| escape(&truncate(annotation)))
                .collect();
            write!(out, ", tooltip=\"{}\"", lines.join("\\n"))?;
        }

        writeln!(out, "];")
    }

    fn write_edge(&self, out: &mut String, diff: &Diff, scope: &Scope<'_>) -> fmt::Result {
        let diffable = diff.current();
        let (source, destination) = diffable
            .endpoints()
            .expect("elements are rendered as nodes");
        let color = self.style.status_color(diff.status());
        let tooltip = format!(
            "{} -> {}",
            endpoint_name(scope, source),
            endpoint_name(scope, destination)
        );

        writeln!(
            out,
            "  \"{source}\" -> \"{destination}\" [label=\"{label}\", color={color}, tooltip=\"{tooltip}\", labeltooltip=\"{tooltip}\"];",
            source = escape(source),
            destination = escape(destination),
            label = escape(diffable.name()),
            tooltip = escape(&tooltip),
        )
    }
}

impl Exporter for DotExporter {
    fn export_scope(&self, title: &str, scope: &Scope<'_>) -> String {
        let mut out = String::new();
        self.write_graph(&mut out, title, scope)
            .expect("writing to a String cannot fail");
        debug!(title, nodes_count = scope.len(); "Rendered DOT graph");
        out
    }
}

/// Resolve an endpoint's display name within the scope, falling back to
/// the raw id when the endpoint has no diff in the collection.
fn endpoint_name<'a>(scope: &'a Scope<'_>, id: &'a str) -> &'a str {
    scope
        .diffs()
        .iter()
        .find(|diff| diff.id() == id)
        .map(|diff| diff.current().name())
        .unwrap_or(id)
}

/// Escape a string for inclusion inside a double-quoted DOT value.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn truncate(annotation: &str) -> String {
    if annotation.chars().count() > TOOLTIP_LIMIT {
        let head: String = annotation.chars().take(TOOLTIP_LIMIT).collect();
        format!("{head}...")
    } else {
        annotation.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet as Tags};

    use pentimento_core::{Action, PathCatalog, Snapshot, SnapshotBuilder};

    use super::*;
    use crate::diff::{AnnotationMap, DiffSet};

    fn catalog() -> PathCatalog {
        let mut catalog = PathCatalog::new();
        catalog.add_person("Clerk");
        catalog.add_system("shop");
        catalog.add_container("shop", "web");
        catalog.add_component("shop", "web", "cart");
        catalog
    }

    fn snapshot(with_person: bool, shop_description: &str) -> Snapshot {
        let mut builder = SnapshotBuilder::new(catalog());
        if with_person {
            builder
                .add_person("Clerk", "Handles orders", Tags::new())
                .expect("person");
        }
        builder
            .add_system("shop", shop_description, Tags::new())
            .expect("system");
        builder
            .add_container("shop", "web", "Storefront", Tags::new())
            .expect("container");
        builder
            .add_component("shop", "web", "cart", "Shopping cart", Tags::new())
            .expect("component");
        if with_person {
            builder
                .add_relationship("@Clerk", "shop", Action::Uses, "manages orders", None)
                .expect("relationship");
        }
        builder.finish()
    }

    #[test]
    fn test_created_node_is_darkgreen() {
        let diffs =
            DiffSet::between(&snapshot(false, "Online shop"), &snapshot(true, "Online shop"))
                .expect("diff");
        let dot = DotExporter::new().export_scope("landscape", &diffs.system_landscape());

        assert!(dot.contains(
            "\"@Clerk\" [label=\"Clerk\\n[Person]\\n@Clerk\", color=darkgreen, fontcolor=darkgreen"
        ));
    }

    #[test]
    fn test_deleted_node_is_red() {
        let diffs =
            DiffSet::between(&snapshot(true, "Online shop"), &snapshot(false, "Online shop"))
                .expect("diff");
        let dot = DotExporter::new().export_scope("landscape", &diffs.system_landscape());

        assert!(dot.contains("color=red"));
        // The deleted relationship still renders, from its before side.
        assert!(dot.contains("\"@Clerk\" -> \"shop\" [label=\"manages orders\", color=red"));
    }

    #[test]
    fn test_updated_and_unchanged_colors() {
        let diffs =
            DiffSet::between(&snapshot(true, "Online shop"), &snapshot(true, "Web shop"))
                .expect("diff");
        let dot = DotExporter::new().export_scope("landscape", &diffs.system_landscape());

        assert!(dot.contains("\"shop\" [label=\"shop\\n[Software System]\\nshop\", color=blue"));
        assert!(dot.contains("color=black"));
    }

    #[test]
    fn test_header_layout_hint_and_closing_brace() {
        let diffs =
            DiffSet::between(&snapshot(true, "Online shop"), &snapshot(true, "Online shop"))
                .expect("diff");
        let dot = DotExporter::new().export_scope("my landscape", &diffs.system_landscape());

        assert!(dot.starts_with("digraph \"my landscape\" {\n  rankdir=LR;\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_drill_down_url_only_where_deeper_view_exists() {
        let diffs =
            DiffSet::between(&snapshot(true, "Online shop"), &snapshot(true, "Online shop"))
                .expect("diff");
        let dot = DotExporter::new()
            .with_link_prefix("diagrams")
            .export_scope("landscape", &diffs.system_landscape());

        // The system owns a container, so it links; the person owns nothing.
        assert!(dot.contains("URL=\"diagrams/shop.svg\""));
        assert!(!dot.contains("URL=\"diagrams/@Clerk.svg\""));
    }

    #[test]
    fn test_annotations_render_as_truncated_tooltip() {
        let long = "a".repeat(60);
        let mut annotations: AnnotationMap = BTreeMap::new();
        annotations.insert(
            "@Clerk".to_string(),
            vec!["short note".to_string(), long.clone()],
        );

        let diffs = DiffSet::between_with_annotations(
            &snapshot(true, "Online shop"),
            &snapshot(true, "Online shop"),
            &annotations,
        )
        .expect("diff");
        let dot = DotExporter::new().export_scope("landscape", &diffs.system_landscape());

        let expected = format!("tooltip=\"short note\\n{}...\"", "a".repeat(50));
        assert!(dot.contains(&expected));
        // Annotations also make the node clickable.
        assert!(dot.contains("URL=\"./@Clerk.svg\""));
    }

    #[test]
    fn test_edge_tooltip_falls_back_to_raw_id() {
        let diffs =
            DiffSet::between(&snapshot(true, "Online shop"), &snapshot(true, "Online shop"))
                .expect("diff");
        let landscape = diffs.system_landscape();

        // Drop the person from the rendered collection; the edge must still
        // render, substituting the raw id for the missing endpoint.
        let without_person: Vec<&Diff> = landscape
            .diffs()
            .iter()
            .copied()
            .filter(|diff| diff.id() != "@Clerk")
            .collect();
        let narrowed = Scope::from_parts(without_person, None);
        let dot = DotExporter::new().export_scope("landscape", &narrowed);

        assert!(dot.contains("tooltip=\"@Clerk -> shop\""));
    }

    #[test]
    fn test_parent_cluster_wraps_children() {
        let diffs =
            DiffSet::between(&snapshot(true, "Online shop"), &snapshot(true, "Online shop"))
                .expect("diff");
        let dot = DotExporter::new().export_scope("containers", &diffs.container_view("shop"));

        assert!(dot.contains("subgraph \"cluster_shop\" {"));
        assert!(dot.contains("label=\"shop\";"));
        assert!(dot.contains("style=filled;"));
        assert!(dot.contains("    \"shop/web\";"));
    }

    #[test]
    fn test_no_cluster_without_parent() {
        let diffs =
            DiffSet::between(&snapshot(true, "Online shop"), &snapshot(true, "Online shop"))
                .expect("diff");
        let dot = DotExporter::new().export_scope("landscape", &diffs.system_landscape());
        assert!(!dot.contains("subgraph"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(escape("a \"quoted\" name"), "a \\\"quoted\\\" name");
        assert_eq!(escape("back\\slash"), "back\\\\slash");
    }
}
