//! Configuration types for Pentimento rendering.
//!
//! This module provides the configuration structures that control how diff
//! graphs are styled. All types implement [`serde::Deserialize`] for
//! loading from external sources (the CLI reads them from TOML).

use serde::Deserialize;

use crate::diff::DiffStatus;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified style configuration.
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Visual styling for rendered diff graphs.
///
/// Every field is optional; unset fields fall back to the built-in
/// palette (created → dark green, deleted → red, updated → blue, children
/// updated → blue-violet, unchanged → black).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    /// Prefix for per-element drill-down links (`{prefix}/{id}.svg`).
    #[serde(default)]
    link_prefix: Option<String>,

    #[serde(default)]
    created_color: Option<String>,

    #[serde(default)]
    deleted_color: Option<String>,

    #[serde(default)]
    updated_color: Option<String>,

    #[serde(default)]
    children_updated_color: Option<String>,

    #[serde(default)]
    unchanged_color: Option<String>,
}

impl StyleConfig {
    /// Link prefix for drill-down URLs. Defaults to the current directory.
    pub fn link_prefix(&self) -> &str {
        self.link_prefix.as_deref().unwrap_or(".")
    }

    /// The color drawn for a node or edge with the given status.
    pub fn status_color(&self, status: DiffStatus) -> &str {
        let (configured, default) = match status {
            DiffStatus::Created => (&self.created_color, "darkgreen"),
            DiffStatus::Deleted => (&self.deleted_color, "red"),
            DiffStatus::Updated => (&self.updated_color, "blue"),
            DiffStatus::ChildrenUpdated => (&self.children_updated_color, "blueviolet"),
            DiffStatus::Unchanged => (&self.unchanged_color, "black"),
        };
        configured.as_deref().unwrap_or(default)
    }
}
