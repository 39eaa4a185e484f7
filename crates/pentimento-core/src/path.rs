//! Canonical paths: hierarchical name-based locators for elements.
//!
//! A canonical path uniquely locates an element within the model hierarchy
//! (`system`, `system/container`, `system/container/component`) or, for a
//! person, an `@name` form. Paths exist only to derive stable ids; once an
//! id is assigned, all comparison happens by id equality.

use std::fmt;

use serde::Serialize;

/// A slash-delimited hierarchical locator for one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    /// Path for a person: `@name`.
    pub fn for_person(name: &str) -> Self {
        Self(format!("@{name}"))
    }

    /// Path for a top-level software system: `system`.
    pub fn for_system(name: &str) -> Self {
        Self(name.to_owned())
    }

    /// Path for a container within a system: `system/container`.
    pub fn for_container(system: &str, container: &str) -> Self {
        Self(format!("{system}/{container}"))
    }

    /// Path for a component within a container: `system/container/component`.
    pub fn for_component(system: &str, container: &str, component: &str) -> Self {
        Self(format!("{system}/{container}/{component}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
