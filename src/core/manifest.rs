//! The normalized manifest: declared constraints and ignore rules.

use std::collections::BTreeMap;

use crate::core::project_root::ProjectRoot;
use crate::core::version::Constraint;

/// Per-project manifest settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectProperties {
    /// Version constraint; `None` means any version is acceptable.
    pub constraint: Option<Constraint>,

    /// Alternate repository location.
    pub source: Option<String>,
}

/// Declared dependency constraints plus ignored packages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    /// At most one entry per root.
    pub constraints: BTreeMap<ProjectRoot, ProjectProperties>,

    /// Ignored package paths, deduplicated, in first-seen order.
    pub ignored: Vec<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Manifest::default()
    }

    /// Record the properties for a root, replacing nothing.
    ///
    /// Returns `false` when the root already had an entry.
    pub fn add_constraint(&mut self, root: ProjectRoot, props: ProjectProperties) -> bool {
        if self.constraints.contains_key(&root) {
            return false;
        }
        self.constraints.insert(root, props);
        true
    }

    /// Add an ignored package unless it is already present.
    pub fn ignore(&mut self, package: impl AsRef<str>) -> bool {
        let package = package.as_ref().trim();
        if package.is_empty() || self.ignored.iter().any(|p| p == package) {
            return false;
        }
        self.ignored.push(package.to_string());
        true
    }

    pub fn constraint_for(&self, root: &ProjectRoot) -> Option<&Constraint> {
        self.constraints.get(root).and_then(|p| p.constraint.as_ref())
    }

    pub fn is_ignored(&self, package: &str) -> bool {
        self.ignored.iter().any(|p| p == package)
    }
}
