//! The normalized lock: one resolved version per project root.

use crate::core::project_root::ProjectRoot;
use crate::core::version::LockedVersion;

/// A locked project entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedProject {
    pub root: ProjectRoot,

    /// Alternate repository location.
    pub source: Option<String>,

    pub version: LockedVersion,

    /// Packages used from this project, relative to the root (`.` is the
    /// root package).
    pub packages: Vec<String>,
}

impl LockedProject {
    pub fn new(root: ProjectRoot, source: Option<String>, version: LockedVersion) -> Self {
        LockedProject {
            root,
            source,
            version,
            packages: Vec::new(),
        }
    }

    /// Record a used package once.
    pub fn add_package(&mut self, package: impl Into<String>) {
        let package = package.into();
        if !self.packages.contains(&package) {
            self.packages.push(package);
        }
    }
}

/// Resolved versions for every converted project, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lock {
    pub projects: Vec<LockedProject>,

    /// Digest of the manifest this lock was produced from.
    pub inputs_digest: Option<String>,
}

impl Lock {
    pub fn new() -> Self {
        Lock::default()
    }

    /// Append a project. Returns `false` if the root is already locked.
    pub fn add_project(&mut self, project: LockedProject) -> bool {
        if self.find(&project.root).is_some() {
            return false;
        }
        self.projects.push(project);
        true
    }

    pub fn find(&self, root: &ProjectRoot) -> Option<&LockedProject> {
        self.projects.iter().find(|p| &p.root == root)
    }

    pub fn find_mut(&mut self, root: &ProjectRoot) -> Option<&mut LockedProject> {
        self.projects.iter_mut().find(|p| &p.root == root)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
