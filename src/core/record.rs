//! Records produced by the legacy format readers.

use std::path::PathBuf;

use crate::core::version::Revision;

/// One dependency entry as a legacy tool recorded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Import path of the package (may be a sub-package of a repository).
    pub import_path: String,

    /// Revision the legacy tool pinned.
    pub revision: Revision,

    /// Free-form tag or branch annotation, if the tool kept one.
    pub label: Option<String>,

    /// Alternate repository location (fork or mirror).
    pub source: Option<String>,
}

impl ImportRecord {
    pub fn new(import_path: impl Into<String>, revision: impl Into<Revision>) -> Self {
        ImportRecord {
            import_path: import_path.into(),
            revision: revision.into(),
            label: None,
            source: None,
        }
    }

    /// Set the version label. Blank labels are dropped.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = if label.trim().is_empty() {
            None
        } else {
            Some(label.trim().to_string())
        };
        self
    }

    /// Set the source override. Blank sources are dropped.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        let source = source.into();
        self.source = if source.trim().is_empty() {
            None
        } else {
            Some(source.trim().to_string())
        };
        self
    }
}

/// Everything an importer read from a project's legacy metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedConfig {
    /// Dependency entries in file order.
    pub records: Vec<ImportRecord>,

    /// Packages the legacy config marked as ignored.
    pub ignored: Vec<String>,

    /// File the revisions were read from.
    pub metadata_file: Option<PathBuf>,
}

impl LoadedConfig {
    pub fn new(records: Vec<ImportRecord>) -> Self {
        LoadedConfig {
            records,
            ignored: Vec::new(),
            metadata_file: None,
        }
    }

    pub fn with_ignored(mut self, ignored: Vec<String>) -> Self {
        self.ignored = ignored;
        self
    }

    pub fn with_metadata_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_file = Some(path.into());
        self
    }
}
