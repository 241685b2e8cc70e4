//! SourceProvider trait - version metadata for repositories.

use thiserror::Error;

use crate::core::{PairedVersion, ProjectRoot};

/// Error reported by a provider.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The repository does not exist or cannot be reached at its location.
    #[error("source not found: `{0}`")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Lists the versions a repository knows about.
///
/// Providers are read-only from the converter's point of view; any caching
/// they do is internal.
pub trait SourceProvider {
    /// Provider name for display.
    fn name(&self) -> &str;

    /// All tags and branches of `root`, each paired with its revision.
    ///
    /// `source` names a fork or mirror to list instead of the root's usual
    /// location.
    fn list_versions(
        &self,
        root: &ProjectRoot,
        source: Option<&str>,
    ) -> Result<Vec<PairedVersion>, SourceError>;

    /// Whether a repository lives exactly at `root`.
    fn source_exists(&self, root: &ProjectRoot) -> Result<bool, SourceError>;
}

impl<P: SourceProvider + ?Sized> SourceProvider for &P {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn list_versions(
        &self,
        root: &ProjectRoot,
        source: Option<&str>,
    ) -> Result<Vec<PairedVersion>, SourceError> {
        (**self).list_versions(root, source)
    }

    fn source_exists(&self, root: &ProjectRoot) -> Result<bool, SourceError> {
        (**self).source_exists(root)
    }
}
