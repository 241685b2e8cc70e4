//! Project roots and import path normalization.
//!
//! A project root is the shortest import path prefix under which one
//! repository lives. Many import paths (sub-packages) map to the same root.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::resolver::errors::ResolveError;
use crate::sources::SourceProvider;

/// Hosts where the root is always `host/owner/repo`.
const THREE_SEGMENT_HOSTS: &[&str] = &["github.com", "bitbucket.org", "gitlab.com"];

/// Suffixes that mark the repository boundary inside a path.
const VCS_SUFFIXES: &[&str] = &[".git", ".hg", ".bzr", ".svn"];

/// The import path prefix that owns one repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectRoot(String);

impl ProjectRoot {
    pub fn new(root: impl Into<String>) -> Self {
        ProjectRoot(root.into().trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `import_path` is this root or a package beneath it.
    ///
    /// Matches whole path segments only: `github.com/a/b` contains
    /// `github.com/a/b/c` but not `github.com/a/bc`.
    pub fn contains(&self, import_path: &str) -> bool {
        match import_path.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// The package path relative to this root (`.` for the root itself).
    pub fn relative_package(&self, import_path: &str) -> Option<String> {
        if !self.contains(import_path) {
            return None;
        }
        let rest = import_path[self.0.len()..].trim_start_matches('/');
        if rest.is_empty() {
            Some(".".to_string())
        } else {
            Some(rest.to_string())
        }
    }
}

impl fmt::Display for ProjectRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectRoot {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectRoot {
    fn from(s: &str) -> Self {
        ProjectRoot::new(s)
    }
}

/// Deduce a root from well-known hosting conventions alone.
///
/// Returns `None` when the path needs a provider lookup.
pub fn deduce_from_conventions(import_path: &str) -> Option<ProjectRoot> {
    let path = import_path.trim_matches('/');
    let segments: Vec<&str> = path.split('/').collect();

    // An explicit VCS suffix marks the boundary, wherever it is.
    for (i, seg) in segments.iter().enumerate() {
        if VCS_SUFFIXES.iter().any(|suffix| seg.ends_with(suffix)) {
            return Some(ProjectRoot::new(segments[..=i].join("/")));
        }
    }

    let host = segments[0];

    if THREE_SEGMENT_HOSTS.contains(&host) {
        return take_segments(&segments, 3);
    }

    match host {
        "golang.org" if segments.get(1) == Some(&"x") => take_segments(&segments, 3),
        "gopkg.in" => {
            // gopkg.in/pkg.v1 or gopkg.in/user/pkg.v1
            let second = segments.get(1)?;
            if is_gopkg_versioned(second) {
                take_segments(&segments, 2)
            } else if segments.get(2).is_some_and(|s| is_gopkg_versioned(s)) {
                take_segments(&segments, 3)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn take_segments(segments: &[&str], n: usize) -> Option<ProjectRoot> {
    if segments.len() < n || segments[..n].iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(ProjectRoot::new(segments[..n].join("/")))
}

fn is_gopkg_versioned(segment: &str) -> bool {
    match segment.rsplit_once(".v") {
        Some((name, major)) => {
            !name.is_empty() && !major.is_empty() && major.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Memoizing import path -> project root deduction.
///
/// One deducer lives for one conversion run. Roots found once answer every
/// later sub-package path without another lookup.
#[derive(Debug, Default)]
pub struct RootDeducer {
    /// Roots discovered so far.
    roots: Vec<ProjectRoot>,

    /// Full import path answers, including failures.
    cache: HashMap<String, Option<ProjectRoot>>,
}

impl RootDeducer {
    pub fn new() -> Self {
        RootDeducer::default()
    }

    /// Find the project root for `import_path`.
    pub fn deduce<P>(
        &mut self,
        provider: &P,
        import_path: &str,
    ) -> Result<ProjectRoot, ResolveError>
    where
        P: SourceProvider + ?Sized,
    {
        let import_path = import_path.trim_matches('/');

        if let Some(cached) = self.cache.get(import_path) {
            return cached
                .clone()
                .ok_or_else(|| ResolveError::RootUnresolvable {
                    root: import_path.to_string(),
                });
        }

        if let Some(root) = self.roots.iter().find(|r| r.contains(import_path)) {
            let root = root.clone();
            self.cache.insert(import_path.to_string(), Some(root.clone()));
            return Ok(root);
        }

        let found = match deduce_from_conventions(import_path) {
            Some(root) => Some(root),
            None => self.probe(provider, import_path)?,
        };

        self.cache.insert(import_path.to_string(), found.clone());
        match found {
            Some(root) => {
                tracing::debug!("deduced root {} for {}", root, import_path);
                self.roots.push(root.clone());
                Ok(root)
            }
            None => Err(ResolveError::RootUnresolvable {
                root: import_path.to_string(),
            }),
        }
    }

    /// Ask the provider about successively longer prefixes.
    fn probe<P>(&self, provider: &P, import_path: &str) -> Result<Option<ProjectRoot>, ResolveError>
    where
        P: SourceProvider + ?Sized,
    {
        let segments: Vec<&str> = import_path.split('/').collect();
        for n in 2..=segments.len() {
            let candidate = ProjectRoot::new(segments[..n].join("/"));
            let exists =
                provider
                    .source_exists(&candidate)
                    .map_err(|e| ResolveError::Provider {
                        root: candidate.to_string(),
                        message: format!("{:#}", e),
                    })?;
            if exists {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Number of distinct roots discovered.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProvider;

    #[test]
    fn test_conventions() {
        assert_eq!(
            deduce_from_conventions("github.com/sdboyer/deptest/foo/bar"),
            Some(ProjectRoot::new("github.com/sdboyer/deptest"))
        );
        assert_eq!(
            deduce_from_conventions("golang.org/x/net/context"),
            Some(ProjectRoot::new("golang.org/x/net"))
        );
        assert_eq!(
            deduce_from_conventions("gopkg.in/yaml.v2"),
            Some(ProjectRoot::new("gopkg.in/yaml.v2"))
        );
        assert_eq!(
            deduce_from_conventions("gopkg.in/check.v1/sub"),
            Some(ProjectRoot::new("gopkg.in/check.v1"))
        );
        assert_eq!(
            deduce_from_conventions("gopkg.in/user/pkg.v3/sub"),
            Some(ProjectRoot::new("gopkg.in/user/pkg.v3"))
        );
        assert_eq!(
            deduce_from_conventions("example.org/repo.git/sub"),
            Some(ProjectRoot::new("example.org/repo.git"))
        );
        assert_eq!(deduce_from_conventions("github.com/sdboyer"), None);
        assert_eq!(deduce_from_conventions("example.org/a/b"), None);
    }

    #[test]
    fn test_contains_matches_whole_segments() {
        let root = ProjectRoot::new("github.com/sdboyer/deptest");
        assert!(root.contains("github.com/sdboyer/deptest"));
        assert!(root.contains("github.com/sdboyer/deptest/foo"));
        assert!(!root.contains("github.com/sdboyer/deptestdos"));
        assert_eq!(
            root.relative_package("github.com/sdboyer/deptest/foo"),
            Some("foo".to_string())
        );
        assert_eq!(
            root.relative_package("github.com/sdboyer/deptest"),
            Some(".".to_string())
        );
    }

    #[test]
    fn test_deducer_probes_provider_once_per_root() {
        let provider = MockProvider::new().with_source("example.org/team/lib");
        let mut deducer = RootDeducer::new();

        let root = deducer.deduce(&provider, "example.org/team/lib/sub/pkg").unwrap();
        assert_eq!(root.as_str(), "example.org/team/lib");
        let probes = provider.exists_calls();

        let again = deducer.deduce(&provider, "example.org/team/lib/other").unwrap();
        assert_eq!(again, root);
        assert_eq!(provider.exists_calls(), probes);
        assert_eq!(deducer.len(), 1);
    }

    #[test]
    fn test_deducer_unresolvable() {
        let provider = MockProvider::new();
        let mut deducer = RootDeducer::new();

        let err = deducer.deduce(&provider, "example.org/nothing/here").unwrap_err();
        assert!(matches!(err, ResolveError::RootUnresolvable { .. }));
    }
}
