//! Git provider - versions from a remote's advertised refs.
//!
//! Nothing is cloned: the provider connects to the remote, reads the ref
//! advertisement (the equivalent of `git ls-remote`) and disconnects.

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::Context;
use git2::{Direction, ErrorCode, Remote};
use url::Url;

use crate::core::{PairedVersion, ProjectRoot, UnpairedVersion};
use crate::sources::{SourceError, SourceProvider};

const HEADS_PREFIX: &str = "refs/heads/";
const TAGS_PREFIX: &str = "refs/tags/";
const PEELED_SUFFIX: &str = "^{}";

/// A provider that queries git remotes.
pub struct GitProvider {
    /// Never touch the network.
    offline: bool,

    /// Per-root remote URL overrides.
    urls: HashMap<ProjectRoot, Url>,

    /// Listings fetched during this run, by remote; `None` records a
    /// missing remote.
    listings: RefCell<HashMap<Url, Option<Vec<PairedVersion>>>>,
}

impl GitProvider {
    pub fn new() -> Self {
        GitProvider {
            offline: false,
            urls: HashMap::new(),
            listings: RefCell::new(HashMap::new()),
        }
    }

    /// Refuse all remote access.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Use `url` instead of the default location for `root`.
    pub fn with_url(mut self, root: ProjectRoot, url: Url) -> Self {
        self.urls.insert(root, url);
        self
    }

    /// The remote URL for a root.
    ///
    /// A recorded `source` wins, then a configured override, then
    /// `https://<root>`. Sources without a scheme get `https://`.
    pub fn source_url(
        &self,
        root: &ProjectRoot,
        source: Option<&str>,
    ) -> Result<Url, SourceError> {
        let location = match source {
            Some(source) if source.contains("://") => source.to_string(),
            Some(source) => format!("https://{}", source),
            None => match self.urls.get(root) {
                Some(url) => return Ok(url.clone()),
                None => format!("https://{}", root),
            },
        };
        Url::parse(&location)
            .with_context(|| {
                format!("invalid repository location for `{}`: {}", root, location)
            })
            .map_err(SourceError::from)
    }

    /// Fetch (or reuse) the listing for a root at `source`.
    fn listing(
        &self,
        root: &ProjectRoot,
        source: Option<&str>,
    ) -> Result<Option<Vec<PairedVersion>>, SourceError> {
        if self.offline {
            tracing::debug!("offline, not listing {}", root);
            return Ok(None);
        }

        let url = self.source_url(root, source)?;
        if let Some(cached) = self.listings.borrow().get(&url) {
            return Ok(cached.clone());
        }

        tracing::info!("Listing refs of {}", url);
        let listing = ls_remote(&url)?;
        self.listings.borrow_mut().insert(url, listing.clone());
        Ok(listing)
    }
}

impl Default for GitProvider {
    fn default() -> Self {
        GitProvider::new()
    }
}

impl SourceProvider for GitProvider {
    fn name(&self) -> &str {
        "git"
    }

    fn list_versions(
        &self,
        root: &ProjectRoot,
        source: Option<&str>,
    ) -> Result<Vec<PairedVersion>, SourceError> {
        self.listing(root, source)?
            .ok_or_else(|| SourceError::NotFound(source.unwrap_or(root.as_str()).to_string()))
    }

    fn source_exists(&self, root: &ProjectRoot) -> Result<bool, SourceError> {
        Ok(self.listing(root, None)?.is_some())
    }
}

/// Read the ref advertisement of `url`. `Ok(None)` when the remote is missing.
fn ls_remote(url: &Url) -> Result<Option<Vec<PairedVersion>>, SourceError> {
    let mut remote = Remote::create_detached(url.as_str())
        .with_context(|| format!("failed to create remote for {}", url))?;

    if let Err(e) = remote.connect(Direction::Fetch) {
        return match e.code() {
            ErrorCode::NotFound | ErrorCode::Auth => {
                tracing::debug!("remote {} not available: {}", url, e);
                Ok(None)
            }
            _ => Err(anyhow::Error::new(e)
                .context(format!("failed to connect to {}", url))
                .into()),
        };
    }

    let default_branch = remote
        .default_branch()
        .ok()
        .and_then(|buf| buf.as_str().map(str::to_string));

    let refs: Vec<(String, String)> = remote
        .list()
        .with_context(|| format!("failed to list refs of {}", url))?
        .iter()
        .map(|head| (head.name().to_string(), head.oid().to_string()))
        .collect();

    let _ = remote.disconnect();

    Ok(Some(versions_from_refs(&refs, default_branch.as_deref())))
}

/// Turn `(refname, oid)` pairs into paired versions.
///
/// Annotated tags are advertised twice; the peeled `^{}` entry carries the
/// commit and wins over the tag object.
pub(crate) fn versions_from_refs(
    refs: &[(String, String)],
    default_branch: Option<&str>,
) -> Vec<PairedVersion> {
    let mut branches = Vec::new();
    let mut tags: Vec<(String, String)> = Vec::new();

    for (name, oid) in refs {
        if let Some(branch) = name.strip_prefix(HEADS_PREFIX) {
            let version = if default_branch == Some(name.as_str()) {
                UnpairedVersion::default_branch(branch)
            } else {
                UnpairedVersion::branch(branch)
            };
            branches.push(version.pair(oid.as_str().into()));
        } else if let Some(tag) = name.strip_prefix(TAGS_PREFIX) {
            if let Some(peeled) = tag.strip_suffix(PEELED_SUFFIX) {
                match tags.iter_mut().find(|(t, _)| t == peeled) {
                    Some(entry) => entry.1 = oid.clone(),
                    None => tags.push((peeled.to_string(), oid.clone())),
                }
            } else if !tags.iter().any(|(t, _)| t == tag) {
                tags.push((tag.to_string(), oid.clone()));
            }
        }
    }

    let mut versions: Vec<PairedVersion> = tags
        .into_iter()
        .map(|(tag, oid)| UnpairedVersion::from_tag(&tag).pair(oid.into()))
        .collect();
    versions.extend(branches);
    versions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(n, o)| (n.to_string(), o.to_string()))
            .collect()
    }

    #[test]
    fn test_versions_from_refs_peels_annotated_tags() {
        let refs = refs(&[
            ("HEAD", "aaaa"),
            ("refs/heads/master", "aaaa"),
            ("refs/heads/dev", "bbbb"),
            ("refs/tags/v1.0.0", "tagobject"),
            ("refs/tags/v1.0.0^{}", "cccc"),
            ("refs/tags/v0.8.0", "cccc"),
        ]);

        let versions = versions_from_refs(&refs, Some("refs/heads/master"));
        assert_eq!(versions.len(), 4);

        let v1 = versions.iter().find(|v| v.to_string() == "v1.0.0").unwrap();
        assert_eq!(v1.revision().as_str(), "cccc");
        assert!(v1.version().semver().is_some());

        let master = versions.iter().find(|v| v.to_string() == "master").unwrap();
        assert_eq!(
            master.version(),
            &UnpairedVersion::default_branch("master")
        );
        let dev = versions.iter().find(|v| v.to_string() == "dev").unwrap();
        assert_eq!(dev.version(), &UnpairedVersion::branch("dev"));
    }

    #[test]
    fn test_source_url() {
        let root = ProjectRoot::new("github.com/sdboyer/deptest");
        let provider = GitProvider::new();
        assert_eq!(
            provider.source_url(&root, None).unwrap().as_str(),
            "https://github.com/sdboyer/deptest"
        );

        let mirror = Url::parse("https://example.org/mirror/deptest.git").unwrap();
        let provider = GitProvider::new().with_url(root.clone(), mirror.clone());
        assert_eq!(provider.source_url(&root, None).unwrap(), mirror);
    }

    #[test]
    fn test_recorded_source_wins_over_override() {
        let root = ProjectRoot::new("github.com/sdboyer/deptest");
        let mirror = Url::parse("https://example.org/mirror/deptest.git").unwrap();
        let provider = GitProvider::new().with_url(root.clone(), mirror);

        assert_eq!(
            provider
                .source_url(&root, Some("https://github.com/fork/deptest.git"))
                .unwrap()
                .as_str(),
            "https://github.com/fork/deptest.git"
        );
        assert_eq!(
            provider
                .source_url(&root, Some("github.com/fork/deptest"))
                .unwrap()
                .as_str(),
            "https://github.com/fork/deptest"
        );
    }

    #[test]
    fn test_offline_reports_missing() {
        let provider = GitProvider::new().offline(true);
        let root = ProjectRoot::new("github.com/sdboyer/deptest");
        assert!(!provider.source_exists(&root).unwrap());
        assert!(matches!(
            provider.list_versions(&root, Some("github.com/fork/deptest")),
            Err(SourceError::NotFound(_))
        ));
    }
}
