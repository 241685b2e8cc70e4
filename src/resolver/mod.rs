//! Version resolution.
//!
//! Turns the `(revision, label)` a legacy tool recorded for a project into a
//! manifest constraint and a lock entry, using the versions the source
//! provider knows about. Resolution never invents a version: if nothing on
//! the remote matches, the lock keeps the bare revision.

pub mod encode;
pub mod errors;

pub use errors::ResolveError;

use crate::core::version::{has_describe_suffix, parse_semver_label, sort_for_upgrade};
use crate::core::{Constraint, LockedVersion, PairedVersion, ProjectRoot, Revision};
use crate::sources::{SourceError, SourceProvider};
use crate::util::Shell;

/// Outcome of resolving one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Constraint for the manifest, if one can be derived.
    pub constraint: Option<Constraint>,

    /// Version for the lock.
    pub version: LockedVersion,
}

/// Resolves recorded revisions against a provider's version list.
pub struct VersionResolver<'a, P: ?Sized> {
    provider: &'a P,
    shell: &'a Shell,
}

impl<'a, P> VersionResolver<'a, P>
where
    P: SourceProvider + ?Sized,
{
    pub fn new(provider: &'a P, shell: &'a Shell) -> Self {
        VersionResolver { provider, shell }
    }

    /// Resolve `revision` (and optional `label`) for `root`, listing versions
    /// from `source` when the record names a fork or mirror.
    ///
    /// 1. A label that parses as semver always yields a caret constraint. If
    ///    the remote has that exact version at `revision`, it is locked; a tag
    ///    spelled exactly like the label wins over one that only parses equal.
    /// 2. Otherwise the versions pointing at `revision` are considered in
    ///    upgrade order and the first is locked (and supplies the constraint
    ///    when the label did not).
    /// 3. Otherwise the bare revision is locked.
    pub fn resolve(
        &self,
        root: &ProjectRoot,
        source: Option<&str>,
        revision: &Revision,
        label: Option<&str>,
    ) -> Result<Resolution, ResolveError> {
        let mut versions = self
            .provider
            .list_versions(root, source)
            .map_err(|e| match e {
                SourceError::NotFound(_) => ResolveError::RootUnresolvable {
                    root: root.to_string(),
                },
                SourceError::Other(e) => ResolveError::Provider {
                    root: root.to_string(),
                    message: format!("{:#}", e),
                },
            })?;
        sort_for_upgrade(&mut versions);

        let mut constraint = None;

        if let Some(label) = label {
            match parse_semver_label(label) {
                Some(parsed) => {
                    constraint = Some(Constraint::caret(&parsed));

                    if has_describe_suffix(label) {
                        self.shell.verbose(format!(
                            "{}: `{}` is a described commit, not a release tag",
                            root, label
                        ));
                    }

                    let tagged: Vec<&PairedVersion> = versions
                        .iter()
                        .filter(|v| v.version().semver() == Some(&parsed))
                        .collect();
                    let at_revision: Vec<&PairedVersion> = tagged
                        .iter()
                        .copied()
                        .filter(|v| v.revision().matches(revision))
                        .collect();
                    let exact = at_revision
                        .iter()
                        .find(|v| v.to_string() == label)
                        .or_else(|| at_revision.first());

                    if let Some(exact) = exact {
                        return Ok(Resolution {
                            constraint,
                            version: LockedVersion::Paired((*exact).clone()),
                        });
                    }
                    if let Some(moved) = tagged.first() {
                        self.shell.verbose(format!(
                            "{}: tag `{}` points at {}, not {}; locking by revision",
                            root,
                            moved,
                            moved.revision(),
                            revision
                        ));
                    }
                }
                None => self.shell.verbose(format!(
                    "{}: label `{}` is not a semantic version, ignoring it",
                    root, label
                )),
            }
        }

        let matching: Vec<&PairedVersion> = versions
            .iter()
            .filter(|v| v.revision().matches(revision))
            .collect();

        let Some(best) = matching.first() else {
            self.shell.verbose(format!(
                "{}: no version points at {}, locking the revision",
                root, revision
            ));
            return Ok(Resolution {
                constraint,
                version: LockedVersion::Revision(revision.clone()),
            });
        };

        if matching.len() > 1 {
            let candidates: Vec<String> = matching.iter().map(|v| v.to_string()).collect();
            self.shell.verbose(format!(
                "{}: {} all point at {}, choosing {}",
                root,
                candidates.join(", "),
                revision,
                best
            ));
        }

        if constraint.is_none() {
            constraint = best.version().to_constraint();
        }

        Ok(Resolution {
            constraint,
            version: LockedVersion::Paired((*best).clone()),
        })
    }
}
