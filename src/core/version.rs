//! Version model for locked projects.
//!
//! A source lists its tags and branches as [`PairedVersion`]s: a human label
//! bound to the revision it points at. A locked project holds a
//! [`LockedVersion`], which is paired when a label could be matched and a
//! bare [`Revision`] otherwise.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::{Comparator, Op, Version, VersionReq};
use serde::{Deserialize, Serialize};

/// Trailing `-<commits>-g<hash>` appended by `git describe`.
static DESCRIBE_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\d+-g[0-9a-f]{4,40}$").unwrap());

/// An opaque VCS revision identifier (usually a full commit hash).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(String);

impl Revision {
    pub fn new(rev: impl Into<String>) -> Self {
        Revision(rev.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Whether `recorded` names this revision, either exactly or as an
    /// abbreviated hash of at least 7 characters.
    pub fn matches(&self, recorded: &Revision) -> bool {
        if self.0 == recorded.0 {
            return true;
        }
        Self::looks_like_commit(&recorded.0) && self.0.starts_with(&recorded.0)
    }

    /// Whether this looks like an abbreviated or full git commit hash.
    pub fn looks_like_commit(s: &str) -> bool {
        (7..=40).contains(&s.len()) && s.chars().all(|c| c.is_ascii_hexdigit())
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revision {
    fn from(s: &str) -> Self {
        Revision::new(s)
    }
}

impl From<String> for Revision {
    fn from(s: String) -> Self {
        Revision(s)
    }
}

/// A version label without a revision attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UnpairedVersion {
    /// A tag that parses as a semantic version. `label` keeps the original
    /// spelling (e.g. `v0.8.0`).
    Semver { version: Version, label: String },
    /// A branch; `is_default` marks the remote's HEAD branch.
    Branch { name: String, is_default: bool },
    /// A tag that is not a semantic version.
    Tag(String),
}

impl UnpairedVersion {
    /// Classify a tag name: semver when it parses, plain tag otherwise.
    pub fn from_tag(tag: &str) -> Self {
        match parse_semver_label(tag) {
            Some(version) if is_strict_semver(tag) => UnpairedVersion::Semver {
                version,
                label: tag.to_string(),
            },
            _ => UnpairedVersion::Tag(tag.to_string()),
        }
    }

    pub fn branch(name: impl Into<String>) -> Self {
        UnpairedVersion::Branch {
            name: name.into(),
            is_default: false,
        }
    }

    pub fn default_branch(name: impl Into<String>) -> Self {
        UnpairedVersion::Branch {
            name: name.into(),
            is_default: true,
        }
    }

    /// The parsed semantic version, if this is a semver tag.
    pub fn semver(&self) -> Option<&Version> {
        match self {
            UnpairedVersion::Semver { version, .. } => Some(version),
            _ => None,
        }
    }

    /// Attach a revision.
    pub fn pair(self, revision: Revision) -> PairedVersion {
        PairedVersion {
            version: self,
            revision,
        }
    }

    /// The constraint this version implies when chosen for a manifest.
    ///
    /// Non-semver tags imply nothing.
    pub fn to_constraint(&self) -> Option<Constraint> {
        match self {
            UnpairedVersion::Semver { version, .. } => Some(Constraint::caret(version)),
            UnpairedVersion::Branch { name, .. } => Some(Constraint::Branch(name.clone())),
            UnpairedVersion::Tag(_) => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            UnpairedVersion::Semver { version, .. } if version.pre.is_empty() => 0,
            UnpairedVersion::Semver { .. } => 1,
            UnpairedVersion::Branch { .. } => 2,
            UnpairedVersion::Tag(_) => 3,
        }
    }
}

impl fmt::Display for UnpairedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnpairedVersion::Semver { label, .. } => f.write_str(label),
            UnpairedVersion::Branch { name, .. } => f.write_str(name),
            UnpairedVersion::Tag(tag) => f.write_str(tag),
        }
    }
}

/// A version label bound to the exact revision it points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairedVersion {
    version: UnpairedVersion,
    revision: Revision,
}

impl PairedVersion {
    pub fn new(version: UnpairedVersion, revision: impl Into<Revision>) -> Self {
        PairedVersion {
            version,
            revision: revision.into(),
        }
    }

    pub fn version(&self) -> &UnpairedVersion {
        &self.version
    }

    pub fn revision(&self) -> &Revision {
        &self.revision
    }
}

impl fmt::Display for PairedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.version, f)
    }
}

/// The version recorded for a project in the lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LockedVersion {
    Unpaired(UnpairedVersion),
    Paired(PairedVersion),
    Revision(Revision),
}

impl LockedVersion {
    /// The revision, if one is known.
    pub fn revision(&self) -> Option<&Revision> {
        match self {
            LockedVersion::Unpaired(_) => None,
            LockedVersion::Paired(pv) => Some(pv.revision()),
            LockedVersion::Revision(rev) => Some(rev),
        }
    }

    /// The version label, if one is known.
    pub fn version(&self) -> Option<&UnpairedVersion> {
        match self {
            LockedVersion::Unpaired(v) => Some(v),
            LockedVersion::Paired(pv) => Some(pv.version()),
            LockedVersion::Revision(_) => None,
        }
    }

    pub fn is_paired(&self) -> bool {
        matches!(self, LockedVersion::Paired(_))
    }
}

impl fmt::Display for LockedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockedVersion::Unpaired(v) => fmt::Display::fmt(v, f),
            LockedVersion::Paired(pv) => fmt::Display::fmt(pv, f),
            LockedVersion::Revision(rev) => fmt::Display::fmt(rev, f),
        }
    }
}

/// A manifest constraint for one project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// A semver range, normally a caret range like `^0.8.0`.
    Semver(VersionReq),
    /// Track a branch.
    Branch(String),
}

impl Constraint {
    /// Caret range anchored at `version`, keeping its pre-release part.
    pub fn caret(version: &Version) -> Self {
        Constraint::Semver(VersionReq {
            comparators: vec![Comparator {
                op: Op::Caret,
                major: version.major,
                minor: Some(version.minor),
                patch: Some(version.patch),
                pre: version.pre.clone(),
            }],
        })
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Semver(req) => write!(f, "{}", req),
            Constraint::Branch(name) => f.write_str(name),
        }
    }
}

/// Parse a human version label as a semantic version.
///
/// Accepts an optional leading `v` and fills in missing minor/patch
/// components (`v1.2` is `1.2.0`).
pub fn parse_semver_label(label: &str) -> Option<Version> {
    let s = label.trim();
    let s = s.strip_prefix('v').unwrap_or(s);
    if s.is_empty() {
        return None;
    }

    if let Ok(v) = s.parse() {
        return Some(v);
    }

    let parts: Vec<&str> = s.split('.').collect();
    match parts.len() {
        1 => {
            let major: u64 = parts[0].parse().ok()?;
            Some(Version::new(major, 0, 0))
        }
        2 => {
            let major: u64 = parts[0].parse().ok()?;
            let minor: u64 = parts[1].parse().ok()?;
            Some(Version::new(major, minor, 0))
        }
        _ => None,
    }
}

/// Whether `label` is a full `major.minor.patch` version, `v` prefix allowed.
fn is_strict_semver(label: &str) -> bool {
    let s = label.strip_prefix('v').unwrap_or(label);
    s.parse::<Version>().is_ok()
}

/// Whether the label ends in a `git describe` suffix such as `-12-g2fd980e`.
pub fn has_describe_suffix(label: &str) -> bool {
    DESCRIBE_SUFFIX.is_match(label)
}

/// Order versions the way an upgrade would consider them.
///
/// Semver releases come first, highest to lowest, then pre-releases, then
/// branches (default branch first), then remaining tags by name.
pub fn upgrade_order(a: &UnpairedVersion, b: &UnpairedVersion) -> Ordering {
    a.rank().cmp(&b.rank()).then_with(|| match (a, b) {
        (
            UnpairedVersion::Semver {
                version: va,
                label: la,
            },
            UnpairedVersion::Semver {
                version: vb,
                label: lb,
            },
        ) => vb.cmp(va).then_with(|| la.cmp(lb)),
        (
            UnpairedVersion::Branch {
                name: na,
                is_default: da,
            },
            UnpairedVersion::Branch {
                name: nb,
                is_default: db,
            },
        ) => db.cmp(da).then_with(|| na.cmp(nb)),
        (UnpairedVersion::Tag(ta), UnpairedVersion::Tag(tb)) => ta.cmp(tb),
        _ => Ordering::Equal,
    })
}

/// Sort paired versions into upgrade order.
pub fn sort_for_upgrade(versions: &mut [PairedVersion]) {
    versions.sort_by(|a, b| upgrade_order(a.version(), b.version()));
}
