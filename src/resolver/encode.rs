//! Manifest and lock encoding and decoding.
//!
//! `Gopkg.toml` carries constraints and ignores; `Gopkg.lock` carries the
//! resolved version of every project.

use std::path::Path;

use anyhow::{bail, Context, Result};
use semver::VersionReq;
use serde::{Deserialize, Serialize};

use crate::core::{
    Constraint, Lock, LockedProject, LockedVersion, Manifest, ProjectProperties, ProjectRoot,
    Revision, UnpairedVersion,
};

const HEADER: &str = "# This file is automatically generated by depmigrate.\n";

/// `Gopkg.toml` representation for serialization.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ManifestFile {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,

    #[serde(rename = "constraint", default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<ConstraintEntry>,
}

/// A `[[constraint]]` table.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConstraintEntry {
    pub name: String,

    /// Semver range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ManifestFile {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        let constraints = manifest
            .constraints
            .iter()
            .map(|(root, props)| {
                let (version, branch) = match &props.constraint {
                    Some(Constraint::Semver(req)) => (Some(req.to_string()), None),
                    Some(Constraint::Branch(name)) => (None, Some(name.clone())),
                    None => (None, None),
                };
                ConstraintEntry {
                    name: root.to_string(),
                    version,
                    branch,
                    source: props.source.clone(),
                }
            })
            .collect();

        ManifestFile {
            ignored: manifest.ignored.clone(),
            constraints,
        }
    }

    pub fn to_manifest(&self) -> Result<Manifest> {
        let mut manifest = Manifest::new();

        for entry in &self.constraints {
            let constraint = match (&entry.version, &entry.branch) {
                (Some(_), Some(_)) => {
                    bail!("constraint `{}` sets both version and branch", entry.name)
                }
                (Some(range), None) => Some(Constraint::Semver(
                    VersionReq::parse(range).with_context(|| {
                        format!("invalid version range `{}` for `{}`", range, entry.name)
                    })?,
                )),
                (None, Some(branch)) => Some(Constraint::Branch(branch.clone())),
                (None, None) => None,
            };

            let root = ProjectRoot::new(entry.name.as_str());
            let props = ProjectProperties {
                constraint,
                source: entry.source.clone(),
            };
            if !manifest.add_constraint(root, props) {
                bail!("duplicate constraint for `{}`", entry.name);
            }
        }

        for pkg in &self.ignored {
            manifest.ignore(pkg);
        }

        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        toml::from_str(&content).with_context(|| "failed to parse manifest")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, format!("{HEADER}\n{content}"))
            .with_context(|| format!("failed to write manifest: {}", path.display()))?;
        Ok(())
    }
}

/// `Gopkg.lock` representation for serialization.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LockFile {
    #[serde(
        rename = "inputs-digest",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub inputs_digest: Option<String>,

    #[serde(default)]
    pub projects: Vec<LockedEntry>,
}

/// A `[[projects]]` table.
#[derive(Debug, Serialize, Deserialize)]
pub struct LockedEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Tag name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    #[serde(default)]
    pub packages: Vec<String>,
}

impl LockedEntry {
    fn from_project(project: &LockedProject) -> Self {
        let (label, revision) = match &project.version {
            LockedVersion::Paired(pv) => (Some(pv.version()), Some(pv.revision().to_string())),
            LockedVersion::Unpaired(v) => (Some(v), None),
            LockedVersion::Revision(rev) => (None, Some(rev.to_string())),
        };

        let (version, branch) = match label {
            Some(UnpairedVersion::Branch { name, .. }) => (None, Some(name.clone())),
            Some(v) => (Some(v.to_string()), None),
            None => (None, None),
        };

        LockedEntry {
            name: project.root.to_string(),
            source: project.source.clone(),
            version,
            branch,
            revision,
            packages: project.packages.clone(),
        }
    }

    fn to_project(&self) -> Result<LockedProject> {
        let label = match (&self.version, &self.branch) {
            (Some(_), Some(_)) => bail!("locked `{}` sets both version and branch", self.name),
            (Some(tag), None) => Some(UnpairedVersion::from_tag(tag)),
            (None, Some(branch)) => Some(UnpairedVersion::branch(branch.as_str())),
            (None, None) => None,
        };
        let revision = self.revision.as_deref().filter(|r| !r.is_empty());

        let version = match (label, revision) {
            (Some(v), Some(rev)) => LockedVersion::Paired(v.pair(Revision::new(rev))),
            (Some(v), None) => LockedVersion::Unpaired(v),
            (None, Some(rev)) => LockedVersion::Revision(Revision::new(rev)),
            (None, None) => bail!("locked `{}` has neither a version nor a revision", self.name),
        };

        let mut project = LockedProject::new(
            ProjectRoot::new(self.name.as_str()),
            self.source.clone(),
            version,
        );
        for pkg in &self.packages {
            project.add_package(pkg.as_str());
        }
        Ok(project)
    }
}

impl LockFile {
    pub fn from_lock(lock: &Lock) -> Self {
        LockFile {
            inputs_digest: lock.inputs_digest.clone(),
            projects: lock.projects.iter().map(LockedEntry::from_project).collect(),
        }
    }

    pub fn to_lock(&self) -> Result<Lock> {
        let mut lock = Lock::new();
        lock.inputs_digest = self.inputs_digest.clone();

        for entry in &self.projects {
            if !lock.add_project(entry.to_project()?) {
                bail!("duplicate lock entry for `{}`", entry.name);
            }
        }

        Ok(lock)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read lockfile: {}", path.display()))?;

        toml::from_str(&content).with_context(|| "failed to parse lockfile")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        let with_header = format!(
            "{HEADER}\
             # It is not intended for manual editing.\n\n\
             {content}"
        );

        std::fs::write(path, with_header)
            .with_context(|| format!("failed to write lockfile: {}", path.display()))?;

        Ok(())
    }
}
