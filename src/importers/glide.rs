//! glide importer - `glide.yaml` plus optional `glide.lock`.
//!
//! `glide.yaml` names dependencies and (optionally) a version label;
//! `glide.lock` pins each one to an exact revision.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{ImportRecord, LoadedConfig, Revision};
use crate::importers::Importer;

pub const GLIDE_YAML: &str = "glide.yaml";
pub const GLIDE_LOCK: &str = "glide.lock";

/// The parts of `glide.yaml` that matter for conversion.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GlideYaml {
    #[serde(rename = "package")]
    pub name: String,

    pub ignore: Vec<String>,

    #[serde(rename = "excludeDirs")]
    pub exclude_dirs: Vec<String>,

    pub import: Vec<GlidePackage>,

    #[serde(rename = "testImport")]
    pub test_import: Vec<GlidePackage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GlidePackage {
    #[serde(rename = "package")]
    pub name: String,

    /// Branch, tag, semver range, or revision.
    pub version: String,

    pub repo: String,
}

/// The parts of `glide.lock` that matter for conversion.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GlideLock {
    pub imports: Vec<GlideLockedPackage>,

    #[serde(rename = "testImports")]
    pub test_imports: Vec<GlideLockedPackage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GlideLockedPackage {
    pub name: String,

    /// Always an exact revision in a lock.
    pub version: String,

    pub repo: String,
}

#[derive(Debug, Default)]
pub struct GlideImporter;

impl GlideImporter {
    pub fn new() -> Self {
        GlideImporter
    }

    pub fn parse_yaml(contents: &str) -> Result<GlideYaml> {
        serde_yaml::from_str(contents).context("failed to parse glide.yaml")
    }

    pub fn parse_lock(contents: &str) -> Result<GlideLock> {
        serde_yaml::from_str(contents).context("failed to parse glide.lock")
    }

    /// Combine the yaml's dependencies with the lock's revisions.
    pub fn records(yaml: &GlideYaml, lock: Option<&GlideLock>) -> Vec<ImportRecord> {
        let locked: HashMap<&str, &GlideLockedPackage> = lock
            .map(|l| {
                l.imports
                    .iter()
                    .chain(l.test_imports.iter())
                    .map(|p| (p.name.as_str(), p))
                    .collect()
            })
            .unwrap_or_default();

        yaml.import
            .iter()
            .chain(yaml.test_import.iter())
            .map(|pkg| {
                let version = pkg.version.trim();
                let version_is_rev = Revision::looks_like_commit(version);

                let (revision, source) = match locked.get(pkg.name.as_str()) {
                    Some(l) => (l.version.clone(), first_non_empty(&pkg.repo, &l.repo)),
                    None if version_is_rev => (version.to_string(), pkg.repo.clone()),
                    None => (String::new(), pkg.repo.clone()),
                };

                let label = if version_is_rev { "" } else { version };

                ImportRecord::new(pkg.name.as_str(), revision)
                    .with_label(label)
                    .with_source(source)
            })
            .collect()
    }

    fn yaml_path(dir: &Path) -> PathBuf {
        dir.join(GLIDE_YAML)
    }

    fn lock_path(dir: &Path) -> PathBuf {
        dir.join(GLIDE_LOCK)
    }
}

fn first_non_empty(a: &str, b: &str) -> String {
    if a.trim().is_empty() {
        b.to_string()
    } else {
        a.to_string()
    }
}

impl Importer for GlideImporter {
    fn name(&self) -> &'static str {
        "glide"
    }

    fn has_metadata(&self, dir: &Path) -> bool {
        Self::yaml_path(dir).is_file()
    }

    fn load(&self, dir: &Path) -> Result<LoadedConfig> {
        let yaml_path = Self::yaml_path(dir);
        tracing::debug!("loading {}", yaml_path.display());
        let contents = std::fs::read_to_string(&yaml_path)
            .with_context(|| format!("failed to read {}", yaml_path.display()))?;
        let yaml = Self::parse_yaml(&contents)?;

        let lock_path = Self::lock_path(dir);
        let lock = if lock_path.is_file() {
            tracing::debug!("loading {}", lock_path.display());
            let contents = std::fs::read_to_string(&lock_path)
                .with_context(|| format!("failed to read {}", lock_path.display()))?;
            Some(Self::parse_lock(&contents)?)
        } else {
            None
        };

        if !yaml.exclude_dirs.is_empty() {
            tracing::warn!(
                "glide excludeDirs has no equivalent and is dropped: {}",
                yaml.exclude_dirs.join(", ")
            );
        }

        let records = Self::records(&yaml, lock.as_ref());
        let pinned_in = if lock.is_some() { lock_path } else { yaml_path };
        Ok(LoadedConfig::new(records)
            .with_ignored(yaml.ignore.clone())
            .with_metadata_file(pinned_in))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const GLIDE_YAML_CONTENTS: &str = r#"
package: github.com/golang/notexist
homepage: http://example.com
ignore:
- github.com/sdboyer/dep-test
excludeDirs:
- samples
import:
- package: github.com/sdboyer/deptest
  repo: https://github.com/sdboyer/deptest.git
  vcs: git
  version: master
- package: github.com/sdboyer/deptestdos
  version: v2.0.0
testImport:
- package: github.com/golang/lint
"#;

    const GLIDE_LOCK_CONTENTS: &str = r#"
hash: 16053c82a71f9bd509b05a4523df6bc418aed2083e4b8bd97a870bbc003256f8
updated: 2017-03-07T17:02:32.214383898-06:00
imports:
- name: github.com/sdboyer/deptest
  repo: https://github.com/sdboyer/deptest.git
  vcs: git
  version: 3f4c3bea144e112a69bbe5d8d01c1b09a544253f
- name: github.com/sdboyer/deptestdos
  version: 5c607206be5decd28e6263ffffdcee067266015e
testImports:
- name: github.com/golang/lint
  version: cb00e5669539f047b2f4c53a421a01b0c8e172c6
"#;

    #[test]
    fn test_load_with_lock() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(GLIDE_YAML), GLIDE_YAML_CONTENTS).unwrap();
        std::fs::write(tmp.path().join(GLIDE_LOCK), GLIDE_LOCK_CONTENTS).unwrap();

        let config = GlideImporter::new().load(tmp.path()).unwrap();
        assert_eq!(config.ignored, vec!["github.com/sdboyer/dep-test"]);
        assert_eq!(config.records.len(), 3);

        let deptest = &config.records[0];
        assert_eq!(deptest.import_path, "github.com/sdboyer/deptest");
        assert_eq!(
            deptest.revision.as_str(),
            "3f4c3bea144e112a69bbe5d8d01c1b09a544253f"
        );
        assert_eq!(deptest.label.as_deref(), Some("master"));
        assert_eq!(
            deptest.source.as_deref(),
            Some("https://github.com/sdboyer/deptest.git")
        );

        let dos = &config.records[1];
        assert_eq!(dos.label.as_deref(), Some("v2.0.0"));
        assert_eq!(
            dos.revision.as_str(),
            "5c607206be5decd28e6263ffffdcee067266015e"
        );
        assert!(dos.source.is_none());

        let lint = &config.records[2];
        assert!(lint.label.is_none());
        assert_eq!(
            lint.revision.as_str(),
            "cb00e5669539f047b2f4c53a421a01b0c8e172c6"
        );
    }

    #[test]
    fn test_without_lock_uses_revision_versions_only() {
        let yaml = GlideImporter::parse_yaml(
            r#"
package: github.com/golang/notexist
import:
- package: github.com/sdboyer/deptest
  version: ff2948a2ac8f538c4ecd55962e919d1e13e74baf
- package: github.com/sdboyer/deptestdos
  version: v2.0.0
"#,
        )
        .unwrap();

        let records = GlideImporter::records(&yaml, None);
        assert_eq!(
            records[0].revision.as_str(),
            "ff2948a2ac8f538c4ecd55962e919d1e13e74baf"
        );
        assert!(records[0].label.is_none());

        // Nothing pins deptestdos; conversion will reject it.
        assert!(records[1].revision.is_empty());
        assert_eq!(records[1].label.as_deref(), Some("v2.0.0"));
    }

    #[test]
    fn test_bad_yaml() {
        assert!(GlideImporter::parse_yaml("import: [unclosed").is_err());
    }
}
