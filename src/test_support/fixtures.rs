//! Test fixtures for legacy project layouts.
//!
//! Pre-built metadata files for each supported tool, plus a project
//! fixture that writes them to a real directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Fixture for a project carrying legacy metadata.
#[derive(Debug, Clone, Default)]
pub struct ProjectFixture {
    /// Files relative to the project directory.
    pub files: BTreeMap<PathBuf, String>,
}

impl ProjectFixture {
    pub fn new() -> Self {
        ProjectFixture::default()
    }

    /// A godep project.
    pub fn godep(godeps_json: impl Into<String>) -> Self {
        ProjectFixture::new().with_file("Godeps/Godeps.json", godeps_json)
    }

    /// A glide project, with a lock when `lock` is given.
    pub fn glide(yaml: impl Into<String>, lock: Option<&str>) -> Self {
        let fixture = ProjectFixture::new().with_file("glide.yaml", yaml);
        match lock {
            Some(lock) => fixture.with_file("glide.lock", lock),
            None => fixture,
        }
    }

    /// A vndr project.
    pub fn vndr(conf: impl Into<String>) -> Self {
        ProjectFixture::new().with_file("vendor.conf", conf)
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Write every file below `dir`.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;

        for (rel_path, content) in &self.files {
            let full_path = dir.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        Ok(dir.to_path_buf())
    }
}

/// Common legacy metadata contents.
pub mod metadata {
    use crate::test_support::{DEPTEST_ROOT, DEPTEST_V1_REV, TEST_PROJECT_ROOT};

    /// `Godeps.json` with one dependency per `(path, rev, comment)`.
    pub fn godeps_json(deps: &[(&str, &str, &str)]) -> String {
        let entries: Vec<String> = deps
            .iter()
            .map(|(path, rev, comment)| {
                format!(
                    "        {{\n            \"ImportPath\": \"{path}\",\n            \"Comment\": \"{comment}\",\n            \"Rev\": \"{rev}\"\n        }}"
                )
            })
            .collect();

        format!(
            "{{\n    \"ImportPath\": \"{}\",\n    \"GoVersion\": \"go1.8\",\n    \"Deps\": [\n{}\n    ]\n}}\n",
            TEST_PROJECT_ROOT,
            entries.join(",\n")
        )
    }

    /// The godep project converted in most tests.
    pub fn deptest_godeps() -> String {
        godeps_json(&[(DEPTEST_ROOT, DEPTEST_V1_REV, "v0.8.0")])
    }

    /// `glide.yaml` with `(package, version)` imports and an ignore list.
    pub fn glide_yaml(imports: &[(&str, &str)], ignore: &[&str]) -> String {
        let mut out = format!("package: {}\n", TEST_PROJECT_ROOT);
        if !ignore.is_empty() {
            out.push_str("ignore:\n");
            for pkg in ignore {
                out.push_str(&format!("- {pkg}\n"));
            }
        }
        out.push_str("import:\n");
        for (pkg, version) in imports {
            out.push_str(&format!("- package: {pkg}\n"));
            if !version.is_empty() {
                out.push_str(&format!("  version: {version}\n"));
            }
        }
        out
    }

    /// `glide.lock` pinning `(name, revision)` pairs.
    pub fn glide_lock(imports: &[(&str, &str)]) -> String {
        let mut out = String::from(
            "hash: 16053c82a71f9bd509b05a4523df6bc418aed2083e4b8bd97a870bbc003256f8\nimports:\n",
        );
        for (name, rev) in imports {
            out.push_str(&format!("- name: {name}\n  version: {rev}\n"));
        }
        out
    }

    /// `vendor.conf` lines of `(path, revision)`.
    pub fn vendor_conf(deps: &[(&str, &str)]) -> String {
        let mut out = String::from("# vndr configuration\n");
        for (path, rev) in deps {
            out.push_str(&format!("{path} {rev}\n"));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importers::{self, Importer};
    use tempfile::TempDir;

    #[test]
    fn test_fixtures_are_detected() {
        let cases = [
            (ProjectFixture::godep(metadata::deptest_godeps()), "godep"),
            (
                ProjectFixture::glide(
                    metadata::glide_yaml(&[(crate::test_support::DEPTEST_ROOT, "v1.0.0")], &[]),
                    Some(&metadata::glide_lock(&[(
                        crate::test_support::DEPTEST_ROOT,
                        crate::test_support::DEPTEST_V1_REV,
                    )])),
                ),
                "glide",
            ),
            (
                ProjectFixture::vndr(metadata::vendor_conf(&[(
                    crate::test_support::DEPTEST_ROOT,
                    crate::test_support::DEPTEST_V1_REV,
                )])),
                "vndr",
            ),
        ];

        for (fixture, expected) in cases {
            let tmp = TempDir::new().unwrap();
            let dir = fixture.write_to(tmp.path()).unwrap();
            let importer = importers::detect(&dir).unwrap();
            assert_eq!(importer.name(), expected);

            let config = importer.load(&dir).unwrap();
            assert_eq!(config.records.len(), 1);
            assert_eq!(
                config.records[0].revision.as_str(),
                crate::test_support::DEPTEST_V1_REV
            );
        }
    }
}
