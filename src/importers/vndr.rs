//! vndr importer - `vendor.conf`.
//!
//! One dependency per line: `import/path revision [repository]`. Blank
//! lines and `#` comments are skipped. There are never version labels.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{ImportRecord, LoadedConfig};
use crate::importers::Importer;

pub const VNDR_CONF: &str = "vendor.conf";

#[derive(Debug, Default)]
pub struct VndrImporter;

impl VndrImporter {
    pub fn new() -> Self {
        VndrImporter
    }

    /// Parse `vendor.conf` contents.
    pub fn parse(contents: &str) -> Vec<ImportRecord> {
        contents.lines().filter_map(parse_line).collect()
    }

    fn path(dir: &Path) -> PathBuf {
        dir.join(VNDR_CONF)
    }
}

fn parse_line(line: &str) -> Option<ImportRecord> {
    let content = match line.split_once('#') {
        Some((before, _)) => before,
        None => line,
    };

    let mut fields = content.split_whitespace();
    let import_path = fields.next()?;
    let revision = fields.next().unwrap_or_default();
    let repo = fields.next().unwrap_or_default();

    Some(ImportRecord::new(import_path, revision).with_source(repo))
}

impl Importer for VndrImporter {
    fn name(&self) -> &'static str {
        "vndr"
    }

    fn has_metadata(&self, dir: &Path) -> bool {
        Self::path(dir).is_file()
    }

    fn load(&self, dir: &Path) -> Result<LoadedConfig> {
        let path = Self::path(dir);
        tracing::debug!("loading {}", path.display());

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        Ok(LoadedConfig::new(Self::parse(&contents)).with_metadata_file(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse() {
        let records = VndrImporter::parse(
            "# comment line\n\
             \n\
             github.com/sdboyer/deptest 3f4c3bea144e112a69bbe5d8d01c1b09a544253f\n\
             github.com/sdboyer/deptestdos v2.0.0 https://github.com/sdboyer/deptest.git # fork\n\
             github.com/sdboyer/nohash\n",
        );

        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            ImportRecord::new(
                "github.com/sdboyer/deptest",
                "3f4c3bea144e112a69bbe5d8d01c1b09a544253f"
            )
        );
        assert_eq!(records[1].revision.as_str(), "v2.0.0");
        assert_eq!(
            records[1].source.as_deref(),
            Some("https://github.com/sdboyer/deptest.git")
        );
        assert!(records[1].label.is_none());
        assert!(records[2].revision.is_empty());
    }

    #[test]
    fn test_load() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(VNDR_CONF),
            "github.com/sdboyer/deptest 3f4c3bea144e112a69bbe5d8d01c1b09a544253f\n",
        )
        .unwrap();

        let importer = VndrImporter::new();
        assert!(importer.has_metadata(tmp.path()));
        let config = importer.load(tmp.path()).unwrap();
        assert_eq!(config.records.len(), 1);
    }
}
