//! godep importer - `Godeps/Godeps.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{ImportRecord, LoadedConfig};
use crate::importers::Importer;

/// Location of the metadata, relative to the project.
pub const GODEP_PATH: &str = "Godeps/Godeps.json";

/// The parts of `Godeps.json` that matter for conversion.
#[derive(Debug, Default, Deserialize)]
pub struct GodepJson {
    #[serde(rename = "ImportPath", default)]
    pub import_path: String,

    #[serde(rename = "Deps", alias = "Imports", default)]
    pub imports: Vec<GodepPackage>,
}

/// One entry of the `Deps` list.
///
/// Missing fields deserialize as empty strings so that conversion, not
/// parsing, reports which import is broken.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GodepPackage {
    #[serde(rename = "ImportPath", default)]
    pub import_path: String,

    #[serde(rename = "Rev", default)]
    pub rev: String,

    /// Usually `git describe` output, e.g. `v1.12.0-12-g2fd980e`.
    #[serde(rename = "Comment", default)]
    pub comment: String,
}

impl From<GodepPackage> for ImportRecord {
    fn from(pkg: GodepPackage) -> Self {
        ImportRecord::new(pkg.import_path, pkg.rev).with_label(pkg.comment)
    }
}

#[derive(Debug, Default)]
pub struct GodepImporter;

impl GodepImporter {
    pub fn new() -> Self {
        GodepImporter
    }

    fn path(dir: &Path) -> PathBuf {
        dir.join(GODEP_PATH)
    }

    /// Parse `Godeps.json` contents.
    pub fn parse(contents: &str) -> Result<GodepJson> {
        serde_json::from_str(contents).context("failed to parse Godeps.json")
    }
}

impl Importer for GodepImporter {
    fn name(&self) -> &'static str {
        "godep"
    }

    fn has_metadata(&self, dir: &Path) -> bool {
        Self::path(dir).is_file()
    }

    fn load(&self, dir: &Path) -> Result<LoadedConfig> {
        let path = Self::path(dir);
        tracing::debug!("loading {}", path.display());

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let json = Self::parse(&contents).with_context(|| format!("in {}", path.display()))?;

        let records = json.imports.into_iter().map(ImportRecord::from).collect();
        Ok(LoadedConfig::new(records).with_metadata_file(path))
    }
}
