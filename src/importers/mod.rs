//! Legacy dependency metadata readers.
//!
//! Each importer knows one legacy tool's files. The first importer whose
//! metadata is present in a project wins; the others are never consulted.

pub mod glide;
pub mod godep;
pub mod vndr;

use std::path::Path;

use anyhow::Result;

use crate::core::LoadedConfig;

pub use glide::GlideImporter;
pub use godep::GodepImporter;
pub use vndr::VndrImporter;

/// A reader for one legacy tool's metadata.
pub trait Importer {
    /// Tool name for display.
    fn name(&self) -> &'static str;

    /// Whether `dir` contains this tool's metadata.
    fn has_metadata(&self, dir: &Path) -> bool;

    /// Read the metadata in `dir` into import records.
    fn load(&self, dir: &Path) -> Result<LoadedConfig>;
}

/// All importers, in detection order.
pub fn all() -> Vec<Box<dyn Importer>> {
    vec![
        Box::new(GodepImporter::new()),
        Box::new(GlideImporter::new()),
        Box::new(VndrImporter::new()),
    ]
}

/// The first importer with metadata in `dir`.
pub fn detect(dir: &Path) -> Option<Box<dyn Importer>> {
    all().into_iter().find(|importer| importer.has_metadata(dir))
}
