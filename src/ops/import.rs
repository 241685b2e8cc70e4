//! Implementation of `depmigrate import`.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::{Lock, Manifest, ProjectRoot};
use crate::importers;
use crate::ops::convert::{ConvertOptions, Converter, SkippedRoot};
use crate::ops::lockfile::{save_lock, save_manifest, LOCK_NAME, MANIFEST_NAME};
use crate::sources::SourceProvider;
use crate::util::diagnostic::suggestions;
use crate::util::{Shell, Status};

/// Options for the import command.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Import path of the project being migrated.
    pub project_root: ProjectRoot,

    /// Extra packages to ignore.
    pub ignored: Vec<String>,

    /// Convert without writing any files.
    pub dry_run: bool,
}

/// Outcome of an import.
#[derive(Debug)]
pub struct ImportResult {
    /// Name of the legacy tool whose metadata was read.
    pub importer: &'static str,
    pub manifest: Manifest,
    pub lock: Lock,
    pub skipped: Vec<SkippedRoot>,
}

/// Detect legacy metadata in `dir`, convert it and write `Gopkg.toml` and
/// `Gopkg.lock` next to it.
///
/// Existing output files are never overwritten.
pub fn import<P>(
    dir: &Path,
    provider: &P,
    shell: &Shell,
    opts: &ImportOptions,
) -> Result<ImportResult>
where
    P: SourceProvider + ?Sized,
{
    let manifest_path = dir.join(MANIFEST_NAME);
    let lock_path = dir.join(LOCK_NAME);

    if !opts.dry_run {
        for path in [&manifest_path, &lock_path] {
            if path.exists() {
                bail!("{} already exists", path.display());
            }
        }
    }

    let Some(importer) = importers::detect(dir) else {
        bail!(
            "no godep, glide or vndr metadata found in {}\n{}",
            dir.display(),
            suggestions::NO_METADATA
        );
    };
    shell.status(
        Status::Detected,
        format!("{} configuration in {}", importer.name(), dir.display()),
    );

    let config = importer
        .load(dir)
        .with_context(|| format!("failed to load {} configuration", importer.name()))?;
    shell.status(
        Status::Converting,
        format!(
            "{} dependencies for {} using {}",
            config.records.len(),
            opts.project_root,
            provider.name()
        ),
    );

    let mut converter = Converter::new(provider, shell);
    let convert_opts = ConvertOptions {
        ignored: opts.ignored.clone(),
    };
    let (manifest, lock) = converter.convert(&opts.project_root, &config, &convert_opts)?;
    let skipped = converter.skipped().to_vec();

    if opts.dry_run {
        tracing::info!("dry run, not writing {} or {}", MANIFEST_NAME, LOCK_NAME);
    } else {
        save_manifest(&manifest_path, &manifest)?;
        shell.status(Status::Wrote, manifest_path.display());
        save_lock(&lock_path, &lock)?;
        shell.status(Status::Wrote, lock_path.display());
    }

    for skip in &skipped {
        shell.status(Status::Skipped, &skip.import_path);
    }
    shell.status(
        Status::Finished,
        format!(
            "{} project{} locked, {} skipped",
            lock.len(),
            if lock.len() == 1 { "" } else { "s" },
            skipped.len()
        ),
    );

    Ok(ImportResult {
        importer: importer.name(),
        manifest,
        lock,
        skipped,
    })
}
