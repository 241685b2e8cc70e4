//! Conversion of loaded legacy records into a manifest and lock.

use std::collections::HashSet;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::{
    LoadedConfig, Lock, LockedProject, Manifest, ProjectProperties, ProjectRoot, RootDeducer,
};
use crate::ops::lockfile::compute_inputs_digest;
use crate::resolver::{ResolveError, VersionResolver};
use crate::sources::SourceProvider;
use crate::util::diagnostic::Diagnostic;
use crate::util::{Shell, Status};

/// A structural problem in the legacy metadata. Aborts the conversion.
#[derive(Debug, Clone, Error, MietteDiagnostic, PartialEq, Eq)]
pub enum ConvertError {
    #[error("dependency #{position} has an empty import path")]
    #[diagnostic(
        code(depmigrate::convert::empty_import_path),
        help("Every dependency entry must name the package it imports")
    )]
    EmptyImportPath {
        /// 1-based position of the entry in the legacy file.
        position: usize,
        file: Option<PathBuf>,
    },

    #[error("dependency `{import_path}` has an empty revision")]
    #[diagnostic(
        code(depmigrate::convert::empty_revision),
        help("Regenerate the legacy lock so every dependency is pinned to a revision")
    )]
    EmptyRevision {
        import_path: String,
        file: Option<PathBuf>,
    },
}

impl ConvertError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (diag, file) = match self {
            ConvertError::EmptyImportPath { position, file } => (
                Diagnostic::error(self.to_string())
                    .with_context(format!("entry {} of the legacy metadata", position))
                    .with_suggestion("Remove the entry or fill in its import path"),
                file,
            ),
            ConvertError::EmptyRevision { import_path, file } => (
                Diagnostic::error(self.to_string())
                    .with_context(format!("`{}` is not pinned to any commit", import_path))
                    .with_suggestion("Regenerate the legacy lock so every dependency is pinned"),
                file,
            ),
        };
        match file {
            Some(file) => diag.with_location(file),
            None => diag,
        }
    }
}

/// Caller-supplied conversion settings.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Extra packages to ignore, merged after the legacy config's own list.
    pub ignored: Vec<String>,
}

/// A dependency that was left out because its root could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRoot {
    pub import_path: String,
    pub error: ResolveError,
}

/// Drives records through root deduction and version resolution.
pub struct Converter<'a, P: ?Sized> {
    provider: &'a P,
    shell: &'a Shell,
    skipped: Vec<SkippedRoot>,
}

impl<'a, P> Converter<'a, P>
where
    P: SourceProvider + ?Sized,
{
    pub fn new(provider: &'a P, shell: &'a Shell) -> Self {
        Converter {
            provider,
            shell,
            skipped: Vec::new(),
        }
    }

    /// Dependencies skipped by the last conversion.
    pub fn skipped(&self) -> &[SkippedRoot] {
        &self.skipped
    }

    /// Convert `config` for the project whose own import path is
    /// `project_root`.
    ///
    /// Structural errors abort before anything is resolved. Unresolvable
    /// roots are reported and skipped; the rest still convert.
    pub fn convert(
        &mut self,
        project_root: &ProjectRoot,
        config: &LoadedConfig,
        opts: &ConvertOptions,
    ) -> Result<(Manifest, Lock), ConvertError> {
        validate(config)?;
        self.skipped.clear();

        let mut manifest = Manifest::new();
        let mut lock = Lock::new();
        let mut deducer = RootDeducer::new();
        let mut seen: HashSet<ProjectRoot> = HashSet::new();
        let mut failed: HashSet<ProjectRoot> = HashSet::new();
        let resolver = VersionResolver::new(self.provider, self.shell);

        let ignored: Vec<&String> = config.ignored.iter().chain(opts.ignored.iter()).collect();

        let progress = self
            .shell
            .progress(config.records.len() as u64, "Resolving");

        for record in &config.records {
            progress.inc(1);
            let path = record.import_path.trim_matches('/');

            if project_root.contains(path) {
                self.shell
                    .verbose(format!("{}: part of the project itself, skipping", path));
                continue;
            }

            if ignored.iter().any(|i| i.as_str() == path) {
                self.shell.verbose(format!("{}: ignored, skipping", path));
                continue;
            }

            let root = match deducer.deduce(self.provider, path) {
                Ok(root) => root,
                Err(e) => {
                    self.skip(path, e);
                    continue;
                }
            };

            if failed.contains(&root) {
                self.shell
                    .verbose(format!("{}: skipped with {}", path, root));
                continue;
            }

            if !seen.insert(root.clone()) {
                if let Some(project) = lock.find_mut(&root) {
                    if let Some(pkg) = root.relative_package(path) {
                        project.add_package(pkg);
                    }
                }
                self.shell
                    .verbose(format!("{}: already converted as part of {}", path, root));
                continue;
            }

            self.shell.verbose(format!(
                "{}: resolving {}{}",
                root,
                record.revision,
                record
                    .label
                    .as_deref()
                    .map(|l| format!(" ({})", l))
                    .unwrap_or_default()
            ));

            match resolver.resolve(
                &root,
                record.source.as_deref(),
                &record.revision,
                record.label.as_deref(),
            ) {
                Ok(resolution) => {
                    if resolution.constraint.is_some() || record.source.is_some() {
                        manifest.add_constraint(
                            root.clone(),
                            ProjectProperties {
                                constraint: resolution.constraint.clone(),
                                source: record.source.clone(),
                            },
                        );
                    }

                    let mut project =
                        LockedProject::new(root.clone(), record.source.clone(), resolution.version);
                    if let Some(pkg) = root.relative_package(path) {
                        project.add_package(pkg);
                    }

                    self.shell.status(
                        Status::Locked,
                        match &resolution.constraint {
                            Some(c) => format!("{} at {} ({})", root, project.version, c),
                            None => format!("{} at {}", root, project.version),
                        },
                    );
                    lock.add_project(project);
                }
                Err(e) => {
                    self.skip(root.as_str(), e);
                    failed.insert(root);
                }
            }
        }

        progress.finish();

        for pkg in ignored {
            if manifest.ignore(pkg) {
                self.shell.status(Status::Ignored, pkg);
            }
        }

        lock.inputs_digest = Some(compute_inputs_digest(&manifest));

        Ok((manifest, lock))
    }

    fn skip(&mut self, import_path: &str, error: ResolveError) {
        self.shell.warn(format!("skipping {}: {}", import_path, error));
        if self.shell.is_verbose() {
            self.shell
                .print_raw(&error.to_diagnostic().format(self.shell.use_color()));
        }
        self.skipped.push(SkippedRoot {
            import_path: import_path.to_string(),
            error,
        });
    }
}

/// Reject records with an empty import path or revision.
fn validate(config: &LoadedConfig) -> Result<(), ConvertError> {
    let file = || config.metadata_file.clone();
    for (i, record) in config.records.iter().enumerate() {
        if record.import_path.trim().is_empty() {
            return Err(ConvertError::EmptyImportPath {
                position: i + 1,
                file: file(),
            });
        }
        if record.revision.is_empty() {
            return Err(ConvertError::EmptyRevision {
                import_path: record.import_path.clone(),
                file: file(),
            });
        }
    }
    Ok(())
}
