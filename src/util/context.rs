//! Global context for depmigrate operations.
//!
//! Bundles the working directory, merged configuration, and the GOPATH
//! lookup used to guess a project's own import path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use url::Url;

use crate::core::ProjectRoot;
use crate::sources::GitProvider;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Merged global + project configuration
    config: Config,

    /// GOPATH entries, in lookup order
    gopaths: Vec<PathBuf>,
}

impl GlobalContext {
    /// Create a context for the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a context for a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let config = load_config(global_config_path().as_deref(), &project_config_path(&cwd));
        GlobalContext {
            cwd,
            config,
            gopaths: default_gopaths(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Replace the GOPATH entries.
    pub fn with_gopaths(mut self, gopaths: Vec<PathBuf>) -> Self {
        self.gopaths = gopaths;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the git provider described by the configuration.
    pub fn provider(&self) -> Result<GitProvider> {
        let mut provider = GitProvider::new().offline(self.config.net.offline);
        for (root, url) in &self.config.import.sources {
            let url = Url::parse(url)
                .with_context(|| format!("invalid source URL for `{}`: {}", root, url))?;
            provider = provider.with_url(ProjectRoot::new(root.as_str()), url);
        }
        Ok(provider)
    }

    /// Guess the import path of `dir` from its location under a GOPATH.
    pub fn import_path_for(&self, dir: &Path) -> Option<ProjectRoot> {
        let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        self.gopaths.iter().find_map(|gopath| {
            let src = gopath.join("src");
            let src = src.canonicalize().unwrap_or(src);
            let rel = dir.strip_prefix(&src).ok()?;
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(ProjectRoot::new(parts.join("/")))
            }
        })
    }
}

/// `$GOPATH` entries, or `~/go` when unset.
fn default_gopaths() -> Vec<PathBuf> {
    match std::env::var_os("GOPATH") {
        Some(value) if !value.is_empty() => std::env::split_paths(&value).collect(),
        _ => directories::BaseDirs::new()
            .map(|b| vec![b.home_dir().join("go")])
            .unwrap_or_default(),
    }
}
