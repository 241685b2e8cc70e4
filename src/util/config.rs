//! Configuration file support for depmigrate.
//!
//! Two configuration file locations are read:
//! - Global: `~/.depmigrate/config.toml` - User-wide defaults
//! - Project: `.depmigrate/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// depmigrate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Import settings
    pub import: ImportConfig,

    /// Network settings
    pub net: NetConfig,
}

/// Import-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Packages to add to the manifest's ignore list on every import
    pub ignore: Vec<String>,

    /// Print resolution details by default
    pub verbose: bool,

    /// Remote URL overrides, keyed by project root
    pub sources: std::collections::BTreeMap<String, String>,
}

/// Network-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Offline mode (don't contact remotes)
    pub offline: bool,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Ignore lists accumulate; source overrides are replaced per root.
    pub fn merge(&mut self, other: Config) {
        for pkg in other.import.ignore {
            if !self.import.ignore.contains(&pkg) {
                self.import.ignore.push(pkg);
            }
        }
        if other.import.verbose {
            self.import.verbose = true;
        }
        self.import.sources.extend(other.import.sources);

        if other.net.offline {
            self.net.offline = true;
        }
    }
}

/// Get the global config directory (~/.depmigrate).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".depmigrate"))
}

/// Get the global config path (~/.depmigrate/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.depmigrate/config.toml).
pub fn project_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".depmigrate").join("config.toml")
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.depmigrate/config.toml)
/// 2. Global config (~/.depmigrate/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.import.ignore.is_empty());
        assert!(!config.import.verbose);
        assert!(!config.net.offline);
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[import]
ignore = ["github.com/foo/bar/testdata"]
verbose = true

[import.sources]
"github.com/sdboyer/deptest" = "https://example.org/fork/deptest.git"

[net]
offline = true
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.import.ignore, vec!["github.com/foo/bar/testdata"]);
        assert!(config.import.verbose);
        assert!(config.net.offline);
        assert_eq!(
            config.import.sources.get("github.com/sdboyer/deptest").map(String::as_str),
            Some("https://example.org/fork/deptest.git")
        );
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[import]
ignore = ["github.com/a/one"]

[import.sources]
"github.com/a/b" = "https://global.example/b.git"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[import]
ignore = ["github.com/a/two", "github.com/a/one"]

[import.sources]
"github.com/a/b" = "https://project.example/b.git"
"#,
        )
        .unwrap();

        let config = load_config(Some(&global_path), &project_path);
        assert_eq!(
            config.import.ignore,
            vec!["github.com/a/one", "github.com/a/two"]
        );
        assert_eq!(
            config.import.sources.get("github.com/a/b").map(String::as_str),
            Some("https://project.example/b.git")
        );
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &tmp.path().join("nope.toml"));
        assert!(config.import.ignore.is_empty());
    }
}
