//! Test utilities and mocks for depmigrate unit tests.
//!
//! The mock provider stands in for remote repositories so that conversion
//! can be tested without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use depmigrate::test_support::{deptest_provider, DEPTEST_ROOT, DEPTEST_V1_REV};
//!
//! #[test]
//! fn test_example() {
//!     let provider = deptest_provider();
//!     let shell = Shell::sink();
//!     let resolver = VersionResolver::new(&provider, &shell);
//!     // Resolve against the fixture repositories...
//! }
//! ```

pub mod fixtures;

use std::cell::Cell;
use std::collections::HashMap;

use anyhow::anyhow;

use crate::core::{PairedVersion, ProjectRoot, UnpairedVersion};
use crate::sources::{SourceError, SourceProvider};

pub use fixtures::*;

/// Import path of the project being converted in unit tests.
pub const TEST_PROJECT_ROOT: &str = "github.com/golang/notexist";

pub const DEPTEST_ROOT: &str = "github.com/sdboyer/deptest";

/// Tagged both `v1.0.0` and `v0.8.0`.
pub const DEPTEST_V1_REV: &str = "ff2948a2ac8f538c4ecd55962e919d1e13e74baf";

/// Tagged `v2.0.0`, also the head of branch `dev`.
pub const DEPTEST_V2_REV: &str = "5c607206be5decd28e6263ffffdcee067266015e";

/// Head of the default branch `master`; untagged.
pub const DEPTEST_MASTER_REV: &str = "3f4c3bea144e112a69bbe5d8d01c1b09a544253f";

pub const DEPTESTDOS_ROOT: &str = "github.com/sdboyer/deptestdos";

pub const DEPTESTDOS_V2_REV: &str = "5c607206be5decd28e6263ffffdcee067266015e";

pub const DEPTESTDOS_MASTER_REV: &str = "a0196baa11ea047dd65037287451d36b861b00ea";

/// In-memory source provider.
///
/// Repositories are keyed by location: the root itself, or a fork's source.
/// Unknown locations report `NotFound`. Calls are counted so tests can check
/// memoization.
#[derive(Debug, Default)]
pub struct MockProvider {
    sources: HashMap<String, Vec<PairedVersion>>,
    failing: HashMap<String, String>,
    exists_calls: Cell<usize>,
    list_calls: Cell<usize>,
}

impl MockProvider {
    pub fn new() -> Self {
        MockProvider::default()
    }

    /// Register a repository with no versions.
    pub fn with_source(self, root: &str) -> Self {
        self.with_versions(root, Vec::new())
    }

    /// Register a repository at `location` and its versions.
    pub fn with_versions(mut self, location: &str, versions: Vec<PairedVersion>) -> Self {
        self.sources.insert(location.to_string(), versions);
        self
    }

    /// Make every call for `location` fail with `message`.
    pub fn with_error(mut self, location: &str, message: &str) -> Self {
        self.failing
            .insert(location.to_string(), message.to_string());
        self
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.get()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    fn check_failing(&self, location: &str) -> Result<(), SourceError> {
        match self.failing.get(location) {
            Some(message) => Err(SourceError::Other(anyhow!("{}", message))),
            None => Ok(()),
        }
    }
}

impl SourceProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn list_versions(
        &self,
        root: &ProjectRoot,
        source: Option<&str>,
    ) -> Result<Vec<PairedVersion>, SourceError> {
        self.list_calls.set(self.list_calls.get() + 1);
        let location = source.unwrap_or(root.as_str());
        self.check_failing(location)?;
        self.sources
            .get(location)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(location.to_string()))
    }

    fn source_exists(&self, root: &ProjectRoot) -> Result<bool, SourceError> {
        self.exists_calls.set(self.exists_calls.get() + 1);
        self.check_failing(root.as_str())?;
        Ok(self.sources.contains_key(root.as_str()))
    }
}

/// A tag at `rev`.
pub fn tag(name: &str, rev: &str) -> PairedVersion {
    UnpairedVersion::from_tag(name).pair(rev.into())
}

/// Provider holding the `deptest` and `deptestdos` fixture repositories.
pub fn deptest_provider() -> MockProvider {
    MockProvider::new()
        .with_versions(
            DEPTEST_ROOT,
            vec![
                UnpairedVersion::default_branch("master").pair(DEPTEST_MASTER_REV.into()),
                UnpairedVersion::branch("dev").pair(DEPTEST_V2_REV.into()),
                tag("v0.8.0", DEPTEST_V1_REV),
                tag("v1.0.0", DEPTEST_V1_REV),
                tag("v2.0.0", DEPTEST_V2_REV),
            ],
        )
        .with_versions(
            DEPTESTDOS_ROOT,
            vec![
                UnpairedVersion::default_branch("master").pair(DEPTESTDOS_MASTER_REV.into()),
                tag("v2.0.0", DEPTESTDOS_V2_REV),
            ],
        )
}
