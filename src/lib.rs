//! depmigrate - convert legacy Go dependency metadata into a manifest and lock
//!
//! This crate reads godep, glide and vndr metadata, resolves every recorded
//! revision against the versions its repository publishes, and produces a
//! normalized manifest of constraints plus a lock of exact versions.

pub mod core;
pub mod importers;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and mocks for depmigrate unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides an in-memory source provider and fixture
/// projects.
#[cfg(test)]
pub mod test_support;

pub use core::{Lock, Manifest, ProjectRoot};
pub use ops::{ConvertError, Converter};
pub use util::context::GlobalContext;
