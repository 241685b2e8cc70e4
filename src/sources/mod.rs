//! Source metadata providers.
//!
//! Providers answer two questions about a repository: does it exist, and
//! which tags and branches does it have.

pub mod git;
pub mod provider;

pub use git::GitProvider;
pub use provider::{SourceError, SourceProvider};
