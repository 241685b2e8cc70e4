//! Core data structures for depmigrate.
//!
//! This module contains the types shared by every importer:
//! - Import records read from legacy metadata
//! - Project roots and their deduction
//! - Versions, revisions and constraints
//! - The normalized manifest and lock

pub mod lock;
pub mod manifest;
pub mod project_root;
pub mod record;
pub mod version;

pub use lock::{Lock, LockedProject};
pub use manifest::{Manifest, ProjectProperties};
pub use project_root::{ProjectRoot, RootDeducer};
pub use record::{ImportRecord, LoadedConfig};
pub use version::{Constraint, LockedVersion, PairedVersion, Revision, UnpairedVersion};
