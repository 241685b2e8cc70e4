//! High-level operations.
//!
//! This module contains the implementation of depmigrate commands.

pub mod convert;
pub mod import;
pub mod lockfile;

pub use convert::{ConvertError, ConvertOptions, Converter, SkippedRoot};
pub use import::{import, ImportOptions, ImportResult};
