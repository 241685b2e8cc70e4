//! Command implementations

pub mod detect;
pub mod import;
