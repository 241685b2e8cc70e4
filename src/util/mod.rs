//! Shared utilities

pub mod config;
pub mod context;
pub mod diagnostic;
pub mod shell;

pub use config::Config;
pub use context::GlobalContext;
pub use diagnostic::Diagnostic;
pub use shell::{ColorChoice, SharedBuffer, Shell, Status, Verbosity};
