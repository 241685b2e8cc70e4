//! Resolution error types and diagnostics.

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error while resolving one project root. Never fatal to a conversion.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unable to resolve project root for `{root}`")]
    RootUnresolvable { root: String },

    #[error("source error for `{root}`: {message}")]
    Provider { root: String, message: String },
}

impl ResolveError {
    /// The import path or root this error concerns.
    pub fn root(&self) -> &str {
        match self {
            ResolveError::RootUnresolvable { root } => root,
            ResolveError::Provider { root, .. } => root,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ResolveError::RootUnresolvable { root } => {
                Diagnostic::warning(format!("could not find a repository for `{}`", root))
                    .with_context("the dependency was left out of the manifest and lock")
                    .with_suggestion("Check that the import path is spelled correctly")
                    .with_suggestion("Ensure the repository is reachable from this machine")
            }
            ResolveError::Provider { root, message } => {
                Diagnostic::warning(format!("error listing versions of `{}`", root))
                    .with_context(message.clone())
                    .with_suggestion("Check your network connection")
            }
        }
    }
}
