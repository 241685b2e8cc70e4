//! User-facing diagnostics.
//!
//! Every failure a user sees names the offending import path and, where
//! possible, the metadata file it came from and a suggested fix.

use std::fmt::{self, Write as _};
use std::path::PathBuf;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// No legacy metadata was found.
    pub const NO_METADATA: &str =
        "help: Run from a project containing Godeps/Godeps.json, glide.yaml or vendor.conf";

    /// The import path under conversion could not be guessed.
    pub const MISSING_ROOT: &str = "help: Pass the project's import path with `--root`";
}

const RED: &str = "1;31";
const YELLOW: &str = "1;33";
const GREEN: &str = "1;32";

/// Error aborts a conversion; a warning only drops one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rendered-on-demand report about one problem.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Legacy metadata file the problem was found in.
    pub location: Option<PathBuf>,
    pub notes: Vec<String>,
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            location: None,
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic::new(Severity::Warning, message)
    }

    /// Add a `= note` line.
    pub fn with_context(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Point at the file the problem was found in.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Render for a terminal. A single suggestion goes on the `help:` line;
    /// several are numbered below it.
    pub fn format(&self, color: bool) -> String {
        let paint = |text: &str, code: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", code, text)
            } else {
                text.to_string()
            }
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}: {}",
            paint(self.severity.label(), self.severity.color()),
            self.message
        );
        if let Some(path) = &self.location {
            let _ = writeln!(out, "  --> {}", path.display());
        }
        for note in &self.notes {
            let _ = writeln!(out, "  = {}", note);
        }

        let help = paint("help", GREEN);
        match self.suggestions.as_slice() {
            [] => {}
            [only] => {
                let _ = write!(out, "\n{}: {}\n", help, only);
            }
            many => {
                let _ = write!(out, "\n{}: consider:\n", help);
                for (i, suggestion) in many.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {}", i + 1, suggestion);
                }
            }
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}
