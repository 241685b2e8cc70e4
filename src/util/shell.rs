//! Centralized user-facing output.
//!
//! The Shell prints aligned status lines (`{status:>12} {message}`) for
//! progress and warnings. Where the lines go is injectable, so library
//! callers and tests can capture them.
//!
//! - Quiet: errors only
//! - Normal: status lines, warnings, and a progress bar on a terminal
//! - Verbose: everything, including the reasoning behind version choices

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use indicatif::{ProgressBar, ProgressStyle};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only, no progress
    Quiet,
    /// Default: status messages + progress bars
    #[default]
    Normal,
    /// --verbose: status lines plus resolution details, no progress bars
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Detected,
    Locked,
    Finished,
    Wrote,

    // In-progress statuses (cyan)
    Converting,

    // Info statuses (blue/default)
    Info,

    // Warning statuses (yellow)
    Ignored,
    Skipped,
    Warning,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Detected => "Detected",
            Status::Locked => "Locked",
            Status::Finished => "Finished",
            Status::Wrote => "Wrote",
            Status::Converting => "Converting",
            Status::Info => "Info",
            Status::Ignored => "Ignored",
            Status::Skipped => "Skipped",
            Status::Warning => "Warning",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Detected | Status::Locked | Status::Finished | Status::Wrote => "\x1b[1;32m",
            Status::Converting => "\x1b[1;36m",
            Status::Info => "\x1b[1;34m",
            Status::Ignored | Status::Skipped | Status::Warning => "\x1b[1;33m",
        }
    }

    /// Alignment width.
    fn width(&self) -> usize {
        12
    }
}

/// A cloneable in-memory writer for capturing shell output.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        SharedBuffer::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut inner) => inner.write(buf),
            Err(_) => Err(io::Error::new(io::ErrorKind::Other, "buffer poisoned")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Central shell for all user-facing output.
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
    /// Progress bars only make sense when writing to a terminal.
    interactive: bool,
    out: Mutex<Box<dyn Write + Send>>,
    warnings: AtomicUsize,
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("verbosity", &self.verbosity)
            .field("use_color", &self.use_color)
            .finish_non_exhaustive()
    }
}

impl Shell {
    /// Create a shell writing to stderr.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let is_tty = io::stderr().is_terminal();
        let use_color = match color {
            ColorChoice::Auto => is_tty,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
            interactive: is_tty,
            out: Mutex::new(Box::new(io::stderr())),
            warnings: AtomicUsize::new(0),
        }
    }

    /// Create a shell writing uncolored lines to `writer`.
    pub fn with_writer(verbosity: Verbosity, writer: impl Write + Send + 'static) -> Self {
        Shell {
            verbosity,
            use_color: false,
            interactive: false,
            out: Mutex::new(Box::new(writer)),
            warnings: AtomicUsize::new(0),
        }
    }

    /// A verbose shell that discards everything.
    pub fn sink() -> Self {
        Shell::with_writer(Verbosity::Verbose, io::sink())
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };
        Shell::new(verbosity, color)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message.
    ///
    /// Nothing is printed in quiet mode.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() {
            return;
        }

        let line = format!("{} {}\n", self.format_status(status), msg);
        self.write_line(&line);
    }

    /// Print an info message.
    pub fn note(&self, msg: impl Display) {
        self.status(Status::Info, msg);
    }

    /// Print a warning and count it.
    pub fn warn(&self, msg: impl Display) {
        self.warnings.fetch_add(1, Ordering::SeqCst);
        self.status(Status::Warning, msg);
    }

    /// Print a message only in verbose mode.
    pub fn verbose(&self, msg: impl Display) {
        if self.is_verbose() {
            self.status(Status::Info, msg);
        }
    }

    /// Print preformatted text (e.g. a rendered diagnostic) unless quiet.
    pub fn print_raw(&self, text: &str) {
        if !self.is_quiet() {
            self.write_line(text);
        }
    }

    /// Number of warnings printed so far.
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::SeqCst)
    }

    fn write_line(&self, line: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.write_all(line.as_bytes());
            let _ = out.flush();
        }
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();
        let width = status.width();

        if self.use_color {
            let color = status.color_code();
            format!("{}{:>width$}\x1b[0m", color, text, width = width)
        } else {
            format!("{:>width$}", text, width = width)
        }
    }

    /// Create a progress bar.
    ///
    /// Only drawn in normal mode on a terminal; otherwise a no-op.
    pub fn progress(&self, total: u64, msg: impl Display) -> Progress {
        Progress::new(self, total, msg.to_string())
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}

/// Progress bar wrapper that respects shell mode.
pub struct Progress {
    pb: Option<ProgressBar>,
}

impl Progress {
    fn new(shell: &Shell, total: u64, message: String) -> Self {
        let pb = if shell.verbosity == Verbosity::Normal && shell.interactive && total > 1 {
            let pb = ProgressBar::new(total);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb.set_message(message);
            Some(pb)
        } else {
            None
        };

        Progress { pb }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(pb) = &self.pb {
            pb.inc(delta);
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.pb {
            pb.finish_and_clear();
        }
    }
}
