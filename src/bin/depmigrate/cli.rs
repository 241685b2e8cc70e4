//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// depmigrate - Convert godep, glide and vndr metadata into Gopkg.toml and Gopkg.lock
#[derive(Parser)]
#[command(name = "depmigrate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert legacy metadata into Gopkg.toml and Gopkg.lock
    Import(ImportArgs),

    /// Show which legacy tool's metadata a project carries
    Detect(DetectArgs),
}

#[derive(Args)]
pub struct ImportArgs {
    /// Project directory (defaults to the current directory)
    pub path: Option<PathBuf>,

    /// Import path of the project (guessed from GOPATH when omitted)
    #[arg(long, env = "DEPMIGRATE_ROOT")]
    pub root: Option<String>,

    /// Convert and report without writing any files
    #[arg(long)]
    pub dry_run: bool,

    /// Additional package to ignore (repeatable)
    #[arg(long = "ignore", value_name = "PKG")]
    pub ignore: Vec<String>,
}

#[derive(Args)]
pub struct DetectArgs {
    /// Project directory (defaults to the current directory)
    pub path: Option<PathBuf>,
}
