//! depmigrate CLI - convert legacy Go dependency metadata

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use depmigrate::util::ColorChoice;
use depmigrate::ConvertError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        match e.downcast_ref::<ConvertError>() {
            Some(convert) => {
                let color = color && std::io::IsTerminal::is_terminal(&std::io::stderr());
                eprint!("{}", convert.to_diagnostic().format(color));
            }
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("depmigrate=debug")
    } else {
        EnvFilter::new("depmigrate=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let color = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    match cli.command {
        Commands::Import(args) => commands::import::execute(args, cli.quiet, cli.verbose, color),
        Commands::Detect(args) => commands::detect::execute(args, cli.quiet, color),
    }
}
