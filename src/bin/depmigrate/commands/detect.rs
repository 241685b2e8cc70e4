//! `depmigrate detect` command

use anyhow::{bail, Result};

use crate::cli::DetectArgs;
use depmigrate::importers;
use depmigrate::util::diagnostic::suggestions;
use depmigrate::util::{ColorChoice, GlobalContext, Shell, Status};

pub fn execute(args: DetectArgs, quiet: bool, color: ColorChoice) -> Result<()> {
    let ctx = match args.path {
        Some(path) => GlobalContext::with_cwd(path),
        None => GlobalContext::new()?,
    };
    let shell = Shell::from_flags(quiet, false, color);

    let Some(importer) = importers::detect(ctx.cwd()) else {
        bail!(
            "no godep, glide or vndr metadata found in {}\n{}",
            ctx.cwd().display(),
            suggestions::NO_METADATA
        );
    };

    let config = importer.load(ctx.cwd())?;
    shell.status(
        Status::Detected,
        format!(
            "{} configuration with {} dependencies",
            importer.name(),
            config.records.len()
        ),
    );
    if let Some(root) = ctx.import_path_for(ctx.cwd()) {
        shell.note(format!("project import path is {}", root));
    }

    println!("{}", importer.name());
    Ok(())
}
