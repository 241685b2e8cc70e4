//! `depmigrate import` command

use anyhow::{anyhow, Result};

use crate::cli::ImportArgs;
use depmigrate::core::ProjectRoot;
use depmigrate::ops::{import, ImportOptions};
use depmigrate::util::diagnostic::suggestions;
use depmigrate::util::{ColorChoice, GlobalContext, Shell};

pub fn execute(args: ImportArgs, quiet: bool, verbose: bool, color: ColorChoice) -> Result<()> {
    let ctx = match args.path {
        Some(path) => GlobalContext::with_cwd(path),
        None => GlobalContext::new()?,
    };
    let config = ctx.config();

    let shell = Shell::from_flags(quiet, verbose || config.import.verbose, color);

    let project_root = match args.root {
        Some(root) => ProjectRoot::new(root),
        None => ctx.import_path_for(ctx.cwd()).ok_or_else(|| {
            anyhow!(
                "could not determine the import path of {}\n{}",
                ctx.cwd().display(),
                suggestions::MISSING_ROOT
            )
        })?,
    };

    let mut ignored = config.import.ignore.clone();
    ignored.extend(args.ignore);

    let opts = ImportOptions {
        project_root,
        ignored,
        dry_run: args.dry_run,
    };

    let provider = ctx.provider()?;
    let result = import(ctx.cwd(), &provider, &shell, &opts)?;

    if opts.dry_run && !shell.is_quiet() {
        for project in &result.lock.projects {
            let constraint = result
                .manifest
                .constraint_for(&project.root)
                .map(|c| format!(" ({})", c))
                .unwrap_or_default();
            println!("{} {}{}", project.root, project.version, constraint);
        }
    }

    Ok(())
}
