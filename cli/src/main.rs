mod cli;
mod cmd;
mod docker;
mod envs;
mod error;
mod release;
mod ui;

use clap::Parser;
use cli::{Cli, Commands, EnvsAction};
use colored::Colorize;
use std::process;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Release(args) => release::execute(args),
        Commands::Envs { action } => match action {
            EnvsAction::Create {
                versions,
                opts,
                requirements,
                pip_requirements,
                dev_mode,
                nest,
            } => envs::create(
                &versions,
                &opts,
                requirements.as_deref(),
                pip_requirements.as_deref(),
                dev_mode.as_deref(),
                nest.as_deref(),
            ),
            EnvsAction::Clean { versions, opts } => envs::clean(&versions, &opts),
            EnvsAction::Run {
                versions,
                opts,
                script,
            } => envs::run_script(&versions, &opts, &script),
        },
        Commands::Docker {
            package,
            min_version,
            max_version,
            path,
            upload,
        } => docker::execute(&package, &min_version, &max_version, &path, upload),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".bold().red(), err.user_message());
        process::exit(1);
    }
}
