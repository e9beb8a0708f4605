use std::fs;
use std::os::unix::fs as unix_fs;
use std::path::{Path, PathBuf};

use crate::cli::EnvsOpts;
use crate::cmd;
use crate::error::{CliError, Result};
use crate::release::split_list;
use crate::ui;

fn manager(opts: &EnvsOpts) -> &'static str {
    if opts.mamba { "mamba" } else { "conda" }
}

fn env_name(opts: &EnvsOpts, version: &str) -> String {
    format!("{}{}{}", opts.prefix, version, opts.suffix)
}

/// Substitutes `[vsn]` in a requirements path when version-specific
/// requirement files are in use.
fn versioned(path: &str, version: &str, vreqs: bool) -> String {
    if vreqs {
        path.replace("[vsn]", version)
    } else {
        path.to_string()
    }
}

pub(crate) fn parse_versions(raw: &str) -> Result<Vec<String>> {
    let versions = split_list(raw);
    if versions.is_empty() {
        return Err(CliError::Other(
            "No interpreter versions given. Pass a comma-separated list such as \"3.10, 3.11\"."
                .to_string(),
        ));
    }
    Ok(versions)
}

/// Creates one environment per interpreter version, then installs the
/// optional pip requirements and developer checkout into each and links
/// the interpreters into the nest directory when requested.
pub fn create(
    versions: &str,
    opts: &EnvsOpts,
    requirements: Option<&str>,
    pip_requirements: Option<&str>,
    dev_mode: Option<&Path>,
    nest: Option<&Path>,
) -> Result<()> {
    let versions = parse_versions(versions)?;
    let manager = manager(opts);

    for version in &versions {
        let name = env_name(opts, version);
        ui::status_message(&format!("Creating environment {name}"));
        let python_spec = format!("python={version}");
        let mut create_args = vec!["create", "-n", name.as_str(), python_spec.as_str()];
        let file_arg;
        if let Some(reqs) = requirements {
            file_arg = format!("--file={}", versioned(reqs, version, opts.vreqs));
            create_args.push(file_arg.as_str());
        }
        create_args.push("--yes");
        cmd::run(manager, &create_args, None)?;
    }

    let nest_dir = nest.and_then(prepare_nest);

    for version in &versions {
        let name = env_name(opts, version);
        if let Some(preqs) = pip_requirements {
            let reqs = versioned(preqs, version, opts.vreqs);
            cmd::run(
                manager,
                &["run", "-n", &name, "pip", "install", "-r", &reqs],
                None,
            )?;
        }
        if let Some(dev_dir) = dev_mode {
            let dev = dev_dir.display().to_string();
            cmd::run(
                manager,
                &["run", "-n", &name, "pip", "install", "-e", &dev],
                None,
            )?;
        }
        if let Some(nest_dir) = &nest_dir {
            link_interpreter(manager, &name, version, nest_dir)?;
        }
    }

    ui::success_message(&format!("Created {} environment(s)", versions.len()));
    Ok(())
}

/// Removes the environments for the given versions.
pub fn clean(versions: &str, opts: &EnvsOpts) -> Result<()> {
    let versions = parse_versions(versions)?;
    let manager = manager(opts);

    for version in &versions {
        let name = env_name(opts, version);
        ui::status_message(&format!("Removing environment {name}"));
        cmd::run(manager, &["remove", "-n", &name, "--all"], None)?;
    }

    ui::success_message(&format!("Removed {} environment(s)", versions.len()));
    Ok(())
}

/// Expands a script into the command lines to run for one version:
/// `[vsn]` is substituted and blank lines are dropped. Each line is
/// kept whole so quoting and shell operators survive.
fn script_commands(script: &str, version: &str) -> Vec<String> {
    script
        .lines()
        .map(|line| line.replace("[vsn]", version))
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Runs each non-blank line of the script inside every environment,
/// substituting `[vsn]` with the environment's interpreter version.
/// Lines go through the environment's shell, so quoted arguments and
/// operators like `&&` behave as they would in a terminal.
pub fn run_script(versions: &str, opts: &EnvsOpts, script: &Path) -> Result<()> {
    let versions = parse_versions(versions)?;
    let manager = manager(opts);
    let script = fs::read_to_string(script)
        .map_err(|err| CliError::Io(err).with_context("Failed to read script file"))?;

    for version in &versions {
        let name = env_name(opts, version);
        ui::section_header(&format!("Environment {name}"));
        for command in script_commands(&script, version) {
            cmd::run(manager, &["run", "-n", &name, "sh", "-c", &command], None)?;
        }
    }

    Ok(())
}

/// Validates the nest target. An unusable target is a warning, not an
/// error: environment creation still proceeds without the nest.
fn prepare_nest(dir: &Path) -> Option<PathBuf> {
    if dir.exists() {
        if !dir.is_dir() {
            ui::warning_message("Nest target is not a directory. No snake nest created.");
            return None;
        }
        match fs::read_dir(dir) {
            Ok(mut entries) => {
                if entries.next().is_some() {
                    ui::warning_message("Nest target directory is not empty. No snake nest created.");
                    return None;
                }
            }
            Err(_) => {
                ui::warning_message("Nest target directory is unreadable. No snake nest created.");
                return None;
            }
        }
    } else if fs::create_dir_all(dir).is_err() {
        ui::warning_message("Could not create the nest directory. No snake nest created.");
        return None;
    }
    Some(dir.to_path_buf())
}

fn link_interpreter(manager: &str, name: &str, version: &str, nest_dir: &Path) -> Result<()> {
    let output = cmd::run_captured(manager, &["run", "-n", name, "which", "python"], None)?;
    let interpreter = output
        .lines()
        .rev()
        .find(|line| line.contains("python"))
        .map(str::trim)
        .unwrap_or_default();
    if interpreter.is_empty() {
        ui::warning_message(&format!("Could not locate the python interpreter for {name}"));
        return Ok(());
    }
    unix_fs::symlink(interpreter, nest_dir.join(format!("python-{version}")))?;
    Ok(())
}
