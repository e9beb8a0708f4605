use std::fs;
use std::path::Path;

use changelog::{Changelog, NewsConfig};

use crate::cli::ReleaseArgs;
use crate::cmd;
use crate::error::{CliError, Result};
use crate::ui;

/// Runs the selected release actions in order: changelog merge, tag
/// push, GitHub release, PyPI upload.
pub fn execute(args: ReleaseArgs) -> Result<()> {
    let directory = args
        .directory
        .canonicalize()
        .map_err(|_| CliError::PathNotFound(args.directory.clone()))?;

    if !(args.changelog || args.tag || args.github || args.pypi) {
        return Err(CliError::Other(
            "No release action selected. Pass --changelog, --tag, --github, or --pypi.".to_string(),
        ));
    }

    if args.changelog {
        update_changelog(&directory, &args)?;
    }
    if args.tag {
        push_tag(&directory, &args.version)?;
    }
    if args.github {
        github_release(&directory, &args)?;
    }
    if args.pypi {
        pypi_release(&directory, &args.version)?;
    }

    Ok(())
}

/// Splits a comma-separated option value, dropping blank parts.
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

fn news_config(args: &ReleaseArgs) -> NewsConfig {
    let mut config = NewsConfig::default();
    if let Some(file) = &args.cl_file {
        config.changelog_file = file.clone();
    }
    if let Some(news) = &args.cl_news {
        config.news_dir = news.clone();
    }
    if let Some(template) = &args.cl_template {
        config.template_file = template.clone();
    }
    if let Some(categories) = &args.cl_categories {
        config.categories = split_list(categories);
    }
    if let Some(ignore) = &args.cl_ignore {
        config.ignore = split_list(ignore);
    }
    if let Some(anchor) = &args.cl_anchor {
        config.anchor = anchor.clone();
    }
    config
}

fn update_changelog(directory: &Path, args: &ReleaseArgs) -> Result<()> {
    ui::status_message("Merging news fragments into the changelog");
    let merger = Changelog::prepare(directory, news_config(args))?;
    let consumed = merger.update(&args.version)?;
    ui::success_message(&format!(
        "Merged {consumed} news fragment(s) into {}",
        merger.changelog_path().display()
    ));
    Ok(())
}

fn push_tag(directory: &Path, version: &str) -> Result<()> {
    ui::status_message(&format!("Tagging version {version}"));
    cmd::run("git", &["tag", version], Some(directory))?;
    cmd::run("git", &["push", "upstream", version], Some(directory))?;
    ui::success_message(&format!("Pushed tag {version} to upstream"));
    Ok(())
}

fn github_release(directory: &Path, args: &ReleaseArgs) -> Result<()> {
    // Scratch directory for the tarball; never clobber an existing one.
    let mut scratch_name = String::from("release_tmp");
    while directory.join(&scratch_name).exists() {
        scratch_name.push_str("_prime");
    }
    let scratch = directory.join(&scratch_name);
    fs::create_dir(&scratch)?;

    let result = tar_and_publish(directory, &scratch_name, args);
    // The scratch directory goes away whether or not the release worked.
    let _ = fs::remove_dir_all(&scratch);
    result
}

fn tar_and_publish(directory: &Path, scratch_name: &str, args: &ReleaseArgs) -> Result<()> {
    let project = directory
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "release".to_string());
    let tarball_path = format!("./{scratch_name}/{project}-{}.tar.gz", args.version);
    let exclude = format!("--exclude=./{scratch_name}");

    ui::status_message(&format!("Building source tarball for {project} {}", args.version));
    cmd::run("tar", &[&exclude, "-zcf", &tarball_path, "."], Some(directory))?;

    let title = args.gh_title.clone().unwrap_or_else(|| args.version.clone());
    let mut gh_args = vec![
        "release",
        "create",
        args.version.as_str(),
        tarball_path.as_str(),
        "-t",
        title.as_str(),
    ];
    match &args.gh_notes {
        Some(notes) => {
            gh_args.push("-n");
            gh_args.push(notes.as_str());
        }
        None => gh_args.push("--generate-notes"),
    }

    ui::status_message("Creating GitHub release");
    cmd::run("gh", &gh_args, Some(directory))?;
    ui::success_message(&format!("Created GitHub release {}", args.version));
    Ok(())
}

fn pypi_release(directory: &Path, version: &str) -> Result<()> {
    ui::status_message("Building distribution");
    cmd::run("python", &["-m", "build"], Some(directory))?;

    let pattern = directory.join("dist").join(format!("*{version}*.tar.gz"));
    let artifacts: Vec<String> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(|entry| entry.ok())
        .map(|path| path.display().to_string())
        .collect();
    if artifacts.is_empty() {
        return Err(CliError::Other(format!(
            "No new distribution matching *{version}*.tar.gz in dist/. Check for any untracked changes."
        )));
    }

    ui::status_message("Uploading to PyPI");
    let mut twine_args = vec!["upload"];
    twine_args.extend(artifacts.iter().map(String::as_str));
    cmd::run("twine", &twine_args, Some(directory))?;
    ui::success_message("Uploaded distribution to PyPI");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(directory: &Path) -> ReleaseArgs {
        ReleaseArgs {
            directory: directory.to_path_buf(),
            version: "1.0.0".to_string(),
            changelog: false,
            tag: false,
            github: false,
            pypi: false,
            cl_file: None,
            cl_news: None,
            cl_template: None,
            cl_categories: None,
            cl_ignore: None,
            cl_anchor: None,
            gh_title: None,
            gh_notes: None,
        }
    }

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(
            split_list("Added, Changed , Fixed"),
            vec!["Added".to_string(), "Changed".to_string(), "Fixed".to_string()]
        );
        assert_eq!(split_list("one,,two,"), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn news_config_picks_up_overrides() {
        let mut release_args = args(&PathBuf::from("."));
        release_args.cl_file = Some("HISTORY.rst".to_string());
        release_args.cl_categories = Some("New, Old".to_string());
        release_args.cl_anchor = Some(".. next release".to_string());

        let config = news_config(&release_args);
        assert_eq!(config.changelog_file, "HISTORY.rst");
        assert_eq!(config.categories, vec!["New".to_string(), "Old".to_string()]);
        assert_eq!(config.anchor, ".. next release");
        assert_eq!(config.news_dir, "news");
    }

    #[test]
    fn no_action_selected_is_an_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let err = execute(args(temp_dir.path())).unwrap_err();
        assert!(err.user_message().contains("No release action selected"));
    }

    #[test]
    fn changelog_action_merges_fragments() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let news_dir = temp_dir.path().join("news");
        std::fs::create_dir(&news_dir).unwrap();
        std::fs::write(news_dir.join("a.rst"), "**Added:**\n\n* Feature X\n").unwrap();

        let mut release_args = args(temp_dir.path());
        release_args.changelog = true;
        execute(release_args).unwrap();

        let merged = std::fs::read_to_string(news_dir.join("CHANGELOG.rst")).unwrap();
        assert!(merged.contains("1.0.0\n=====\n\n**Added:**\n\n* Feature X\n"));
        assert!(!news_dir.join("a.rst").exists());
    }

    #[test]
    fn missing_directory_is_reported() {
        let err = execute(args(&PathBuf::from("/no/such/directory"))).unwrap_err();
        assert!(matches!(err, CliError::PathNotFound(_)));
    }
}
