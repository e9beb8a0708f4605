use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::cmd;
use crate::error::{CliError, Result};
use crate::ui;

static MINOR_VERSION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+$").expect("Failed to compile version regex"));

const PLATFORMS: [&str; 3] = ["linux", "windows", "macos"];

// Name of the long-running Docker-OSX container used for macOS builds.
const OSX_CONTAINER: &str = "docker-osx";

const TWINE_UPLOAD: &str =
    "twine upload dist/* --username $TWINE_USERNAME --password $TWINE_PASSWORD";

/// Builds the package for every Python version in the inclusive
/// `min_version..=max_version` range on linux, windows, and macos.
pub fn execute(
    package: &str,
    min_version: &str,
    max_version: &str,
    path: &Path,
    upload: bool,
) -> Result<()> {
    if !path.exists() {
        return Err(CliError::PathNotFound(path.to_path_buf()));
    }

    let versions = version_range(min_version, max_version)?;
    for platform in PLATFORMS {
        for version in &versions {
            if platform == "macos" {
                build_macos(package, version, upload, path)?;
            } else {
                build_image(package, version, platform, upload, path)?;
            }
        }
    }
    Ok(())
}

fn parse_version(version: &str) -> Result<(u32, u32)> {
    if !MINOR_VERSION_PATTERN.is_match(version) {
        return Err(CliError::InvalidVersion(version.to_string()));
    }
    let mut parts = version.split('.');
    let major = parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(|| CliError::InvalidVersion(version.to_string()))?;
    let minor = parts
        .next()
        .and_then(|part| part.parse().ok())
        .ok_or_else(|| CliError::InvalidVersion(version.to_string()))?;
    Ok((major, minor))
}

/// Expands an inclusive `X.Y` range into the concrete version list.
pub(crate) fn version_range(min_version: &str, max_version: &str) -> Result<Vec<String>> {
    let (min_major, min_minor) = parse_version(min_version)?;
    let (max_major, max_minor) = parse_version(max_version)?;

    if min_major != max_major {
        return Err(CliError::InvalidVersionRange(
            min_version.to_string(),
            max_version.to_string(),
            "major versions must match".to_string(),
        ));
    }
    if min_minor > max_minor {
        return Err(CliError::InvalidVersionRange(
            min_version.to_string(),
            max_version.to_string(),
            "minimum is greater than maximum".to_string(),
        ));
    }

    Ok((min_minor..=max_minor)
        .map(|minor| format!("{min_major}.{minor}"))
        .collect())
}

fn build_image(
    package: &str,
    version: &str,
    platform: &str,
    upload: bool,
    path: &Path,
) -> Result<()> {
    ui::status_message(&format!("Building {package} for Python {version} on {platform}"));

    let image = format!("{package}:{version}-{platform}");
    let dockerfile = format!("Dockerfile.{platform}");
    let build_arg = format!("PYTHON_VERSION={version}");
    let context = path.display().to_string();
    cmd::run(
        "docker",
        &[
            "build",
            "--build-arg",
            &build_arg,
            "-t",
            &image,
            "-f",
            &dockerfile,
            &context,
        ],
        None,
    )?;

    if upload {
        ui::status_message(&format!("Uploading {package} for Python {version} on {platform}"));
        let shell = if platform == "windows" { "powershell" } else { "/bin/bash" };
        cmd::run("docker", &["run", "--rm", &image, shell, "-c", TWINE_UPLOAD], None)?;
    }

    ui::success_message(&format!("Finished {package} {version} on {platform}"));
    Ok(())
}

fn build_macos(package: &str, version: &str, upload: bool, path: &Path) -> Result<()> {
    ui::status_message(&format!("Building {package} for Python {version} on macos"));

    let source = path.display().to_string();
    let target = format!("{OSX_CONTAINER}:/app");
    cmd::run("docker", &["cp", &source, &target], None)?;

    let build_script = format!(
        "cd /app && pyenv install --skip-existing {version} && pyenv local {version} && python -m build"
    );
    cmd::run("docker", &["exec", OSX_CONTAINER, "bash", "-c", &build_script], None)?;

    if upload {
        ui::status_message(&format!("Uploading {package} for Python {version} on macos"));
        cmd::run("docker", &["exec", OSX_CONTAINER, "bash", "-c", TWINE_UPLOAD], None)?;
    }

    ui::success_message(&format!("Finished {package} {version} on macos"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn range_expands_inclusive_minor_versions() {
        assert_eq!(
            version_range("3.10", "3.12").unwrap(),
            vec!["3.10".to_string(), "3.11".to_string(), "3.12".to_string()]
        );
        assert_eq!(version_range("3.11", "3.11").unwrap(), vec!["3.11".to_string()]);
    }

    #[test]
    fn malformed_versions_are_rejected() {
        assert!(matches!(
            version_range("3", "3.12").unwrap_err(),
            CliError::InvalidVersion(_)
        ));
        assert!(matches!(
            version_range("3.10", "3.12.1").unwrap_err(),
            CliError::InvalidVersion(_)
        ));
        assert!(matches!(
            version_range("3.x", "3.12").unwrap_err(),
            CliError::InvalidVersion(_)
        ));
    }

    #[test]
    fn mismatched_majors_are_rejected() {
        assert!(matches!(
            version_range("2.7", "3.12").unwrap_err(),
            CliError::InvalidVersionRange(..)
        ));
    }

    #[test]
    fn inverted_ranges_are_rejected() {
        assert!(matches!(
            version_range("3.12", "3.10").unwrap_err(),
            CliError::InvalidVersionRange(..)
        ));
    }

    #[test]
    fn missing_package_path_fails_before_any_build() {
        let err = execute("pkg", "3.10", "3.11", &PathBuf::from("/no/such/path"), false)
            .unwrap_err();
        assert!(matches!(err, CliError::PathNotFound(_)));
    }
}
