use std::path::Path;
use std::process::Command;

use crate::error::{CliError, Result};

/// Runs an external command to completion with inherited stdio.
///
/// The command's own output streams straight to the terminal; a
/// non-zero exit status becomes an error carrying the command line.
pub fn run(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<()> {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let status = command.status().map_err(|err| CliError::CommandFailed {
        command: render(program, args),
        detail: err.to_string(),
    })?;

    if status.success() {
        Ok(())
    } else {
        Err(CliError::CommandFailed {
            command: render(program, args),
            detail: format!("{status}"),
        })
    }
}

/// Runs an external command and captures its trimmed stdout.
pub fn run_captured(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<String> {
    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let output = command.output().map_err(|err| CliError::CommandFailed {
        command: render(program, args),
        detail: err.to_string(),
    })?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(CliError::CommandFailed {
            command: render(program, args),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

fn render(program: &str, args: &[&str]) -> String {
    let mut rendered = String::from(program);
    for arg in args {
        rendered.push(' ');
        if arg.chars().any(char::is_whitespace) {
            rendered.push('"');
            rendered.push_str(arg);
            rendered.push('"');
        } else {
            rendered.push_str(arg);
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_joins_program_and_args() {
        assert_eq!(render("git", &["tag", "1.0.0"]), "git tag 1.0.0");
        assert_eq!(render("ls", &[]), "ls");
    }

    #[test]
    fn render_quotes_args_containing_whitespace() {
        assert_eq!(
            render("sh", &["-c", "cd /tmp && python -m build"]),
            "sh -c \"cd /tmp && python -m build\""
        );
    }

    #[test]
    fn failed_command_reports_the_command_line() {
        let err = run("relkit-no-such-binary", &["--flag"], None).unwrap_err();
        match err {
            CliError::CommandFailed { command, .. } => {
                assert_eq!(command, "relkit-no-such-binary --flag");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[test]
    fn captured_output_is_trimmed() {
        let output = run_captured("echo", &["hello"], None).unwrap();
        assert_eq!(output, "hello");
    }
}
