use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Changelog error: {0}")]
    Changelog(#[from] changelog::ChangelogError),

    #[error("Command `{command}` failed: {detail}")]
    CommandFailed { command: String, detail: String },

    #[error("Invalid version `{0}`: expected the form X.Y")]
    InvalidVersion(String),

    #[error("Invalid version range {0}..{1}: {2}")]
    InvalidVersionRange(String, String, String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Glob pattern error: {0}")]
    GlobError(#[from] glob::PatternError),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<CliError>),
}

impl CliError {
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Io(err) => format!("I/O operation failed: {err}"),
            Self::Changelog(err) => err.user_message(),
            Self::CommandFailed { command, detail } => {
                format!("Command `{command}` failed: {detail}")
            }
            Self::InvalidVersion(version) => {
                format!("Invalid version `{version}`: expected the form X.Y")
            }
            Self::InvalidVersionRange(min, max, reason) => {
                format!("Invalid version range {min}..{max}: {reason}")
            }
            Self::PathNotFound(path) => format!("Path not found: {}", path.display()),
            Self::GlobError(err) => format!("Invalid glob pattern: {err}"),
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
