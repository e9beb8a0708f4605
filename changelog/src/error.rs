use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when merging news fragments into a changelog
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("Failed to read or write changelog file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Anchor line `{0}` not found in changelog")]
    AnchorNotFound(String),

    #[error("Unknown category `{category}` in news fragment {file}")]
    UnknownCategory { category: String, file: PathBuf },

    #[error("News path exists but is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("{0}")]
    Other(String),

    #[error("{0}: {1}")]
    WithContext(String, Box<ChangelogError>),
}

impl ChangelogError {
    #[must_use]
    pub fn with_context<C: Into<String>>(self, context: C) -> Self {
        Self::WithContext(context.into(), Box::new(self))
    }

    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ReadError(err) => format!("File operation failed: {err}"),
            Self::AnchorNotFound(anchor) => format!(
                "Anchor line `{anchor}` not found in the changelog; add it or pass the anchor in use"
            ),
            Self::UnknownCategory { category, file } => format!(
                "News fragment {} uses the category `{category}`, which is not in the configured category list",
                file.display()
            ),
            Self::NotADirectory(path) => {
                format!("News path exists but is not a directory: {}", path.display())
            }
            Self::Other(msg) => msg.clone(),
            Self::WithContext(ctx, err) => format!("{ctx}: {}", err.user_message()),
        }
    }
}
