use crate::error::ChangelogError;
use std::collections::HashMap;

/// Type alias for Result with `ChangelogError`
pub type Result<T> = std::result::Result<T, ChangelogError>;

/// Collected news entries, keyed by category name
pub type CategoryChanges = HashMap<String, Vec<String>>;
