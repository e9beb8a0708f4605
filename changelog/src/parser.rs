use std::path::Path;

use crate::config::NewsConfig;
use crate::error::ChangelogError;
use crate::types::{CategoryChanges, Result};
use crate::utils::CATEGORY_HEADER_PATTERN;

#[derive(Debug, Clone)]
enum ParserState {
    NoCategory,
    InCategory(String),
}

/// Parses news fragments into category-keyed entry lists.
///
/// A `**<Name>:**` line switches the current category; every following
/// non-blank line is recorded verbatim under it until the next header.
/// Lines before the first header are ignored, as are lines still
/// carrying the template placeholder.
#[derive(Debug, Clone)]
pub struct FragmentParser {
    config: NewsConfig,
}

impl FragmentParser {
    #[must_use]
    pub fn new(config: NewsConfig) -> Self {
        Self { config }
    }

    /// Parses a single fragment, appending its entries to `changes`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` when a header names a category absent
    /// from the configured set. `source` is only used for reporting.
    pub fn parse_into(
        &self,
        source: &Path,
        content: &str,
        changes: &mut CategoryChanges,
    ) -> Result<()> {
        let mut state = ParserState::NoCategory;

        for line in content.lines() {
            if let Some(captures) = CATEGORY_HEADER_PATTERN.captures(line) {
                if let Some(category_match) = captures.get(1) {
                    let category = category_match.as_str().to_string();
                    if !self.config.categories.contains(&category) {
                        return Err(ChangelogError::UnknownCategory {
                            category,
                            file: source.to_path_buf(),
                        });
                    }
                    state = ParserState::InCategory(category);
                }
                continue;
            }

            if let ParserState::InCategory(category) = &state {
                if line.trim().is_empty() || line.contains(&self.config.placeholder) {
                    continue;
                }
                changes.entry(category.clone()).or_default().push(line.to_string());
            }
        }

        Ok(())
    }

    /// Parses a single fragment into a fresh category map.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`FragmentParser::parse_into`].
    pub fn parse(&self, source: &Path, content: &str) -> Result<CategoryChanges> {
        let mut changes = CategoryChanges::new();
        self.parse_into(source, content, &mut changes)?;
        Ok(changes)
    }
}
