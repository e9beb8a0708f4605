use std::fs;
use std::path::{Path, PathBuf};

use crate::config::NewsConfig;
use crate::error::ChangelogError;
use crate::formatter::render_section;
use crate::parser::FragmentParser;
use crate::types::{CategoryChanges, Result};

/// Drives a single changelog merge: collect the pending news fragments,
/// render a versioned section, splice it into the changelog after the
/// anchor line, and delete the consumed fragments.
pub struct Changelog {
    news_dir: PathBuf,
    config: NewsConfig,
    ignore: Vec<String>,
}

impl Changelog {
    /// Prepares a merge rooted at `release_dir`.
    ///
    /// The news directory, the fragment template, and the changelog file
    /// are created when missing; none of these are errors.
    ///
    /// # Errors
    ///
    /// Returns an error when the news path exists but is not a
    /// directory, or when any of the bootstrap files cannot be written.
    pub fn prepare(release_dir: &Path, config: NewsConfig) -> Result<Self> {
        let news_dir = release_dir.join(&config.news_dir);
        if !news_dir.exists() {
            fs::create_dir_all(&news_dir)?;
        } else if !news_dir.is_dir() {
            return Err(ChangelogError::NotADirectory(news_dir));
        }

        // The template and the changelog live in the news directory and
        // must survive every merge, along with user-specified ignores.
        let mut ignore = config.ignore.clone();
        ignore.push(config.template_file.clone());
        ignore.push(config.changelog_file.clone());

        let merger = Self {
            news_dir,
            config,
            ignore,
        };
        merger.ensure_template()?;
        merger.ensure_changelog()?;
        Ok(merger)
    }

    #[must_use]
    pub fn news_dir(&self) -> &Path {
        &self.news_dir
    }

    #[must_use]
    pub fn changelog_path(&self) -> PathBuf {
        self.news_dir.join(&self.config.changelog_file)
    }

    fn template_path(&self) -> PathBuf {
        self.news_dir.join(&self.config.template_file)
    }

    fn ensure_template(&self) -> Result<()> {
        let path = self.template_path();
        if path.exists() {
            return Ok(());
        }
        let entries: Vec<String> = self
            .config
            .categories
            .iter()
            .map(|category| format!("**{category}:**\n\n* {}\n", self.config.placeholder))
            .collect();
        fs::write(&path, format!("{}\n", entries.join("\n")))?;
        Ok(())
    }

    fn ensure_changelog(&self) -> Result<()> {
        let path = self.changelog_path();
        if path.exists() {
            return Ok(());
        }
        let header = format!(
            "=============\nRelease Notes\n=============\n\n{}\n",
            self.config.anchor
        );
        fs::write(&path, header)?;
        Ok(())
    }

    /// Fragment files pending merge, sorted by file name so the merged
    /// output does not depend on directory enumeration order.
    ///
    /// # Errors
    ///
    /// Returns an error when the news directory cannot be read.
    pub fn pending_fragments(&self) -> Result<Vec<PathBuf>> {
        let mut fragments = Vec::new();
        for entry in fs::read_dir(&self.news_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if self.ignore.contains(&name) {
                continue;
            }
            fragments.push(path);
        }
        fragments.sort();
        Ok(fragments)
    }

    /// Parses every pending fragment into a single category map.
    ///
    /// # Errors
    ///
    /// Returns an error when a fragment cannot be read or names an
    /// unknown category.
    pub fn collect_changes(&self) -> Result<CategoryChanges> {
        let parser = FragmentParser::new(self.config.clone());
        let mut changes = CategoryChanges::new();
        for fragment in self.pending_fragments()? {
            let content = fs::read_to_string(&fragment)?;
            parser.parse_into(&fragment, &content, &mut changes)?;
        }
        Ok(changes)
    }

    /// Splices `section` into `content` directly after the anchor line.
    ///
    /// Everything before the anchor line and everything after it is
    /// kept byte-for-byte. The section is preceded by one blank line;
    /// when older entries follow the anchor, exactly one more blank
    /// line separates the section from them.
    ///
    /// # Errors
    ///
    /// Returns `AnchorNotFound` when no line's trimmed content equals
    /// the configured anchor.
    pub fn splice_after_anchor(&self, content: &str, section: &str) -> Result<String> {
        let anchor = self.config.anchor.as_str();

        let mut anchor_end = None;
        let mut offset = 0usize;
        for line in content.split_inclusive('\n') {
            offset += line.len();
            if line.trim() == anchor {
                anchor_end = Some(offset);
                break;
            }
        }
        let anchor_end = match anchor_end {
            Some(end) => end,
            None => return Err(ChangelogError::AnchorNotFound(anchor.to_string())),
        };

        let (before, rest) = content.split_at(anchor_end);
        let mut merged = String::with_capacity(content.len() + section.len() + 3);
        merged.push_str(before);
        if !before.ends_with('\n') {
            merged.push('\n');
        }
        merged.push('\n');
        merged.push_str(section);
        if !rest.trim().is_empty() {
            merged.push('\n');
        }
        merged.push_str(rest);
        Ok(merged)
    }

    /// Runs the merge end to end and deletes the consumed fragments.
    ///
    /// Returns the number of fragment files that were merged in.
    ///
    /// # Errors
    ///
    /// Returns an error when fragments or the changelog cannot be read
    /// or written, or when the anchor line is missing.
    pub fn update(&self, version: &str) -> Result<usize> {
        let changes = self.collect_changes()?;
        let section = render_section(version, &self.config.categories, &changes);

        let changelog_path = self.changelog_path();
        let content = fs::read_to_string(&changelog_path)?;
        let merged = self.splice_after_anchor(&content, &section)?;
        fs::write(&changelog_path, merged)?;

        let fragments = self.pending_fragments()?;
        let consumed = fragments.len();
        for fragment in fragments {
            fs::remove_file(&fragment)?;
        }
        Ok(consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merger() -> Changelog {
        let config = NewsConfig::default();
        let mut ignore = config.ignore.clone();
        ignore.push(config.template_file.clone());
        ignore.push(config.changelog_file.clone());
        Changelog {
            news_dir: PathBuf::from("news"),
            config,
            ignore,
        }
    }

    #[test]
    fn splice_into_empty_changelog_adds_no_separator() {
        let content = "=============\nRelease Notes\n=============\n\n.. current developments\n";
        let merged = merger()
            .splice_after_anchor(content, "1.0.0\n=====\n")
            .unwrap();

        assert_eq!(
            merged,
            "=============\nRelease Notes\n=============\n\n.. current developments\n\n1.0.0\n=====\n"
        );
    }

    #[test]
    fn splice_keeps_older_entries_verbatim_after_one_blank_line() {
        let content = "header\n.. current developments\n\n0.9.0\n=====\n\n**Fixed:**\n\n* old\n";
        let merged = merger()
            .splice_after_anchor(content, "1.0.0\n=====\n")
            .unwrap();

        let rest = "\n0.9.0\n=====\n\n**Fixed:**\n\n* old\n";
        assert_eq!(merged, format!("header\n.. current developments\n\n1.0.0\n=====\n\n{rest}"));
        // Pre-existing content reappears verbatim after the new block.
        assert!(merged.ends_with(rest));
    }

    #[test]
    fn splice_handles_anchor_as_final_unterminated_line() {
        let content = "header\n.. current developments";
        let merged = merger()
            .splice_after_anchor(content, "1.0.0\n=====\n")
            .unwrap();

        assert_eq!(merged, "header\n.. current developments\n\n1.0.0\n=====\n");
    }

    #[test]
    fn missing_anchor_is_an_error() {
        let err = merger()
            .splice_after_anchor("no marker here\n", "1.0.0\n=====\n")
            .unwrap_err();

        match err {
            ChangelogError::AnchorNotFound(anchor) => {
                assert_eq!(anchor, ".. current developments");
            }
            other => panic!("expected AnchorNotFound, got {other:?}"),
        }
    }

    #[test]
    fn content_before_the_anchor_is_untouched() {
        let content = "preamble line one\npreamble line two\n.. current developments\n";
        let merged = merger()
            .splice_after_anchor(content, "1.0.0\n=====\n")
            .unwrap();

        assert!(merged.starts_with("preamble line one\npreamble line two\n.. current developments\n"));
    }
}
