use crate::types::CategoryChanges;

/// Renders the versioned section that gets spliced into the changelog.
///
/// The title is the version string underlined with `=` of matching
/// length. Categories are emitted in the given order; a category with
/// no collected entries is omitted entirely.
#[must_use]
pub fn render_section(version: &str, categories: &[String], changes: &CategoryChanges) -> String {
    let mut rendered = String::with_capacity(256);
    rendered.push_str(version);
    rendered.push('\n');
    rendered.push_str(&"=".repeat(version.chars().count()));
    rendered.push('\n');

    for category in categories {
        if let Some(entries) = changes.get(category) {
            if entries.is_empty() {
                continue;
            }
            rendered.push('\n');
            rendered.push_str("**");
            rendered.push_str(category);
            rendered.push_str(":**\n\n");
            for entry in entries {
                rendered.push_str(entry);
                rendered.push('\n');
            }
        }
    }

    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NewsConfig;

    fn changes(pairs: &[(&str, &[&str])]) -> CategoryChanges {
        pairs
            .iter()
            .map(|(category, entries)| {
                (
                    (*category).to_string(),
                    entries.iter().map(|entry| (*entry).to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn renders_the_expected_block() {
        let config = NewsConfig::default();
        let changes = changes(&[("Added", &["* Feature X"]), ("Fixed", &["* Bug Y"])]);

        let rendered = render_section("1.2.0", &config.categories, &changes);

        assert_eq!(
            rendered,
            "1.2.0\n=====\n\n**Added:**\n\n* Feature X\n\n**Fixed:**\n\n* Bug Y\n"
        );
    }

    #[test]
    fn no_changes_renders_header_and_underline_only() {
        let config = NewsConfig::default();
        let rendered = render_section("1.2.0", &config.categories, &CategoryChanges::new());

        assert_eq!(rendered, "1.2.0\n=====\n");
    }

    #[test]
    fn underline_matches_version_length() {
        let config = NewsConfig::default();
        let rendered = render_section("10.20.30", &config.categories, &CategoryChanges::new());

        assert_eq!(rendered, "10.20.30\n========\n");
    }

    #[test]
    fn categories_follow_configured_order() {
        let config = NewsConfig::default();
        // Fixed comes after Removed in the default order, regardless of map order.
        let changes = changes(&[("Fixed", &["* b"]), ("Removed", &["* a"])]);

        let rendered = render_section("2.0", &config.categories, &changes);

        assert_eq!(rendered, "2.0\n===\n\n**Removed:**\n\n* a\n\n**Fixed:**\n\n* b\n");
    }

    #[test]
    fn empty_category_lists_are_omitted() {
        let config = NewsConfig::default();
        let changes = changes(&[("Added", &[]), ("Security", &["* CVE fix"])]);

        let rendered = render_section("0.1", &config.categories, &changes);

        assert_eq!(rendered, "0.1\n===\n\n**Security:**\n\n* CVE fix\n");
    }
}
