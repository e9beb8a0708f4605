/// Configuration options for news-fragment collection and merging
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// Recognized categories, in the order they are rendered
    pub categories: Vec<String>,
    /// Name of the news directory, relative to the release directory
    pub news_dir: String,
    /// Name of the fragment template file inside the news directory
    pub template_file: String,
    /// Name of the changelog file inside the news directory
    pub changelog_file: String,
    /// Extra news files to leave untouched besides template and changelog
    pub ignore: Vec<String>,
    /// Marker line after which new release sections are inserted
    pub anchor: String,
    /// Token marking an unfilled template entry; such lines are dropped
    pub placeholder: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                "Added".to_string(),
                "Changed".to_string(),
                "Deprecated".to_string(),
                "Removed".to_string(),
                "Fixed".to_string(),
                "Security".to_string(),
            ],
            news_dir: "news".to_string(),
            template_file: "TEMPLATE.rst".to_string(),
            changelog_file: "CHANGELOG.rst".to_string(),
            ignore: Vec::new(),
            anchor: ".. current developments".to_string(),
            placeholder: "<news item>".to_string(),
        }
    }
}
