use once_cell::sync::Lazy;
use regex::Regex;

pub static CATEGORY_HEADER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*(.+):\*\*").expect("Failed to compile category header regex")
});
