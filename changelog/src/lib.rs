//! Merging of per-change news fragments into a release changelog.
//!
//! Contributors drop small category-tagged fragment files into a news
//! directory; at release time the fragments are aggregated by category,
//! rendered as a versioned section, and spliced into the changelog
//! directly after a fixed anchor line. Consumed fragments are deleted.

pub mod config;
pub mod core;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod types;
mod utils;

pub use config::NewsConfig;
pub use core::Changelog;
pub use error::ChangelogError;
pub use formatter::render_section;
pub use parser::FragmentParser;
pub use types::{CategoryChanges, Result};
