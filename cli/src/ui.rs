use colored::Colorize;
use std::io::{self, Write};

/// Print a status message for a long-running step
pub fn status_message(message: &str) {
    println!("{} {} ... ", "⏳".yellow(), message.bright_white());
    io::stdout().flush().ok();
}

/// Print a success message
pub fn success_message(message: &str) {
    println!("{} {}", "✅".green(), message.green());
}

/// Print a warning message
pub fn warning_message(message: &str) {
    println!("{} {}", "⚠️ ".yellow(), message.yellow());
}

/// Print a section header to separate logical sections of output
pub fn section_header(title: &str) {
    println!("\n{}", format!("==== {} ====", title).cyan().bold());
}
