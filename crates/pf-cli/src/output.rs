//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints a value as pretty JSON.
///
/// ## Errors
///
/// Returns an error if the value cannot be serialized.
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prompts for password input (hidden).
///
/// ## Errors
///
/// Returns an error if the terminal cannot be read.
pub fn prompt_password(prompt: &str) -> anyhow::Result<String> {
    Ok(rpassword::prompt_password(prompt)?)
}
