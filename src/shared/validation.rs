use lazy_static::lazy_static;
use regex::Regex;

use crate::core::error::{AppError, Result};

lazy_static! {
    /// Characters that may not appear in a stored attachment name.
    /// Anything outside `[A-Za-z0-9._-]` is replaced with an underscore.
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]").unwrap();
}

/// Returns the trimmed value of a required text field.
pub fn required_text(value: Option<String>, field: &str) -> Result<String> {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Reduces a client supplied filename to a safe base name.
///
/// Directory components are dropped (both `/` and `\` separators), unsafe
/// characters are replaced and leading dots are removed so the result can
/// never escape the upload directory or become a hidden file.
/// Returns `None` when nothing usable is left.
pub fn sanitize_filename(original: &str) -> Option<String> {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned = UNSAFE_FILENAME_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        None
    } else {
        Some(cleaned.to_string())
    }
}
