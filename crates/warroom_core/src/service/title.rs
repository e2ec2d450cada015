//! Title normalization for the input boundary.
//!
//! The core stores titles as given. UI and CLI callers run user input
//! through [`normalize_title`] before calling the state manager.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum title length in characters accepted from user input.
pub const MAX_TITLE_CHARS: usize = 40;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Rejected title input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleError {
    /// Nothing left after trimming.
    Blank,
}

impl Display for TitleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "title must not be blank"),
        }
    }
}

impl Error for TitleError {}

/// Trims, collapses whitespace runs, and caps to [`MAX_TITLE_CHARS`].
pub fn normalize_title(raw: &str) -> Result<String, TitleError> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        return Err(TitleError::Blank);
    }
    Ok(collapsed
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect::<String>()
        .trim_end()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_title, TitleError, MAX_TITLE_CHARS};

    #[test]
    fn blank_input_is_rejected() {
        assert_eq!(normalize_title("  \t\n"), Err(TitleError::Blank));
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(
            normalize_title("  ship \t the\n\nrelease ").as_deref(),
            Ok("ship the release")
        );
    }

    #[test]
    fn long_input_is_capped_by_characters() {
        let title = normalize_title(&"é".repeat(MAX_TITLE_CHARS + 5)).unwrap();
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
    }
}
