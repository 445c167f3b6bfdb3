//! Text normalization applied to every article before it is stored.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

/// Unicode punctuation plus the ASCII symbols (`$`, `+`, `|`, ...) POSIX counts as punctuation.
static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{P}[:punct:]]").expect("valid punctuation regex"));

/// Reduce arbitrary text to lowercase alphabetic words separated by single spaces.
///
/// Each whitespace-delimited token has its punctuation removed and is
/// lowercased. Tokens that end up empty or still contain anything other than
/// alphabetic characters (digits, symbols, mixed content) are dropped whole.
/// Token order is preserved.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_text("Hello, World! It's 2024."), "hello world its");
/// assert_eq!(normalize_text("covid19 vaccine"), "vaccine");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace()
        .filter_map(|token| {
            let word = PUNCTUATION.replace_all(token, "").to_lowercase();
            let keep = !word.is_empty() && word.chars().all(char::is_alphabetic);
            keep.then_some(word)
        })
        .join(" ")
}
