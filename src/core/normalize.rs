//! Word normalization
//!
//! Guesses are compared against solutions after case folding and punctuation
//! removal, so "Don't" and "dont" are the same word.

/// Typographic punctuation that mobile keyboards substitute for ASCII.
const TYPOGRAPHIC_PUNCTUATION: [char; 8] = [
    '\u{2018}', // ‘
    '\u{2019}', // ’
    '\u{201C}', // “
    '\u{201D}', // ”
    '\u{2013}', // –
    '\u{2014}', // —
    '\u{2026}', // …
    '\u{00B4}', // ´
];

/// Check whether a character is stripped by [`normalize`]
#[inline]
#[must_use]
pub fn is_punctuation(ch: char) -> bool {
    ch.is_ascii_punctuation() || TYPOGRAPHIC_PUNCTUATION.contains(&ch)
}

/// Canonicalize a word for comparison
///
/// Trims surrounding whitespace, lower-cases, and drops punctuation.
/// Whitespace-only input yields an empty string.
///
/// # Examples
/// ```
/// use acronym_puzzles::core::normalize;
///
/// assert_eq!(normalize("Don't"), "dont");
/// assert_eq!(normalize("well-known"), "wellknown");
/// assert_eq!(normalize("   "), "");
/// ```
#[must_use]
pub fn normalize(word: &str) -> String {
    word.trim()
        .chars()
        .filter(|&ch| !is_punctuation(ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalize every space-separated word and rejoin with single spaces
#[must_use]
pub fn normalize_sentence(sentence: &str) -> String {
    sentence
        .split_whitespace()
        .map(normalize)
        .collect::<Vec<_>>()
        .join(" ")
}
