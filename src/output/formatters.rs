//! Formatting utilities for terminal output

use crate::core::WordAccuracy;
use crate::engine::NO_CURSOR;

/// Emoji tile for one word result
#[must_use]
pub const fn accuracy_tile(accuracy: WordAccuracy) -> char {
    match accuracy {
        WordAccuracy::Correct => '🟩',
        WordAccuracy::WrongLocation => '🟨',
        WordAccuracy::Wrong => '⬜',
    }
}

/// Format word results as a row of emoji tiles
#[must_use]
pub fn results_to_emoji(results: &[WordAccuracy]) -> String {
    results.iter().copied().map(accuracy_tile).collect()
}

/// Create a progress bar string
#[must_use]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    // Cast is safe: values are clamped to [0, width]
    let filled = ((value / max) * width as f64).max(0.0) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a guess score (0.0 to 1.0) as a bar
#[must_use]
pub fn score_bar(score: f64, width: usize) -> String {
    create_progress_bar(score, 1.0, width)
}

/// Cursor value for display, with the sentinel shown as a dash
#[must_use]
pub fn format_cursor(cursor: i64) -> String {
    if cursor == NO_CURSOR {
        "-".to_string()
    } else {
        cursor.to_string()
    }
}
