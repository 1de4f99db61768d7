//! Guess evaluation
//!
//! Scores a submitted sentence against a puzzle solution, word by word and as a
//! whole.

use super::similarity::similarity_ratio;
use crate::core::{WordAccuracy, normalize, normalize_sentence};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Highest score a guess can reach without being fully correct
pub const NEAR_MISS_SCORE: f64 = 0.99;

/// Result of evaluating one guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessEvaluation {
    pub word_results: Vec<WordAccuracy>,
    pub score: f64,
}

impl GuessEvaluation {
    /// Whether the guess solved the puzzle
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.word_results.iter().all(|result| result.is_correct())
    }
}

/// Classify a guessed word against the solution word at the same index
///
/// A guess that is a fragment of the solution word (e.g. "elephant" for
/// "elephants") is `WrongLocation`.
#[must_use]
pub fn classify_word(guess: &str, solution: &str) -> WordAccuracy {
    let guess = normalize(guess);
    let solution = normalize(solution);

    if guess == solution {
        WordAccuracy::Correct
    } else if solution.contains(guess.as_str()) {
        WordAccuracy::WrongLocation
    } else {
        WordAccuracy::Wrong
    }
}

/// Evaluate a guess against a solution
///
/// Both sentences are split on single spaces. One result is produced per
/// index up to the longer of the two; an index present on only one side is
/// `Wrong`, so a guess with missing or extra words is never fully correct.
///
/// The score is exactly 1.0 for a fully correct guess. Otherwise it is the
/// similarity ratio of the normalized sentences rounded to two decimals and
/// capped at [`NEAR_MISS_SCORE`].
///
/// # Examples
/// ```
/// use acronym_puzzles::core::WordAccuracy;
/// use acronym_puzzles::engine::evaluate_guess;
///
/// let eval = evaluate_guess("Big Apple", "big apple!");
/// assert_eq!(eval.score, 1.0);
///
/// let eval = evaluate_guess("Big Apple", "big ape");
/// assert_eq!(eval.word_results, vec![WordAccuracy::Correct, WordAccuracy::Wrong]);
/// assert!(eval.score < 1.0);
/// ```
#[must_use]
pub fn evaluate_guess(solution: &str, guess: &str) -> GuessEvaluation {
    let solution_words: Vec<&str> = solution.split(' ').collect();
    let guess_words: Vec<&str> = guess.split(' ').collect();
    let len = solution_words.len().max(guess_words.len());

    let word_results: Vec<WordAccuracy> = (0..len)
        .map(|i| match (guess_words.get(i), solution_words.get(i)) {
            (Some(guess_word), Some(solution_word)) => classify_word(guess_word, solution_word),
            _ => WordAccuracy::Wrong,
        })
        .collect();

    let score = if word_results.iter().all(|result| result.is_correct()) {
        1.0
    } else {
        let ratio = similarity_ratio(&normalize_sentence(guess), &normalize_sentence(solution));
        round_score(ratio).min(NEAR_MISS_SCORE)
    };

    GuessEvaluation {
        word_results,
        score,
    }
}

/// Round to two decimal places, taking the exact binary value of `ratio`
///
/// Exact ties go to the even hundredth: 0.125 rounds to 0.12, 0.375 to 0.38.
fn round_score(ratio: f64) -> f64 {
    let lower = (ratio * 100.0).floor() as i64;
    // sign of 200 * ratio - (2 * lower + 1) with a single rounding step
    let above_midpoint = (8.0 * ratio).mul_add(25.0, -((2 * lower + 1) as f64));
    let hundredths = match above_midpoint.partial_cmp(&0.0) {
        Some(Ordering::Greater) => lower + 1,
        Some(Ordering::Equal) if lower % 2 != 0 => lower + 1,
        _ => lower,
    };
    hundredths as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use WordAccuracy::{Correct, Wrong, WrongLocation};

    #[test]
    fn exact_guess_scores_one() {
        let eval = evaluate_guess(
            "Lions Tigers Monkeys Elephants",
            "lions tigers monkeys elephants",
        );
        assert_eq!(eval.word_results, vec![Correct; 4]);
        assert!((eval.score - 1.0).abs() < f64::EPSILON);
        assert!(eval.is_solved());
    }

    #[test]
    fn punctuation_is_ignored() {
        let eval = evaluate_guess("Don't stop believing", "dont stop believing!");
        assert_eq!(eval.word_results, vec![Correct; 3]);
        assert!((eval.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn fragment_is_wrong_location() {
        let eval = evaluate_guess(
            "Lions Tigers Monkeys Elephants",
            "Lions Tigers Monkeys Elephant",
        );
        assert_eq!(
            eval.word_results,
            vec![Correct, Correct, Correct, WrongLocation]
        );
        assert!(!eval.is_solved());
        // 58 / 59 rounds to 0.98
        assert!((eval.score - 0.98).abs() < 1e-9);
    }

    #[test]
    fn unrelated_word_is_wrong() {
        assert_eq!(classify_word("zebra", "elephants"), Wrong);
        assert_eq!(classify_word("PHANT", "elephants"), WrongLocation);
        assert_eq!(classify_word("Elephants.", "elephants"), Correct);
    }

    #[test]
    fn near_miss_is_capped_below_one() {
        // A long sentence differing in one trailing letter rounds to 1.00
        let solution = "the quick brown fox jumps over the lazy dog while everyone in the crowded \
                        stadium watches very closely as the final whistle sounds today";
        let guess = solution.strip_suffix('y').unwrap();
        let eval = evaluate_guess(solution, guess);
        assert_eq!(eval.word_results.last(), Some(&WrongLocation));
        assert!((eval.score - NEAR_MISS_SCORE).abs() < 1e-9);
    }

    #[test]
    fn shorter_guess_pads_with_wrong() {
        let eval = evaluate_guess("Big Apple Pie", "big apple");
        assert_eq!(eval.word_results, vec![Correct, Correct, Wrong]);
        assert!(eval.score < 1.0);
    }

    #[test]
    fn longer_guess_marks_extra_words_wrong() {
        let eval = evaluate_guess("Big Apple", "big apple pie");
        assert_eq!(eval.word_results, vec![Correct, Correct, Wrong]);
        assert!(eval.score < 1.0);
    }

    #[test]
    fn result_length_is_longer_side() {
        let cases = [
            ("a b c", "a"),
            ("a", "a b c d"),
            ("one two", "uno dos"),
            ("x", ""),
        ];
        for (solution, guess) in cases {
            let eval = evaluate_guess(solution, guess);
            let expected = solution.split(' ').count().max(guess.split(' ').count());
            assert_eq!(eval.word_results.len(), expected);
            assert!((0.0..=1.0).contains(&eval.score));
        }
    }

    #[test]
    fn score_is_one_only_when_all_correct() {
        let cases = [
            ("Big Apple", "big apple"),
            ("Big Apple", "big appl"),
            ("Big Apple", "apple big"),
            ("Big Apple", "big  apple"),
        ];
        for (solution, guess) in cases {
            let eval = evaluate_guess(solution, guess);
            let perfect = (eval.score - 1.0).abs() < f64::EPSILON;
            assert_eq!(perfect, eval.is_solved(), "{guess:?}");
        }
    }

    #[test]
    fn exact_ties_round_to_even() {
        let cases = [
            ("axxxxxxx", 0.12),
            ("abcxxxxx", 0.38),
            ("abcdexyz", 0.62),
            ("abcdefgx", 0.88),
        ];
        for (guess, expected) in cases {
            let eval = evaluate_guess("abcdefgh", guess);
            assert!((eval.score - expected).abs() < 1e-9, "{guess}: {}", eval.score);
        }
    }

    #[test]
    fn rounding_uses_the_binary_value() {
        // 0.015 and 0.285 are stored just below the halfway point
        assert!((round_score(0.015) - 0.01).abs() < 1e-9);
        assert!((round_score(0.285) - 0.28).abs() < 1e-9);
        assert!((round_score(0.5) - 0.5).abs() < 1e-9);
        assert!((round_score(2.0 / 3.0) - 0.67).abs() < 1e-9);
    }

    #[test]
    fn serializes_wire_shape() {
        let eval = evaluate_guess("Big Apple", "big ape");
        let json = serde_json::to_value(&eval).unwrap();
        assert_eq!(json["word_results"], serde_json::json!([0, 2]));
        assert!(json["score"].is_f64());
    }
}
