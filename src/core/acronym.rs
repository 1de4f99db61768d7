//! Acronym derivation

/// Build the acronym shown to players for a solution
///
/// Takes the upper-cased first letter of every whitespace-delimited word.
///
/// # Examples
/// ```
/// use acronym_puzzles::core::acronym;
///
/// assert_eq!(acronym("Lions Tigers Monkeys Elephants"), "LTME");
/// assert_eq!(acronym(""), "");
/// ```
#[must_use]
pub fn acronym(solution: &str) -> String {
    solution
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
