//! Catalog audit
//!
//! Checks every puzzle in a catalog before it is served: the solution must
//! score as a perfect guess against itself, produce a non-empty acronym, and
//! sit at a valid position with a positive par score. Solutions must be
//! unique across the whole catalog.

use crate::core::{CategoryId, Puzzle, PuzzleId, acronym};
use crate::engine::evaluate_guess;
use crate::store::Catalog;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::time::{Duration, Instant};

/// A problem found in a catalog
#[derive(Debug, Clone, PartialEq)]
pub enum AuditIssue {
    /// Guessing the solution verbatim does not solve the puzzle
    SelfGuessFails { puzzle: PuzzleId, score: f64 },
    EmptyAcronym { puzzle: PuzzleId },
    ZeroPosition { puzzle: PuzzleId },
    ZeroParScore { puzzle: PuzzleId },
    UnknownCategory { puzzle: PuzzleId, category: CategoryId },
    DuplicatePosition {
        category: CategoryId,
        position: u32,
        puzzles: (PuzzleId, PuzzleId),
    },
    DuplicateSolution {
        solution: String,
        puzzles: (PuzzleId, PuzzleId),
    },
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfGuessFails { puzzle, score } => {
                write!(f, "puzzle {puzzle}: own solution scores {score:.2}")
            }
            Self::EmptyAcronym { puzzle } => write!(f, "puzzle {puzzle}: empty acronym"),
            Self::ZeroPosition { puzzle } => {
                write!(f, "puzzle {puzzle}: position must be positive")
            }
            Self::ZeroParScore { puzzle } => {
                write!(f, "puzzle {puzzle}: par score must be positive")
            }
            Self::UnknownCategory { puzzle, category } => {
                write!(f, "puzzle {puzzle}: unknown category {category}")
            }
            Self::DuplicatePosition {
                category,
                position,
                puzzles: (a, b),
            } => write!(
                f,
                "category {category}: puzzles {a} and {b} share position {position}"
            ),
            Self::DuplicateSolution {
                solution,
                puzzles: (a, b),
            } => write!(f, "puzzles {a} and {b} share solution \"{solution}\""),
        }
    }
}

/// Outcome of an audit
#[derive(Debug)]
pub struct AuditReport {
    pub categories: usize,
    pub puzzles_checked: usize,
    pub issues: Vec<AuditIssue>,
    pub duration: Duration,
}

impl AuditReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Audit every puzzle of `catalog`
///
/// Per-puzzle checks run in parallel; a progress bar is drawn when
/// `show_progress` is set.
#[must_use]
pub fn run_audit(catalog: &Catalog, show_progress: bool) -> AuditReport {
    let start = Instant::now();
    let pb = if show_progress {
        progress_bar(catalog.puzzles.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let known: FxHashSet<CategoryId> = catalog.categories.iter().map(|c| c.id).collect();
    let mut issues: Vec<AuditIssue> = catalog
        .puzzles
        .par_iter()
        .flat_map_iter(|puzzle| {
            let found = check_puzzle(puzzle, &known);
            pb.inc(1);
            found
        })
        .collect();
    pb.finish_with_message("Complete!");

    issues.extend(duplicate_positions(&catalog.puzzles));
    issues.extend(duplicate_solutions(&catalog.puzzles));

    AuditReport {
        categories: catalog.categories.len(),
        puzzles_checked: catalog.puzzles.len(),
        issues,
        duration: start.elapsed(),
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░"));
    }
    pb
}

fn check_puzzle(puzzle: &Puzzle, known: &FxHashSet<CategoryId>) -> Vec<AuditIssue> {
    let mut issues = Vec::new();
    let id = puzzle.id;

    if !known.contains(&puzzle.category) {
        issues.push(AuditIssue::UnknownCategory {
            puzzle: id,
            category: puzzle.category,
        });
    }
    if puzzle.position == 0 {
        issues.push(AuditIssue::ZeroPosition { puzzle: id });
    }
    if puzzle.par_score == 0 {
        issues.push(AuditIssue::ZeroParScore { puzzle: id });
    }
    if acronym(&puzzle.solution).is_empty() {
        issues.push(AuditIssue::EmptyAcronym { puzzle: id });
    }

    let evaluation = evaluate_guess(&puzzle.solution, &puzzle.solution);
    if !evaluation.is_solved() {
        issues.push(AuditIssue::SelfGuessFails {
            puzzle: id,
            score: evaluation.score,
        });
    }
    issues
}

fn duplicate_positions(puzzles: &[Puzzle]) -> Vec<AuditIssue> {
    let mut seen: FxHashMap<(CategoryId, u32), PuzzleId> = FxHashMap::default();
    let mut issues = Vec::new();
    for puzzle in puzzles {
        if let Some(&first) = seen.get(&(puzzle.category, puzzle.position)) {
            issues.push(AuditIssue::DuplicatePosition {
                category: puzzle.category,
                position: puzzle.position,
                puzzles: (first, puzzle.id),
            });
        } else {
            seen.insert((puzzle.category, puzzle.position), puzzle.id);
        }
    }
    issues
}

fn duplicate_solutions(puzzles: &[Puzzle]) -> Vec<AuditIssue> {
    let mut seen: FxHashMap<&str, PuzzleId> = FxHashMap::default();
    let mut issues = Vec::new();
    for puzzle in puzzles {
        if let Some(&first) = seen.get(puzzle.solution.as_str()) {
            issues.push(AuditIssue::DuplicateSolution {
                solution: puzzle.solution.clone(),
                puzzles: (first, puzzle.id),
            });
        } else {
            seen.insert(&puzzle.solution, puzzle.id);
        }
    }
    issues
}
