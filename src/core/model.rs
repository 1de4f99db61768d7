//! Puzzle, category and progress entities
//!
//! These are read-only views of what the repositories own. The core never
//! mutates a puzzle or category.

use super::acronym;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a player, as resolved from their credential
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Storage id of a category
    CategoryId
);
numeric_id!(
    /// Storage id of a puzzle
    PuzzleId
);
numeric_id!(
    /// Storage id of a progress record
    ProgressId
);

/// Default par score for imported puzzles
pub const DEFAULT_PAR_SCORE: u32 = 5;

const fn default_par_score() -> u32 {
    DEFAULT_PAR_SCORE
}

const fn default_active() -> bool {
    true
}

/// A puzzle: clue, hidden sentence solution, and its place in the category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: PuzzleId,
    pub category: CategoryId,
    pub position: u32,
    pub solution: String,
    pub clue: String,
    #[serde(default = "default_par_score")]
    pub par_score: u32,
}

/// What a player sees of a puzzle before solving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleCard {
    pub acronym: String,
    pub clue: String,
    pub par_score: u32,
    pub position: u32,
}

impl From<&Puzzle> for PuzzleCard {
    fn from(puzzle: &Puzzle) -> Self {
        Self {
            acronym: acronym(&puzzle.solution),
            clue: puzzle.clue.clone(),
            par_score: puzzle.par_score,
            position: puzzle.position,
        }
    }
}

/// A themed group of puzzles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// `None` for system categories
    #[serde(default)]
    pub creator: Option<UserId>,
}

impl Category {
    #[inline]
    #[must_use]
    pub const fn is_system(&self) -> bool {
        self.creator.is_none()
    }

    /// System categories are visible to everyone, user categories to their creator
    #[must_use]
    pub fn is_visible_to(&self, user: &UserId) -> bool {
        self.creator.as_ref().is_none_or(|creator| creator == user)
    }
}

/// Game mode a progress record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Leveled progression, one permanent record per (user, puzzle)
    #[serde(rename = "levelup", alias = "levels")]
    Levels,
    Endless,
    Daily,
}

impl GameMode {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Levels => "levelup",
            Self::Endless => "endless",
            Self::Daily => "daily",
        }
    }

    /// Parse a wire name (`levels` is accepted for `levelup`)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "levelup" | "levels" => Some(Self::Levels),
            "endless" => Some(Self::Endless),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }

    /// Whether at most one record may ever exist per (user, puzzle)
    #[must_use]
    pub const fn is_permanent(self) -> bool {
        matches!(self, Self::Levels)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored result for one play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: ProgressId,
    pub user: UserId,
    pub category: CategoryId,
    pub puzzle: Option<PuzzleId>,
    pub mode: GameMode,
    pub score: i64,
    pub attempts_data: Option<String>,
    /// Calendar day the record was written
    pub day: NaiveDate,
}

/// Fields of a progress record before storage assigns an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProgress {
    pub user: UserId,
    pub category: CategoryId,
    pub puzzle: Option<PuzzleId>,
    pub mode: GameMode,
    pub score: i64,
    pub attempts_data: Option<String>,
    pub day: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_mode_wire_names() {
        assert_eq!(serde_json::to_string(&GameMode::Levels).unwrap(), "\"levelup\"");
        assert_eq!(serde_json::to_string(&GameMode::Daily).unwrap(), "\"daily\"");

        let levels: GameMode = serde_json::from_str("\"levels\"").unwrap();
        assert_eq!(levels, GameMode::Levels);
        let endless: GameMode = serde_json::from_str("\"endless\"").unwrap();
        assert_eq!(endless, GameMode::Endless);
        assert!(serde_json::from_str::<GameMode>("\"arcade\"").is_err());
    }

    #[test]
    fn game_mode_from_name() {
        assert_eq!(GameMode::from_name("levelup"), Some(GameMode::Levels));
        assert_eq!(GameMode::from_name("levels"), Some(GameMode::Levels));
        assert_eq!(GameMode::from_name("LEVELS"), None);
        assert!(GameMode::Levels.is_permanent());
        assert!(!GameMode::Daily.is_permanent());
    }

    #[test]
    fn category_visibility() {
        let mut category = Category {
            id: CategoryId(1),
            slug: "gen-z".into(),
            name: "Gen Z".into(),
            description: String::new(),
            emoji: String::new(),
            order: 0,
            is_active: true,
            creator: None,
        };
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");

        assert!(category.is_system());
        assert!(category.is_visible_to(&alice));

        category.creator = Some(alice.clone());
        assert!(category.is_visible_to(&alice));
        assert!(!category.is_visible_to(&bob));
    }

    #[test]
    fn card_hides_solution() {
        let puzzle = Puzzle {
            id: PuzzleId(7),
            category: CategoryId(1),
            position: 4,
            solution: "Busy bees make honey".into(),
            clue: "Sweet workers".into(),
            par_score: 4,
        };
        let card = PuzzleCard::from(&puzzle);
        assert_eq!(card.acronym, "BBMH");
        assert_eq!(card.position, 4);

        let json = serde_json::to_value(&card).unwrap();
        assert!(json.get("solution").is_none());
        assert_eq!(json["clue"], "Sweet workers");
    }

    #[test]
    fn puzzle_par_score_defaults() {
        let puzzle: Puzzle = serde_json::from_str(
            r#"{"id":1,"category":2,"position":3,"solution":"Big Apple","clue":"City"}"#,
        )
        .unwrap();
        assert_eq!(puzzle.par_score, DEFAULT_PAR_SCORE);
        assert_eq!(puzzle.category, CategoryId(2));
    }
}
