//! Per-word guess classification
//!
//! Each guessed word is classified against the solution word at the same index.
//! On the wire the classification is a small integer:
//! - 0 = Correct
//! - 1 = Wrong location (guess is a fragment of the solution word)
//! - 2 = Wrong

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Accuracy of one guessed word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordAccuracy {
    Correct,
    WrongLocation,
    Wrong,
}

impl WordAccuracy {
    /// Wire code of this classification
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Correct => 0,
            Self::WrongLocation => 1,
            Self::Wrong => 2,
        }
    }

    /// Parse a wire code
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Correct),
            1 => Some(Self::WrongLocation),
            2 => Some(Self::Wrong),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }
}

impl fmt::Display for WordAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Correct => write!(f, "correct"),
            Self::WrongLocation => write!(f, "wrong location"),
            Self::Wrong => write!(f, "wrong"),
        }
    }
}

impl Serialize for WordAccuracy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for WordAccuracy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Self::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid word accuracy code {code}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(WordAccuracy::Correct.code(), 0);
        assert_eq!(WordAccuracy::WrongLocation.code(), 1);
        assert_eq!(WordAccuracy::Wrong.code(), 2);
        assert_eq!(WordAccuracy::from_code(3), None);
    }

    #[test]
    fn serializes_as_integer() {
        let json = serde_json::to_string(&[
            WordAccuracy::Correct,
            WordAccuracy::WrongLocation,
            WordAccuracy::Wrong,
        ])
        .unwrap();
        assert_eq!(json, "[0,1,2]");
    }

    #[test]
    fn rejects_unknown_code() {
        let parsed: Result<WordAccuracy, _> = serde_json::from_str("7");
        assert!(parsed.is_err());
        let parsed: WordAccuracy = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, WordAccuracy::WrongLocation);
    }
}
