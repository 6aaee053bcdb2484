// Meal entity and the preparation difficulty scale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ArenaError, Result};

/// Preparation difficulty, ordered Low < Med < High.
///
/// Wire form is the uppercase token (`"LOW"`, `"MED"`, `"HIGH"`), which is
/// also what the database stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MED")]
    Med,
    #[serde(rename = "HIGH")]
    High,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Low => "LOW",
            Difficulty::Med => "MED",
            Difficulty::High => "HIGH",
        }
    }
}

impl FromStr for Difficulty {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "LOW" => Ok(Difficulty::Low),
            "MED" => Ok(Difficulty::Med),
            "HIGH" => Ok(Difficulty::High),
            other => Err(ArenaError::Validation(format!(
                "invalid difficulty level: {}. Must be 'LOW', 'MED', or 'HIGH'",
                other
            ))),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A meal in the catalog.
///
/// `id` is the stable identity; the rest is a value snapshot. Soft-deleted
/// meals keep their row (and battle history) but are invisible to name
/// lookups and the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub name: String,
    pub cuisine: String,
    pub price: f64,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Attributes of a meal about to be inserted. The catalog validates these
/// before they reach a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMeal {
    pub name: String,
    pub cuisine: String,
    pub price: f64,
    pub difficulty: Difficulty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse_roundtrip() {
        for token in ["LOW", "MED", "HIGH"] {
            let difficulty: Difficulty = token.parse().unwrap();
            assert_eq!(difficulty.as_str(), token);
        }
    }

    #[test]
    fn test_difficulty_rejects_unknown_token() {
        let err = "EXTREME".parse::<Difficulty>().unwrap_err();
        assert!(matches!(err, ArenaError::Validation(_)));
    }

    #[test]
    fn test_difficulty_ordering() {
        assert!(Difficulty::Low < Difficulty::Med);
        assert!(Difficulty::Med < Difficulty::High);
    }

    #[test]
    fn test_difficulty_serde_uses_uppercase_tokens() {
        assert_eq!(serde_json::to_string(&Difficulty::Med).unwrap(), "\"MED\"");
        let parsed: Difficulty = serde_json::from_str("\"HIGH\"").unwrap();
        assert_eq!(parsed, Difficulty::High);
    }
}
