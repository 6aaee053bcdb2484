// Meal Arena - Core Library
// Exposes all modules for use in the CLI, API server, and tests

pub mod battle;
pub mod catalog;
pub mod db;
pub mod error;
pub mod leaderboard;
pub mod meal;
pub mod roster;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use battle::{BattleArena, BattleOutcome, ScoringConfig};
pub use catalog::{clear_meals, create_meal, delete_meal, get_meal_by_id, get_meal_by_name};
pub use db::{setup_database, SqliteStore};
pub use error::{ArenaError, Result};
pub use leaderboard::{rank, LeaderboardEntry, SortKey};
pub use meal::{Difficulty, Meal, NewMeal};
pub use roster::{Roster, ROSTER_CAPACITY};
pub use stats::{record_result, StatRecord};
pub use store::{MealStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
