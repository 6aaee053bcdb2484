// Stat ledger: per-meal battle counters.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ArenaError, Result};
use crate::store::MealStore;

/// Cumulative battle counters for one meal.
///
/// Invariant: `wins <= battles`. A meal that never fought has the
/// zero-valued record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRecord {
    pub battles: u32,
    pub wins: u32,
}

impl StatRecord {
    /// Wins over battles fought; 0.0 for a meal that never fought.
    pub fn win_ratio(&self) -> f64 {
        if self.battles == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.battles)
        }
    }
}

/// Apply one battle result to the ledger: both combatants fought once, the
/// winner won. Both ids are checked against the catalog before the first
/// write, so a failure leaves the ledger untouched.
pub fn record_result<S: MealStore>(store: &mut S, winner_id: i64, loser_id: i64) -> Result<()> {
    if winner_id == loser_id {
        return Err(ArenaError::Validation(format!(
            "winner and loser are the same meal (id {})",
            winner_id
        )));
    }
    if store.meal_by_id(winner_id)?.is_none() {
        return Err(ArenaError::NotFound(format!("meal with id {}", winner_id)));
    }
    if store.meal_by_id(loser_id)?.is_none() {
        return Err(ArenaError::NotFound(format!("meal with id {}", loser_id)));
    }

    let mut winner = store.stats(winner_id)?;
    winner.battles += 1;
    winner.wins += 1;

    let mut loser = store.stats(loser_id)?;
    loser.battles += 1;

    store.update_stats(winner_id, &winner)?;
    store.update_stats(loser_id, &loser)?;

    debug!(winner_id, loser_id, "battle result recorded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::create_meal;
    use crate::meal::Difficulty;
    use crate::store::MemoryStore;

    fn store_with_pair() -> (MemoryStore, i64, i64) {
        let mut store = MemoryStore::new();
        let a = create_meal(&mut store, "Tacos", "Mexican", 9.5, Difficulty::Low).unwrap();
        let b = create_meal(&mut store, "Ramen", "Japanese", 14.0, Difficulty::Med).unwrap();
        (store, a.id, b.id)
    }

    #[test]
    fn test_win_ratio_is_zero_without_battles() {
        assert_eq!(StatRecord::default().win_ratio(), 0.0);
    }

    #[test]
    fn test_win_ratio_stays_in_unit_interval() {
        let record = StatRecord { battles: 4, wins: 3 };
        assert_eq!(record.win_ratio(), 0.75);
        assert!(record.win_ratio() >= 0.0 && record.win_ratio() <= 1.0);
    }

    #[test]
    fn test_record_result_increments_both_counters() {
        let (mut store, a, b) = store_with_pair();

        record_result(&mut store, a, b).unwrap();
        record_result(&mut store, b, a).unwrap();
        record_result(&mut store, a, b).unwrap();

        assert_eq!(store.stats(a).unwrap(), StatRecord { battles: 3, wins: 2 });
        assert_eq!(store.stats(b).unwrap(), StatRecord { battles: 3, wins: 1 });
    }

    #[test]
    fn test_record_result_rejects_unknown_ids() {
        let (mut store, a, _) = store_with_pair();

        let err = record_result(&mut store, a, 999).unwrap_err();
        assert!(matches!(err, ArenaError::NotFound(_)));
        // validate-then-commit: the winner's counters stayed untouched
        assert_eq!(store.stats(a).unwrap(), StatRecord::default());
    }

    #[test]
    fn test_record_result_rejects_self_battle() {
        let (mut store, a, _) = store_with_pair();
        let err = record_result(&mut store, a, a).unwrap_err();
        assert!(matches!(err, ArenaError::Validation(_)));
    }
}
