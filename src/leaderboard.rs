// Leaderboard: ranked read-only view over catalog and ledger.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{ArenaError, Result};
use crate::meal::Meal;
use crate::stats::StatRecord;
use crate::store::MealStore;

/// Ranking key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Wins,
    WinRatio,
    BattlesFought,
}

impl FromStr for SortKey {
    type Err = ArenaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "wins" => Ok(SortKey::Wins),
            "win_ratio" => Ok(SortKey::WinRatio),
            "battles_fought" => Ok(SortKey::BattlesFought),
            other => Err(ArenaError::Validation(format!(
                "invalid sort key: {}. Must be 'wins', 'win_ratio', or 'battles_fought'",
                other
            ))),
        }
    }
}

/// One ranked row: catalog snapshot plus its battle record.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub meal: Meal,
    pub stats: StatRecord,
    pub win_ratio: f64,
}

/// Rank every non-deleted meal that fought at least once, descending by
/// `key`. Ties break on higher wins, then name ascending, which makes the
/// order a strict total order. No side effects.
pub fn rank<S: MealStore>(store: &S, key: SortKey) -> Result<Vec<LeaderboardEntry>> {
    let mut entries = Vec::new();
    for meal in store.all_meals()? {
        let stats = store.stats(meal.id)?;
        if stats.battles == 0 {
            continue;
        }
        let win_ratio = stats.win_ratio();
        entries.push(LeaderboardEntry {
            meal,
            stats,
            win_ratio,
        });
    }

    entries.sort_by(|a, b| {
        key_order(b, a, key)
            .then_with(|| b.stats.wins.cmp(&a.stats.wins))
            .then_with(|| a.meal.name.cmp(&b.meal.name))
    });

    Ok(entries)
}

fn key_order(a: &LeaderboardEntry, b: &LeaderboardEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::Wins => a.stats.wins.cmp(&b.stats.wins),
        SortKey::BattlesFought => a.stats.battles.cmp(&b.stats.battles),
        // ratios are finite, so the partial order is total here
        SortKey::WinRatio => a
            .win_ratio
            .partial_cmp(&b.win_ratio)
            .unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{create_meal, delete_meal};
    use crate::meal::Difficulty;
    use crate::store::MemoryStore;

    /// Catalog with hand-set records:
    /// Alpha 2/2, Bravo 3/6, Caesar 1/1, Dormant 0/0.
    fn fixture() -> (MemoryStore, i64, i64, i64, i64) {
        let mut store = MemoryStore::new();
        let alpha = create_meal(&mut store, "Alpha", "Test", 10.0, Difficulty::Low).unwrap();
        let bravo = create_meal(&mut store, "Bravo", "Test", 11.0, Difficulty::Med).unwrap();
        let caesar = create_meal(&mut store, "Caesar", "Test", 12.0, Difficulty::High).unwrap();
        let dormant = create_meal(&mut store, "Dormant", "Test", 13.0, Difficulty::Low).unwrap();

        store
            .update_stats(alpha.id, &StatRecord { battles: 2, wins: 2 })
            .unwrap();
        store
            .update_stats(bravo.id, &StatRecord { battles: 6, wins: 3 })
            .unwrap();
        store
            .update_stats(caesar.id, &StatRecord { battles: 1, wins: 1 })
            .unwrap();

        (store, alpha.id, bravo.id, caesar.id, dormant.id)
    }

    fn names(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.meal.name.as_str()).collect()
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("wins".parse::<SortKey>().unwrap(), SortKey::Wins);
        assert_eq!("win_ratio".parse::<SortKey>().unwrap(), SortKey::WinRatio);
        assert_eq!(
            "battles_fought".parse::<SortKey>().unwrap(),
            SortKey::BattlesFought
        );
        assert!(matches!(
            "win_pct".parse::<SortKey>().unwrap_err(),
            ArenaError::Validation(_)
        ));
    }

    #[test]
    fn test_meals_without_battles_are_excluded() {
        let (store, .., dormant) = fixture();
        let entries = rank(&store, SortKey::Wins).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.meal.id != dormant));
    }

    #[test]
    fn test_rank_by_wins() {
        let (store, ..) = fixture();
        let entries = rank(&store, SortKey::Wins).unwrap();
        assert_eq!(names(&entries), ["Bravo", "Alpha", "Caesar"]);
    }

    #[test]
    fn test_rank_by_battles_fought() {
        let (store, ..) = fixture();
        let entries = rank(&store, SortKey::BattlesFought).unwrap();
        assert_eq!(names(&entries), ["Bravo", "Alpha", "Caesar"]);
    }

    #[test]
    fn test_rank_by_win_ratio_breaks_tie_on_wins() {
        let (store, ..) = fixture();
        // Alpha and Caesar both sit at ratio 1.0; Alpha has more wins
        let entries = rank(&store, SortKey::WinRatio).unwrap();
        assert_eq!(names(&entries), ["Alpha", "Caesar", "Bravo"]);
    }

    #[test]
    fn test_full_tie_falls_back_to_name_order() {
        let mut store = MemoryStore::new();
        let zulu = create_meal(&mut store, "Zulu", "Test", 10.0, Difficulty::Low).unwrap();
        let echo = create_meal(&mut store, "Echo", "Test", 10.0, Difficulty::Low).unwrap();
        let record = StatRecord { battles: 4, wins: 2 };
        store.update_stats(zulu.id, &record).unwrap();
        store.update_stats(echo.id, &record).unwrap();

        for key in [SortKey::Wins, SortKey::WinRatio, SortKey::BattlesFought] {
            let entries = rank(&store, key).unwrap();
            assert_eq!(names(&entries), ["Echo", "Zulu"]);
        }
    }

    #[test]
    fn test_deleted_meals_drop_off_the_board() {
        let (mut store, alpha, ..) = fixture();
        delete_meal(&mut store, alpha).unwrap();

        let entries = rank(&store, SortKey::Wins).unwrap();
        assert_eq!(names(&entries), ["Bravo", "Caesar"]);
    }
}
