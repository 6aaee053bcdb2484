// Storage seam: the narrow repository interface the core depends on.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::error::{ArenaError, Result};
use crate::meal::{Meal, NewMeal};
use crate::stats::StatRecord;

/// Persistence collaborator for meals and their battle statistics.
///
/// The core talks to storage only through this trait. [`crate::db::SqliteStore`]
/// is the durable implementation; [`MemoryStore`] backs unit tests and
/// throwaway runs. Inputs are validated by the catalog before they get here.
pub trait MealStore {
    /// Insert a pre-validated meal and assign its identity.
    fn insert_meal(&mut self, new: &NewMeal) -> Result<Meal>;

    /// Fetch by id, including soft-deleted rows (callers check the flag).
    fn meal_by_id(&self, id: i64) -> Result<Option<Meal>>;

    /// Fetch by exact name among non-deleted meals.
    fn meal_by_name(&self, name: &str) -> Result<Option<Meal>>;

    /// All non-deleted meals, in insertion order.
    fn all_meals(&self) -> Result<Vec<Meal>>;

    /// Set the soft-delete flag. `NotFound` if no such row exists.
    fn mark_deleted(&mut self, id: i64) -> Result<()>;

    /// Battle statistics for a meal; zero-valued if it never fought.
    fn stats(&self, id: i64) -> Result<StatRecord>;

    /// Overwrite a meal's statistics. `NotFound` if no such row exists.
    fn update_stats(&mut self, id: i64, stats: &StatRecord) -> Result<()>;

    /// Drop every meal and statistic. Reset/test workflows only.
    fn clear_all(&mut self) -> Result<()>;
}

/// In-memory store. A fresh instance per test gives full isolation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    meals: BTreeMap<i64, Meal>,
    stats: BTreeMap<i64, StatRecord>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MealStore for MemoryStore {
    fn insert_meal(&mut self, new: &NewMeal) -> Result<Meal> {
        self.next_id += 1;
        let meal = Meal {
            id: self.next_id,
            name: new.name.clone(),
            cuisine: new.cuisine.clone(),
            price: new.price,
            difficulty: new.difficulty,
            deleted: false,
            created_at: Utc::now(),
        };
        self.meals.insert(meal.id, meal.clone());
        Ok(meal)
    }

    fn meal_by_id(&self, id: i64) -> Result<Option<Meal>> {
        Ok(self.meals.get(&id).cloned())
    }

    fn meal_by_name(&self, name: &str) -> Result<Option<Meal>> {
        Ok(self
            .meals
            .values()
            .find(|meal| !meal.deleted && meal.name == name)
            .cloned())
    }

    fn all_meals(&self) -> Result<Vec<Meal>> {
        Ok(self
            .meals
            .values()
            .filter(|meal| !meal.deleted)
            .cloned()
            .collect())
    }

    fn mark_deleted(&mut self, id: i64) -> Result<()> {
        match self.meals.get_mut(&id) {
            Some(meal) => {
                meal.deleted = true;
                Ok(())
            }
            None => Err(ArenaError::NotFound(format!("meal with id {}", id))),
        }
    }

    fn stats(&self, id: i64) -> Result<StatRecord> {
        Ok(self.stats.get(&id).copied().unwrap_or_default())
    }

    fn update_stats(&mut self, id: i64, stats: &StatRecord) -> Result<()> {
        if !self.meals.contains_key(&id) {
            return Err(ArenaError::NotFound(format!("meal with id {}", id)));
        }
        self.stats.insert(id, *stats);
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.meals.clear();
        self.stats.clear();
        self.next_id = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meal::Difficulty;

    fn new_meal(name: &str) -> NewMeal {
        NewMeal {
            name: name.to_string(),
            cuisine: "Test".to_string(),
            price: 10.0,
            difficulty: Difficulty::Med,
        }
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let mut store = MemoryStore::new();
        let first = store.insert_meal(&new_meal("A")).unwrap();
        let second = store.insert_meal(&new_meal("B")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let mut store = MemoryStore::new();
        let meal = store.insert_meal(&new_meal("Tacos")).unwrap();

        assert_eq!(store.meal_by_id(meal.id).unwrap().unwrap().name, "Tacos");
        assert_eq!(store.meal_by_name("Tacos").unwrap().unwrap().id, meal.id);
        assert!(store.meal_by_name("Sushi").unwrap().is_none());
    }

    #[test]
    fn test_soft_delete_hides_from_name_lookup_but_not_id() {
        let mut store = MemoryStore::new();
        let meal = store.insert_meal(&new_meal("Tacos")).unwrap();
        store.mark_deleted(meal.id).unwrap();

        assert!(store.meal_by_name("Tacos").unwrap().is_none());
        assert!(store.all_meals().unwrap().is_empty());
        // the row survives with its flag set
        assert!(store.meal_by_id(meal.id).unwrap().unwrap().deleted);
    }

    #[test]
    fn test_stats_default_to_zero_and_update_persists() {
        let mut store = MemoryStore::new();
        let meal = store.insert_meal(&new_meal("Tacos")).unwrap();

        assert_eq!(store.stats(meal.id).unwrap(), StatRecord::default());

        let record = StatRecord { battles: 2, wins: 1 };
        store.update_stats(meal.id, &record).unwrap();
        assert_eq!(store.stats(meal.id).unwrap(), record);
    }

    #[test]
    fn test_update_stats_unknown_id_fails() {
        let mut store = MemoryStore::new();
        let err = store.update_stats(7, &StatRecord::default()).unwrap_err();
        assert!(matches!(err, ArenaError::NotFound(_)));
    }

    #[test]
    fn test_clear_all_resets_everything() {
        let mut store = MemoryStore::new();
        let meal = store.insert_meal(&new_meal("Tacos")).unwrap();
        store
            .update_stats(meal.id, &StatRecord { battles: 1, wins: 1 })
            .unwrap();

        store.clear_all().unwrap();
        assert!(store.all_meals().unwrap().is_empty());
        assert!(store.meal_by_id(meal.id).unwrap().is_none());
        assert_eq!(store.stats(meal.id).unwrap(), StatRecord::default());
    }
}
