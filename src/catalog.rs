// Catalog operations: meal lifecycle over a store.

use tracing::{info, warn};

use crate::error::{ArenaError, Result};
use crate::meal::{Difficulty, Meal, NewMeal};
use crate::store::MealStore;

/// Validate and insert a new meal.
///
/// Rejects an empty name, a non-positive (or non-finite) price, and a name
/// already carried by a non-deleted meal (case-sensitive exact match). All
/// checks run before the insert.
pub fn create_meal<S: MealStore>(
    store: &mut S,
    name: &str,
    cuisine: &str,
    price: f64,
    difficulty: Difficulty,
) -> Result<Meal> {
    if name.is_empty() {
        return Err(ArenaError::Validation(
            "meal name must not be empty".to_string(),
        ));
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(ArenaError::Validation(format!(
            "invalid price: {}. Price must be a positive number",
            price
        )));
    }
    if store.meal_by_name(name)?.is_some() {
        warn!(name, "rejected duplicate meal name");
        return Err(ArenaError::Validation(format!(
            "meal with name '{}' already exists",
            name
        )));
    }

    let meal = store.insert_meal(&NewMeal {
        name: name.to_string(),
        cuisine: cuisine.to_string(),
        price,
        difficulty,
    })?;

    info!(id = meal.id, name = %meal.name, "meal created");
    Ok(meal)
}

/// Soft-delete a meal. Its battle history stays on the row.
pub fn delete_meal<S: MealStore>(store: &mut S, id: i64) -> Result<()> {
    match store.meal_by_id(id)? {
        None => Err(ArenaError::NotFound(format!("meal with id {}", id))),
        Some(meal) if meal.deleted => Err(ArenaError::NotFound(format!(
            "meal with id {} has been deleted",
            id
        ))),
        Some(_) => {
            store.mark_deleted(id)?;
            info!(id, "meal deleted");
            Ok(())
        }
    }
}

/// Immutable snapshot by id; soft-deleted meals count as absent.
pub fn get_meal_by_id<S: MealStore>(store: &S, id: i64) -> Result<Meal> {
    match store.meal_by_id(id)? {
        Some(meal) if !meal.deleted => Ok(meal),
        Some(_) => Err(ArenaError::NotFound(format!(
            "meal with id {} has been deleted",
            id
        ))),
        None => Err(ArenaError::NotFound(format!("meal with id {}", id))),
    }
}

/// Immutable snapshot by exact name.
pub fn get_meal_by_name<S: MealStore>(store: &S, name: &str) -> Result<Meal> {
    store
        .meal_by_name(name)?
        .ok_or_else(|| ArenaError::NotFound(format!("meal with name '{}'", name)))
}

/// Remove every meal and reset identities. Test/reset workflows only.
pub fn clear_meals<S: MealStore>(store: &mut S) -> Result<()> {
    store.clear_all()?;
    info!("meal catalog cleared");
    Ok(())
}
