// Battle engine: fight scoring, outcome resolution, roster orchestration.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog;
use crate::error::{ArenaError, Result};
use crate::meal::{Difficulty, Meal};
use crate::roster::Roster;
use crate::stats;
use crate::store::MealStore;

// ============================================================================
// SCORING CONFIGURATION
// ============================================================================

/// Scoring constants. Tune these instead of editing the formula.
///
/// A meal's fight score is
/// `price_weight * price - difficulty_penalty * multiplier(difficulty)`,
/// clamped from below by `score_floor`. With the multipliers ordered
/// LOW < MED < HIGH the score is strictly increasing in price, strictly
/// decreasing in difficulty (until the floor), and always positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Fight capacity contributed per unit of price.
    pub price_weight: f64,
    /// Scales the whole difficulty penalty term; 0 turns difficulty off.
    pub difficulty_penalty: f64,
    /// Penalty multiplier for LOW difficulty (smallest: flawless execution is easy).
    pub low_multiplier: f64,
    /// Penalty multiplier for MED difficulty.
    pub med_multiplier: f64,
    /// Penalty multiplier for HIGH difficulty (largest).
    pub high_multiplier: f64,
    /// Lower clamp on any fight score; keeps win probabilities well-defined.
    pub score_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            price_weight: 1.0,
            difficulty_penalty: 2.0,
            low_multiplier: 1.0,
            med_multiplier: 2.0,
            high_multiplier: 3.0,
            score_floor: 0.1,
        }
    }
}

impl ScoringConfig {
    fn multiplier(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Low => self.low_multiplier,
            Difficulty::Med => self.med_multiplier,
            Difficulty::High => self.high_multiplier,
        }
    }

    /// Fight score for one meal. Always `>= score_floor`.
    pub fn fight_score(&self, meal: &Meal) -> f64 {
        let raw = self.price_weight * meal.price
            - self.difficulty_penalty * self.multiplier(meal.difficulty);
        raw.max(self.score_floor)
    }
}

// ============================================================================
// BATTLE OUTCOME
// ============================================================================

/// What one resolved battle produced. Transient: returned to the caller and
/// discarded, the statistics are the durable side effect.
#[derive(Debug, Clone, Serialize)]
pub struct BattleOutcome {
    pub winner: Meal,
    pub loser: Meal,
    pub winner_score: f64,
    pub loser_score: f64,
    /// Probability the winner carried into the draw.
    pub win_probability: f64,
    pub fought_at: DateTime<Utc>,
}

// ============================================================================
// BATTLE ARENA
// ============================================================================

/// Staged combatants plus the scoring rules; battles resolve against a store.
///
/// The arena is single-owner state. Callers sharing it across request
/// handlers wrap it (together with its store) in one mutex so that staging,
/// catalog writes, and resolution serialize; the loser of a battle race then
/// observes an empty roster and fails with `InsufficientCombatants`.
#[derive(Debug, Default)]
pub struct BattleArena {
    roster: Roster,
    config: ScoringConfig,
}

impl BattleArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        BattleArena {
            roster: Roster::new(),
            config,
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Fight score under this arena's configuration.
    pub fn fight_score(&self, meal: &Meal) -> f64 {
        self.config.fight_score(meal)
    }

    /// Stage a meal for the next battle. The id is validated against the
    /// catalog first, so a missing or deleted meal never occupies a slot.
    pub fn prep_combatant<S: MealStore>(&mut self, store: &S, id: i64) -> Result<Meal> {
        let meal = catalog::get_meal_by_id(store, id)?;
        self.roster.stage(meal.id)?;
        info!(id = meal.id, name = %meal.name, staged = self.roster.len(), "combatant staged");
        Ok(meal)
    }

    /// Snapshots of the staged combatants in staging order. Read-only; ids
    /// that stopped resolving (deleted after staging) are omitted.
    pub fn combatants<S: MealStore>(&self, store: &S) -> Result<Vec<Meal>> {
        let mut meals = Vec::with_capacity(self.roster.len());
        for &id in self.roster.ids() {
            if let Some(meal) = store.meal_by_id(id)? {
                if !meal.deleted {
                    meals.push(meal);
                }
            }
        }
        Ok(meals)
    }

    /// Empty the roster. Idempotent.
    pub fn clear_combatants(&mut self) {
        self.roster.clear();
    }

    /// Resolve the staged battle.
    ///
    /// Scores both combatants, derives the first combatant's win probability
    /// `s1 / (s1 + s2)`, draws one uniform `r` from the injected rng, and
    /// declares the first combatant the winner iff `r < p1`. On success both
    /// battle counters and the winner's win counter are recorded and the
    /// roster empties. Every check runs before the first mutation: a failure
    /// leaves ledger and roster exactly as they were (a deleted combatant is
    /// the one exception, its dead id is evicted from the roster).
    pub fn battle<S, R>(&mut self, store: &mut S, rng: &mut R) -> Result<BattleOutcome>
    where
        S: MealStore,
        R: Rng,
    {
        if !self.roster.is_ready() {
            return Err(ArenaError::InsufficientCombatants(self.roster.len()));
        }
        let first_id = self.roster.ids()[0];
        let second_id = self.roster.ids()[1];

        // Re-validate: a meal deleted after staging must not fight as a ghost.
        let first = self.fetch_combatant(store, first_id)?;
        let second = self.fetch_combatant(store, second_id)?;

        let first_score = self.config.fight_score(&first);
        let second_score = self.config.fight_score(&second);
        let first_probability = first_score / (first_score + second_score);

        let roll = rng.gen::<f64>();
        let first_wins = roll < first_probability;

        let (winner, loser, winner_score, loser_score, win_probability) = if first_wins {
            (first, second, first_score, second_score, first_probability)
        } else {
            (second, first, second_score, first_score, 1.0 - first_probability)
        };

        stats::record_result(store, winner.id, loser.id)?;
        self.roster.clear();

        info!(
            winner = %winner.name,
            loser = %loser.name,
            winner_score,
            loser_score,
            win_probability,
            "battle resolved"
        );

        Ok(BattleOutcome {
            winner,
            loser,
            winner_score,
            loser_score,
            win_probability,
            fought_at: Utc::now(),
        })
    }

    fn fetch_combatant<S: MealStore>(&mut self, store: &S, id: i64) -> Result<Meal> {
        match store.meal_by_id(id)? {
            Some(meal) if !meal.deleted => Ok(meal),
            _ => {
                self.roster.evict(id);
                Err(ArenaError::NotFound(format!(
                    "staged meal with id {} is no longer in the catalog",
                    id
                )))
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
