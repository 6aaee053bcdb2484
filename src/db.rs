// Sqlite-backed meal store.
//
// Battle counters live as columns on the meals row, so a meal's stats share
// the lifetime of its record: soft-deleting a meal orphans its history in
// place and the leaderboard's catalog-active filter keeps it out of view.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{ArenaError, Result};
use crate::meal::{Difficulty, Meal, NewMeal};
use crate::stats::StatRecord;
use crate::store::MealStore;

/// Create the meals table and indexes. Idempotent.
pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery (no-op on in-memory databases)
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            cuisine TEXT NOT NULL,
            price REAL NOT NULL,
            difficulty TEXT NOT NULL,
            battles INTEGER NOT NULL DEFAULT 0,
            wins INTEGER NOT NULL DEFAULT 0,
            deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meals_name ON meals(name)",
        [],
    )?;

    Ok(())
}

/// Durable [`MealStore`] over a rusqlite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// Private in-memory database, one per call. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn row_to_meal(row: &rusqlite::Row<'_>) -> rusqlite::Result<Meal> {
    let difficulty: String = row.get(4)?;
    let created_at: String = row.get(6)?;

    Ok(Meal {
        id: row.get(0)?,
        name: row.get(1)?,
        cuisine: row.get(2)?,
        price: row.get(3)?,
        difficulty: difficulty
            .parse::<Difficulty>()
            .map_err(|_| rusqlite::Error::InvalidQuery)?,
        deleted: row.get::<_, i64>(5)? != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|_| rusqlite::Error::InvalidQuery)?
            .with_timezone(&Utc),
    })
}

impl MealStore for SqliteStore {
    fn insert_meal(&mut self, new: &NewMeal) -> Result<Meal> {
        let created_at = Utc::now();

        self.conn.execute(
            "INSERT INTO meals (name, cuisine, price, difficulty, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.name,
                new.cuisine,
                new.price,
                new.difficulty.as_str(),
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(Meal {
            id: self.conn.last_insert_rowid(),
            name: new.name.clone(),
            cuisine: new.cuisine.clone(),
            price: new.price,
            difficulty: new.difficulty,
            deleted: false,
            created_at,
        })
    }

    fn meal_by_id(&self, id: i64) -> Result<Option<Meal>> {
        let meal = self
            .conn
            .query_row(
                "SELECT id, name, cuisine, price, difficulty, deleted, created_at
                 FROM meals WHERE id = ?1",
                params![id],
                row_to_meal,
            )
            .optional()?;

        Ok(meal)
    }

    fn meal_by_name(&self, name: &str) -> Result<Option<Meal>> {
        let meal = self
            .conn
            .query_row(
                "SELECT id, name, cuisine, price, difficulty, deleted, created_at
                 FROM meals WHERE name = ?1 AND deleted = 0",
                params![name],
                row_to_meal,
            )
            .optional()?;

        Ok(meal)
    }

    fn all_meals(&self) -> Result<Vec<Meal>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, cuisine, price, difficulty, deleted, created_at
             FROM meals WHERE deleted = 0 ORDER BY id",
        )?;

        let meals = stmt
            .query_map([], row_to_meal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    fn mark_deleted(&mut self, id: i64) -> Result<()> {
        let updated = self
            .conn
            .execute("UPDATE meals SET deleted = 1 WHERE id = ?1", params![id])?;

        if updated == 0 {
            return Err(ArenaError::NotFound(format!("meal with id {}", id)));
        }
        Ok(())
    }

    fn stats(&self, id: i64) -> Result<StatRecord> {
        let record = self
            .conn
            .query_row(
                "SELECT battles, wins FROM meals WHERE id = ?1",
                params![id],
                |row| {
                    Ok(StatRecord {
                        battles: row.get(0)?,
                        wins: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(record.unwrap_or_default())
    }

    fn update_stats(&mut self, id: i64, stats: &StatRecord) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE meals SET battles = ?1, wins = ?2 WHERE id = ?3",
            params![stats.battles, stats.wins, id],
        )?;

        if updated == 0 {
            return Err(ArenaError::NotFound(format!("meal with id {}", id)));
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.conn.execute("DELETE FROM meals", [])?;
        // Restart identity numbering; the sequence table only exists once an
        // AUTOINCREMENT insert has happened.
        let _ = self
            .conn
            .execute("DELETE FROM sqlite_sequence WHERE name = 'meals'", []);
        Ok(())
    }
}
