// Combatant roster: bounded staging area for the next battle.

use crate::error::{ArenaError, Result};

/// Exactly this many combatants fight a battle.
pub const ROSTER_CAPACITY: usize = 2;

/// Ordered meal ids staged for the next battle.
///
/// The roster holds bare ids, never entities: the arena re-validates each id
/// against the catalog before anything irreversible happens.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    slots: Vec<i64>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a meal id. `RosterFull` when two are already staged, `Duplicate`
    /// when the id already occupies a slot.
    pub fn stage(&mut self, id: i64) -> Result<()> {
        if self.slots.len() >= ROSTER_CAPACITY {
            return Err(ArenaError::RosterFull);
        }
        if self.slots.contains(&id) {
            return Err(ArenaError::Duplicate(format!("meal with id {}", id)));
        }
        self.slots.push(id);
        Ok(())
    }

    pub fn ids(&self) -> &[i64] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Both slots filled: a battle may run.
    pub fn is_ready(&self) -> bool {
        self.slots.len() == ROSTER_CAPACITY
    }

    /// Drop a staged id (a combatant that left the catalog). Returns whether
    /// anything was removed.
    pub fn evict(&mut self, id: i64) -> bool {
        let before = self.slots.len();
        self.slots.retain(|&staged| staged != id);
        self.slots.len() != before
    }

    /// Empty the roster. Idempotent.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
