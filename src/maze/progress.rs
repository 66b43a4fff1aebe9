//! Durable cross-session progress for the maze game.
//!
//! A handful of flat keys in the storage port, written after every
//! mutation that matters and read back leniently at startup. Nothing
//! here ever fails loudly: unreadable values fall back to defaults so
//! a half-written store degrades to a fresh run, not a crash.

use crate::maze::gate::GateSet;
use crate::maze::layout::GridPos;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Storage key for the level counter.
pub const KEY_LEVEL: &str = "maze.level";
/// Storage key for the score.
pub const KEY_SCORE: &str = "maze.score";
/// Storage key for remaining lives.
pub const KEY_LIVES: &str = "maze.lives";
/// Storage key for the serialized gate-unlock map.
pub const KEY_GATES: &str = "maze.gates";
/// Storage key for the solved-gate counter.
///
/// Written for readers of the raw store file; load recomputes the
/// count from the unlock map instead of trusting this value.
pub const KEY_GATES_SOLVED: &str = "maze.gates_solved";

/// Lives at the start of a fresh run, and the cap.
pub const MAX_LIVES: u8 = 3;

/// One gate's persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredGate {
    /// Gate cell x coordinate.
    pub x: u16,
    /// Gate cell y coordinate.
    pub y: u16,
    /// Whether the gate was already solved.
    pub unlocked: bool,
}

/// The durable snapshot of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressRecord {
    /// Current level, 1-based.
    pub level: u32,
    /// Accumulated score.
    pub score: u32,
    /// Remaining lives, `0..=MAX_LIVES`.
    pub lives: u8,
    /// Unlock state of the current level's gates.
    pub gates: Vec<StoredGate>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        Self {
            level: 1,
            score: 0,
            lives: MAX_LIVES,
            gates: Vec::new(),
        }
    }
}

impl ProgressRecord {
    /// Snapshot the live session state for persisting.
    #[must_use]
    pub fn from_session(level: u32, score: u32, lives: u8, gates: &GateSet) -> Self {
        let gates = gates
            .iter()
            .map(|gate| StoredGate {
                x: gate.pos.x,
                y: gate.pos.y,
                unlocked: gate.unlocked,
            })
            .collect();
        Self {
            level,
            score,
            lives,
            gates,
        }
    }

    /// Positions of gates recorded as unlocked.
    #[must_use]
    pub fn unlocked_positions(&self) -> HashSet<GridPos> {
        self.gates
            .iter()
            .filter(|gate| gate.unlocked)
            .map(|gate| GridPos::new(gate.x, gate.y))
            .collect()
    }

    /// Solved-gate count, derived from the unlock map.
    #[must_use]
    pub fn solved(&self) -> usize {
        self.gates.iter().filter(|gate| gate.unlocked).count()
    }

    /// Write the record through the storage port.
    ///
    /// Best-effort like all storage writes; the solved counter is
    /// written derived, never tracked separately.
    pub fn save<S: KeyValueStore>(&self, store: &mut S) {
        store.set(KEY_LEVEL, &self.level.to_string());
        store.set(KEY_SCORE, &self.score.to_string());
        store.set(KEY_LIVES, &self.lives.to_string());
        match serde_json::to_string(&self.gates) {
            Ok(json) => store.set(KEY_GATES, &json),
            Err(err) => warn!(%err, "gate map serialization failed, not persisted"),
        }
        store.set(KEY_GATES_SOLVED, &self.solved().to_string());
    }

    /// Read the record back, falling back field by field.
    ///
    /// Missing or malformed values become their defaults; a malformed
    /// gate map becomes empty. A stored solved counter that disagrees
    /// with the map is logged and discarded.
    #[must_use]
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        let defaults = Self::default();
        let level = read_number(store, KEY_LEVEL, defaults.level).max(1);
        let score = read_number(store, KEY_SCORE, defaults.score);
        let lives = read_number(store, KEY_LIVES, defaults.lives).min(MAX_LIVES);
        let gates = match store.get(KEY_GATES) {
            None => Vec::new(),
            Some(json) => match serde_json::from_str(&json) {
                Ok(gates) => gates,
                Err(err) => {
                    warn!(%err, "gate map corrupt, treating all gates as locked");
                    Vec::new()
                }
            },
        };

        let record = Self {
            level,
            score,
            lives,
            gates,
        };
        if let Some(stored) = store.get(KEY_GATES_SOLVED)
            && stored.parse::<usize>() != Ok(record.solved())
        {
            debug!(
                %stored,
                derived = record.solved(),
                "stored solved counter disagrees with unlock map"
            );
        }
        record
    }

    /// Remove every persisted key for this game.
    pub fn clear<S: KeyValueStore>(store: &mut S) {
        store.remove(KEY_LEVEL);
        store.remove(KEY_SCORE);
        store.remove(KEY_LIVES);
        clear_gates(store);
    }
}

/// Remove only the gate-unlock keys.
///
/// A regenerated maze keeps level, score, and lives but starts its
/// gates from scratch.
pub fn clear_gates<S: KeyValueStore>(store: &mut S) {
    store.remove(KEY_GATES);
    store.remove(KEY_GATES_SOLVED);
}

fn read_number<S, N>(store: &S, key: &str, default: N) -> N
where
    S: KeyValueStore,
    N: std::str::FromStr + Copy,
{
    match store.get(key) {
        None => default,
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, %raw, "unreadable stored number, using default");
                default
            }
        },
    }
}
