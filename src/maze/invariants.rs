//! Session invariants - sanity checks that detect bugs.
//!
//! These should never trigger during correct play; they exist so the
//! randomized suites can verify the session stays coherent under
//! arbitrary input orderings. Checks run against the public snapshot,
//! which exposes everything the invariants talk about.

use crate::maze::game::{CellView, MazeSnapshot};
use crate::maze::progress::MAX_LIVES;

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all session invariants.
///
/// Returns a list of violations found, or empty if all invariants
/// hold.
#[must_use]
pub fn check_invariants(snapshot: &MazeSnapshot) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut push = |message: String| violations.push(InvariantViolation { message });

    let expected_cells = usize::from(snapshot.width) * usize::from(snapshot.height);
    if snapshot.cells.len() != expected_cells {
        push(format!(
            "grid has {} cells, dimensions say {expected_cells}",
            snapshot.cells.len()
        ));
        return violations;
    }

    if snapshot.player.x >= snapshot.width || snapshot.player.y >= snapshot.height {
        push(format!("player at {} is outside the grid", snapshot.player));
        return violations;
    }

    match snapshot.cell(snapshot.player.x, snapshot.player.y) {
        CellView::Wall => push(format!("player stands on a wall at {}", snapshot.player)),
        CellView::GateLocked => push(format!(
            "player stands on a locked gate at {}",
            snapshot.player
        )),
        _ => {}
    }

    let gate_cells = snapshot
        .cells
        .iter()
        .filter(|cell| matches!(cell, CellView::GateLocked | CellView::GateOpen))
        .count();
    if gate_cells != snapshot.total_gates {
        push(format!(
            "gate registry tracks {} gates, grid shows {gate_cells}",
            snapshot.total_gates
        ));
    }
    let open_cells = snapshot
        .cells
        .iter()
        .filter(|cell| **cell == CellView::GateOpen)
        .count();
    if open_cells != snapshot.solved {
        push(format!(
            "solved count {} disagrees with {open_cells} open gate cells",
            snapshot.solved
        ));
    }
    if snapshot.solved > snapshot.total_gates {
        push(format!(
            "solved count {} exceeds total gates {}",
            snapshot.solved, snapshot.total_gates
        ));
    }

    if snapshot.lives > MAX_LIVES {
        push(format!(
            "lives {} exceed the cap {MAX_LIVES}",
            snapshot.lives
        ));
    }

    if let Some(challenge) = &snapshot.challenge {
        if !snapshot.game_active {
            push("challenge open while the session is inactive".to_owned());
        }
        if challenge.gate.x >= snapshot.width || challenge.gate.y >= snapshot.height {
            push(format!(
                "challenge gate {} is outside the grid",
                challenge.gate
            ));
        } else if snapshot.cell(challenge.gate.x, challenge.gate.y) != CellView::GateLocked {
            push(format!(
                "challenge gate {} is not a locked gate cell",
                challenge.gate
            ));
        }
        if challenge.entered > challenge.sequence_length {
            push(format!(
                "challenge input {} outgrew its sequence length {}",
                challenge.entered, challenge.sequence_length
            ));
        }
    }

    if snapshot.awaiting_next_level && snapshot.game_active {
        push("session active while awaiting next-level confirmation".to_owned());
    }

    violations
}

/// Assert all session invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with a detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(snapshot: &MazeSnapshot) {
    let violations = check_invariants(snapshot);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Session invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_snapshot: &MazeSnapshot) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::game::{GameConfig, MazeGame};
    use crate::maze::layout::GridPos;
    use crate::storage::MemoryStore;

    fn valid_snapshot() -> MazeSnapshot {
        let mut game = MazeGame::new(MemoryStore::new(), GameConfig::default()).unwrap();
        game.init();
        game.snapshot()
    }

    #[test]
    fn test_fresh_session_passes() {
        let violations = check_invariants(&valid_snapshot());
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_player_on_wall_detected() {
        let mut snapshot = valid_snapshot();
        snapshot.player = GridPos::new(0, 0);
        let violations = check_invariants(&snapshot);
        assert!(!violations.is_empty());
        assert!(violations[0].message.contains("wall"));
    }

    #[test]
    fn test_player_outside_grid_detected() {
        let mut snapshot = valid_snapshot();
        snapshot.player = GridPos::new(40, 2);
        let violations = check_invariants(&snapshot);
        assert!(violations[0].message.contains("outside"));
    }

    #[test]
    fn test_solved_count_drift_detected() {
        let mut snapshot = valid_snapshot();
        snapshot.solved = 2;
        let violations = check_invariants(&snapshot);
        assert!(!violations.is_empty());
        assert!(violations[0].message.contains("solved count"));
    }

    #[test]
    fn test_lives_above_cap_detected() {
        let mut snapshot = valid_snapshot();
        snapshot.lives = 7;
        let violations = check_invariants(&snapshot);
        assert!(violations[0].message.contains("lives"));
    }

    #[test]
    fn test_modal_state_conflict_detected() {
        let mut snapshot = valid_snapshot();
        snapshot.awaiting_next_level = true;
        let violations = check_invariants(&snapshot);
        assert!(violations[0].message.contains("awaiting"));
    }
}
