//! Gates and per-level gate bookkeeping.

use crate::maze::layout::{GridPos, MazeLayout};
use std::collections::HashSet;

/// A locked cell guarding part of the maze.
///
/// Identity is positional: a gate is "the gate at (x, y)" within the
/// active layout, there is no separate ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    /// Cell position of the gate.
    pub pos: GridPos,
    /// Whether the gate's challenge has been solved.
    pub unlocked: bool,
    /// Number of colors in the gate's challenge sequence.
    pub sequence_length: usize,
}

/// Challenge sequence length for gates created at a level.
#[must_use]
pub fn sequence_length_for_level(level: u32) -> usize {
    3 + (level / 2) as usize
}

/// All gates of the current level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateSet {
    gates: Vec<Gate>,
}

impl GateSet {
    /// Build the gate set for a layout.
    ///
    /// Scans the layout row-major for gate cells. Every gate at this
    /// level shares the same sequence length; a gate starts unlocked
    /// only if its position appears in `prior_solved` (restored from
    /// persisted progress).
    #[must_use]
    pub fn build(layout: &MazeLayout, level: u32, prior_solved: &HashSet<GridPos>) -> Self {
        let sequence_length = sequence_length_for_level(level);
        let gates = layout
            .gate_positions()
            .into_iter()
            .map(|pos| Gate {
                pos,
                unlocked: prior_solved.contains(&pos),
                sequence_length,
            })
            .collect();
        Self { gates }
    }

    /// Total number of gates.
    #[must_use]
    pub fn total(&self) -> usize {
        self.gates.len()
    }

    /// Number of unlocked gates, always derived from the collection.
    #[must_use]
    pub fn solved(&self) -> usize {
        self.gates.iter().filter(|gate| gate.unlocked).count()
    }

    /// Check whether every gate is unlocked.
    #[must_use]
    pub fn all_solved(&self) -> bool {
        self.gates.iter().all(|gate| gate.unlocked)
    }

    /// The gate at a position, if any.
    #[must_use]
    pub fn get(&self, pos: GridPos) -> Option<&Gate> {
        self.gates.iter().find(|gate| gate.pos == pos)
    }

    /// Check whether a locked gate sits at a position.
    #[must_use]
    pub fn is_locked_at(&self, pos: GridPos) -> bool {
        self.get(pos).is_some_and(|gate| !gate.unlocked)
    }

    /// Unlock the gate at a position.
    ///
    /// Returns `false` without touching anything if no gate exists
    /// there; callers route through the navigation engine so that
    /// case indicates a caller bug, not a player action.
    pub fn mark_solved(&mut self, pos: GridPos) -> bool {
        match self.gates.iter_mut().find(|gate| gate.pos == pos) {
            Some(gate) => {
                gate.unlocked = true;
                true
            }
            None => false,
        }
    }

    /// Iterate over all gates in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    /// Positions of all unlocked gates in scan order.
    #[must_use]
    pub fn solved_positions(&self) -> Vec<GridPos> {
        self.gates
            .iter()
            .filter(|gate| gate.unlocked)
            .map(|gate| gate.pos)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::layout::LayoutCatalog;

    fn level_one_gates(prior: &[GridPos]) -> GateSet {
        let catalog = LayoutCatalog::builtin().unwrap();
        let layout = catalog.layout_for_level(1);
        GateSet::build(&layout, 1, &prior.iter().copied().collect())
    }

    #[test]
    fn test_sequence_length_scales_with_level() {
        assert_eq!(sequence_length_for_level(1), 3);
        assert_eq!(sequence_length_for_level(2), 4);
        assert_eq!(sequence_length_for_level(3), 4);
        assert_eq!(sequence_length_for_level(4), 5);
        assert_eq!(sequence_length_for_level(10), 8);
    }

    #[test]
    fn test_build_matches_layout_gate_cells() {
        let catalog = LayoutCatalog::builtin().unwrap();
        for level in 1..=6 {
            let layout = catalog.layout_for_level(level);
            let gates = GateSet::build(&layout, level, &HashSet::new());
            assert_eq!(gates.total(), layout.gate_count());
            assert_eq!(gates.solved(), 0);
            for gate in gates.iter() {
                assert_eq!(gate.sequence_length, sequence_length_for_level(level));
            }
        }
    }

    #[test]
    fn test_prior_solved_positions_restore_unlocks() {
        let gates = level_one_gates(&[GridPos::new(9, 5)]);
        assert_eq!(gates.solved(), 1);
        assert!(gates.get(GridPos::new(9, 5)).unwrap().unlocked);
        assert!(!gates.get(GridPos::new(5, 3)).unwrap().unlocked);
        assert!(!gates.all_solved());
    }

    #[test]
    fn test_prior_positions_not_in_layout_are_dropped() {
        let gates = level_one_gates(&[GridPos::new(1, 1)]);
        assert_eq!(gates.solved(), 0);
        assert_eq!(gates.total(), 3);
    }

    #[test]
    fn test_mark_solved_updates_counts() {
        let mut gates = level_one_gates(&[]);
        assert!(gates.mark_solved(GridPos::new(5, 3)));
        assert_eq!(gates.solved(), 1);
        assert_eq!(gates.solved_positions(), vec![GridPos::new(5, 3)]);
        assert!(!gates.is_locked_at(GridPos::new(5, 3)));
        assert!(gates.is_locked_at(GridPos::new(9, 5)));
    }

    #[test]
    fn test_mark_solved_missing_gate_is_noop() {
        let mut gates = level_one_gates(&[]);
        assert!(!gates.mark_solved(GridPos::new(2, 2)));
        assert_eq!(gates.solved(), 0);
    }

    #[test]
    fn test_all_solved() {
        let mut gates = level_one_gates(&[]);
        for pos in [GridPos::new(5, 3), GridPos::new(9, 5), GridPos::new(5, 8)] {
            gates.mark_solved(pos);
        }
        assert!(gates.all_solved());
        assert_eq!(gates.solved(), gates.total());
    }

    #[test]
    fn test_empty_set_is_all_solved() {
        let gates = GateSet::default();
        assert!(gates.all_solved());
        assert_eq!(gates.total(), 0);
    }
}
