//! Player movement rules and grid pathfinding.

use crate::maze::gate::GateSet;
use crate::maze::layout::{CellKind, GridPos, MazeLayout};
use std::collections::{HashMap, VecDeque};

/// A directional move intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Decreasing y.
    Up,
    /// Increasing y.
    Down,
    /// Decreasing x.
    Left,
    /// Increasing x.
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The cell one step in this direction, or `None` if that would
    /// leave the grid's unsigned coordinate space.
    #[must_use]
    pub const fn apply(self, pos: GridPos) -> Option<GridPos> {
        match self {
            Direction::Up => match pos.y.checked_sub(1) {
                Some(y) => Some(GridPos::new(pos.x, y)),
                None => None,
            },
            Direction::Down => Some(GridPos::new(pos.x, pos.y + 1)),
            Direction::Left => match pos.x.checked_sub(1) {
                Some(x) => Some(GridPos::new(x, pos.y)),
                None => None,
            },
            Direction::Right => Some(GridPos::new(pos.x + 1, pos.y)),
        }
    }
}

/// What a single move attempt would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCheck {
    /// Out of bounds or into a wall; the player stays put.
    Blocked,
    /// Normal step onto a walkable cell.
    Enter(GridPos),
    /// Step onto the level exit; completion must be evaluated.
    EnterEnd(GridPos),
    /// The target is a locked gate; the player stays put and the
    /// gate's challenge begins.
    LockedGate(GridPos),
}

/// Evaluate one move against the layout and gate state.
///
/// Pure with respect to its inputs; the session applies the result.
/// An unlocked gate behaves exactly like a path cell.
#[must_use]
pub fn evaluate_move(
    layout: &MazeLayout,
    gates: &GateSet,
    from: GridPos,
    direction: Direction,
) -> MoveCheck {
    let Some(target) = direction.apply(from) else {
        return MoveCheck::Blocked;
    };
    let Some(kind) = layout.get(target) else {
        return MoveCheck::Blocked;
    };
    if !kind.is_walkable() {
        return MoveCheck::Blocked;
    }
    if gates.is_locked_at(target) {
        return MoveCheck::LockedGate(target);
    }
    if kind == CellKind::End {
        return MoveCheck::EnterEnd(target);
    }
    MoveCheck::Enter(target)
}

/// Breadth-first shortest path between two cells.
///
/// Gates count as walkable regardless of lock state, so the result
/// describes the corridor structure of the maze, not what a player
/// could traverse right now. Returns the move list from `from` to
/// `to`, empty when they are equal, `None` when unreachable.
#[must_use]
pub fn shortest_path(layout: &MazeLayout, from: GridPos, to: GridPos) -> Option<Vec<Direction>> {
    if layout.get(from).is_none_or(|kind| !kind.is_walkable())
        || layout.get(to).is_none_or(|kind| !kind.is_walkable())
    {
        return None;
    }
    if from == to {
        return Some(Vec::new());
    }

    let mut came_from: HashMap<GridPos, (GridPos, Direction)> = HashMap::new();
    let mut queue = VecDeque::from([from]);
    while let Some(pos) = queue.pop_front() {
        for direction in Direction::ALL {
            let Some(next) = direction.apply(pos) else {
                continue;
            };
            let walkable = layout.get(next).is_some_and(CellKind::is_walkable);
            if !walkable || next == from || came_from.contains_key(&next) {
                continue;
            }
            came_from.insert(next, (pos, direction));
            if next == to {
                let mut steps = Vec::new();
                let mut cursor = to;
                while cursor != from {
                    let (prev, step) = came_from[&cursor];
                    steps.push(step);
                    cursor = prev;
                }
                steps.reverse();
                return Some(steps);
            }
            queue.push_back(next);
        }
    }
    None
}
