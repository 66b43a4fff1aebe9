//! Input events routed from the shell to the active controller.

use crate::maze::{Color, Direction};

/// A player input, already translated from raw key presses by the
/// front-end. Controllers consume these without knowing which keys
/// produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Move the player one cell in a direction.
    Move(Direction),
    /// Press one of the five color buttons.
    Color(Color),
    /// Start (or replay) the active challenge's reveal sequence.
    StartSequence,
    /// Confirm the pending modal prompt.
    Confirm,
    /// Reset all progress back to level one.
    Reset,
    /// Regenerate the current level's maze.
    NewMaze,
}
