// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Gatewalk: a memory-maze game with color-sequence gate challenges.
//!
//! The player walks a grid maze toward the exit. Gates block the way;
//! stepping into a locked gate opens a Simon-style challenge where a
//! color sequence plays back once and must be reproduced from memory.
//! Solving a gate unlocks it for the rest of the level. Progress
//! (level, score, lives, unlocked gates) persists between sessions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      Terminal Front-End (TUI)       │
//! ├─────────────────────────────────────┤
//! │    Hub Shell (controllers, input)   │
//! ├─────────────────────────────────────┤
//! │   Maze Game (grid, gates, rules)    │
//! ├─────────────────────────────────────┤
//! │    Storage (key-value, JSON file)   │
//! └─────────────────────────────────────┘
//! ```

pub mod hub;
pub mod maze;
pub mod storage;

// Re-export key types at crate root for convenience
pub use hub::{GameController, GameHub, HubSettings, InputEvent};
pub use maze::{
    Color, Direction, GameConfig, GameEvent, GridPos, MazeGame, MazeSnapshot, ProgressRecord,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore};
