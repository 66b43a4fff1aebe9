//! Hub shell for Gatewalk.
//!
//! The hub is the frame around the games: it owns the registered
//! controllers, decides which one holds the screen, and carries the
//! cosmetic settings (theme, sound) that no single game owns. Front
//! ends translate raw key presses into [`InputEvent`]s and feed them
//! through the hub to the active controller.

mod controller;
mod input;
mod settings;

pub use controller::{GameController, GameHandle, GameHub};
pub use input::InputEvent;
pub use settings::{HubSettings, KEY_DARK_MODE, KEY_SOUND};
