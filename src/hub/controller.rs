//! Controller lifecycle and the hub registry.
//!
//! Each game implements [`GameController`]; the [`GameHub`] owns the
//! registered controllers and keeps exactly one of them active. Input
//! and clock ticks route through the hub to whichever controller holds
//! the screen.

use std::any::Any;
use std::time::Duration;

use tracing::{debug, warn};

use crate::hub::InputEvent;
use crate::maze::GameEvent;

/// Lifecycle and input surface every hub game implements.
///
/// The hub drives these in a fixed order: `init` once after
/// registration, then `cleanup` and `pause` on the outgoing controller
/// and `activate` on the incoming one at every switch.
pub trait GameController {
    /// Short stable identifier, used for traces and lookups.
    fn name(&self) -> &str;

    /// One-time setup: load persisted state and build the first board.
    fn init(&mut self);

    /// The controller has been given the screen.
    fn activate(&mut self) {}

    /// The controller is being put in the background.
    fn pause(&mut self) {}

    /// Release transient state before losing the screen. Runs before
    /// `pause` when switching away.
    fn cleanup(&mut self) {}

    /// Cosmetic refresh request, e.g. after a theme change.
    fn redraw(&mut self) {}

    /// Apply one player input, returning the events it produced.
    fn handle_input(&mut self, event: InputEvent) -> Vec<GameEvent>;

    /// Advance internal timers by `elapsed` wall-clock time.
    fn tick(&mut self, elapsed: Duration) -> Vec<GameEvent>;

    /// Typed access for callers that know the concrete controller.
    fn as_any(&self) -> &dyn Any;

    /// Mutable typed access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Opaque handle to a registered controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameHandle(usize);

/// Registry of game controllers with a single active slot.
pub struct GameHub {
    games: Vec<Box<dyn GameController>>,
    active: Option<usize>,
}

impl std::fmt::Debug for GameHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.games.iter().map(|g| g.name()).collect();
        f.debug_struct("GameHub")
            .field("games", &names)
            .field("active", &self.active)
            .finish()
    }
}

impl Default for GameHub {
    fn default() -> Self {
        Self::new()
    }
}

impl GameHub {
    /// Create an empty hub.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            games: Vec::new(),
            active: None,
        }
    }

    /// Number of registered controllers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Check if no controllers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Register a controller and return its handle.
    pub fn register<G: GameController + 'static>(&mut self, game: G) -> GameHandle {
        debug!(game = game.name(), "registered controller");
        self.games.push(Box::new(game));
        GameHandle(self.games.len() - 1)
    }

    /// Run `init` on every registered controller, in registration
    /// order.
    pub fn init_all(&mut self) {
        for game in &mut self.games {
            game.init();
        }
    }

    /// Make a controller active.
    ///
    /// The outgoing controller (if any) gets `cleanup` then `pause`;
    /// the incoming one gets `activate`. Switching to the already
    /// active controller does nothing. Returns false for a handle the
    /// hub does not know.
    pub fn switch_to(&mut self, handle: GameHandle) -> bool {
        if handle.0 >= self.games.len() {
            warn!(handle = handle.0, "switch to unknown controller");
            return false;
        }
        if let Some(current) = self.active {
            if current == handle.0 {
                return true;
            }
            let outgoing = &mut self.games[current];
            debug!(game = outgoing.name(), "deactivating controller");
            outgoing.cleanup();
            outgoing.pause();
        }
        self.active = Some(handle.0);
        let incoming = &mut self.games[handle.0];
        debug!(game = incoming.name(), "activating controller");
        incoming.activate();
        true
    }

    /// The active controller, if one has been selected.
    #[must_use]
    pub fn active(&self) -> Option<&dyn GameController> {
        self.active.map(|index| self.games[index].as_ref())
    }

    /// Mutable access to the active controller.
    pub fn active_mut(&mut self) -> Option<&mut dyn GameController> {
        match self.active {
            Some(index) => Some(self.games[index].as_mut()),
            None => None,
        }
    }

    /// The active controller downcast to its concrete type.
    #[must_use]
    pub fn active_as<T: 'static>(&self) -> Option<&T> {
        self.active().and_then(|game| game.as_any().downcast_ref())
    }

    /// Mutable downcast of the active controller.
    pub fn active_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.active_mut()
            .and_then(|game| game.as_any_mut().downcast_mut())
    }

    /// Ask every controller to refresh its presentation.
    pub fn redraw_all(&mut self) {
        for game in &mut self.games {
            game.redraw();
        }
    }

    /// Route an input event to the active controller.
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<GameEvent> {
        match self.active_mut() {
            Some(game) => game.handle_input(event),
            None => Vec::new(),
        }
    }

    /// Advance the active controller's timers.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        match self.active_mut() {
            Some(game) => game.tick(elapsed),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records lifecycle calls so tests can assert ordering.
    struct ScriptedGame {
        id: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl ScriptedGame {
        fn new(id: &'static str, log: Rc<RefCell<Vec<String>>>) -> Self {
            Self { id, log }
        }

        fn record(&self, call: &str) {
            self.log.borrow_mut().push(format!("{}:{call}", self.id));
        }
    }

    impl GameController for ScriptedGame {
        fn name(&self) -> &str {
            self.id
        }

        fn init(&mut self) {
            self.record("init");
        }

        fn activate(&mut self) {
            self.record("activate");
        }

        fn pause(&mut self) {
            self.record("pause");
        }

        fn cleanup(&mut self) {
            self.record("cleanup");
        }

        fn handle_input(&mut self, _event: InputEvent) -> Vec<GameEvent> {
            self.record("input");
            vec![GameEvent::Blocked]
        }

        fn tick(&mut self, _elapsed: Duration) -> Vec<GameEvent> {
            self.record("tick");
            Vec::new()
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn hub_with_two() -> (GameHub, GameHandle, GameHandle, Rc<RefCell<Vec<String>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hub = GameHub::new();
        let first = hub.register(ScriptedGame::new("alpha", Rc::clone(&log)));
        let second = hub.register(ScriptedGame::new("beta", Rc::clone(&log)));
        (hub, first, second, log)
    }

    #[test]
    fn test_init_all_runs_in_registration_order() {
        let (mut hub, _, _, log) = hub_with_two();
        hub.init_all();
        assert_eq!(*log.borrow(), vec!["alpha:init", "beta:init"]);
    }

    #[test]
    fn test_switch_runs_cleanup_pause_then_activate() {
        let (mut hub, first, second, log) = hub_with_two();
        assert!(hub.switch_to(first));
        log.borrow_mut().clear();

        assert!(hub.switch_to(second));
        assert_eq!(
            *log.borrow(),
            vec!["alpha:cleanup", "alpha:pause", "beta:activate"]
        );
    }

    #[test]
    fn test_switch_to_active_controller_is_a_no_op() {
        let (mut hub, first, _, log) = hub_with_two();
        assert!(hub.switch_to(first));
        log.borrow_mut().clear();
        assert!(hub.switch_to(first));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_input_routes_to_active_controller_only() {
        let (mut hub, _, second, log) = hub_with_two();
        assert!(hub.handle_input(InputEvent::Confirm).is_empty());

        assert!(hub.switch_to(second));
        log.borrow_mut().clear();
        let events = hub.handle_input(InputEvent::Confirm);
        assert_eq!(events.len(), 1);
        assert_eq!(*log.borrow(), vec!["beta:input"]);
    }

    #[test]
    fn test_active_as_downcasts_to_concrete_type() {
        let (mut hub, first, _, _) = hub_with_two();
        assert!(hub.active_as::<ScriptedGame>().is_none());

        assert!(hub.switch_to(first));
        let game = hub.active_as::<ScriptedGame>().unwrap();
        assert_eq!(game.id, "alpha");
        assert!(hub.active_as::<GameHub>().is_none());
    }
}
