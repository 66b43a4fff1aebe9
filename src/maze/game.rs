//! The maze game session.
//!
//! `MazeGame` owns the live state for one run: the selected layout,
//! the gate set, the player, the active challenge, and the run
//! counters. Every mutating operation returns the [`GameEvent`]s it
//! caused so presentation layers can react without reaching into the
//! session. Persistence happens inside the operations that change
//! durable state; callers never save explicitly.

use crate::maze::challenge::{Challenge, ChallengePhase, Color, PlaybackEvent, SubmitOutcome};
use crate::maze::events::GameEvent;
use crate::maze::gate::GateSet;
use crate::maze::layout::{CellKind, GridPos, LayoutCatalog, LayoutError, MazeLayout};
use crate::maze::nav::{Direction, MoveCheck, evaluate_move};
use crate::maze::progress::{self, MAX_LIVES, ProgressRecord};
use crate::storage::KeyValueStore;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

/// Tunable rules for a session.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    /// Seed for sequence generation.
    pub seed: u64,
    /// Lives at the start of a fresh run.
    pub starting_lives: u8,
    /// Points per color when a sequence is solved.
    pub points_per_color: u32,
    /// Flat bonus for completing a level.
    pub level_bonus: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_lives: MAX_LIVES,
            points_per_color: 10,
            level_bonus: 100,
        }
    }
}

/// How a cell should be presented, unlock state resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    /// Open corridor.
    Path,
    /// Wall.
    Wall,
    /// A gate still waiting for its challenge.
    GateLocked,
    /// A gate whose challenge was solved.
    GateOpen,
    /// The spawn cell.
    Start,
    /// The exit cell.
    End,
}

/// Challenge state as presentation layers see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeViewState {
    /// Waiting for the player to start playback.
    AwaitingStart,
    /// Playback running.
    Playing,
    /// Accepting player input.
    AwaitingInput,
}

/// View of the active challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeView {
    /// The gate under challenge.
    pub gate: GridPos,
    /// Length of the sequence to reproduce.
    pub sequence_length: usize,
    /// Colors correctly entered so far.
    pub entered: usize,
    /// The color playback is currently lighting, if any.
    pub lit: Option<Color>,
    /// Coarse phase for status display.
    pub state: ChallengeViewState,
}

/// A complete renderable view of the session.
///
/// Plain data; produced fresh on demand and safe to hold across
/// frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeSnapshot {
    /// Current level.
    pub level: u32,
    /// Current score.
    pub score: u32,
    /// Remaining lives.
    pub lives: u8,
    /// Unlocked gates in the level.
    pub solved: usize,
    /// Total gates in the level.
    pub total_gates: usize,
    /// Grid width.
    pub width: u16,
    /// Grid height.
    pub height: u16,
    /// Cells in row-major order with gate unlock state resolved.
    pub cells: Vec<CellView>,
    /// The player's cell.
    pub player: GridPos,
    /// Whether the session accepts play input.
    pub game_active: bool,
    /// Whether a completed level awaits the player's confirmation.
    pub awaiting_next_level: bool,
    /// The active challenge, if any.
    pub challenge: Option<ChallengeView>,
}

impl MazeSnapshot {
    /// The cell view at a position.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the grid.
    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> CellView {
        assert!(x < self.width && y < self.height);
        self.cells[usize::from(y) * usize::from(self.width) + usize::from(x)]
    }
}

/// One maze game session.
#[derive(Debug, Clone)]
pub struct MazeGame<S: KeyValueStore> {
    config: GameConfig,
    catalog: LayoutCatalog,
    store: S,
    rng: SmallRng,
    level: u32,
    score: u32,
    lives: u8,
    game_active: bool,
    awaiting_next_level: bool,
    layout: MazeLayout,
    gates: GateSet,
    player: GridPos,
    challenge: Option<Challenge>,
}

impl<S: KeyValueStore> MazeGame<S> {
    /// Create a session over a storage port.
    ///
    /// The session starts inert; call [`init`](Self::init) to load
    /// persisted progress and begin play.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if the built-in template catalog
    /// fails to parse.
    pub fn new(store: S, config: GameConfig) -> Result<Self, LayoutError> {
        let catalog = LayoutCatalog::builtin()?;
        let layout = catalog.layout_for_level(1);
        let player = layout.start();
        let gates = GateSet::build(&layout, 1, &HashSet::new());
        Ok(Self {
            config,
            catalog,
            store,
            rng: SmallRng::seed_from_u64(config.seed),
            level: 1,
            score: 0,
            lives: config.starting_lives,
            game_active: false,
            awaiting_next_level: false,
            layout,
            gates,
            player,
            challenge: None,
        })
    }

    /// Load persisted progress and start (or restart) play.
    pub fn init(&mut self) {
        let record = ProgressRecord::load(&self.store);
        self.level = record.level;
        self.score = record.score;
        self.lives = record.lives;
        let prior = record.unlocked_positions();
        self.rebuild_level(&prior);
        self.game_active = self.lives > 0;
        self.awaiting_next_level = false;
        debug!(
            level = self.level,
            score = self.score,
            lives = self.lives,
            restored_gates = prior.len(),
            "maze session initialized"
        );
    }

    fn rebuild_level(&mut self, prior_solved: &HashSet<GridPos>) {
        self.layout = self.catalog.layout_for_level(self.level);
        self.gates = GateSet::build(&self.layout, self.level, prior_solved);
        self.player = self.layout.start();
        self.challenge = None;
    }

    fn persist(&mut self) {
        ProgressRecord::from_session(self.level, self.score, self.lives, &self.gates)
            .save(&mut self.store);
    }

    /// Current level, 1-based.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Current score.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u8 {
        self.lives
    }

    /// Whether the session accepts play input.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.game_active
    }

    /// Whether a completed level awaits confirmation.
    #[must_use]
    pub const fn awaiting_next_level(&self) -> bool {
        self.awaiting_next_level
    }

    /// The player's position.
    #[must_use]
    pub const fn player(&self) -> GridPos {
        self.player
    }

    /// The active layout.
    #[must_use]
    pub const fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    /// The current level's gates.
    #[must_use]
    pub const fn gates(&self) -> &GateSet {
        &self.gates
    }

    /// The active challenge, if any.
    #[must_use]
    pub const fn challenge(&self) -> Option<&Challenge> {
        self.challenge.as_ref()
    }

    /// Attempt a directional move.
    ///
    /// Ignored while the session is inactive or a challenge is open.
    /// Walking into a locked gate starts its challenge instead of
    /// moving; walking onto the exit with every gate open completes
    /// the level.
    pub fn move_player(&mut self, direction: Direction) -> Vec<GameEvent> {
        if !self.game_active || self.challenge.is_some() {
            return Vec::new();
        }
        match evaluate_move(&self.layout, &self.gates, self.player, direction) {
            MoveCheck::Blocked => vec![GameEvent::Blocked],
            MoveCheck::Enter(to) => {
                self.player = to;
                vec![GameEvent::Moved { to }]
            }
            MoveCheck::LockedGate(pos) => self.begin_challenge(pos),
            MoveCheck::EnterEnd(to) => {
                self.player = to;
                let mut events = vec![GameEvent::Moved { to }];
                if self.gates.all_solved() {
                    self.complete_level(&mut events);
                } else {
                    events.push(GameEvent::GatesStillLocked {
                        solved: self.gates.solved(),
                        total: self.gates.total(),
                    });
                }
                events
            }
        }
    }

    fn begin_challenge(&mut self, pos: GridPos) -> Vec<GameEvent> {
        let Some(gate) = self.gates.get(pos) else {
            return vec![GameEvent::Blocked];
        };
        let sequence_length = gate.sequence_length;
        self.challenge = Some(Challenge::new(
            pos,
            sequence_length,
            self.level,
            &mut self.rng,
        ));
        vec![GameEvent::ChallengeStarted {
            gate: pos,
            sequence_length,
        }]
    }

    fn complete_level(&mut self, events: &mut Vec<GameEvent>) {
        self.level += 1;
        self.score += self.config.level_bonus;
        self.game_active = false;
        self.awaiting_next_level = true;
        // The finished level's unlocks are meaningless for the next
        // template, so the new level persists with a cleared map.
        ProgressRecord {
            level: self.level,
            score: self.score,
            lives: self.lives,
            gates: Vec::new(),
        }
        .save(&mut self.store);
        events.push(GameEvent::LevelComplete {
            level: self.level,
            bonus: self.config.level_bonus,
            score: self.score,
        });
    }

    /// Start or replay sequence playback for the open challenge.
    pub fn start_sequence(&mut self) -> Vec<GameEvent> {
        if !self.game_active {
            return Vec::new();
        }
        match self.challenge.as_mut() {
            Some(challenge) => {
                if challenge.start_playback() {
                    vec![GameEvent::PlaybackStarted]
                } else {
                    Vec::new()
                }
            }
            None => Vec::new(),
        }
    }

    /// Submit one color of the player's answer.
    pub fn submit_color(&mut self, color: Color) -> Vec<GameEvent> {
        if !self.game_active {
            return Vec::new();
        }
        let outcome = match self.challenge.as_mut() {
            Some(challenge) => challenge.submit(color),
            None => return Vec::new(),
        };
        match outcome {
            SubmitOutcome::Ignored => Vec::new(),
            SubmitOutcome::Progress { index } => {
                vec![GameEvent::ColorPressed { color, index }]
            }
            SubmitOutcome::Solved => self.resolve_success(color),
            SubmitOutcome::Mismatch { index } => self.resolve_failure(color, index),
        }
    }

    fn resolve_success(&mut self, color: Color) -> Vec<GameEvent> {
        let Some(challenge) = self.challenge.take() else {
            return Vec::new();
        };
        let gate = challenge.gate();
        let length = challenge.sequence().len();
        let points = length as u32 * self.config.points_per_color;
        self.score += points;
        self.gates.mark_solved(gate);
        self.persist();
        vec![
            GameEvent::ColorPressed {
                color,
                index: length - 1,
            },
            GameEvent::GateUnlocked {
                gate,
                points,
                solved: self.gates.solved(),
                total: self.gates.total(),
            },
        ]
    }

    fn resolve_failure(&mut self, color: Color, index: usize) -> Vec<GameEvent> {
        self.lives = self.lives.saturating_sub(1);
        self.persist();
        let mut events = vec![
            GameEvent::ColorPressed { color, index },
            GameEvent::SequenceWrong {
                index,
                lives_left: self.lives,
            },
        ];
        if self.lives == 0 {
            self.game_active = false;
            self.challenge = None;
            events.push(GameEvent::GameOver { score: self.score });
        } else if let Some(challenge) = self.challenge.as_mut() {
            challenge.fail_attempt();
        }
        events
    }

    /// Advance time-dependent state (sequence playback).
    pub fn tick(&mut self, dt: Duration) -> Vec<GameEvent> {
        if !self.game_active {
            return Vec::new();
        }
        let Some(challenge) = self.challenge.as_mut() else {
            return Vec::new();
        };
        challenge
            .advance(dt)
            .into_iter()
            .map(|event| match event {
                PlaybackEvent::Reveal { index, color } => GameEvent::ColorRevealed { color, index },
                PlaybackEvent::Finished => GameEvent::PlaybackComplete,
            })
            .collect()
    }

    /// Acknowledge a modal state.
    ///
    /// After a completed level this builds the next level and resumes
    /// play; after a game over it performs a full reset. Otherwise a
    /// no-op.
    pub fn confirm(&mut self) -> Vec<GameEvent> {
        if self.awaiting_next_level {
            self.awaiting_next_level = false;
            self.rebuild_level(&HashSet::new());
            self.game_active = true;
            debug!(level = self.level, "next level started");
            return Vec::new();
        }
        if !self.game_active {
            return self.reset_game();
        }
        Vec::new()
    }

    /// Wipe persistence and start a fresh run.
    pub fn reset_game(&mut self) -> Vec<GameEvent> {
        ProgressRecord::clear(&mut self.store);
        self.level = 1;
        self.score = 0;
        self.lives = self.config.starting_lives;
        self.awaiting_next_level = false;
        self.rebuild_level(&HashSet::new());
        self.game_active = true;
        vec![GameEvent::GameReset]
    }

    /// Rebuild the current level with fresh, locked gates.
    ///
    /// Level, score, and lives survive; gate unlocks are discarded in
    /// memory and storage. Selection stays level-cyclic, so the same
    /// template may come back.
    pub fn generate_new_maze(&mut self) -> Vec<GameEvent> {
        progress::clear_gates(&mut self.store);
        self.awaiting_next_level = false;
        self.rebuild_level(&HashSet::new());
        self.game_active = self.lives > 0;
        vec![GameEvent::MazeRegenerated { level: self.level }]
    }

    /// Route one logical input event to the matching operation.
    pub fn handle_input(&mut self, event: crate::hub::InputEvent) -> Vec<GameEvent> {
        use crate::hub::InputEvent;
        match event {
            InputEvent::Move(direction) => self.move_player(direction),
            InputEvent::Color(color) => self.submit_color(color),
            InputEvent::StartSequence => self.start_sequence(),
            InputEvent::Confirm => self.confirm(),
            InputEvent::Reset => self.reset_game(),
            InputEvent::NewMaze => self.generate_new_maze(),
        }
    }

    /// Produce a renderable view of the whole session.
    #[must_use]
    pub fn snapshot(&self) -> MazeSnapshot {
        let cells = self
            .layout
            .iter()
            .map(|(pos, kind)| match kind {
                CellKind::Path => CellView::Path,
                CellKind::Wall => CellView::Wall,
                CellKind::Start => CellView::Start,
                CellKind::End => CellView::End,
                CellKind::Gate => {
                    if self.gates.is_locked_at(pos) {
                        CellView::GateLocked
                    } else {
                        CellView::GateOpen
                    }
                }
            })
            .collect();
        let challenge = self.challenge.as_ref().map(|challenge| ChallengeView {
            gate: challenge.gate(),
            sequence_length: challenge.sequence().len(),
            entered: challenge.input().len(),
            lit: challenge.lit_color(),
            state: match challenge.phase() {
                ChallengePhase::AwaitingStart => ChallengeViewState::AwaitingStart,
                ChallengePhase::Playing(_) => ChallengeViewState::Playing,
                ChallengePhase::AwaitingInput => ChallengeViewState::AwaitingInput,
            },
        });
        MazeSnapshot {
            level: self.level,
            score: self.score,
            lives: self.lives,
            solved: self.gates.solved(),
            total_gates: self.gates.total(),
            width: self.layout.width(),
            height: self.layout.height(),
            cells,
            player: self.player,
            game_active: self.game_active,
            awaiting_next_level: self.awaiting_next_level,
            challenge,
        }
    }
}

impl<S: KeyValueStore + 'static> crate::hub::GameController for MazeGame<S> {
    fn name(&self) -> &str {
        "maze"
    }

    fn init(&mut self) {
        MazeGame::init(self);
    }

    fn activate(&mut self) {
        debug!(level = self.level, "maze controller activated");
    }

    /// Abandons any open challenge. The gate stays locked and no life
    /// is lost; playback stops because the timer state is dropped with
    /// the challenge.
    fn cleanup(&mut self) {
        if self.challenge.take().is_some() {
            debug!("dropped active challenge on cleanup");
        }
    }

    fn handle_input(&mut self, event: crate::hub::InputEvent) -> Vec<GameEvent> {
        MazeGame::handle_input(self, event)
    }

    fn tick(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        MazeGame::tick(self, elapsed)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
