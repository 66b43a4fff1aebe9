//! Color-sequence memory challenges guarding maze gates.
//!
//! A challenge walks a small state machine: it waits for the player to
//! start, plays the sequence back one color at a time, then accepts
//! input until the attempt resolves. Playback never sleeps; it is
//! advanced with elapsed time by the host loop, so tests can step it
//! deterministically and dropping the challenge cancels it outright.

use crate::maze::layout::GridPos;
use rand::Rng;
use std::fmt;
use std::time::Duration;

/// Base reveal time per color in milliseconds.
const TEMPO_BASE_MS: u64 = 400;
/// Tempo reduction per level in milliseconds.
const TEMPO_STEP_MS: u64 = 30;
/// Fastest allowed reveal time in milliseconds.
const TEMPO_FLOOR_MS: u64 = 200;
/// Pause between the last reveal and input being enabled.
const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// One of the five challenge colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red pad.
    Red,
    /// Yellow pad.
    Yellow,
    /// Green pad.
    Green,
    /// Blue pad.
    Blue,
    /// Purple pad.
    Purple,
}

impl Color {
    /// The full palette, in pad order.
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
    ];

    /// Lowercase name of the color.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
        }
    }

    /// Draw one color uniformly at random.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reveal time per color at a level.
///
/// Playback speeds up with the level and bottoms out at the floor.
#[must_use]
pub fn reveal_tempo(level: u32) -> Duration {
    let ms = TEMPO_BASE_MS
        .saturating_sub(u64::from(level) * TEMPO_STEP_MS)
        .max(TEMPO_FLOOR_MS);
    Duration::from_millis(ms)
}

/// Event produced while playback advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A color lit up for the player to memorize.
    Reveal {
        /// Zero-based position within the sequence.
        index: usize,
        /// The revealed color.
        color: Color,
    },
    /// Playback ran to completion; input is enabled.
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackStep {
    /// Dark gap before the next reveal.
    Gap,
    /// The current color is lit.
    Lit,
    /// Trailing pause after the last reveal.
    Settle,
    /// Playback has finished.
    Done,
}

/// Timer state for one playback run.
///
/// Each color gets a dark gap followed by an equally long lit phase;
/// after the last color a fixed settle delay runs before input opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playback {
    tempo: Duration,
    index: usize,
    step: PlaybackStep,
    elapsed: Duration,
}

impl Playback {
    fn new(tempo: Duration) -> Self {
        Self {
            tempo,
            index: 0,
            step: PlaybackStep::Gap,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance by elapsed wall time, yielding any due events.
    ///
    /// A large `dt` may complete several steps at once; events are
    /// returned in playback order.
    fn advance(&mut self, dt: Duration, sequence: &[Color]) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();
        if sequence.is_empty() && self.step != PlaybackStep::Done {
            self.step = PlaybackStep::Done;
            events.push(PlaybackEvent::Finished);
            return events;
        }

        self.elapsed += dt;
        loop {
            let need = match self.step {
                PlaybackStep::Gap | PlaybackStep::Lit => self.tempo,
                PlaybackStep::Settle => SETTLE_DELAY,
                PlaybackStep::Done => break,
            };
            if self.elapsed < need {
                break;
            }
            self.elapsed -= need;
            match self.step {
                PlaybackStep::Gap => {
                    self.step = PlaybackStep::Lit;
                    events.push(PlaybackEvent::Reveal {
                        index: self.index,
                        color: sequence[self.index],
                    });
                }
                PlaybackStep::Lit => {
                    if self.index + 1 == sequence.len() {
                        self.step = PlaybackStep::Settle;
                    } else {
                        self.index += 1;
                        self.step = PlaybackStep::Gap;
                    }
                }
                PlaybackStep::Settle => {
                    self.step = PlaybackStep::Done;
                    events.push(PlaybackEvent::Finished);
                    break;
                }
                PlaybackStep::Done => break,
            }
        }
        events
    }

    fn lit_index(&self) -> Option<usize> {
        (self.step == PlaybackStep::Lit).then_some(self.index)
    }

    fn is_done(&self) -> bool {
        self.step == PlaybackStep::Done
    }
}

/// Where a challenge currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengePhase {
    /// Waiting for the player to start (or restart) playback.
    AwaitingStart,
    /// Sequence playback in progress; input ignored.
    Playing(Playback),
    /// Playback finished; accepting player input.
    AwaitingInput,
}

/// Outcome of submitting one color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was not enabled; nothing happened.
    Ignored,
    /// Correct color, sequence not yet complete.
    Progress {
        /// Index that was just matched.
        index: usize,
    },
    /// The full sequence was reproduced correctly.
    Solved,
    /// Wrong color; the attempt fails as a whole.
    Mismatch {
        /// Index at which the input diverged.
        index: usize,
    },
}

/// An active gate confrontation.
///
/// Exists only while the player stands before a locked gate; the
/// session drops it on success, reset, or maze regeneration. The
/// sequence is generated once at creation and deliberately survives
/// failed attempts, so a retry replays the same colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    gate: GridPos,
    tempo: Duration,
    sequence: Vec<Color>,
    input: Vec<Color>,
    phase: ChallengePhase,
}

impl Challenge {
    /// Create a challenge for a gate.
    ///
    /// Generates `sequence_length` colors uniformly at random and
    /// waits for the player to start playback.
    pub fn new<R: Rng>(gate: GridPos, sequence_length: usize, level: u32, rng: &mut R) -> Self {
        let sequence = (0..sequence_length).map(|_| Color::random(rng)).collect();
        Self {
            gate,
            tempo: reveal_tempo(level),
            sequence,
            input: Vec::new(),
            phase: ChallengePhase::AwaitingStart,
        }
    }

    /// Position of the gate under challenge.
    #[must_use]
    pub const fn gate(&self) -> GridPos {
        self.gate
    }

    /// The color sequence the player must reproduce.
    #[must_use]
    pub fn sequence(&self) -> &[Color] {
        &self.sequence
    }

    /// Colors entered so far in the current attempt.
    #[must_use]
    pub fn input(&self) -> &[Color] {
        &self.input
    }

    /// Current phase of the challenge state machine.
    #[must_use]
    pub const fn phase(&self) -> ChallengePhase {
        self.phase
    }

    /// Check whether playback is running.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self.phase, ChallengePhase::Playing(_))
    }

    /// Check whether player input is currently accepted.
    #[must_use]
    pub fn input_enabled(&self) -> bool {
        self.phase == ChallengePhase::AwaitingInput && self.input.len() < self.sequence.len()
    }

    /// The color currently lit by playback, if any.
    #[must_use]
    pub fn lit_color(&self) -> Option<Color> {
        match self.phase {
            ChallengePhase::Playing(playback) => {
                playback.lit_index().map(|index| self.sequence[index])
            }
            _ => None,
        }
    }

    /// Start or restart sequence playback.
    ///
    /// Allowed while waiting to start and also from the input phase,
    /// where it acts as a replay of the same sequence; any partial
    /// input is discarded. Returns `false` if playback is already
    /// running.
    pub fn start_playback(&mut self) -> bool {
        match self.phase {
            ChallengePhase::AwaitingStart | ChallengePhase::AwaitingInput => {
                self.input.clear();
                self.phase = ChallengePhase::Playing(Playback::new(self.tempo));
                true
            }
            ChallengePhase::Playing(_) => false,
        }
    }

    /// Advance playback by elapsed time.
    ///
    /// Outside the playback phase this is a no-op. When playback
    /// completes, the challenge moves to the input phase.
    pub fn advance(&mut self, dt: Duration) -> Vec<PlaybackEvent> {
        let ChallengePhase::Playing(mut playback) = self.phase else {
            return Vec::new();
        };
        let events = playback.advance(dt, &self.sequence);
        self.phase = if playback.is_done() {
            ChallengePhase::AwaitingInput
        } else {
            ChallengePhase::Playing(playback)
        };
        events
    }

    /// Submit one color of the player's answer.
    ///
    /// Ignored unless input is enabled. The comparison happens at the
    /// just-appended index; the first wrong color fails the whole
    /// attempt.
    pub fn submit(&mut self, color: Color) -> SubmitOutcome {
        if !self.input_enabled() {
            return SubmitOutcome::Ignored;
        }
        self.input.push(color);
        let index = self.input.len() - 1;
        if self.sequence[index] != color {
            return SubmitOutcome::Mismatch { index };
        }
        if self.input.len() == self.sequence.len() {
            SubmitOutcome::Solved
        } else {
            SubmitOutcome::Progress { index }
        }
    }

    /// Reset after a failed attempt, keeping the same sequence.
    ///
    /// Clears the entered colors and returns to the start-pending
    /// phase so the player can watch the playback again.
    pub fn fail_attempt(&mut self) {
        self.input.clear();
        self.phase = ChallengePhase::AwaitingStart;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn challenge(seed: u64) -> Challenge {
        let mut rng = SmallRng::seed_from_u64(seed);
        Challenge::new(GridPos::new(5, 3), 3, 1, &mut rng)
    }

    fn play_through(challenge: &mut Challenge) -> Vec<PlaybackEvent> {
        assert!(challenge.start_playback());
        challenge.advance(Duration::from_secs(60))
    }

    #[test]
    fn test_palette_has_five_distinct_colors() {
        for (i, a) in Color::ALL.iter().enumerate() {
            for b in &Color::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(Color::Purple.as_str(), "purple");
    }

    #[test]
    fn test_reveal_tempo_scales_and_floors() {
        assert_eq!(reveal_tempo(1), Duration::from_millis(370));
        assert_eq!(reveal_tempo(2), Duration::from_millis(340));
        assert_eq!(reveal_tempo(6), Duration::from_millis(220));
        assert_eq!(reveal_tempo(7), Duration::from_millis(200));
        assert_eq!(reveal_tempo(50), Duration::from_millis(200));
    }

    #[test]
    fn test_generation_is_seed_deterministic() {
        let a = challenge(7);
        let b = challenge(7);
        assert_eq!(a.sequence(), b.sequence());
        assert_eq!(a.sequence().len(), 3);
    }

    #[test]
    fn test_generation_covers_palette() {
        let mut rng = SmallRng::seed_from_u64(42);
        let c = Challenge::new(GridPos::new(1, 1), 200, 1, &mut rng);
        for color in Color::ALL {
            assert!(c.sequence().contains(&color), "{color} never drawn");
        }
    }

    #[test]
    fn test_playback_reveals_in_time_order() {
        let mut c = challenge(3);
        let expected: Vec<Color> = c.sequence().to_vec();
        assert!(c.start_playback());
        let tempo = Duration::from_millis(370);

        // Nothing happens inside the first dark gap.
        assert!(c.advance(tempo - Duration::from_millis(1)).is_empty());
        assert_eq!(
            c.advance(Duration::from_millis(1)),
            vec![PlaybackEvent::Reveal {
                index: 0,
                color: expected[0]
            }]
        );
        assert_eq!(c.lit_color(), Some(expected[0]));

        // One full lit phase plus the next gap reveals the next color.
        assert_eq!(c.advance(tempo), Vec::new());
        assert_eq!(c.lit_color(), None);
        assert_eq!(
            c.advance(tempo),
            vec![PlaybackEvent::Reveal {
                index: 1,
                color: expected[1]
            }]
        );
        assert_eq!(
            c.advance(tempo + tempo),
            vec![PlaybackEvent::Reveal {
                index: 2,
                color: expected[2]
            }]
        );

        // Last lit phase, then the settle delay gates input.
        assert_eq!(c.advance(tempo), Vec::new());
        assert!(!c.input_enabled());
        assert_eq!(
            c.advance(Duration::from_millis(300)),
            vec![PlaybackEvent::Finished]
        );
        assert!(c.input_enabled());
    }

    #[test]
    fn test_large_advance_completes_playback() {
        let mut c = challenge(11);
        let expected: Vec<Color> = c.sequence().to_vec();
        let events = play_through(&mut c);
        assert_eq!(events.len(), 4);
        for (index, color) in expected.iter().enumerate() {
            assert_eq!(
                events[index],
                PlaybackEvent::Reveal {
                    index,
                    color: *color
                }
            );
        }
        assert_eq!(events[3], PlaybackEvent::Finished);
        assert!(c.input_enabled());
    }

    #[test]
    fn test_start_rejected_while_playing() {
        let mut c = challenge(5);
        assert!(c.start_playback());
        assert!(!c.start_playback());
        assert!(c.is_playing());
    }

    #[test]
    fn test_replay_from_input_phase_clears_partial_input() {
        let mut c = challenge(5);
        let first = c.sequence()[0];
        play_through(&mut c);
        assert_eq!(c.submit(first), SubmitOutcome::Progress { index: 0 });
        assert_eq!(c.input().len(), 1);

        // Starting again acts as a replay of the same sequence.
        let before: Vec<Color> = c.sequence().to_vec();
        assert!(c.start_playback());
        assert!(c.input().is_empty());
        let events = c.advance(Duration::from_secs(60));
        assert_eq!(
            events[0],
            PlaybackEvent::Reveal {
                index: 0,
                color: before[0]
            }
        );
        assert_eq!(c.sequence(), before.as_slice());
    }

    #[test]
    fn test_submit_ignored_before_and_during_playback() {
        let mut c = challenge(9);
        assert_eq!(c.submit(Color::Red), SubmitOutcome::Ignored);
        c.start_playback();
        assert_eq!(c.submit(Color::Red), SubmitOutcome::Ignored);
        assert!(c.input().is_empty());
    }

    #[test]
    fn test_correct_sequence_solves() {
        let mut c = challenge(13);
        let colors: Vec<Color> = c.sequence().to_vec();
        play_through(&mut c);
        assert_eq!(c.submit(colors[0]), SubmitOutcome::Progress { index: 0 });
        assert_eq!(c.submit(colors[1]), SubmitOutcome::Progress { index: 1 });
        assert_eq!(c.submit(colors[2]), SubmitOutcome::Solved);
        assert_eq!(c.input(), colors.as_slice());
    }

    #[test]
    fn test_wrong_color_fails_at_its_index() {
        let mut c = challenge(17);
        let colors: Vec<Color> = c.sequence().to_vec();
        let wrong = Color::ALL
            .into_iter()
            .find(|color| *color != colors[1])
            .unwrap();
        play_through(&mut c);
        c.submit(colors[0]);
        assert_eq!(c.submit(wrong), SubmitOutcome::Mismatch { index: 1 });
    }

    #[test]
    fn test_failed_attempt_keeps_sequence_resets_input() {
        let mut c = challenge(19);
        let colors: Vec<Color> = c.sequence().to_vec();
        let wrong = Color::ALL
            .into_iter()
            .find(|color| *color != colors[0])
            .unwrap();
        play_through(&mut c);
        assert_eq!(c.submit(wrong), SubmitOutcome::Mismatch { index: 0 });

        c.fail_attempt();
        assert!(c.input().is_empty());
        assert_eq!(c.phase(), ChallengePhase::AwaitingStart);
        assert_eq!(c.sequence(), colors.as_slice());

        // The retry replays and then accepts the same sequence.
        play_through(&mut c);
        c.submit(colors[0]);
        c.submit(colors[1]);
        assert_eq!(c.submit(colors[2]), SubmitOutcome::Solved);
    }

    #[test]
    fn test_submit_after_full_input_is_ignored() {
        let mut c = challenge(23);
        let colors: Vec<Color> = c.sequence().to_vec();
        play_through(&mut c);
        for color in &colors {
            c.submit(*color);
        }
        assert_eq!(c.submit(colors[0]), SubmitOutcome::Ignored);
        assert_eq!(c.input().len(), colors.len());
    }

    #[test]
    fn test_advance_outside_playback_is_noop() {
        let mut c = challenge(29);
        assert!(c.advance(Duration::from_secs(5)).is_empty());
        play_through(&mut c);
        assert!(c.advance(Duration::from_secs(5)).is_empty());
        assert!(c.input_enabled());
    }
}
