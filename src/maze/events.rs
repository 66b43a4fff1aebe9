//! Semantic game events and their audio cues.
//!
//! Every mutating session operation returns the events it caused, in
//! order. Presentation layers turn them into toasts, modals, and
//! sounds; the names and payloads here are the whole contract.

use crate::maze::challenge::Color;
use crate::maze::layout::GridPos;
use std::fmt;

/// A named sound cue for the audio collaborator.
///
/// The collaborator owns the mute flag; the core always emits cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Footstep for a successful move.
    Move,
    /// Bump against a wall or the grid edge.
    Blocked,
    /// Tone of one challenge color.
    ColorTone(Color),
    /// A gate opened.
    Unlock,
    /// A sequence attempt failed.
    Fail,
    /// A level was completed.
    Win,
    /// The run ended with no lives left.
    Lose,
}

impl fmt::Display for AudioCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioCue::Move => f.write_str("move"),
            AudioCue::Blocked => f.write_str("blocked"),
            AudioCue::ColorTone(color) => write!(f, "tone-{color}"),
            AudioCue::Unlock => f.write_str("unlock"),
            AudioCue::Fail => f.write_str("fail"),
            AudioCue::Win => f.write_str("win"),
            AudioCue::Lose => f.write_str("lose"),
        }
    }
}

/// Something observable that happened inside the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The player stepped onto a cell.
    Moved {
        /// The cell entered.
        to: GridPos,
    },
    /// A move was rejected by a wall or the grid edge.
    Blocked,
    /// The player collided with a locked gate and its challenge began.
    ChallengeStarted {
        /// The gate under challenge.
        gate: GridPos,
        /// Colors the player will have to memorize.
        sequence_length: usize,
    },
    /// Sequence playback began (first start or replay).
    PlaybackStarted,
    /// Playback lit one color.
    ColorRevealed {
        /// The lit color.
        color: Color,
        /// Position within the sequence.
        index: usize,
    },
    /// Playback finished; the session now accepts color input.
    PlaybackComplete,
    /// The player pressed a color pad while input was enabled.
    ColorPressed {
        /// The pressed color.
        color: Color,
        /// Position within the attempt.
        index: usize,
    },
    /// The attempt failed at an index.
    SequenceWrong {
        /// Index where input diverged from the sequence.
        index: usize,
        /// Lives remaining after the failure.
        lives_left: u8,
    },
    /// A gate challenge was solved.
    GateUnlocked {
        /// The opened gate.
        gate: GridPos,
        /// Points awarded for the sequence.
        points: u32,
        /// Unlocked gates after this one.
        solved: usize,
        /// Total gates in the level.
        total: usize,
    },
    /// The player reached the exit with gates still locked.
    GatesStillLocked {
        /// Unlocked gates so far.
        solved: usize,
        /// Total gates in the level.
        total: usize,
    },
    /// All gates were open and the exit was reached.
    LevelComplete {
        /// The level the player will enter next.
        level: u32,
        /// Flat completion bonus added to the score.
        bonus: u32,
        /// Score after the bonus.
        score: u32,
    },
    /// Lives ran out; the session is terminal until reset.
    GameOver {
        /// Final score of the run.
        score: u32,
    },
    /// The session was reset to a fresh run.
    GameReset,
    /// The maze was rebuilt in place, keeping score and lives.
    MazeRegenerated {
        /// Level whose template was re-selected.
        level: u32,
    },
}

impl GameEvent {
    /// The sound cue for this event, if it has one.
    #[must_use]
    pub const fn audio_cue(&self) -> Option<AudioCue> {
        match self {
            GameEvent::Moved { .. } => Some(AudioCue::Move),
            GameEvent::Blocked => Some(AudioCue::Blocked),
            GameEvent::ColorRevealed { color, .. } | GameEvent::ColorPressed { color, .. } => {
                Some(AudioCue::ColorTone(*color))
            }
            GameEvent::SequenceWrong { .. } => Some(AudioCue::Fail),
            GameEvent::GateUnlocked { .. } => Some(AudioCue::Unlock),
            GameEvent::LevelComplete { .. } => Some(AudioCue::Win),
            GameEvent::GameOver { .. } => Some(AudioCue::Lose),
            GameEvent::ChallengeStarted { .. }
            | GameEvent::PlaybackStarted
            | GameEvent::PlaybackComplete
            | GameEvent::GatesStillLocked { .. }
            | GameEvent::GameReset
            | GameEvent::MazeRegenerated { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_mapping() {
        assert_eq!(
            GameEvent::Moved {
                to: GridPos::new(1, 1)
            }
            .audio_cue(),
            Some(AudioCue::Move)
        );
        assert_eq!(GameEvent::Blocked.audio_cue(), Some(AudioCue::Blocked));
        assert_eq!(
            GameEvent::ColorRevealed {
                color: Color::Blue,
                index: 0
            }
            .audio_cue(),
            Some(AudioCue::ColorTone(Color::Blue))
        );
        assert_eq!(
            GameEvent::ColorPressed {
                color: Color::Red,
                index: 2
            }
            .audio_cue(),
            Some(AudioCue::ColorTone(Color::Red))
        );
        assert_eq!(GameEvent::GameOver { score: 10 }.audio_cue(), Some(AudioCue::Lose));
        assert_eq!(GameEvent::GameReset.audio_cue(), None);
        assert_eq!(
            GameEvent::GatesStillLocked { solved: 1, total: 3 }.audio_cue(),
            None
        );
    }

    #[test]
    fn test_cue_names() {
        assert_eq!(AudioCue::Move.to_string(), "move");
        assert_eq!(
            AudioCue::ColorTone(Color::Purple).to_string(),
            "tone-purple"
        );
        assert_eq!(AudioCue::Lose.to_string(), "lose");
    }
}
