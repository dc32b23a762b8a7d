//! Playback scheduling: the animation clock and its state machine.

mod scheduler;
mod timer;

use thiserror::Error;

use crate::ascii::FrameSequence;
use crate::effects::EffectSession;

pub use scheduler::Player;

/// Shortest allowed frame interval in milliseconds.
pub const MIN_INTERVAL_MS: u64 = 50;
/// Longest allowed frame interval in milliseconds.
pub const MAX_INTERVAL_MS: u64 = 1000;
/// Frame interval used when none is configured.
pub const DEFAULT_INTERVAL_MS: u64 = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("nothing is loaded to play")]
    NoContent,
}

/// Playback state machine mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl std::fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Playing => write!(f, "playing"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// What a player session animates. Exactly one kind is active at a time.
///
/// A sequence positions by frame index; an effect session positions by
/// tick. Content is read-only once loaded and is replaced wholesale by
/// the next load.
#[derive(Debug, Clone)]
pub enum PlaybackContent {
    Sequence(FrameSequence),
    Effect(EffectSession),
}
