//! Player handle and public playback API.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::timer::{run_playback_loop, TimerCommand};
use super::{
    PlaybackContent, PlaybackError, PlaybackMode, DEFAULT_INTERVAL_MS, MAX_INTERVAL_MS,
    MIN_INTERVAL_MS,
};
use crate::ascii::FrameSequence;
use crate::effects::EffectSession;

/// Playback scheduler.
///
/// Owns the animation clock and the playback state machine. While playing,
/// a background thread advances position on the configured interval and
/// publishes the current frame's text into a shared cell; the presentation
/// layer polls that cell through [`Player::current_frame`]. Pausing or
/// stopping terminates the thread, so at most one timing loop exists per
/// player.
pub struct Player {
    /// Loaded content, shared read-only with the timing thread.
    content: Option<Arc<PlaybackContent>>,
    /// State-machine mode. Only the control thread writes this.
    mode: PlaybackMode,
    /// Frame index or effect tick, shared with the timing thread.
    position: Arc<AtomicU64>,
    /// Latest published frame text (shared with the timing thread).
    current: Arc<Mutex<Option<String>>>,
    /// Sleep interval in milliseconds, read by the loop at every wake.
    interval_ms: Arc<AtomicU64>,
    /// Signal to stop the timing thread.
    stop_signal: Arc<AtomicBool>,
    /// Channel to send commands to the timing thread.
    command_tx: Option<Sender<TimerCommand>>,
    /// Timing thread handle.
    timer_thread: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("mode", &self.mode)
            .field("position", &self.position.load(Ordering::Relaxed))
            .field("interval_ms", &self.interval_ms.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Create a stopped player with no content and the default interval.
    pub fn new() -> Self {
        Self {
            content: None,
            mode: PlaybackMode::Stopped,
            position: Arc::new(AtomicU64::new(0)),
            current: Arc::new(Mutex::new(None)),
            interval_ms: Arc::new(AtomicU64::new(DEFAULT_INTERVAL_MS)),
            stop_signal: Arc::new(AtomicBool::new(false)),
            command_tx: None,
            timer_thread: None,
        }
    }

    /// Load a rendered sequence, replacing any previous content.
    ///
    /// Forces a stop first so the timing loop never sees a torn swap,
    /// resets position to frame 0 and publishes that frame. An empty
    /// sequence clears the loaded content instead.
    pub fn load_sequence(&mut self, sequence: FrameSequence) {
        self.halt_timer();
        self.mode = PlaybackMode::Stopped;
        self.position.store(0, Ordering::SeqCst);
        self.content = if sequence.is_empty() {
            None
        } else {
            log::debug!("Loaded sequence of {} frame(s)", sequence.len());
            Some(Arc::new(PlaybackContent::Sequence(sequence)))
        };
        self.publish_current();
    }

    /// Load an effect session, replacing any previous content.
    ///
    /// Position becomes tick 0, which displays the untouched base frame.
    /// A session whose base frame is empty clears the loaded content.
    pub fn load_effect(&mut self, session: EffectSession) {
        self.halt_timer();
        self.mode = PlaybackMode::Stopped;
        self.position.store(0, Ordering::SeqCst);
        self.content = if session.base().is_empty() {
            None
        } else {
            log::debug!("Loaded {} effect session", session.effect());
            Some(Arc::new(PlaybackContent::Effect(session)))
        };
        self.publish_current();
    }

    /// Start or resume playback.
    ///
    /// A no-op when already playing; never spawns a second timing loop.
    pub fn play(&mut self) -> Result<(), PlaybackError> {
        let content = match &self.content {
            Some(content) => Arc::clone(content),
            None => return Err(PlaybackError::NoContent),
        };
        if self.mode == PlaybackMode::Playing && self.timer_is_alive() {
            return Ok(());
        }

        // Joins any finished thread before spawning a fresh one.
        self.halt_timer();
        self.stop_signal.store(false, Ordering::SeqCst);

        let (tx, rx) = mpsc::channel();
        self.command_tx = Some(tx);

        let position = Arc::clone(&self.position);
        let current = Arc::clone(&self.current);
        let interval_ms = Arc::clone(&self.interval_ms);
        let stop = Arc::clone(&self.stop_signal);

        let handle = std::thread::spawn(move || {
            run_playback_loop(content, position, current, interval_ms, stop, rx);
        });
        self.timer_thread = Some(handle);
        self.mode = PlaybackMode::Playing;
        log::info!("Playback started");
        Ok(())
    }

    /// Pause playback, keeping the current position. No-op unless playing.
    pub fn pause(&mut self) {
        if self.mode != PlaybackMode::Playing {
            return;
        }
        self.halt_timer();
        self.mode = PlaybackMode::Paused;
        log::info!(
            "Playback paused at position {}",
            self.position.load(Ordering::SeqCst)
        );
    }

    /// Stop playback and reset position to the start.
    pub fn stop(&mut self) {
        self.halt_timer();
        self.mode = PlaybackMode::Stopped;
        self.position.store(0, Ordering::SeqCst);
        self.publish_current();
        log::info!("Playback stopped");
    }

    /// Move one frame forward, wrapping at the end of the sequence.
    ///
    /// Stepping applies only to sequences and only while not playing;
    /// anything else is a no-op. Effect ticks advance only via the clock.
    pub fn step_forward(&mut self) {
        self.step(1);
    }

    /// Move one frame backward, wrapping at the start of the sequence.
    pub fn step_backward(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: i64) {
        if self.mode == PlaybackMode::Playing {
            return;
        }
        let len = match self.content.as_deref() {
            Some(PlaybackContent::Sequence(sequence)) => sequence.len() as i64,
            _ => return,
        };
        let next = (self.position.load(Ordering::SeqCst) as i64 + delta).rem_euclid(len);
        self.position.store(next as u64, Ordering::SeqCst);
        self.publish_current();
    }

    /// Set the frame interval, clamped into `[50, 1000]` milliseconds.
    ///
    /// Takes effect at the timing loop's next wake; no restart is needed.
    pub fn set_interval(&mut self, ms: u64) {
        self.interval_ms
            .store(ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS), Ordering::SeqCst);
    }

    /// The configured frame interval in milliseconds.
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms.load(Ordering::SeqCst)
    }

    /// Current frame index (sequence) or tick (effect session).
    pub fn position(&self) -> u64 {
        self.position.load(Ordering::SeqCst)
    }

    /// The state-machine mode.
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// True while content is loaded.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    /// The latest published frame text.
    ///
    /// Returns `None` until content has been loaded.
    pub fn current_frame(&self) -> Option<String> {
        let cell = self.current.lock().ok()?;
        cell.clone()
    }

    /// Check whether the timing thread is live.
    pub fn is_playing(&self) -> bool {
        self.mode == PlaybackMode::Playing && self.timer_is_alive()
    }

    fn timer_is_alive(&self) -> bool {
        self.timer_thread
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signal the timing thread to stop and wait for it to finish.
    fn halt_timer(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);

        // Also send a command in case the thread is mid-wake.
        if let Some(tx) = self.command_tx.take() {
            let _ = tx.send(TimerCommand::Stop);
        }

        if let Some(handle) = self.timer_thread.take() {
            let _ = handle.join();
        }
    }

    /// Publish the frame at the current position into the shared cell.
    fn publish_current(&self) {
        let text = match self.content.as_deref() {
            Some(PlaybackContent::Sequence(sequence)) => {
                let index = self.position.load(Ordering::SeqCst) as usize;
                sequence.frame(index).map(|frame| frame.to_text())
            }
            Some(PlaybackContent::Effect(session)) => {
                let tick = self.position.load(Ordering::SeqCst);
                if tick == 0 {
                    Some(session.base().to_text())
                } else {
                    Some(session.frame_at(tick).to_text())
                }
            }
            None => None,
        };
        if let Ok(mut cell) = self.current.lock() {
            *cell = text;
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.halt_timer();
    }
}
