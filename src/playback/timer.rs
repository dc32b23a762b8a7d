//! Background timing-loop thread.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::PlaybackContent;

/// Commands sent to the timing thread.
pub enum TimerCommand {
    Stop,
}

/// Run the playback clock until told to stop.
///
/// Each pass sleeps for the configured interval, re-checks for a stop so a
/// cancellation during the sleep publishes nothing, then advances position
/// and publishes the new current frame's text. Sequences advance the frame
/// index modulo length; effect sessions advance the tick without bound.
pub fn run_playback_loop(
    content: Arc<PlaybackContent>,
    position: Arc<AtomicU64>,
    current: Arc<Mutex<Option<String>>>,
    interval_ms: Arc<AtomicU64>,
    stop: Arc<AtomicBool>,
    rx: Receiver<TimerCommand>,
) {
    while !stop.load(Ordering::Relaxed) {
        let interval = interval_ms.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(interval));

        // At most this one sleep is wasted on cancellation.
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if let Ok(TimerCommand::Stop) = rx.try_recv() {
            break;
        }

        let text = match &*content {
            PlaybackContent::Sequence(sequence) => {
                let next = (position.load(Ordering::Relaxed) + 1) % sequence.len() as u64;
                position.store(next, Ordering::Relaxed);
                sequence.frame(next as usize).map(|frame| frame.to_text())
            }
            PlaybackContent::Effect(session) => {
                let tick = position.fetch_add(1, Ordering::Relaxed) + 1;
                Some(session.frame_at(tick).to_text())
            }
        };

        if let Some(text) = text {
            if let Ok(mut cell) = current.lock() {
                *cell = Some(text);
            }
        }
    }
}
