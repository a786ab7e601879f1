use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc::{self, RecvTimeoutError},
    },
    thread::JoinHandle,
};

use anyhow::Context as _;

use crate::{
    foundation::core::Frame, foundation::error::StereoResult, render::pipeline::AnimationSequence,
};

/// Player lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// No loop is running.
    Stopped,
    /// A loop thread is showing frames.
    Playing,
}

/// Looping frame cursor: `0, 1, .., len - 1, 0, ..`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackCursor {
    len: usize,
    current: usize,
}

impl PlaybackCursor {
    /// Cursor over `len` frames, starting at frame 0.
    pub fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    /// Frame to show next.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of frames the cursor cycles through.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Return `true` when there is nothing to cycle through.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Step to the next frame, wrapping at the end, and return it.
    pub fn advance(&mut self) -> usize {
        if self.len > 0 {
            self.current = (self.current + 1) % self.len;
        }
        self.current
    }

    /// Go back to frame 0.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}

/// Receives frames from the player loop.
pub trait FrameDisplay: Send {
    /// Show frame `idx`. Runs on the player thread.
    fn show(&mut self, idx: usize, frame: &Frame);
}

impl<F> FrameDisplay for F
where
    F: FnMut(usize, &Frame) + Send,
{
    fn show(&mut self, idx: usize, frame: &Frame) {
        self(idx, frame)
    }
}

/// Loops an [`AnimationSequence`] on a background thread at the sequence's frame interval.
///
/// `stop` (or dropping the player) wakes the loop, waits for an in-flight `show` to return and
/// joins the thread.
#[derive(Debug)]
pub struct AnimationPlayer {
    playing: Arc<AtomicBool>,
    current: Arc<AtomicUsize>,
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationPlayer {
    /// Create a stopped player.
    pub fn new() -> Self {
        Self {
            playing: Arc::new(AtomicBool::new(false)),
            current: Arc::new(AtomicUsize::new(0)),
            stop_tx: None,
            handle: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PlayerState {
        if self.handle.is_some() && self.playing.load(Ordering::Acquire) {
            PlayerState::Playing
        } else {
            PlayerState::Stopped
        }
    }

    /// Index of the frame most recently handed to the display (0 before the first one).
    pub fn current_frame(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    /// Start looping `sequence` from frame 0, replacing any running loop.
    ///
    /// An empty sequence leaves the player stopped.
    pub fn play<D>(&mut self, sequence: Arc<AnimationSequence>, mut display: D) -> StereoResult<()>
    where
        D: FrameDisplay + 'static,
    {
        self.stop();
        if sequence.is_empty() {
            tracing::debug!("play ignored: empty sequence");
            return Ok(());
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let playing = Arc::clone(&self.playing);
        let current = Arc::clone(&self.current);
        let interval = sequence.frame_interval();
        current.store(0, Ordering::Release);
        playing.store(true, Ordering::Release);

        let spawned = std::thread::Builder::new()
            .name("stereoloop-player".to_owned())
            .spawn(move || {
                let _running = ClearOnExit(Arc::clone(&playing));
                let mut cursor = PlaybackCursor::new(sequence.len());
                loop {
                    if !playing.load(Ordering::Acquire) {
                        break;
                    }
                    let idx = cursor.current();
                    current.store(idx, Ordering::Release);
                    if let Some(frame) = sequence.get(idx) {
                        display.show(idx, frame);
                    }
                    cursor.advance();
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .context("spawn player thread");
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.playing.store(false, Ordering::Release);
                return Err(e.into());
            }
        };

        self.stop_tx = Some(stop_tx);
        self.handle = Some(handle);
        tracing::info!(interval_ms = interval.as_millis() as u64, "player started");
        Ok(())
    }

    /// Stop the loop and join its thread. No-op when already stopped.
    pub fn stop(&mut self) {
        self.playing.store(false, Ordering::Release);
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("player display panicked");
            }
            tracing::info!("player stopped");
        }
    }
}

// Marks the player stopped however the loop thread ends, including a panicking display.
struct ClearOnExit(Arc<AtomicBool>);

impl Drop for ClearOnExit {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Drop for AnimationPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anim/player.rs"]
mod tests;
