use crate::{
    foundation::core::Frame,
    foundation::error::{StereoError, StereoResult},
    foundation::math::frame_delay_ms,
    render::pipeline::AnimationSequence,
};

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SinkConfig {
    /// Width of the first frame in pixels.
    pub width: u32,
    /// Height of the first frame in pixels.
    pub height: u32,
    /// Playback rate; finite and positive.
    pub fps: f64,
}

/// Sink contract for consuming generated frames in sequence order.
///
/// Ordering contract: `push_frame` is called with strictly increasing indices, starting at 0.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> StereoResult<()>;
    /// Push one frame in sequence order.
    fn push_frame(&mut self, idx: usize, frame: &Frame) -> StereoResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> StereoResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(usize, Frame)>,
    finished: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(usize, Frame)] {
        &self.frames
    }

    /// Return `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> StereoResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &Frame) -> StereoResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> StereoResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Feed every frame of `sequence` to `sink` in order.
///
/// `fps` must be finite and positive. An empty sequence is a [`StereoError::MissingInput`];
/// the sink is not started in that case.
#[tracing::instrument(skip(sequence, sink), fields(frames = sequence.len()))]
pub fn export_sequence(
    sequence: &AnimationSequence,
    sink: &mut dyn FrameSink,
    fps: f64,
) -> StereoResult<()> {
    frame_delay_ms(fps)?;
    let Some(first) = sequence.frames().first() else {
        return Err(StereoError::missing_input("no frames to export"));
    };

    sink.begin(SinkConfig {
        width: first.width(),
        height: first.height(),
        fps,
    })?;
    for (idx, frame) in sequence.frames().iter().enumerate() {
        sink.push_frame(idx, frame)?;
    }
    sink.end()?;

    tracing::info!(frames = sequence.len(), "exported sequence");
    Ok(())
}

pub(crate) fn check_order(last: &mut Option<usize>, idx: usize) -> StereoResult<()> {
    if let Some(prev) = *last
        && idx <= prev
    {
        return Err(StereoError::encoding(format!(
            "out-of-order frame index {idx} after {prev}"
        )));
    }
    *last = Some(idx);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
