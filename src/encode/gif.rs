use std::{io::Write, time::Duration};

use image::{
    Delay,
    codecs::gif::{GifEncoder, Repeat},
};

use crate::{
    encode::sink::{FrameSink, SinkConfig, check_order, export_sequence},
    foundation::core::Frame,
    foundation::error::{StereoError, StereoResult},
    foundation::math::frame_delay_ms,
    render::pipeline::AnimationSequence,
};

/// Animated GIF sink. Loops forever; every frame is shown for `1000 / fps` ms.
///
/// All frames must match the size announced in `begin`. The GIF trailer is written by `end`.
pub struct GifSink<W: Write + Send> {
    writer: Option<W>,
    encoder: Option<GifEncoder<W>>,
    cfg: Option<SinkConfig>,
    delay: Delay,
    last_idx: Option<usize>,
}

impl<W: Write + Send> GifSink<W> {
    /// Encode into `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
            encoder: None,
            cfg: None,
            delay: Delay::from_numer_denom_ms(0, 1),
            last_idx: None,
        }
    }
}

impl<W: Write + Send> FrameSink for GifSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> StereoResult<()> {
        let delay_ms = frame_delay_ms(cfg.fps)?;
        if cfg.width == 0 || cfg.height == 0 {
            return Err(StereoError::geometry("gif frames must have non-zero size"));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(StereoError::geometry(format!(
                "{}x{} exceeds the gif size limit",
                cfg.width, cfg.height
            )));
        }
        let writer = self
            .writer
            .take()
            .ok_or_else(|| StereoError::encoding("gif sink already started"))?;

        let mut encoder = GifEncoder::new(writer);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| StereoError::encoding(format!("gif set repeat: {e}")))?;

        self.delay = Delay::from_saturating_duration(Duration::from_secs_f64(delay_ms / 1000.0));
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &Frame) -> StereoResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg.as_ref(), self.encoder.as_mut()) else {
            return Err(StereoError::encoding("gif sink not started"));
        };
        check_order(&mut self.last_idx, idx)?;
        if (frame.width(), frame.height()) != (cfg.width, cfg.height) {
            return Err(StereoError::geometry(format!(
                "gif frame {idx} is {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }

        encoder
            .encode_frame(image::Frame::from_parts(frame.to_image(), 0, 0, self.delay))
            .map_err(|e| StereoError::encoding(format!("gif frame {idx}: {e}")))?;
        Ok(())
    }

    fn end(&mut self) -> StereoResult<()> {
        // Dropping the encoder writes the trailer.
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| StereoError::encoding("gif sink not started"))?;
        drop(encoder);
        self.cfg = None;
        Ok(())
    }
}

/// Encode a whole sequence as a looping animated GIF and return the file bytes.
pub fn encode_gif(sequence: &AnimationSequence, fps: f64) -> StereoResult<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut sink = GifSink::new(&mut buf);
        export_sequence(sequence, &mut sink, fps)?;
    }
    tracing::debug!(bytes = buf.len(), "encoded gif");
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
