use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::{DynamicImage, ImageFormat};

use crate::{
    encode::sink::{FrameSink, SinkConfig, check_order},
    foundation::core::Frame,
    foundation::error::{StereoError, StereoResult},
};

/// Still-image format for [`ImageSequenceSink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SequenceFormat {
    /// Baseline JPEG (alpha dropped).
    #[default]
    Jpeg,
    /// Lossless PNG.
    Png,
}

impl SequenceFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// File name of frame `idx`: `{prefix}_{idx:03}.{ext}`.
pub fn sequence_file_name(prefix: &str, idx: usize, format: SequenceFormat) -> String {
    format!("{prefix}_{idx:03}.{}", format.extension())
}

/// Writes each frame as a numbered still image inside one directory.
#[derive(Debug)]
pub struct ImageSequenceSink {
    dir: PathBuf,
    prefix: String,
    format: SequenceFormat,
    started: bool,
    last_idx: Option<usize>,
    written: Vec<PathBuf>,
}

impl ImageSequenceSink {
    /// Write `stereo_NNN.jpg` files into `dir` (created on `begin`).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            prefix: "stereo".to_owned(),
            format: SequenceFormat::default(),
            started: false,
            last_idx: None,
            written: Vec::new(),
        }
    }

    /// Replace the file name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replace the output format.
    pub fn with_format(mut self, format: SequenceFormat) -> Self {
        self.format = format;
        self
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FrameSink for ImageSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> StereoResult<()> {
        if self.prefix.is_empty() {
            return Err(StereoError::invalid_parameter("image sequence prefix must not be empty"));
        }
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create output directory '{}'", self.dir.display())
        })?;
        self.started = true;
        self.last_idx = None;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &Frame) -> StereoResult<()> {
        if !self.started {
            return Err(StereoError::encoding("image sequence sink not started"));
        }
        check_order(&mut self.last_idx, idx)?;

        let path = self
            .dir
            .join(sequence_file_name(&self.prefix, idx, self.format));
        let img = DynamicImage::ImageRgba8(frame.to_image());
        let result = match self.format {
            SequenceFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8())
                .save_with_format(&path, ImageFormat::Jpeg),
            SequenceFormat::Png => img.save_with_format(&path, ImageFormat::Png),
        };
        result.map_err(|e| {
            StereoError::encoding(format!("failed to write '{}': {e}", path.display()))
        })?;

        tracing::debug!(path = %path.display(), "wrote frame");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> StereoResult<()> {
        if !self.started {
            return Err(StereoError::encoding("image sequence sink not started"));
        }
        self.started = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sequence.rs"]
mod tests;
