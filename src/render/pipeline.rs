use std::time::Duration;

use rayon::prelude::*;

use crate::{
    foundation::core::{Frame, Raster},
    foundation::error::{StereoError, StereoResult},
    foundation::math::{check_raster_dims, scaled_len},
    render::compositor::{RowMode, compose},
    render::params::StereogramParams,
    render::shift::ShiftTable,
    render::texture::prepare_strip,
};

/// Preview delay between frames when none is configured.
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 150;

/// Ordered, loopable list of generated frames.
///
/// Frame `i` was generated from depth map `i`; the order is never changed after generation.
#[derive(Clone, Debug)]
pub struct AnimationSequence {
    frames: Vec<Frame>,
    frame_interval_ms: u64,
}

impl AnimationSequence {
    /// Wrap frames with the default preview interval.
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }

    /// Return the sequence with a different preview interval.
    pub fn with_frame_interval_ms(mut self, ms: u64) -> Self {
        self.frame_interval_ms = ms;
        self
    }

    /// Frames in generation order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Frame `idx`, if present.
    pub fn get(&self, idx: usize) -> Option<&Frame> {
        self.frames.get(idx)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Return `true` when there are no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Preview delay between frames in milliseconds.
    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    /// Preview delay between frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Threading controls for multi-frame generation.
#[derive(Clone, Debug, Default)]
pub struct GenerateThreading {
    /// Generate frames concurrently on a rayon pool.
    pub parallel: bool,
    /// Optional explicit worker thread count (parallel mode only, must be >= 1).
    pub threads: Option<usize>,
    /// Spread the rows of each frame over the rayon pool.
    pub parallel_rows: bool,
}

impl GenerateThreading {
    fn row_mode(&self) -> RowMode {
        if self.parallel_rows {
            RowMode::Parallel
        } else {
            RowMode::Sequential
        }
    }
}

/// Generate a single stereogram from one depth map and one texture.
#[tracing::instrument(
    skip(depth, texture),
    fields(depth = ?depth.dimensions(), texture = ?texture.dimensions())
)]
pub fn generate_frame(
    depth: &Raster,
    texture: &Raster,
    params: &StereogramParams,
    rows: RowMode,
) -> StereoResult<Frame> {
    params.validate()?;
    if texture.is_empty() {
        return Err(StereoError::geometry("texture must have non-zero dimensions"));
    }
    let shifts = ShiftTable::build(params.depth_multiplier);
    generate_frame_unchecked(depth, texture, params, &shifts, rows)
}

/// Generate one frame per depth map, pairing depth map `i` with `textures[i % textures.len()]`.
///
/// Any failure aborts the whole batch; no partial sequence is returned. In parallel mode frames
/// are computed concurrently but still returned in depth-map order.
#[tracing::instrument(
    skip_all,
    fields(depth_maps = depth_maps.len(), textures = textures.len(), parallel = threading.parallel)
)]
pub fn generate_all(
    depth_maps: &[Raster],
    textures: &[Raster],
    params: &StereogramParams,
    threading: &GenerateThreading,
) -> StereoResult<AnimationSequence> {
    if depth_maps.is_empty() {
        return Err(StereoError::missing_input("no depth maps loaded"));
    }
    if textures.is_empty() {
        return Err(StereoError::missing_input("no textures loaded"));
    }
    params.validate()?;
    if let Some(idx) = textures.iter().position(Raster::is_empty) {
        return Err(StereoError::geometry(format!(
            "texture {idx} must have non-zero dimensions"
        )));
    }

    let shifts = ShiftTable::build(params.depth_multiplier);
    let rows = threading.row_mode();
    let total = depth_maps.len();
    let render = |i: usize| -> StereoResult<Frame> {
        let tex_idx = i % textures.len();
        tracing::debug!(frame = i + 1, total, texture = tex_idx, "generating frame");
        generate_frame_unchecked(&depth_maps[i], &textures[tex_idx], params, &shifts, rows)
    };

    let frames = if threading.parallel {
        let pool = build_thread_pool(threading.threads)?;
        pool.install(|| {
            (0..total)
                .into_par_iter()
                .map(render)
                .collect::<StereoResult<Vec<_>>>()
        })?
    } else {
        (0..total).map(render).collect::<StereoResult<Vec<_>>>()?
    };

    tracing::info!(frames = frames.len(), "generated stereogram frames");
    Ok(AnimationSequence::new(frames))
}

fn generate_frame_unchecked(
    depth: &Raster,
    texture: &Raster,
    params: &StereogramParams,
    shifts: &ShiftTable,
    rows: RowMode,
) -> StereoResult<Frame> {
    let width = scaled_len(depth.width(), params.image_scale);
    let height = scaled_len(depth.height(), params.image_scale);
    if width == 0 || height == 0 {
        return Err(StereoError::geometry(format!(
            "depth map {}x{} scales to {width}x{height} at scale {}",
            depth.width(),
            depth.height(),
            params.image_scale
        )));
    }
    check_raster_dims("scaled depth map", width, height)?;
    let strip_w = width / params.num_strips;
    if strip_w < 1 {
        return Err(StereoError::geometry(format!(
            "num_strips ({}) exceeds scaled depth width ({width}); strip width would be 0",
            params.num_strips
        )));
    }

    let scaled = depth.resized(width, height, params.resample.filter());
    let strip = prepare_strip(texture, strip_w, height, params)?;
    compose(&scaled, &strip, params.num_strips, shifts, rows)
}

fn build_thread_pool(threads: Option<usize>) -> StereoResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(StereoError::invalid_parameter(
            "generate threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| StereoError::from(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
