use std::{path::PathBuf, sync::Arc};

use crate::{
    assets::decode::{collect_image_paths, load_raster},
    assets::order::{sort_depth_inputs, sort_texture_inputs},
    encode::gif::encode_gif,
    encode::sink::{FrameSink, export_sequence},
    foundation::core::{NamedRaster, Raster},
    foundation::error::{StereoError, StereoResult},
    render::params::StereogramParams,
    render::pipeline::{
        AnimationSequence, DEFAULT_FRAME_INTERVAL_MS, GenerateThreading, generate_all,
    },
};

/// Accumulated inputs and the most recently generated sequence.
///
/// Inputs arrive in batches. Each batch is sorted on its own (depth maps by frame number,
/// textures naturally by name) and appended after earlier batches.
#[derive(Debug)]
pub struct StereoSession {
    depth_names: Vec<String>,
    depth_maps: Vec<Raster>,
    texture_names: Vec<String>,
    textures: Vec<Raster>,
    frame_interval_ms: u64,
    sequence: Option<Arc<AnimationSequence>>,
}

impl Default for StereoSession {
    fn default() -> Self {
        Self::new()
    }
}

impl StereoSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self {
            depth_names: Vec::new(),
            depth_maps: Vec::new(),
            texture_names: Vec::new(),
            textures: Vec::new(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            sequence: None,
        }
    }

    /// Append a batch of depth maps, sorted by the frame number in their names.
    pub fn add_depth_maps(&mut self, mut batch: Vec<NamedRaster>) -> usize {
        sort_depth_inputs(&mut batch);
        for item in batch {
            self.depth_names.push(item.name);
            self.depth_maps.push(item.raster);
        }
        tracing::info!(total = self.depth_maps.len(), "loaded depth maps");
        self.depth_maps.len()
    }

    /// Load depth-map files (directories are expanded) and append them as one batch.
    pub fn add_depth_files(&mut self, paths: &[PathBuf]) -> StereoResult<usize> {
        let batch = load_batch(paths, "depth map")?;
        Ok(self.add_depth_maps(batch))
    }

    /// Append a batch of textures, sorted naturally by name.
    pub fn add_textures(&mut self, mut batch: Vec<NamedRaster>) -> usize {
        sort_texture_inputs(&mut batch);
        for item in batch {
            self.texture_names.push(item.name);
            self.textures.push(item.raster);
        }
        tracing::info!(total = self.textures.len(), "loaded textures");
        self.textures.len()
    }

    /// Load texture files (directories are expanded) and append them as one batch.
    pub fn add_texture_files(&mut self, paths: &[PathBuf]) -> StereoResult<usize> {
        let batch = load_batch(paths, "texture")?;
        Ok(self.add_textures(batch))
    }

    /// Depth-map names in generation order.
    pub fn depth_map_names(&self) -> &[String] {
        &self.depth_names
    }

    /// Texture names in pairing order.
    pub fn texture_names(&self) -> &[String] {
        &self.texture_names
    }

    /// Preview interval given to generated sequences.
    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    /// Change the preview interval for the next `generate`.
    pub fn set_frame_interval_ms(&mut self, ms: u64) {
        self.frame_interval_ms = ms;
    }

    /// Last generated sequence, if any.
    pub fn sequence(&self) -> Option<Arc<AnimationSequence>> {
        self.sequence.clone()
    }

    /// Generate one frame per loaded depth map.
    ///
    /// The previous sequence is discarded first, so a failed run leaves no frames behind.
    #[tracing::instrument(skip(self, threading))]
    pub fn generate(
        &mut self,
        params: &StereogramParams,
        threading: &GenerateThreading,
    ) -> StereoResult<Arc<AnimationSequence>> {
        self.sequence = None;
        let sequence = generate_all(&self.depth_maps, &self.textures, params, threading)?
            .with_frame_interval_ms(self.frame_interval_ms);
        let sequence = Arc::new(sequence);
        self.sequence = Some(Arc::clone(&sequence));
        Ok(sequence)
    }

    /// Push the generated frames through `sink` at the preview rate.
    pub fn export_frames(&self, sink: &mut dyn FrameSink) -> StereoResult<()> {
        let sequence = self.require_sequence()?;
        let fps = 1000.0 / sequence.frame_interval_ms().max(1) as f64;
        export_sequence(sequence, sink, fps)
    }

    /// Encode the generated frames as a looping GIF at `fps`.
    pub fn export_gif(&self, fps: f64) -> StereoResult<Vec<u8>> {
        encode_gif(self.require_sequence()?, fps)
    }

    /// Forget all inputs and the generated sequence.
    pub fn clear(&mut self) {
        self.depth_names.clear();
        self.depth_maps.clear();
        self.texture_names.clear();
        self.textures.clear();
        self.sequence = None;
    }

    fn require_sequence(&self) -> StereoResult<&AnimationSequence> {
        self.sequence
            .as_deref()
            .ok_or_else(|| StereoError::missing_input("no generated sequence; run generate first"))
    }
}

fn load_batch(paths: &[PathBuf], kind: &str) -> StereoResult<Vec<NamedRaster>> {
    let files = collect_image_paths(paths)?;
    if files.is_empty() {
        return Err(StereoError::missing_input(format!("no {kind} image files found")));
    }
    files.iter().map(|p| load_raster(p)).collect()
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
