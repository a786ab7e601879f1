use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{StereoError, StereoResult};

/// Resampling filter used when scaling depth maps and textures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resample {
    /// Nearest-neighbour: hard edges, exact source values.
    Nearest,
    /// Bilinear (triangle) filtering.
    #[default]
    Bilinear,
}

impl Resample {
    pub(crate) fn filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
        }
    }
}

/// How the prepared texture is fitted into the seed strip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StripFit {
    /// Keep the top-left `strip_width x strip_height` region of the prepared texture.
    #[default]
    Clip,
    /// Squeeze the whole prepared texture into the strip.
    Stretch,
}

/// Parameters shared by every frame of one generation call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StereogramParams {
    /// Number of depth-shifted strip repetitions across the scaled depth width (>= 1).
    pub num_strips: u32,
    /// Disparity multiplier; `0` disables depth entirely (>= 0).
    pub depth_multiplier: f64,
    /// Scale applied to each depth map before generation (> 0).
    pub image_scale: f64,
    /// Tile the texture vertically instead of stretching it to the strip height.
    pub tile_texture: bool,
    /// Flip every odd tile vertically (only meaningful with `tile_texture`).
    pub mirror_tiles: bool,
    /// Resampling filter for depth and texture scaling.
    pub resample: Resample,
    /// Seed strip fitting mode.
    pub strip_fit: StripFit,
}

impl Default for StereogramParams {
    fn default() -> Self {
        Self {
            num_strips: 6,
            depth_multiplier: 1.0,
            image_scale: 1.0,
            tile_texture: false,
            mirror_tiles: false,
            resample: Resample::default(),
            strip_fit: StripFit::default(),
        }
    }
}

impl StereogramParams {
    /// Check numeric ranges. Called before any raster work begins.
    pub fn validate(&self) -> StereoResult<()> {
        if self.num_strips < 1 {
            return Err(StereoError::invalid_parameter("num_strips must be >= 1"));
        }
        if !self.depth_multiplier.is_finite() || self.depth_multiplier < 0.0 {
            return Err(StereoError::invalid_parameter(format!(
                "depth_multiplier must be a finite number >= 0 (got {})",
                self.depth_multiplier
            )));
        }
        if !self.image_scale.is_finite() || self.image_scale <= 0.0 {
            return Err(StereoError::invalid_parameter(format!(
                "image_scale must be a finite number > 0 (got {})",
                self.image_scale
            )));
        }
        Ok(())
    }

    /// Load parameters from a JSON file; missing fields take their defaults.
    pub fn from_path(path: &Path) -> StereoResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open stereogram params '{}'", path.display()))?;
        let params: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse stereogram params '{}'", path.display()))?;
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/params.rs"]
mod tests;
