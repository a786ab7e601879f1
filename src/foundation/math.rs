use crate::foundation::error::{StereoError, StereoResult};

/// Largest width or height of any raster built during generation (the GIF size limit).
pub const MAX_RASTER_DIM: u32 = 65_535;

/// `floor(len * scale)`, saturating into `u32`.
pub fn scaled_len(len: u32, scale: f64) -> u32 {
    (f64::from(len) * scale).floor() as u32
}

/// `ceil(len * 1.1)`: strip width plus the texture safety margin.
pub fn margin_len(len: u32) -> u32 {
    (f64::from(len) * 1.1).ceil() as u32
}

/// Per-frame delay in milliseconds for a frame rate: `1000 / fps`.
pub fn frame_delay_ms(fps: f64) -> StereoResult<f64> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(StereoError::invalid_parameter(format!(
            "frame rate must be a finite number > 0 (got {fps})"
        )));
    }
    Ok(1000.0 / fps)
}

/// Reject a `width x height` raster larger than [`MAX_RASTER_DIM`] on either side.
pub(crate) fn check_raster_dims(what: &str, width: u32, height: u32) -> StereoResult<()> {
    if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
        return Err(StereoError::geometry(format!(
            "{what} would be {width}x{height}, above the {MAX_RASTER_DIM} px limit"
        )));
    }
    Ok(())
}

/// Rescale `len` by `num / den`, rounding to nearest and never returning zero.
pub(crate) fn proportional_len(len: u32, num: u32, den: u32) -> u32 {
    let v = (f64::from(len) * f64::from(num) / f64::from(den.max(1))).round();
    (v as u32).max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
