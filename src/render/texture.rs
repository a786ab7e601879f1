use std::borrow::Cow;

use image::imageops::FilterType;

use crate::{
    foundation::core::Raster,
    foundation::error::{StereoError, StereoResult},
    foundation::math::{check_raster_dims, margin_len, proportional_len},
    render::params::{StereogramParams, StripFit},
};

/// Build the seed strip: a `strip_width x strip_height` raster painted from `texture`.
///
/// Without tiling the texture is only ever scaled up: first to `ceil(strip_width * 1.1)` wide
/// (keeping aspect), then, if still too short, to `strip_height` tall (keeping aspect again).
/// With tiling the texture is scaled to `ceil(strip_width * 1.1)` wide and repeated downwards,
/// see [`tile_vertically`]. The result is then fitted into the strip per
/// [`StereogramParams::strip_fit`].
pub fn prepare_strip(
    texture: &Raster,
    strip_width: u32,
    strip_height: u32,
    params: &StereogramParams,
) -> StereoResult<Raster> {
    if texture.is_empty() {
        return Err(StereoError::geometry(format!(
            "texture must have non-zero dimensions (got {}x{})",
            texture.width(),
            texture.height()
        )));
    }
    if strip_width == 0 || strip_height == 0 {
        return Err(StereoError::geometry(format!(
            "strip must have non-zero dimensions (got {strip_width}x{strip_height})"
        )));
    }

    let filter = params.resample.filter();
    let prepared = if params.tile_texture {
        let tile_w = margin_len(strip_width);
        let tile_h = proportional_len(texture.height(), tile_w, texture.width());
        check_raster_dims("texture tile", tile_w, tile_h)?;
        let tile = texture.resized(tile_w, tile_h, filter);
        Cow::Owned(tile_vertically(&tile, strip_height, params.mirror_tiles))
    } else {
        upscale_to_cover(texture, strip_width, strip_height, filter)?
    };

    Ok(match params.strip_fit {
        StripFit::Clip => prepared.cropped(strip_width, strip_height),
        StripFit::Stretch => prepared.resized(strip_width, strip_height, filter),
    })
}

/// Repeat `tile` top to bottom into a raster of `height` rows (same width as `tile`).
///
/// Tile `k` starts at row `k * tile.height()`; the last one is clipped. With `mirror`, odd
/// tiles are flipped vertically so neighbouring tiles meet at a reflected edge.
pub fn tile_vertically(tile: &Raster, height: u32, mirror: bool) -> Raster {
    let mut out = Raster::new(tile.width(), height);
    let tile_h = tile.height();
    if tile_h == 0 {
        return out;
    }

    let flipped = mirror.then(|| tile.flipped_vertical());
    for k in 0..height.div_ceil(tile_h) {
        let src = match &flipped {
            Some(f) if k % 2 == 1 => f,
            _ => tile,
        };
        out.blit(src, 0, i64::from(k) * i64::from(tile_h));
    }
    out
}

// The two passes are independent, so a texture that is both too narrow and too short can
// end up scaled twice.
fn upscale_to_cover(
    texture: &Raster,
    strip_width: u32,
    strip_height: u32,
    filter: FilterType,
) -> StereoResult<Cow<'_, Raster>> {
    let mut out = Cow::Borrowed(texture);

    let min_w = margin_len(strip_width);
    if out.width() < min_w {
        let h = proportional_len(out.height(), min_w, out.width());
        check_raster_dims("upscaled texture", min_w, h)?;
        out = Cow::Owned(out.resized(min_w, h, filter));
    }
    if out.height() < strip_height {
        let w = proportional_len(out.width(), strip_height, out.height());
        check_raster_dims("upscaled texture", w, strip_height)?;
        out = Cow::Owned(out.resized(w, strip_height, filter));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/texture.rs"]
mod tests;
