use rayon::prelude::*;

use crate::{
    foundation::core::{Frame, Raster},
    foundation::error::{StereoError, StereoResult},
    render::shift::ShiftTable,
};

/// Row scheduling inside one frame. Rows never read each other, so both modes produce
/// identical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowMode {
    /// Rows top to bottom on the calling thread.
    #[default]
    Sequential,
    /// Rows spread over the current rayon pool.
    Parallel,
}

/// Composite one stereogram frame.
///
/// `depth` is the depth map already scaled to the output resolution and `strip` the prepared
/// seed strip, which must be `(depth.width() / num_strips) x depth.height()`.
///
/// The output is `depth.width() + strip_width` wide. Columns `[0, strip_width)` hold the seed
/// strip; each following strip-width run copies pixels from one strip to the left, displaced
/// right by the depth-dependent shift. Source columns are clamped to the output width, and a
/// source pixel that has not been painted yet reads as black. Alpha is forced opaque.
pub fn compose(
    depth: &Raster,
    strip: &Raster,
    num_strips: u32,
    shifts: &ShiftTable,
    rows: RowMode,
) -> StereoResult<Frame> {
    if num_strips < 1 {
        return Err(StereoError::invalid_parameter("num_strips must be >= 1"));
    }
    let (depth_w, depth_h) = depth.dimensions();
    let strip_w = depth_w / num_strips;
    if strip_w < 1 {
        return Err(StereoError::geometry(format!(
            "num_strips ({num_strips}) exceeds scaled depth width ({depth_w}); \
             strip width would be 0"
        )));
    }
    if depth_h == 0 {
        return Err(StereoError::geometry("scaled depth map has zero height"));
    }
    if strip.dimensions() != (strip_w, depth_h) {
        return Err(StereoError::geometry(format!(
            "seed strip is {}x{}, expected {strip_w}x{depth_h}",
            strip.width(),
            strip.height()
        )));
    }

    let out_w = depth_w
        .checked_add(strip_w)
        .ok_or_else(|| StereoError::geometry("output width overflows u32"))?;
    let mut out = Raster::new(out_w, depth_h);
    out.blit(strip, 0, 0);

    let row_len = out_w as usize * 4;
    let bytes = out.as_bytes_mut();
    match rows {
        RowMode::Sequential => bytes
            .chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| shift_row(row, y as u32, depth, strip_w, num_strips, shifts)),
        RowMode::Parallel => bytes
            .par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| shift_row(row, y as u32, depth, strip_w, num_strips, shifts)),
    }

    Ok(Frame::new(out))
}

// Strips are filled left to right, each reading from the already painted region of the row.
fn shift_row(
    row: &mut [u8],
    y: u32,
    depth: &Raster,
    strip_w: u32,
    num_strips: u32,
    shifts: &ShiftTable,
) {
    let last_col = row.len() / 4 - 1;
    for o in 0..num_strips {
        let strip_x = o * strip_w;
        for x in 0..strip_w {
            let shift = shifts.shift(depth.depth_at(x + strip_x, y));
            let src = ((x + strip_x).saturating_add(shift) as usize).min(last_col) * 4;
            let dst = (x + strip_x + strip_w) as usize * 4;
            row.copy_within(src..src + 3, dst);
            row[dst + 3] = 255;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
