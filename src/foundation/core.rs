use image::{RgbaImage, imageops};

use crate::foundation::error::{StereoError, StereoResult};

/// Owned RGBA8 pixel grid (straight alpha, row-major).
///
/// Every input (depth maps, textures) and every intermediate (scaled depth copy, seed strip) is
/// a `Raster`. Pixel accessors follow `image` semantics and panic when `(x, y)` lies outside the
/// raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    img: RgbaImage,
}

impl Raster {
    /// Allocate a `width x height` raster filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            img: RgbaImage::new(width, height),
        }
    }

    /// Allocate a `width x height` raster filled with `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, image::Rgba(rgba)),
        }
    }

    /// Wrap raw RGBA8 bytes. `data.len()` must equal `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> StereoResult<Self> {
        let len = data.len();
        let img = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            StereoError::geometry(format!(
                "rgba8 buffer of {len} bytes does not match {width}x{height}"
            ))
        })?;
        Ok(Self { img })
    }

    /// Wrap an already decoded `image` buffer.
    pub fn from_image(img: RgbaImage) -> Self {
        Self { img }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.img.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    /// Return `true` when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Pixel at `(x, y)` as `[r, g, b, a]`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.img.get_pixel(x, y).0
    }

    /// Overwrite the pixel at `(x, y)`.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.img.put_pixel(x, y, image::Rgba(rgba));
    }

    /// Depth value at `(x, y)`: the red channel.
    pub fn depth_at(&self, x: u32, y: u32) -> u8 {
        self.img.get_pixel(x, y).0[0]
    }

    /// Row-major RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.img.as_raw()
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.img
    }

    /// Borrow the underlying `image` buffer.
    pub fn as_image(&self) -> &RgbaImage {
        &self.img
    }

    /// Unwrap into the underlying `image` buffer.
    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    /// Resample to `width x height`. Returns a plain copy when the size is unchanged.
    pub fn resized(&self, width: u32, height: u32, filter: imageops::FilterType) -> Self {
        if self.dimensions() == (width, height) {
            return self.clone();
        }
        Self {
            img: imageops::resize(&self.img, width, height, filter),
        }
    }

    /// Top-left `width x height` region, clamped to the raster bounds.
    pub fn cropped(&self, width: u32, height: u32) -> Self {
        Self {
            img: imageops::crop_imm(&self.img, 0, 0, width, height).to_image(),
        }
    }

    /// Copy mirrored top-to-bottom (row `r` becomes row `height - 1 - r`).
    pub fn flipped_vertical(&self) -> Self {
        Self {
            img: imageops::flip_vertical(&self.img),
        }
    }

    /// Paint `src` with its top-left corner at `(x, y)`, clipping at the raster edges.
    /// Pixels are replaced, not blended.
    pub fn blit(&mut self, src: &Raster, x: i64, y: i64) {
        imageops::replace(&mut self.img, &src.img, x, y);
    }
}

/// A raster tagged with the file name it was loaded from; used to order inputs.
#[derive(Clone, Debug)]
pub struct NamedRaster {
    /// File name (or any label) used for ordering.
    pub name: String,
    /// Decoded pixels.
    pub raster: Raster,
}

impl NamedRaster {
    /// Pair a name with a raster.
    pub fn new(name: impl Into<String>, raster: Raster) -> Self {
        Self {
            name: name.into(),
            raster,
        }
    }
}

/// One generated stereogram. Frames are immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    raster: Raster,
}

impl Frame {
    pub(crate) fn new(raster: Raster) -> Self {
        Self { raster }
    }

    /// Width in pixels (`scaled depth width + strip width`).
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// Height in pixels (`scaled depth height`).
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Pixel at `(x, y)` as `[r, g, b, a]`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.raster.pixel(x, y)
    }

    /// Borrow the frame pixels.
    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Owned copy of the pixels as an `image` buffer, for encoders.
    pub fn to_image(&self) -> RgbaImage {
        self.raster.as_image().clone()
    }

    /// Give up the frame and keep its pixels.
    pub fn into_raster(self) -> Raster {
        self.raster
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
