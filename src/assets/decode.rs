use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::{
    core::{NamedRaster, Raster},
    error::{StereoError, StereoResult},
};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

/// Decode an encoded image (any format `image` recognises) into an RGBA8 raster.
pub fn decode_raster(bytes: &[u8]) -> StereoResult<Raster> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(Raster::from_image(dyn_img.to_rgba8()))
}

/// Load an image file, keeping its file name for input ordering.
#[tracing::instrument]
pub fn load_raster(path: &Path) -> StereoResult<NamedRaster> {
    let dyn_img = image::open(path).with_context(|| format!("open image '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(NamedRaster::new(name, Raster::from_image(dyn_img.to_rgba8())))
}

/// Return `true` when the path carries a known raster extension (case-insensitive).
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Expand input paths: files are kept as given, directories are replaced by the image files
/// they directly contain (sorted by path). Non-image directory entries are skipped.
pub fn collect_image_paths(paths: &[PathBuf]) -> StereoResult<Vec<PathBuf>> {
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        if path.is_dir() {
            let mut found = Vec::new();
            let entries = std::fs::read_dir(path)
                .with_context(|| format!("read directory '{}'", path.display()))?;
            for entry in entries {
                let entry =
                    entry.with_context(|| format!("read directory '{}'", path.display()))?;
                let p = entry.path();
                if p.is_file() && is_image_path(&p) {
                    found.push(p);
                }
            }
            found.sort();
            if found.is_empty() {
                tracing::warn!(dir = %path.display(), "directory contains no image files");
            }
            out.extend(found);
        } else if path.exists() {
            out.push(path.clone());
        } else {
            return Err(StereoError::missing_input(format!(
                "input path '{}' does not exist",
                path.display()
            )));
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
