//! stereoloop turns depth maps and repeating textures into single-image stereograms (SIRDS) and
//! looping stereogram animations.
//!
//! # Pipeline overview
//!
//! 1. **Load**: decode depth maps and textures into [`Raster`]s (usually through a
//!    [`StereoSession`], which keeps inputs in frame order).
//! 2. **Prepare**: scale the depth map, build a [`ShiftTable`] and the seed strip
//!    ([`prepare_strip`]).
//! 3. **Compose**: resample the seed strip across the image width, shifted per depth
//!    ([`compose`]).
//! 4. **Sequence**: repeat for every depth map, pairing textures cyclically
//!    ([`generate_all`]).
//! 5. **Present**: loop frames with an [`AnimationPlayer`] and/or push them into a
//!    [`FrameSink`] (numbered still images or an animated GIF).
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: the same inputs and parameters always produce the same pixels, whether
//!   frames and rows are computed sequentially or in parallel.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod anim;
mod assets;
mod encode;
mod foundation;
mod render;
mod session;

pub use anim::player::{AnimationPlayer, FrameDisplay, PlaybackCursor, PlayerState};
pub use assets::decode::{collect_image_paths, decode_raster, is_image_path, load_raster};
pub use assets::order::{frame_number_key, natural_cmp, sort_depth_inputs, sort_texture_inputs};
pub use encode::gif::{GifSink, encode_gif};
pub use encode::sequence::{ImageSequenceSink, SequenceFormat, sequence_file_name};
pub use encode::sink::{FrameSink, InMemorySink, SinkConfig, export_sequence};
pub use foundation::core::{Frame, NamedRaster, Raster};
pub use foundation::error::{StereoError, StereoResult};
pub use foundation::math::{MAX_RASTER_DIM, frame_delay_ms, margin_len, scaled_len};
pub use render::compositor::{RowMode, compose};
pub use render::params::{Resample, StereogramParams, StripFit};
pub use render::pipeline::{
    AnimationSequence, DEFAULT_FRAME_INTERVAL_MS, GenerateThreading, generate_all, generate_frame,
};
pub use render::shift::{MAX_DISPARITY_PX, ShiftTable};
pub use render::texture::{prepare_strip, tile_vertically};
pub use session::StereoSession;
