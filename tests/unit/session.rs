use std::io::Cursor;

use super::*;
use crate::encode::sink::InMemorySink;

fn named(name: &str, rgba: [u8; 4], w: u32, h: u32) -> NamedRaster {
    NamedRaster::new(name, Raster::filled(w, h, rgba))
}

fn params() -> StereogramParams {
    StereogramParams {
        num_strips: 2,
        ..StereogramParams::default()
    }
}

#[test]
fn batches_are_sorted_individually_and_appended() {
    let mut s = StereoSession::new();
    s.add_depth_maps(vec![
        named("d_10.png", [0; 4], 4, 4),
        named("d_2.png", [0; 4], 4, 4),
    ]);
    s.add_depth_maps(vec![named("d_1.png", [0; 4], 4, 4)]);
    assert_eq!(s.depth_map_names(), &["d_2.png", "d_10.png", "d_1.png"]);

    s.add_textures(vec![
        named("t10.png", [0; 4], 1, 1),
        named("t9.png", [0; 4], 1, 1),
    ]);
    assert_eq!(s.texture_names(), &["t9.png", "t10.png"]);
}

#[test]
fn generate_pairs_textures_in_loaded_order() {
    let mut s = StereoSession::new();
    s.add_depth_maps((0..3).map(|i| named(&format!("d_{i}.png"), [0, 0, 0, 255], 4, 2)).collect());
    s.add_textures(vec![
        named("b.png", [0, 0, 200, 255], 1, 1),
        named("a.png", [200, 0, 0, 255], 1, 1),
    ]);

    let seq = s.generate(&params(), &GenerateThreading::default()).unwrap();
    assert_eq!(seq.len(), 3);
    assert_eq!(seq.frames()[0].pixel(3, 0), [200, 0, 0, 255]);
    assert_eq!(seq.frames()[1].pixel(3, 0), [0, 0, 200, 255]);
    assert_eq!(seq.frames()[2].pixel(3, 0), [200, 0, 0, 255]);
    assert!(Arc::ptr_eq(&seq, &s.sequence().unwrap()));
}

#[test]
fn failed_generate_drops_previous_sequence() {
    let mut s = StereoSession::new();
    s.add_depth_maps(vec![named("d.png", [0, 0, 0, 255], 4, 4)]);
    s.add_textures(vec![named("t.png", [1, 2, 3, 255], 1, 1)]);
    s.generate(&params(), &GenerateThreading::default()).unwrap();
    assert!(s.sequence().is_some());

    let bad = StereogramParams {
        num_strips: 9,
        ..params()
    };
    assert!(matches!(
        s.generate(&bad, &GenerateThreading::default()),
        Err(StereoError::GeometryViolation(_))
    ));
    assert!(s.sequence().is_none());
}

#[test]
fn exports_require_a_generated_sequence() {
    let s = StereoSession::new();
    let mut sink = InMemorySink::new();
    assert!(matches!(
        s.export_frames(&mut sink),
        Err(StereoError::MissingInput(_))
    ));
    assert!(matches!(s.export_gif(10.0), Err(StereoError::MissingInput(_))));
}

#[test]
fn generate_without_inputs_is_missing_input() {
    let mut s = StereoSession::new();
    s.add_textures(vec![named("t.png", [1, 2, 3, 255], 1, 1)]);
    assert!(matches!(
        s.generate(&params(), &GenerateThreading::default()),
        Err(StereoError::MissingInput(_))
    ));
}

#[test]
fn export_frames_uses_preview_rate() {
    let mut s = StereoSession::new();
    s.set_frame_interval_ms(250);
    s.add_depth_maps(vec![
        named("d1.png", [0, 0, 0, 255], 4, 4),
        named("d2.png", [0, 0, 0, 255], 4, 4),
    ]);
    s.add_textures(vec![named("t.png", [1, 2, 3, 255], 1, 1)]);
    s.generate(&params(), &GenerateThreading::default()).unwrap();

    let mut sink = InMemorySink::new();
    s.export_frames(&mut sink).unwrap();
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.config().unwrap().fps, 4.0);

    let gif = s.export_gif(4.0).unwrap();
    assert!(gif.starts_with(b"GIF89a"));
}

#[test]
fn clear_resets_everything() {
    let mut s = StereoSession::new();
    s.add_depth_maps(vec![named("d.png", [0, 0, 0, 255], 4, 4)]);
    s.add_textures(vec![named("t.png", [1, 2, 3, 255], 1, 1)]);
    s.generate(&params(), &GenerateThreading::default()).unwrap();
    s.clear();
    assert!(s.depth_map_names().is_empty());
    assert!(s.texture_names().is_empty());
    assert!(s.sequence().is_none());
}

#[test]
fn files_and_directories_load_as_batches() {
    let dir = std::env::temp_dir().join(format!("stereoloop_session_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("depth")).unwrap();
    let write_png = |path: PathBuf| {
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(4, 4))
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(path, buf).unwrap();
    };
    write_png(dir.join("depth").join("depth_10.png"));
    write_png(dir.join("depth").join("depth_9.png"));
    std::fs::write(dir.join("depth").join("notes.txt"), b"skip me").unwrap();
    write_png(dir.join("tex.png"));

    let mut s = StereoSession::new();
    assert_eq!(s.add_depth_files(&[dir.join("depth")]).unwrap(), 2);
    assert_eq!(s.depth_map_names(), &["depth_9.png", "depth_10.png"]);
    assert_eq!(s.add_texture_files(&[dir.join("tex.png")]).unwrap(), 1);

    std::fs::create_dir_all(dir.join("empty")).unwrap();
    assert!(matches!(
        s.add_texture_files(&[dir.join("empty")]),
        Err(StereoError::MissingInput(_))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}
