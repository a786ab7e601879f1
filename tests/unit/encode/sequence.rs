use super::*;
use crate::foundation::core::Raster;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir =
        std::env::temp_dir().join(format!("stereoloop_sequence_{tag}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 3,
        fps: 10.0,
    }
}

fn frame(rgba: [u8; 4]) -> Frame {
    Frame::new(Raster::filled(4, 3, rgba))
}

#[test]
fn file_names_are_zero_padded() {
    assert_eq!(sequence_file_name("stereo", 0, SequenceFormat::Jpeg), "stereo_000.jpg");
    assert_eq!(sequence_file_name("stereo", 42, SequenceFormat::Png), "stereo_042.png");
    assert_eq!(sequence_file_name("f", 1234, SequenceFormat::Jpeg), "f_1234.jpg");
}

#[test]
fn png_sequence_round_trips_pixels() {
    let dir = scratch_dir("png").join("nested");
    let mut sink = ImageSequenceSink::new(&dir).with_format(SequenceFormat::Png);
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &frame([10, 20, 30, 255])).unwrap();
    sink.push_frame(1, &frame([40, 50, 60, 255])).unwrap();
    sink.end().unwrap();

    assert_eq!(
        sink.written(),
        &[dir.join("stereo_000.png"), dir.join("stereo_001.png")]
    );
    let img = image::open(dir.join("stereo_001.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 3));
    assert_eq!(img.get_pixel(2, 1).0, [40, 50, 60, 255]);

    let _ = std::fs::remove_dir_all(scratch_dir("png"));
}

#[test]
fn jpeg_is_default_and_uses_prefix() {
    let dir = scratch_dir("jpeg");
    let mut sink = ImageSequenceSink::new(&dir).with_prefix("shot");
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &frame([200, 200, 200, 255])).unwrap();
    sink.end().unwrap();

    let path = dir.join("shot_000.jpg");
    assert!(path.is_file());
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (4, 3));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn push_before_begin_and_out_of_order_fail() {
    let dir = scratch_dir("order");
    let mut sink = ImageSequenceSink::new(&dir).with_format(SequenceFormat::Png);
    assert!(matches!(
        sink.push_frame(0, &frame([0, 0, 0, 255])),
        Err(StereoError::EncodingFailure(_))
    ));
    sink.begin(cfg()).unwrap();
    sink.push_frame(3, &frame([0, 0, 0, 255])).unwrap();
    assert!(matches!(
        sink.push_frame(3, &frame([0, 0, 0, 255])),
        Err(StereoError::EncodingFailure(_))
    ));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_prefix_is_invalid() {
    let mut sink = ImageSequenceSink::new(scratch_dir("prefix")).with_prefix("");
    assert!(matches!(
        sink.begin(cfg()),
        Err(StereoError::InvalidParameter(_))
    ));
}
