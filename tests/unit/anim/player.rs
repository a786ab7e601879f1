use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use super::*;
use crate::foundation::core::Raster;

fn sequence(n: usize, interval_ms: u64) -> Arc<AnimationSequence> {
    Arc::new(
        AnimationSequence::new(
            (0..n)
                .map(|i| Frame::new(Raster::filled(2, 2, [i as u8, 0, 0, 255])))
                .collect(),
        )
        .with_frame_interval_ms(interval_ms),
    )
}

fn recorder() -> (Arc<Mutex<Vec<usize>>>, impl FnMut(usize, &Frame) + Send + 'static) {
    let shown = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&shown);
    (shown, move |idx: usize, frame: &Frame| {
        assert_eq!(frame.pixel(0, 0)[0], idx as u8);
        sink.lock().unwrap().push(idx);
    })
}

fn wait_for(shown: &Mutex<Vec<usize>>, n: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while shown.lock().unwrap().len() < n {
        assert!(Instant::now() < deadline, "player did not show {n} frames");
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn cursor_wraps_modulo_length() {
    let mut c = PlaybackCursor::new(3);
    let seen: Vec<_> = (0..7).map(|_| c.advance()).collect();
    assert_eq!(seen, vec![1, 2, 0, 1, 2, 0, 1]);
    c.reset();
    assert_eq!(c.current(), 0);

    let mut empty = PlaybackCursor::new(0);
    assert!(empty.is_empty());
    assert_eq!(empty.advance(), 0);
}

#[test]
fn empty_sequence_stays_stopped() {
    let mut player = AnimationPlayer::new();
    let (shown, display) = recorder();
    player.play(sequence(0, 1), display).unwrap();
    assert_eq!(player.state(), PlayerState::Stopped);
    std::thread::sleep(Duration::from_millis(10));
    assert!(shown.lock().unwrap().is_empty());
}

#[test]
fn plays_frames_in_a_loop_until_stopped() {
    let mut player = AnimationPlayer::new();
    let (shown, display) = recorder();
    player.play(sequence(3, 1), display).unwrap();
    assert_eq!(player.state(), PlayerState::Playing);

    wait_for(&shown, 7);
    player.stop();
    assert_eq!(player.state(), PlayerState::Stopped);

    let after_stop = shown.lock().unwrap().clone();
    assert_eq!(&after_stop[..7], &[0, 1, 2, 0, 1, 2, 0]);
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(*shown.lock().unwrap(), after_stop);
}

#[test]
fn stop_wakes_a_long_interval_immediately() {
    let mut player = AnimationPlayer::new();
    let (shown, display) = recorder();
    player.play(sequence(2, 60_000), display).unwrap();
    wait_for(&shown, 1);

    let started = Instant::now();
    player.stop();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(*shown.lock().unwrap(), vec![0]);
    assert_eq!(player.current_frame(), 0);
}

#[test]
fn play_while_playing_restarts_from_first_frame() {
    let mut player = AnimationPlayer::new();
    let (first, display) = recorder();
    player.play(sequence(4, 1), display).unwrap();
    wait_for(&first, 3);

    let (second, display) = recorder();
    player.play(sequence(4, 60_000), display).unwrap();
    wait_for(&second, 1);
    let frozen = first.lock().unwrap().len();

    assert_eq!(*second.lock().unwrap(), vec![0]);
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(first.lock().unwrap().len(), frozen);
}

#[test]
fn dropping_the_player_stops_the_loop() {
    let (shown, display) = recorder();
    {
        let mut player = AnimationPlayer::new();
        player.play(sequence(2, 1), display).unwrap();
        wait_for(&shown, 2);
    }
    let count = shown.lock().unwrap().len();
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(shown.lock().unwrap().len(), count);
}

#[test]
fn panicking_display_reports_stopped() {
    let mut player = AnimationPlayer::new();
    player
        .play(sequence(3, 1), |idx: usize, _: &Frame| {
            if idx == 0 {
                panic!("display failed");
            }
        })
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while player.state() == PlayerState::Playing {
        assert!(Instant::now() < deadline, "player still reports Playing");
        std::thread::sleep(Duration::from_millis(1));
    }
    player.stop();
    assert_eq!(player.state(), PlayerState::Stopped);
}
