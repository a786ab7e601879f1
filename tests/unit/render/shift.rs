use super::*;

#[test]
fn zero_depth_never_shifts() {
    for m in [0.0, 0.5, 1.0, 3.0, 100.0] {
        assert_eq!(ShiftTable::build(m).shift(0), 0);
    }
}

#[test]
fn full_depth_unit_multiplier_is_max_disparity() {
    let t = ShiftTable::build(1.0);
    assert_eq!(t.shift(255), 15);
    assert_eq!(t.shift(17), 1);
    assert_eq!(t.shift(16), 0);
    assert_eq!(t.shift(128), 7);
}

#[test]
fn multiplier_scales_shift() {
    assert_eq!(ShiftTable::build(2.0).shift(255), 30);
    assert_eq!(ShiftTable::build(0.5).shift(255), 7);
}

#[test]
fn zero_multiplier_is_all_zero() {
    assert!(ShiftTable::build(0.0).as_slice().iter().all(|&s| s == 0));
}

#[test]
fn table_is_monotonic() {
    for m in [0.0, 0.3, 1.0, 2.7] {
        let t = ShiftTable::build(m);
        for v in 1..256 {
            assert!(t.as_slice()[v] >= t.as_slice()[v - 1]);
        }
    }
}
