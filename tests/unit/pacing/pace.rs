use super::*;

fn at(speed: f64) -> PacingConfig {
    PacingConfig { speed }
}

#[test]
fn normalize_replaces_missing_and_out_of_range_delays() {
    assert_eq!(normalize_delay(None), 100.0);
    assert_eq!(normalize_delay(Some(0)), 100.0);
    assert_eq!(normalize_delay(Some(19)), 100.0);
    assert_eq!(normalize_delay(Some(20)), 20.0);
    assert_eq!(normalize_delay(Some(150)), 150.0);
    assert_eq!(normalize_delay(Some(200)), 200.0);
    assert_eq!(normalize_delay(Some(201)), 100.0);
    assert_eq!(normalize_delay(Some(5000)), 100.0);
}

#[test]
fn neutral_speed_is_identity() {
    for delay in [None, Some(20), Some(40), Some(130), Some(200), Some(900)] {
        let baseline = normalize_delay(delay);
        assert_eq!(pace(baseline, &at(NEUTRAL_SPEED)), baseline);
    }
}

#[test]
fn extremes_match_documented_values() {
    assert_eq!(pace(100.0, &at(1.0)), 200.0);
    assert!((pace(100.0, &at(10.0)) - 16.6667).abs() < 1e-3);
}

#[test]
fn intermediate_speeds_interpolate_linearly() {
    assert_eq!(pace(100.0, &at(3.0)), 150.0);
    let half = pace(100.0, &at(7.5));
    assert!((half - (50.0 + FLOOR_DELAY_MS / 2.0)).abs() < 1e-9);
}

#[test]
fn pacing_is_monotonic_in_speed() {
    let mut last = f64::INFINITY;
    for step in 0..=18 {
        let speed = 1.0 + f64::from(step) * 0.5;
        let d = pace(80.0, &at(speed));
        assert!(d <= last, "speed {speed} produced {d} after {last}");
        last = d;
    }
}

#[test]
fn clamped_config_keeps_speed_in_range() {
    assert_eq!(PacingConfig::clamped(0.0).speed, MIN_SPEED);
    assert_eq!(PacingConfig::clamped(42.0).speed, MAX_SPEED);
    assert_eq!(PacingConfig::clamped(6.5).speed, 6.5);
    assert_eq!(PacingConfig::clamped(f64::NAN).speed, NEUTRAL_SPEED);
}

#[test]
fn pace_frame_uses_normalized_delay() {
    let frame = Frame::new(1, 1, vec![0u8; 4], Some(5)).unwrap();
    assert_eq!(pace_frame(&frame, &at(1.0)), Duration::from_millis(200));
}
