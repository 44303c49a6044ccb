use super::*;
use serde_json::json;

#[test]
fn parses_six_digit_hex() {
    assert_eq!(parse_color("#000000").unwrap(), Color::BLACK);
    assert_eq!(parse_color("#ffffff").unwrap(), Color::WHITE);
    assert_eq!(parse_color("#FF0000").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(parse_color("1a1a2e").unwrap(), Color::rgb(26, 26, 46));
}

#[test]
fn three_digit_form_duplicates_nibbles() {
    assert_eq!(parse_color("#abc").unwrap(), Color::rgb(170, 187, 204));
    assert_eq!(parse_color("f00").unwrap(), Color::rgb(255, 0, 0));
    assert_eq!(
        parse_color("#abc").unwrap(),
        parse_color("#aabbcc").unwrap()
    );
}

#[test]
fn rejects_malformed_text() {
    for bad in ["", "#", "#12", "#1234", "#12345", "#1234567", "#zzz", "#12g456", "#é12"] {
        let err = parse_color(bad).unwrap_err();
        assert!(
            matches!(err, GifsciiError::InvalidColor(_)),
            "{bad:?} -> {err}"
        );
    }
}

#[test]
fn distance_is_symmetric_and_bounded() {
    let black = Color::BLACK;
    let white = Color::WHITE;
    let red = Color::rgb(255, 0, 0);

    assert_eq!(distance(red, red), 0.0);
    assert_eq!(distance(red, black), distance(black, red));
    assert_eq!(distance(red, black), 255.0);
    assert!((distance(black, white) - MAX_DISTANCE).abs() < 1e-9);
}

#[test]
fn serde_uses_hex_strings() {
    let c: Color = serde_json::from_value(json!("#0f0")).unwrap();
    assert_eq!(c, Color::rgb(0, 255, 0));

    let c: Color = serde_json::from_value(json!([1, 2, 3])).unwrap();
    assert_eq!(c, Color::rgb(1, 2, 3));

    assert_eq!(
        serde_json::to_value(Color::rgb(255, 128, 0)).unwrap(),
        json!("#ff8000")
    );
    assert!(serde_json::from_value::<Color>(json!("#nothex")).is_err());
}
