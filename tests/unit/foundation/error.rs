use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GifsciiError::invalid_color("x")
            .to_string()
            .contains("invalid color:")
    );
    assert!(
        GifsciiError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GifsciiError::decode("x").to_string().contains("decode error:"));
    assert!(GifsciiError::encode("x").to_string().contains("encode error:"));
    assert!(
        GifsciiError::missing_surface("x")
            .to_string()
            .contains("missing surface:")
    );
}

#[test]
fn degenerate_frame_reports_dimensions() {
    let err = GifsciiError::DegenerateFrame {
        width: 0,
        height: 12,
    };
    assert_eq!(err.to_string(), "degenerate frame: 0x12");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GifsciiError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
