use super::*;
use crate::layers::Layer;

#[test]
fn defaults_match_the_starter_settings() {
    let cfg = RenderConfig::default();
    assert_eq!(cfg.block_size, 8);
    assert_eq!(cfg.scale, 2.0);
    assert_eq!(cfg.background, Color::WHITE);
    assert!(!cfg.show_underlay);

    let snap = RenderSnapshot::starter();
    assert_eq!(snap.layers.len(), 4);
    assert_eq!(snap.pacing.speed, 5.0);
    snap.validate().unwrap();
}

#[test]
fn glyph_cell_size_has_a_floor_of_six() {
    let mut cfg = RenderConfig {
        block_size: 1,
        scale: 1.0,
        ..RenderConfig::default()
    };
    assert_eq!(cfg.glyph_cell_size(), 6.0);
    cfg.block_size = 8;
    cfg.scale = 2.0;
    assert_eq!(cfg.glyph_cell_size(), 16.0);
}

#[test]
fn output_size_floors_and_rejects_empty_surfaces() {
    let cfg = RenderConfig {
        scale: 1.5,
        ..RenderConfig::default()
    };
    assert_eq!(cfg.output_size(3, 5).unwrap(), (4, 7));

    assert!(matches!(
        cfg.output_size(0, 5),
        Err(GifsciiError::DegenerateFrame {
            width: 0,
            height: 5
        })
    ));

    let tiny = RenderConfig {
        scale: 0.25,
        ..RenderConfig::default()
    };
    assert!(matches!(
        tiny.output_size(3, 8),
        Err(GifsciiError::DegenerateFrame { width: 0, .. })
    ));
}

#[test]
fn validate_rejects_bad_knobs() {
    let mut snap = RenderSnapshot::starter();
    snap.render.block_size = 0;
    assert!(snap.validate().is_err());

    let mut snap = RenderSnapshot::starter();
    snap.render.scale = f64::INFINITY;
    assert!(snap.validate().is_err());

    let mut snap = RenderSnapshot::starter();
    snap.pacing.speed = 11.0;
    assert!(snap.validate().is_err());
}

#[test]
fn json_round_trips_with_hex_colors() {
    let snap = RenderSnapshot::starter();
    let text = snap.to_json().unwrap();
    assert!(text.contains("\"#ff0000\""));
    let back = RenderSnapshot::from_reader(text.as_bytes()).unwrap();
    assert_eq!(back, snap);
}

#[test]
fn json_accepts_legacy_field_names_and_defaults() {
    let text = r##"{
        "layers": [
            {"id": 0, "symbol": "@", "fg": "#000", "bg": "fff", "target": "#f00",
             "spread": 40, "bgEnabled": false}
        ],
        "render": {"blockSize": 4, "canvasBg": "#102030"}
    }"##;
    let snap = RenderSnapshot::from_reader(text.as_bytes()).unwrap();
    assert_eq!(snap.render.block_size, 4);
    assert_eq!(snap.render.scale, 2.0);
    assert_eq!(snap.render.background, Color::rgb(0x10, 0x20, 0x30));
    assert_eq!(snap.pacing.speed, 5.0);

    let layer = snap.layers.get(0).unwrap();
    assert_eq!(layer.target, Color::rgb(255, 0, 0));
    assert!(layer.visible);
    assert!(!layer.fill_background);
}

#[test]
fn from_reader_rejects_invalid_snapshots() {
    let dup = r##"{"layers": [
        {"id": 1, "symbol": "a", "foreground": "#000", "background": "#fff", "target": "#000", "spread": 1},
        {"id": 1, "symbol": "b", "foreground": "#000", "background": "#fff", "target": "#000", "spread": 1}
    ]}"##;
    assert!(matches!(
        RenderSnapshot::from_reader(dup.as_bytes()),
        Err(GifsciiError::Validation(_))
    ));
    assert!(RenderSnapshot::from_reader("{not json".as_bytes()).is_err());
    assert!(RenderSnapshot::from_path("/definitely/not/here.json").is_err());
}

#[test]
fn legacy_layer_list_sets_the_underlay_flag() {
    let layers = vec![
        LegacyLayer {
            id: -1,
            symbol: String::new(),
            fg: "#000".into(),
            bg: "#fff".into(),
            target: "#000".into(),
            spread: 0.0,
            visible: true,
            bg_enabled: None,
        },
        LegacyLayer {
            id: 0,
            symbol: "@".into(),
            fg: "#000".into(),
            bg: "#fff".into(),
            target: "#000".into(),
            spread: 100.0,
            visible: true,
            bg_enabled: None,
        },
    ];
    let snap = RenderSnapshot::from_legacy_layers(layers).unwrap();
    assert!(snap.render.show_underlay);
    assert_eq!(snap.layers.len(), 1);
    assert_eq!(snap.layers.get(0), Some(&Layer::new(0, '@', Color::BLACK)));
}
