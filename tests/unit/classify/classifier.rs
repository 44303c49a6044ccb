use super::*;
use crate::layers::MAX_SPREAD;

const RED: [u8; 4] = [255, 0, 0, 255];

fn stack(layers: Vec<Layer>) -> LayerStack {
    LayerStack::from_layers(layers).unwrap()
}

#[test]
fn transparent_pixels_never_match() {
    let s = stack(vec![
        Layer::new(0, '@', Color::rgb(255, 0, 0)).with_spread(MAX_SPREAD),
    ]);
    assert!(classify_pixel(&s, [255, 0, 0, 0]).is_none());
    assert!(classify_pixel(&s, [0, 0, 0, 0]).is_none());
    assert_eq!(classify_pixel(&s, [255, 0, 0, 1]).unwrap().id, 0);
}

#[test]
fn later_layer_wins_ties() {
    let s = stack(vec![
        Layer::new(0, 'a', Color::rgb(250, 0, 0)).with_spread(50.0),
        Layer::new(1, 'b', Color::rgb(240, 0, 0)).with_spread(50.0),
    ]);
    assert_eq!(classify_pixel(&s, RED).unwrap().id, 1);

    let mut swapped = s.clone();
    swapped.move_to(1, 0).unwrap();
    assert_eq!(classify_pixel(&swapped, RED).unwrap().id, 0);
}

#[test]
fn zero_spread_requires_exact_hit() {
    let s = stack(vec![Layer::new(0, '@', Color::rgb(10, 20, 30)).with_spread(0.0)]);
    assert!(classify_pixel(&s, [10, 20, 30, 255]).is_some());
    assert!(classify_pixel(&s, [10, 20, 31, 255]).is_none());
}

#[test]
fn spread_boundary_is_inclusive() {
    let s = stack(vec![Layer::new(0, '@', Color::BLACK).with_spread(5.0)]);
    // 3-4-0 triangle: distance exactly 5.
    assert!(classify_pixel(&s, [3, 4, 0, 255]).is_some());
    assert!(classify_pixel(&s, [3, 5, 0, 255]).is_none());
}

#[test]
fn max_spread_matches_every_opaque_color_with_top_layer() {
    let s = stack(vec![
        Layer::new(0, 'a', Color::BLACK).with_spread(MAX_SPREAD),
        Layer::new(1, 'b', Color::WHITE).with_spread(MAX_SPREAD),
        Layer::new(2, 'c', Color::rgb(0, 0, 255))
            .with_spread(MAX_SPREAD)
            .hidden(),
    ]);
    let classifier = Classifier::new(&s);
    for rgba in [
        [0, 0, 0, 255],
        [255, 255, 255, 255],
        [0, 0, 255, 255],
        [17, 200, 3, 128],
    ] {
        assert_eq!(classifier.classify(rgba).unwrap().id, 1);
    }
}

#[test]
fn hidden_layers_are_excluded_without_affecting_others() {
    let mut s = stack(vec![
        Layer::new(0, 'a', Color::rgb(200, 0, 0)).with_spread(60.0),
        Layer::new(1, 'b', Color::rgb(255, 0, 0)).with_spread(10.0),
    ]);
    assert_eq!(classify_pixel(&s, RED).unwrap().id, 1);
    assert!(classify_pixel(&s, [120, 0, 0, 255]).is_none());

    s.set_visible(1, false).unwrap();
    assert_eq!(classify_pixel(&s, RED).unwrap().id, 0);
    assert!(classify_pixel(&s, [120, 0, 0, 255]).is_none());
}

#[test]
fn empty_or_all_hidden_stack_never_matches() {
    let s = LayerStack::new();
    assert!(Classifier::new(&s).is_empty());
    assert!(classify_pixel(&s, RED).is_none());

    let hidden = stack(vec![Layer::new(0, '@', Color::rgb(255, 0, 0)).hidden()]);
    assert!(Classifier::new(&hidden).is_empty());
}

#[test]
fn classification_is_deterministic() {
    let s = LayerStack::starter();
    let c = Classifier::new(&s);
    for rgba in [[0, 0, 0, 255], [255, 10, 10, 255], [0, 250, 0, 255], [0, 0, 255, 255]] {
        assert_eq!(
            c.classify(rgba).map(|l| l.id),
            c.classify(rgba).map(|l| l.id)
        );
    }
}
