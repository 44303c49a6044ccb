use super::*;
use crate::render::glyph::GlyphFonts;

fn canvas(width: u32, height: u32) -> RasterCanvas {
    RasterCanvas::new(width, height, GlyphAtlas::new(GlyphFonts::empty())).unwrap()
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

#[test]
fn zero_sized_surface_is_missing() {
    let err = RasterCanvas::new(0, 4, GlyphAtlas::new(GlyphFonts::empty()))
        .err()
        .unwrap();
    assert!(matches!(err, GifsciiError::MissingSurface(_)));
}

#[test]
fn clear_and_fill_rect_write_opaque_pixels() {
    let mut c = canvas(2, 2);
    c.clear(Color::WHITE).unwrap();
    c.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::rgb(0, 0, 255))
        .unwrap();
    let s = c.into_surface();
    assert_eq!((s.width, s.height), (2, 2));
    assert_eq!(s.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(1, 1), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(2, 0), None);
}

#[test]
fn empty_rects_are_ignored() {
    let mut c = canvas(2, 2);
    c.clear(Color::BLACK).unwrap();
    c.fill_rect(Rect::new(1.0, 1.0, 1.0, 1.0), Color::WHITE)
        .unwrap();
    assert!(c.snapshot().data.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
}

#[test]
fn draw_image_scales_the_frame_over_dest() {
    let frame = Frame::new(1, 1, vec![255, 0, 0, 255], None).unwrap();
    let mut c = canvas(4, 4);
    c.clear(Color::WHITE).unwrap();
    c.draw_image(&frame, Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();
    let s = c.snapshot();
    for y in 0..4 {
        for x in 0..4 {
            assert!(close(s.pixel(x, y).unwrap(), [255, 0, 0, 255]), "({x},{y})");
        }
    }
}

#[test]
fn transparent_frame_pixels_leave_the_background() {
    let frame = Frame::new(1, 1, vec![255, 0, 0, 0], None).unwrap();
    let mut c = canvas(2, 2);
    c.clear(Color::WHITE).unwrap();
    c.draw_image(&frame, Rect::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    assert!(close(c.snapshot().pixel(1, 1).unwrap(), [255, 255, 255, 255]));
}

#[test]
fn glyphs_without_fonts_leave_the_surface_untouched() {
    let mut c = canvas(8, 8);
    c.clear(Color::WHITE).unwrap();
    c.draw_glyph('@', Point::new(4.0, 4.0), 6.0, Color::BLACK)
        .unwrap();
    c.draw_glyph(' ', Point::new(4.0, 4.0), 6.0, Color::BLACK)
        .unwrap();
    let (surface, atlas) = c.into_parts();
    assert!(surface.data.chunks_exact(4).all(|p| p == [255, 255, 255, 255]));
    assert_eq!(atlas.len(), 2);
}

#[test]
fn premultiply_rounds_and_zeroes_transparent() {
    assert_eq!(
        premultiplied(&[255, 128, 0, 128, 9, 9, 9, 0]),
        vec![128, 64, 0, 128, 0, 0, 0, 0]
    );
}

#[test]
fn surface_converts_and_saves_png() {
    let surface = CompositeSurface {
        width: 1,
        height: 1,
        data: vec![1, 2, 3, 255],
    };
    assert_eq!(surface.to_rgba_image().unwrap().get_pixel(0, 0).0, [1, 2, 3, 255]);

    let dir = std::env::temp_dir().join(format!("gifscii-raster-{}", std::process::id()));
    let path = dir.join("one.png");
    surface.save_png(&path).unwrap();
    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.get_pixel(0, 0).0, [1, 2, 3, 255]);
    let _ = std::fs::remove_dir_all(&dir);

    let bad = CompositeSurface {
        width: 2,
        height: 2,
        data: vec![0; 4],
    };
    assert!(bad.to_rgba_image().is_err());
}
