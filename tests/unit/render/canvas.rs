use super::*;

fn glyph_at(list: &mut DrawList, glyph: char, x: f64, y: f64) {
    list.draw_glyph(glyph, Point::new(x, y), 6.0, Color::BLACK)
        .unwrap();
}

#[test]
fn draw_list_records_calls_in_order() {
    let frame = Frame::new(1, 1, vec![1, 2, 3, 255], None).unwrap();
    let mut list = DrawList::new(4, 2);
    list.clear(Color::WHITE).unwrap();
    list.draw_image(&frame, Rect::new(0.0, 0.0, 4.0, 2.0)).unwrap();
    list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK)
        .unwrap();
    glyph_at(&mut list, '@', 0.5, 0.5);

    assert_eq!(list.size(), (4, 2));
    assert_eq!(list.ops().len(), 4);
    assert_eq!(list.ops()[0], DrawOp::Clear(Color::WHITE));
    assert!(matches!(
        list.ops()[1],
        DrawOp::Image {
            width: 1,
            height: 1,
            ..
        }
    ));
    assert_eq!(
        list.glyphs().collect::<Vec<_>>(),
        vec![('@', Point::new(0.5, 0.5))]
    );
}

#[test]
fn to_text_places_glyphs_on_the_grid() {
    let mut list = DrawList::new(4, 4);
    glyph_at(&mut list, '@', 1.0, 1.0);
    glyph_at(&mut list, '#', 3.0, 1.0);
    glyph_at(&mut list, '*', 3.5, 3.5);
    assert_eq!(list.to_text(2.0, 2.0), "@#\n *");
}

#[test]
fn to_text_later_glyphs_win_and_clear_blanks() {
    let mut list = DrawList::new(2, 1);
    glyph_at(&mut list, 'a', 0.2, 0.2);
    list.clear(Color::WHITE).unwrap();
    glyph_at(&mut list, 'b', 1.5, 0.5);
    glyph_at(&mut list, 'c', 1.2, 0.1);
    assert_eq!(list.to_text(1.0, 1.0), " c");
}

#[test]
fn reset_drops_ops() {
    let mut list = DrawList::new(2, 2);
    glyph_at(&mut list, 'x', 0.0, 0.0);
    list.reset(3, 1);
    assert!(list.ops().is_empty());
    assert_eq!(list.size(), (3, 1));
    assert_eq!(list.to_text(1.0, 1.0), "   ");
    assert_eq!(DrawList::new(0, 3).to_text(1.0, 1.0), "");
}
