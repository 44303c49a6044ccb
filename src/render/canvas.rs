use crate::color::Color;
use crate::foundation::core::{Frame, Point, Rect};
use crate::foundation::error::GifsciiResult;

/// Drawing target for one composited frame.
///
/// Implemented by the raster surface used for export and previews, and by [`DrawList`], which
/// only records what was drawn.
pub trait Canvas {
    /// Surface dimensions in pixels.
    fn size(&self) -> (u32, u32);

    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Color) -> GifsciiResult<()>;

    /// Fill `rect` with `color`.
    fn fill_rect(&mut self, rect: Rect, color: Color) -> GifsciiResult<()>;

    /// Draw `frame` scaled into `dest`.
    fn draw_image(&mut self, frame: &Frame, dest: Rect) -> GifsciiResult<()>;

    /// Draw `glyph` centered on `center`, sized to a `cell_size` pixel cell.
    fn draw_glyph(
        &mut self,
        glyph: char,
        center: Point,
        cell_size: f64,
        color: Color,
    ) -> GifsciiResult<()>;
}

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Whole-surface fill.
    Clear(Color),
    /// Rectangle fill.
    FillRect {
        /// Filled area.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// Scaled source frame.
    Image {
        /// Source frame width.
        width: u32,
        /// Source frame height.
        height: u32,
        /// Destination area.
        dest: Rect,
    },
    /// Centered glyph.
    Glyph {
        /// The glyph.
        glyph: char,
        /// Cell center.
        center: Point,
        /// Cell size.
        cell_size: f64,
        /// Glyph color.
        color: Color,
    },
}

/// [`Canvas`] that records operations instead of rasterizing them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
}

impl DrawList {
    /// Empty recording for a `width` x `height` surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Drop recorded ops and resize.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.ops.clear();
    }

    /// Recorded ops in call order.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Recorded glyphs with their centers, in call order.
    pub fn glyphs(&self) -> impl Iterator<Item = (char, Point)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Glyph { glyph, center, .. } => Some((*glyph, *center)),
            _ => None,
        })
    }

    /// Lay recorded glyphs out on a character grid of `cell_w` x `cell_h` pixel cells.
    ///
    /// Rows are joined with `\n`; cells without a glyph are spaces. A later glyph in the same cell
    /// overwrites an earlier one, and a `Clear` blanks the grid.
    pub fn to_text(&self, cell_w: f64, cell_h: f64) -> String {
        if self.width == 0 || self.height == 0 || cell_w <= 0.0 || cell_h <= 0.0 {
            return String::new();
        }
        let cols = (f64::from(self.width) / cell_w).ceil().max(1.0) as usize;
        let rows = (f64::from(self.height) / cell_h).ceil().max(1.0) as usize;
        let mut grid = vec![vec![' '; cols]; rows];

        for op in &self.ops {
            match op {
                DrawOp::Clear(_) => grid.iter_mut().for_each(|row| row.fill(' ')),
                DrawOp::Glyph { glyph, center, .. } => {
                    if center.x < 0.0 || center.y < 0.0 {
                        continue;
                    }
                    let col = ((center.x / cell_w).floor() as usize).min(cols - 1);
                    let row = ((center.y / cell_h).floor() as usize).min(rows - 1);
                    grid[row][col] = *glyph;
                }
                _ => {}
            }
        }

        grid.into_iter()
            .map(|row| row.into_iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Canvas for DrawList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) -> GifsciiResult<()> {
        self.ops.push(DrawOp::Clear(color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> GifsciiResult<()> {
        self.ops.push(DrawOp::FillRect { rect, color });
        Ok(())
    }

    fn draw_image(&mut self, frame: &Frame, dest: Rect) -> GifsciiResult<()> {
        self.ops.push(DrawOp::Image {
            width: frame.width(),
            height: frame.height(),
            dest,
        });
        Ok(())
    }

    fn draw_glyph(
        &mut self,
        glyph: char,
        center: Point,
        cell_size: f64,
        color: Color,
    ) -> GifsciiResult<()> {
        self.ops.push(DrawOp::Glyph {
            glyph,
            center,
            cell_size,
            color,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
