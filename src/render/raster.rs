use std::path::Path;

use anyhow::Context;
use resvg::tiny_skia;

use crate::color::Color;
use crate::foundation::core::{Frame, Point, Rect};
use crate::foundation::error::{GifsciiError, GifsciiResult};
use crate::render::canvas::Canvas;
use crate::render::glyph::{GlyphAtlas, cell_extent};

/// Finished composite: straight (non-premultiplied) RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeSurface {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl CompositeSurface {
    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4).map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Copy into an [`image::RgbaImage`].
    pub fn to_rgba_image(&self) -> GifsciiResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            GifsciiError::validation(format!(
                "surface buffer does not match {}x{}",
                self.width, self.height
            ))
        })
    }

    /// Write the surface as a PNG file, creating parent directories.
    pub fn save_png(&self, path: impl AsRef<Path>) -> GifsciiResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// CPU raster [`Canvas`] backed by a tiny-skia pixmap.
pub struct RasterCanvas {
    pixmap: tiny_skia::Pixmap,
    glyphs: GlyphAtlas,
}

impl RasterCanvas {
    /// Transparent `width` x `height` surface drawing glyphs through `glyphs`.
    pub fn new(width: u32, height: u32, glyphs: GlyphAtlas) -> GifsciiResult<Self> {
        let pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            GifsciiError::missing_surface(format!("failed to allocate {width}x{height} pixmap"))
        })?;
        Ok(Self { pixmap, glyphs })
    }

    /// Copy the current pixels out as straight RGBA8.
    pub fn snapshot(&self) -> CompositeSurface {
        let mut data = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        CompositeSurface {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
            data,
        }
    }

    /// Finish drawing and hand back the surface.
    pub fn into_surface(self) -> CompositeSurface {
        self.snapshot()
    }

    /// Finish drawing and hand back the surface together with the glyph atlas for reuse.
    pub fn into_parts(self) -> (CompositeSurface, GlyphAtlas) {
        (self.snapshot(), self.glyphs)
    }
}

fn sk_color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, 255)
}

fn premultiplied(rgba: &[u8]) -> Vec<u8> {
    let mut out = rgba.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
    out
}

impl Canvas for RasterCanvas {
    fn size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    fn clear(&mut self, color: Color) -> GifsciiResult<()> {
        self.pixmap.fill(sk_color(color));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> GifsciiResult<()> {
        let Some(rect) = tiny_skia::Rect::from_xywh(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.width() as f32,
            rect.height() as f32,
        ) else {
            return Ok(());
        };
        let mut paint = tiny_skia::Paint::default();
        paint.set_color(sk_color(color));
        paint.anti_alias = true;
        self.pixmap
            .fill_rect(rect, &paint, tiny_skia::Transform::identity(), None);
        Ok(())
    }

    fn draw_image(&mut self, frame: &Frame, dest: Rect) -> GifsciiResult<()> {
        if frame.is_degenerate() || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }
        let size = tiny_skia::IntSize::from_wh(frame.width(), frame.height())
            .ok_or(GifsciiError::DegenerateFrame {
                width: frame.width(),
                height: frame.height(),
            })?;
        let src = tiny_skia::Pixmap::from_vec(premultiplied(frame.rgba()), size).ok_or_else(
            || GifsciiError::missing_surface("failed to wrap frame pixels in a pixmap"),
        )?;

        let sx = dest.width() / f64::from(frame.width());
        let sy = dest.height() / f64::from(frame.height());
        let transform = tiny_skia::Transform::from_row(
            sx as f32,
            0.0,
            0.0,
            sy as f32,
            dest.x0 as f32,
            dest.y0 as f32,
        );
        let paint = tiny_skia::PixmapPaint {
            quality: tiny_skia::FilterQuality::Bilinear,
            ..Default::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
        Ok(())
    }

    fn draw_glyph(
        &mut self,
        glyph: char,
        center: Point,
        cell_size: f64,
        color: Color,
    ) -> GifsciiResult<()> {
        let Some(cell) = self.glyphs.cell(glyph, cell_size, color)? else {
            return Ok(());
        };
        let half = f64::from(cell_extent(cell_size)) / 2.0;
        let x = (center.x - half).round() as i32;
        let y = (center.y - half).round() as i32;
        self.pixmap.draw_pixmap(
            x,
            y,
            cell.pixmap.as_ref(),
            &tiny_skia::PixmapPaint::default(),
            tiny_skia::Transform::identity(),
            None,
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
