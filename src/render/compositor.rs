use crate::classify::Classifier;
use crate::config::RenderConfig;
use crate::foundation::core::{Frame, Point, Rect, Size};
use crate::foundation::error::GifsciiResult;
use crate::layers::LayerStack;
use crate::render::canvas::Canvas;

/// Output surface size for `frame` under `config`: each side scaled by `config.scale` and floored.
///
/// Fails with `DegenerateFrame` when the frame or the scaled surface has a zero side.
pub fn surface_size(frame: &Frame, config: &RenderConfig) -> GifsciiResult<(u32, u32)> {
    config.output_size(frame.width(), frame.height())
}

/// Turns frames into block-glyph composites for one layer stack and render configuration.
///
/// The live preview and the export pipeline both draw through this type, so their output is
/// identical for the same frame and snapshot.
#[derive(Clone, Debug)]
pub struct Compositor<'a> {
    classifier: Classifier<'a>,
    config: &'a RenderConfig,
}

impl<'a> Compositor<'a> {
    /// Prepare the visible layers of `layers` for compositing under `config`.
    pub fn new(layers: &'a LayerStack, config: &'a RenderConfig) -> Self {
        Self {
            classifier: Classifier::new(layers),
            config,
        }
    }

    /// Draw `frame` onto `canvas`, whose size is taken as the output surface size.
    ///
    /// The surface is always cleared to the background first. A degenerate frame or canvas
    /// leaves it at that; otherwise the underlay (if enabled) and the matched blocks follow.
    /// Returns the number of blocks stamped with a glyph.
    pub fn composite<C>(&self, frame: &Frame, canvas: &mut C) -> GifsciiResult<usize>
    where
        C: Canvas + ?Sized,
    {
        let (out_w, out_h) = canvas.size();
        if out_w == 0 || out_h == 0 {
            tracing::debug!(out_w, out_h, "skipping composite onto empty surface");
            return Ok(0);
        }
        canvas.clear(self.config.background)?;

        if frame.is_degenerate() {
            tracing::debug!(
                width = frame.width(),
                height = frame.height(),
                "skipping degenerate frame"
            );
            return Ok(0);
        }

        let out = Size::new(f64::from(out_w), f64::from(out_h));
        if self.config.show_underlay {
            canvas.draw_image(frame, Rect::from_origin_size(Point::ORIGIN, out))?;
        }
        if self.classifier.is_empty() {
            return Ok(0);
        }

        let (w, h) = (frame.width(), frame.height());
        let block = self.config.block_size.max(1);
        let block_f = f64::from(block);
        let half = block_f / 2.0;
        let scale_x = out.width / f64::from(w);
        let scale_y = out.height / f64::from(h);
        let cell = self.config.glyph_cell_size();
        let block_out = Size::new(block_f * scale_x, block_f * scale_y);

        let mut stamped = 0;
        for by in 0..h.div_ceil(block) {
            let src_cy = f64::from(by) * block_f + half;
            let py = sample_coord(src_cy, h);
            for bx in 0..w.div_ceil(block) {
                let src_cx = f64::from(bx) * block_f + half;
                let px = sample_coord(src_cx, w);

                let Some(rgba) = frame.pixel(px, py) else {
                    continue;
                };
                let Some(layer) = self.classifier.classify(rgba) else {
                    continue;
                };

                let center = Point::new(src_cx * scale_x, src_cy * scale_y);
                if layer.fill_background {
                    canvas.fill_rect(Rect::from_center_size(center, block_out), layer.background)?;
                }
                canvas.draw_glyph(layer.symbol, center, cell, layer.foreground)?;
                stamped += 1;
            }
        }
        Ok(stamped)
    }
}

// floor(center), clamped into [0, extent - 1].
fn sample_coord(center: f64, extent: u32) -> u32 {
    let floored = center.floor();
    if floored >= f64::from(extent - 1) {
        extent - 1
    } else {
        floored as u32
    }
}

/// One-shot [`Compositor::composite`].
pub fn composite<C>(
    frame: &Frame,
    layers: &LayerStack,
    config: &RenderConfig,
    canvas: &mut C,
) -> GifsciiResult<usize>
where
    C: Canvas + ?Sized,
{
    Compositor::new(layers, config).composite(frame, canvas)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
