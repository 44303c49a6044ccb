//! Compositing frames into block-glyph surfaces, and the surfaces they draw on.

mod canvas;
mod compositor;
mod glyph;
mod raster;

pub use canvas::{Canvas, DrawList, DrawOp};
pub use compositor::{Compositor, composite, surface_size};
pub use glyph::{GlyphAtlas, GlyphFonts};
pub use raster::{CompositeSurface, RasterCanvas};
