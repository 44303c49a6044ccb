//! gifscii turns animated GIFs into ASCII-art animations.
//!
//! Each frame is cut into square blocks. A block's center pixel is matched against an ordered
//! [`LayerStack`]; the winning [`Layer`] stamps its glyph, colors and optional background fill at
//! the block's position on the output surface. The same [`Compositor`] and pacing rules drive both
//! outputs:
//!
//! - live preview through a [`Player`] / [`PlaybackSession`] onto any [`Display`]
//! - batch [`export`] of every frame into a [`FrameEncoder`], such as the looping
//!   [`GifFrameEncoder`]
//!
//! Configuration travels as immutable [`RenderSnapshot`]s.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod codec;
mod color;
mod config;
mod export;
mod foundation;
mod layers;
pub mod pacing;
mod playback;
mod render;

pub use crate::foundation::core::{Frame, Point, Rect, Size};
pub use crate::foundation::error::{GifsciiError, GifsciiResult};

pub use crate::classify::{Classifier, classify_pixel};
pub use crate::codec::{GifFrameEncoder, decode_gif, decode_gif_path};
pub use crate::color::{Color, MAX_DISTANCE, distance, parse_color};
pub use crate::config::{RenderConfig, RenderSnapshot};
pub use crate::export::{
    DEFAULT_QUALITY, EncoderConfig, ExportOpts, ExportThreading, FrameEncoder, InMemoryEncoder,
    export, export_gif,
};
pub use crate::layers::{Layer, LayerStack, LegacyLayer, MAX_SPREAD, UNDERLAY_SENTINEL_ID};
pub use crate::pacing::{PacingConfig, normalize_delay, pace};
pub use crate::playback::{
    CancellationToken, Display, PlaybackSession, Player, Playhead, SessionState,
};
pub use crate::render::{
    Canvas, CompositeSurface, Compositor, DrawList, DrawOp, GlyphAtlas, GlyphFonts, RasterCanvas,
    composite, surface_size,
};
