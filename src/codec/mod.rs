//! GIF decoding into [`crate::Frame`]s and GIF encoding of composited surfaces.

mod gif;

pub use gif::{GifFrameEncoder, decode_gif, decode_gif_path};
