//! Batch export: every frame composited and paced exactly once, handed to an encoder in order.

mod encoder;
mod pipeline;

pub use encoder::{DEFAULT_QUALITY, EncoderConfig, FrameEncoder, InMemoryEncoder};
pub use pipeline::{ExportOpts, ExportThreading, export, export_gif};
