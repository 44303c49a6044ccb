use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;
use image::AnimationDecoder;
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};

use crate::export::{EncoderConfig, FrameEncoder};
use crate::foundation::core::Frame;
use crate::foundation::error::{GifsciiError, GifsciiResult};
use crate::render::CompositeSurface;

/// Decode every frame of an animated (or still) GIF.
///
/// Frames come back full-canvas RGBA with disposal already applied. Each frame's delay is
/// normalized once here.
#[tracing::instrument(skip_all, fields(bytes = bytes.len()))]
pub fn decode_gif(bytes: &[u8]) -> GifsciiResult<Vec<Frame>> {
    let decoder = GifDecoder::new(Cursor::new(bytes))
        .map_err(|e| GifsciiError::decode(format!("read gif header: {e}")))?;
    let decoded = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| GifsciiError::decode(format!("decode gif frames: {e}")))?;
    if decoded.is_empty() {
        return Err(GifsciiError::EmptyContent);
    }

    let frames = decoded
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom == 0 {
                None
            } else {
                Some((f64::from(numer) / f64::from(denom)).round() as u32)
            };
            let buffer = frame.into_buffer();
            let (width, height) = buffer.dimensions();
            Frame::new(width, height, buffer.into_raw(), delay_ms)
        })
        .collect::<GifsciiResult<Vec<_>>>()?;
    tracing::debug!(frames = frames.len(), "decoded gif");
    Ok(frames)
}

/// [`decode_gif`] on the contents of a file.
pub fn decode_gif_path(path: impl AsRef<Path>) -> GifsciiResult<Vec<Frame>> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("read gif '{}'", path.display()))?;
    decode_gif(&bytes)
}

// Write target the GIF encoder owns while the bytes stay reachable after it is dropped.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// [`FrameEncoder`] producing an infinitely looping animated GIF.
///
/// Frames are quantized and written as they are submitted. The quality hint is the encoder's
/// speed setting: 1 is best and slowest, 30 fastest.
#[derive(Default)]
pub struct GifFrameEncoder {
    cfg: Option<EncoderConfig>,
    out: SharedBuf,
    encoder: Option<GifEncoder<SharedBuf>>,
}

impl GifFrameEncoder {
    /// Create an idle encoder; `begin` starts a stream.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameEncoder for GifFrameEncoder {
    fn begin(&mut self, cfg: EncoderConfig) -> GifsciiResult<()> {
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(GifsciiError::encode(format!(
                "{}x{} exceeds the gif size limit of {}x{}",
                cfg.width,
                cfg.height,
                u16::MAX,
                u16::MAX
            )));
        }
        self.out = SharedBuf::default();
        let speed = i32::from(cfg.quality.clamp(1, 30));
        let mut encoder = GifEncoder::new_with_speed(self.out.clone(), speed);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| GifsciiError::encode(format!("set gif loop count: {e}")))?;
        self.encoder = Some(encoder);
        self.cfg = Some(cfg);
        Ok(())
    }

    fn submit(&mut self, surface: &CompositeSurface, delay_ms: f64) -> GifsciiResult<()> {
        let (Some(cfg), Some(encoder)) = (self.cfg, self.encoder.as_mut()) else {
            return Err(GifsciiError::encode("submit before begin"));
        };
        if (surface.width, surface.height) != (cfg.width, cfg.height) {
            return Err(GifsciiError::encode(format!(
                "surface is {}x{}, encoder expects {}x{}",
                surface.width, surface.height, cfg.width, cfg.height
            )));
        }
        let image = surface.to_rgba_image()?;
        let delay = image::Delay::from_numer_denom_ms(delay_ms.max(0.0).round() as u32, 1);
        encoder
            .encode_frame(image::Frame::from_parts(image, 0, 0, delay))
            .map_err(|e| GifsciiError::encode(format!("encode gif frame: {e}")))
    }

    fn finish(&mut self) -> GifsciiResult<Vec<u8>> {
        let Some(encoder) = self.encoder.take() else {
            return Err(GifsciiError::encode("finish before begin"));
        };
        // Dropping the encoder writes the trailer.
        drop(encoder);
        self.cfg = None;
        Ok(self.out.take())
    }

    fn abort(&mut self) {
        self.encoder = None;
        self.cfg = None;
        self.out.take();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/codec/gif.rs"]
mod tests;
