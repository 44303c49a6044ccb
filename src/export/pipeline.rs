use rayon::prelude::*;

use crate::codec::GifFrameEncoder;
use crate::config::{RenderConfig, RenderSnapshot};
use crate::export::encoder::{DEFAULT_QUALITY, EncoderConfig, FrameEncoder};
use crate::foundation::core::Frame;
use crate::foundation::error::{GifsciiError, GifsciiResult};
use crate::pacing::{PacingConfig, pace};
use crate::playback::CancellationToken;
use crate::render::{CompositeSurface, Compositor, GlyphAtlas, GlyphFonts, RasterCanvas};

/// Threading and chunking controls for export.
#[derive(Clone, Debug)]
pub struct ExportThreading {
    /// Composite frames on a rayon pool when `true`.
    pub parallel: bool,
    /// Frames composited per batch before their surfaces are handed to the encoder.
    pub chunk_size: usize,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for ExportThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 16,
            threads: None,
        }
    }
}

/// Options for one export run.
#[derive(Clone, Debug)]
pub struct ExportOpts {
    /// Threading controls.
    pub threading: ExportThreading,
    /// Encoder quality hint in `1..=30`, lower is better.
    pub quality: u8,
    /// Checked before every frame; once cancelled the run aborts the encoder and fails with
    /// `Cancelled`.
    pub cancel: Option<CancellationToken>,
    /// Fonts for glyph rasterization; system fonts when `None`.
    pub fonts: Option<GlyphFonts>,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            threading: ExportThreading::default(),
            quality: DEFAULT_QUALITY,
            cancel: None,
            fonts: None,
        }
    }
}

impl ExportOpts {
    fn check_cancelled(&self) -> GifsciiResult<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(GifsciiError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Composite and pace every frame with `snapshot`, feed `encoder` in frame order and return the
/// bytes it produces.
///
/// Frames are visited exactly once. All non-degenerate frames must share one size, which sets the
/// output size; mixed sizes fail with `Validation` before the encoder is started. Degenerate
/// frames still yield a background-only surface so every frame is submitted. Any failure,
/// including cancellation, aborts the encoder.
#[tracing::instrument(
    skip_all,
    fields(frames = frames.len(), parallel = opts.threading.parallel)
)]
pub fn export(
    frames: &[Frame],
    snapshot: &RenderSnapshot,
    encoder: &mut dyn FrameEncoder,
    opts: &ExportOpts,
) -> GifsciiResult<Vec<u8>> {
    if frames.is_empty() {
        return Err(GifsciiError::EmptyContent);
    }
    snapshot.validate()?;
    let (width, height) = output_size(frames, &snapshot.render)?;
    let fonts = opts.fonts.clone().unwrap_or_else(GlyphFonts::system);

    encoder.begin(EncoderConfig {
        width,
        height,
        quality: opts.quality.clamp(1, 30),
    })?;

    let job = Job {
        compositor: Compositor::new(&snapshot.layers, &snapshot.render),
        pacing: &snapshot.pacing,
        fonts: &fonts,
        width,
        height,
    };
    let submitted = if opts.threading.parallel {
        export_parallel(frames, &job, encoder, opts)
    } else {
        export_sequential(frames, &job, encoder, opts)
    };
    if let Err(err) = submitted {
        encoder.abort();
        tracing::debug!(%err, "export aborted");
        return Err(err);
    }

    let bytes = encoder.finish()?;
    tracing::info!(
        frames = frames.len(),
        width,
        height,
        bytes = bytes.len(),
        "export finished"
    );
    Ok(bytes)
}

/// [`export`] into an animated GIF that loops forever.
pub fn export_gif(
    frames: &[Frame],
    snapshot: &RenderSnapshot,
    opts: &ExportOpts,
) -> GifsciiResult<Vec<u8>> {
    let mut encoder = GifFrameEncoder::new();
    export(frames, snapshot, &mut encoder, opts)
}

fn output_size(frames: &[Frame], render: &RenderConfig) -> GifsciiResult<(u32, u32)> {
    let mut sized = frames.iter().enumerate().filter(|(_, f)| !f.is_degenerate());
    let Some((_, reference)) = sized.next() else {
        return Err(GifsciiError::DegenerateFrame {
            width: frames[0].width(),
            height: frames[0].height(),
        });
    };
    let size = (reference.width(), reference.height());
    if let Some((index, odd)) = sized.find(|(_, f)| (f.width(), f.height()) != size) {
        return Err(GifsciiError::validation(format!(
            "frame {index} is {}x{}, expected {}x{} like the first frame",
            odd.width(),
            odd.height(),
            size.0,
            size.1
        )));
    }
    render.output_size(size.0, size.1)
}

struct Job<'a> {
    compositor: Compositor<'a>,
    pacing: &'a PacingConfig,
    fonts: &'a GlyphFonts,
    width: u32,
    height: u32,
}

impl Job<'_> {
    fn render(
        &self,
        frame: &Frame,
        atlas: &mut Option<GlyphAtlas>,
    ) -> GifsciiResult<(CompositeSurface, f64)> {
        let glyphs = atlas
            .take()
            .unwrap_or_else(|| GlyphAtlas::new(self.fonts.clone()));
        let mut canvas = RasterCanvas::new(self.width, self.height, glyphs)?;
        self.compositor.composite(frame, &mut canvas)?;
        let (surface, glyphs) = canvas.into_parts();
        *atlas = Some(glyphs);
        Ok((surface, pace(frame.delay_ms(), self.pacing)))
    }
}

fn submit(
    encoder: &mut dyn FrameEncoder,
    index: usize,
    surface: &CompositeSurface,
    delay_ms: f64,
) -> GifsciiResult<()> {
    tracing::debug!(index, delay_ms, "submitting frame");
    encoder.submit(surface, delay_ms)
}

fn export_sequential(
    frames: &[Frame],
    job: &Job<'_>,
    encoder: &mut dyn FrameEncoder,
    opts: &ExportOpts,
) -> GifsciiResult<()> {
    let mut atlas = None;
    for (index, frame) in frames.iter().enumerate() {
        opts.check_cancelled()?;
        let (surface, delay_ms) = job.render(frame, &mut atlas)?;
        submit(encoder, index, &surface, delay_ms)?;
    }
    Ok(())
}

fn export_parallel(
    frames: &[Frame],
    job: &Job<'_>,
    encoder: &mut dyn FrameEncoder,
    opts: &ExportOpts,
) -> GifsciiResult<()> {
    let pool = build_thread_pool(opts.threading.threads)?;
    let chunk_size = normalized_chunk_size(opts.threading.chunk_size);

    let mut index = 0;
    for chunk in frames.chunks(chunk_size) {
        opts.check_cancelled()?;
        let rendered = pool.install(|| {
            chunk
                .par_iter()
                .map_init(
                    || None::<GlyphAtlas>,
                    |atlas, frame| -> GifsciiResult<(CompositeSurface, f64)> {
                        opts.check_cancelled()?;
                        job.render(frame, atlas)
                    },
                )
                .collect::<Vec<_>>()
        });

        for item in rendered {
            opts.check_cancelled()?;
            let (surface, delay_ms) = item?;
            submit(encoder, index, &surface, delay_ms)?;
            index += 1;
        }
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> GifsciiResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(GifsciiError::validation(
            "export threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder =
        rayon::ThreadPoolBuilder::new().thread_name(|i| format!("gifscii-export-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| GifsciiError::validation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
