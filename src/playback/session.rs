use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use anyhow::anyhow;

use crate::config::RenderSnapshot;
use crate::foundation::core::Frame;
use crate::foundation::error::{GifsciiError, GifsciiResult};
use crate::pacing::pace_frame;
use crate::playback::cancel::CancellationToken;
use crate::playback::playhead::Playhead;
use crate::render::{Canvas, Compositor, surface_size};

/// Live output target for a playback session.
///
/// Each tick asks for a surface sized to the current frame, composites onto it, then presents it.
pub trait Display: Send {
    /// Drawing surface of exactly `width` x `height` pixels.
    ///
    /// Fails with `MissingSurface` when the target is gone; the session then ends.
    fn surface(&mut self, width: u32, height: u32) -> GifsciiResult<&mut dyn Canvas>;

    /// Show what was drawn for frame `frame_index`.
    fn present(&mut self, frame_index: usize) -> GifsciiResult<()>;
}

/// Lifecycle of a [`PlaybackSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No tick is scheduled.
    Idle,
    /// A worker is showing frames.
    Running,
}

#[derive(Debug, Default)]
struct Progress {
    shown: AtomicU64,
}

type WorkerOutput<D> = (D, GifsciiResult<()>);

/// One running instance of the live loop over an immutable snapshot.
///
/// The worker shows the current frame immediately, sleeps for its paced delay and moves on,
/// wrapping after the last frame. [`stop`](Self::stop) is effective on return: no composite or
/// present happens afterwards.
pub struct PlaybackSession<D: Display + 'static> {
    token: CancellationToken,
    worker: Option<JoinHandle<WorkerOutput<D>>>,
    progress: Arc<Progress>,
    display: Option<D>,
}

impl<D: Display + 'static> PlaybackSession<D> {
    /// Validate `snapshot` and start showing `frames` from frame 0 on a dedicated thread.
    #[tracing::instrument(skip_all, fields(frames = frames.len()))]
    pub fn start(
        frames: Arc<[Frame]>,
        snapshot: Arc<RenderSnapshot>,
        display: D,
    ) -> GifsciiResult<Self> {
        let playhead = Playhead::new(frames.len()).ok_or(GifsciiError::EmptyContent)?;
        snapshot.validate()?;

        let token = CancellationToken::new();
        let progress = Arc::new(Progress::default());
        let worker = std::thread::Builder::new()
            .name("gifscii-playback".to_owned())
            .spawn({
                let token = token.clone();
                let progress = Arc::clone(&progress);
                move || {
                    let mut display = display;
                    let res = run_loop(&frames, &snapshot, &mut display, playhead, &token, &progress);
                    if let Err(err) = &res {
                        tracing::warn!(%err, "playback session ended with an error");
                    }
                    (display, res)
                }
            })
            .map_err(|e| anyhow!("spawn playback worker: {e}"))?;

        Ok(Self {
            token,
            worker: Some(worker),
            progress,
            display: None,
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        match &self.worker {
            Some(handle) if !handle.is_finished() => SessionState::Running,
            _ => SessionState::Idle,
        }
    }

    /// Number of frames presented so far.
    pub fn shown(&self) -> u64 {
        self.progress.shown.load(Ordering::Acquire)
    }

    /// Token that stops this session when cancelled; clones may be handed to other threads.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancel the pending tick and wait for the worker to exit.
    ///
    /// Idempotent. Returns the error that ended the session early, if any, on the first call.
    /// Called from the worker thread itself, it only cancels.
    pub fn stop(&mut self) -> GifsciiResult<()> {
        self.token.cancel();
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };
        if handle.thread().id() == std::thread::current().id() {
            return Ok(());
        }
        match handle.join() {
            Ok((display, res)) => {
                self.display = Some(display);
                res
            }
            Err(_) => Err(anyhow!("playback worker panicked").into()),
        }
    }

    /// Take back the display after [`stop`](Self::stop).
    pub fn take_display(&mut self) -> Option<D> {
        self.display.take()
    }
}

impl<D: Display + 'static> Drop for PlaybackSession<D> {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

fn run_loop<D: Display>(
    frames: &[Frame],
    snapshot: &RenderSnapshot,
    display: &mut D,
    mut playhead: Playhead,
    token: &CancellationToken,
    progress: &Progress,
) -> GifsciiResult<()> {
    let compositor = Compositor::new(&snapshot.layers, &snapshot.render);
    loop {
        if token.is_cancelled() {
            return Ok(());
        }

        let index = playhead.index();
        let frame = &frames[index];
        match surface_size(frame, &snapshot.render) {
            Ok((width, height)) => {
                let canvas = display.surface(width, height)?;
                compositor.composite(frame, canvas)?;
                display.present(index)?;
                progress.shown.fetch_add(1, Ordering::AcqRel);
            }
            Err(GifsciiError::DegenerateFrame { width, height }) => {
                tracing::debug!(index, width, height, "not showing degenerate frame");
            }
            Err(err) => return Err(err),
        }

        let delay = pace_frame(frame, &snapshot.pacing);
        tracing::debug!(
            index,
            baseline_ms = frame.delay_ms(),
            speed = snapshot.pacing.speed,
            delay_ms = delay.as_secs_f64() * 1000.0,
            "paced frame"
        );
        playhead.advance();

        if token.wait_timeout(delay) {
            return Ok(());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/session.rs"]
mod tests;
