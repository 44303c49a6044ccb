use std::sync::Arc;

use crate::config::RenderSnapshot;
use crate::foundation::core::Frame;
use crate::foundation::error::{GifsciiError, GifsciiResult};
use crate::playback::session::{Display, PlaybackSession, SessionState};

/// Owns decoded frames and a display, and runs at most one [`PlaybackSession`] over them.
///
/// Every configuration change replaces the snapshot and, when playing, restarts playback from
/// frame 0 on a fresh session.
pub struct Player<D: Display + 'static> {
    frames: Arc<[Frame]>,
    snapshot: Arc<RenderSnapshot>,
    display: Option<D>,
    session: Option<PlaybackSession<D>>,
}

impl<D: Display + 'static> Player<D> {
    /// Idle player. Fails with `EmptyContent` when `frames` is empty.
    pub fn new(frames: Vec<Frame>, snapshot: RenderSnapshot, display: D) -> GifsciiResult<Self> {
        if frames.is_empty() {
            return Err(GifsciiError::EmptyContent);
        }
        snapshot.validate()?;
        Ok(Self {
            frames: frames.into(),
            snapshot: Arc::new(snapshot),
            display: Some(display),
            session: None,
        })
    }

    /// Frames being played.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Snapshot the next session will use.
    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }

    /// State of the current session, `Idle` when there is none.
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, PlaybackSession::state)
    }

    /// Frames presented by the current session.
    pub fn shown(&self) -> u64 {
        self.session.as_ref().map_or(0, PlaybackSession::shown)
    }

    /// Start playing from frame 0. No-op while already running.
    ///
    /// When the previous session ended with an error, that error is returned instead and the
    /// player stays idle with its display recovered; the next call starts playback.
    pub fn play(&mut self) -> GifsciiResult<()> {
        if self.state() == SessionState::Running {
            return Ok(());
        }
        self.halt()?;
        let display = self.display.take().ok_or_else(|| {
            GifsciiError::missing_surface("display was lost by a previous session")
        })?;
        self.session = Some(PlaybackSession::start(
            Arc::clone(&self.frames),
            Arc::clone(&self.snapshot),
            display,
        )?);
        Ok(())
    }

    /// Replace the snapshot. A running session is discarded and playback restarts from frame 0.
    ///
    /// An invalid snapshot is rejected and leaves playback untouched.
    pub fn reconfigure(&mut self, snapshot: RenderSnapshot) -> GifsciiResult<()> {
        snapshot.validate()?;
        let was_running = self.state() == SessionState::Running;
        self.discard_session();
        self.snapshot = Arc::new(snapshot);
        tracing::debug!(was_running, "player reconfigured");
        if was_running {
            self.play()
        } else {
            Ok(())
        }
    }

    /// Stop playback. Idempotent.
    pub fn stop(&mut self) -> GifsciiResult<()> {
        self.halt()
    }

    /// Stop playback and hand back the display.
    pub fn into_display(mut self) -> GifsciiResult<D> {
        self.halt()?;
        self.display.take().ok_or_else(|| {
            GifsciiError::missing_surface("display was lost by a previous session")
        })
    }

    // Like `halt`, for callers that replace the session anyway.
    fn discard_session(&mut self) {
        if let Err(err) = self.halt() {
            tracing::warn!(%err, "discarding failed playback session");
        }
    }

    // Stops the current session, if any, and recovers its display.
    fn halt(&mut self) -> GifsciiResult<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        let res = session.stop();
        if let Some(display) = session.take_display() {
            self.display = Some(display);
        }
        res
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
