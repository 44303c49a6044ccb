//! Live playback: a timed, cancellable loop that composites frames onto a display.

mod cancel;
mod player;
mod playhead;
mod session;

pub use cancel::CancellationToken;
pub use player::Player;
pub use playhead::Playhead;
pub use session::{Display, PlaybackSession, SessionState};
