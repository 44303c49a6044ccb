/// Convenience result type used across gifscii.
pub type GifsciiResult<T> = Result<T, GifsciiError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GifsciiError {
    /// Malformed hex color text.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The animation has no frames to play or export.
    #[error("empty content: animation has no frames")]
    EmptyContent,

    /// Frame (or derived output surface) with a zero dimension.
    #[error("degenerate frame: {width}x{height}")]
    DegenerateFrame {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// Invalid user-provided configuration or frame data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Failure reported by the decoder collaborator.
    #[error("decode error: {0}")]
    Decode(String),

    /// Failure reported by the encoder collaborator.
    #[error("encode error: {0}")]
    Encode(String),

    /// Drawing target unavailable.
    #[error("missing surface: {0}")]
    MissingSurface(String),

    /// Operation aborted through a cancellation token.
    #[error("cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GifsciiError {
    /// Build a [`GifsciiError::InvalidColor`] value.
    pub fn invalid_color(msg: impl Into<String>) -> Self {
        Self::InvalidColor(msg.into())
    }

    /// Build a [`GifsciiError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GifsciiError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`GifsciiError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`GifsciiError::MissingSurface`] value.
    pub fn missing_surface(msg: impl Into<String>) -> Self {
        Self::MissingSurface(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
