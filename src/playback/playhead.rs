/// Circular frame cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playhead {
    index: usize,
    len: usize,
}

impl Playhead {
    /// Cursor at frame 0 over `len` frames. `None` when `len` is zero.
    pub fn new(len: usize) -> Option<Self> {
        (len > 0).then_some(Self { index: 0, len })
    }

    /// Current frame index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move to the next frame, wrapping to 0 after the last, and return the new index.
    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.len;
        self.index
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/playhead.rs"]
mod tests;
