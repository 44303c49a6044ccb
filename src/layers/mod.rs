//! Classification layers and their priority-ordered stack.

mod stack;

pub use stack::{Layer, LayerStack, LegacyLayer, MAX_SPREAD, UNDERLAY_SENTINEL_ID};
