//! Per-block layer selection.

mod classifier;

pub use classifier::{Classifier, classify_pixel};
