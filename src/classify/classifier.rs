use crate::color::Color;
use crate::layers::{Layer, LayerStack};

/// Visible layers of one stack, prepared for repeated classification.
///
/// Built once per compositing pass. Layers are held highest priority first so a scan can stop at
/// the first match.
#[derive(Clone, Debug)]
pub struct Classifier<'a> {
    by_priority: Vec<&'a Layer>,
}

impl<'a> Classifier<'a> {
    /// Prepare the visible layers of `stack`.
    pub fn new(stack: &'a LayerStack) -> Self {
        Self {
            by_priority: stack.visible().rev().collect(),
        }
    }

    /// `true` when no visible layer can ever match.
    pub fn is_empty(&self) -> bool {
        self.by_priority.is_empty()
    }

    /// Pick the layer for one sampled RGBA pixel, or `None` when nothing matches.
    ///
    /// Fully transparent pixels never match. Otherwise the highest-priority (last inserted) layer
    /// whose spread contains the color wins.
    pub fn classify(&self, rgba: [u8; 4]) -> Option<&'a Layer> {
        if rgba[3] == 0 {
            return None;
        }
        let color = Color::rgb(rgba[0], rgba[1], rgba[2]);
        self.by_priority.iter().copied().find(|l| l.matches(color))
    }
}

/// One-shot classification of a single pixel against `stack`.
pub fn classify_pixel(stack: &LayerStack, rgba: [u8; 4]) -> Option<&Layer> {
    Classifier::new(stack).classify(rgba)
}

#[cfg(test)]
#[path = "../../tests/unit/classify/classifier.rs"]
mod tests;
