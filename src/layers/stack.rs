use serde::{Deserialize, Serialize};

use crate::color::{Color, distance, parse_color};
use crate::foundation::error::{GifsciiError, GifsciiResult};

/// Upper bound for [`Layer::spread`]. Larger than [`crate::MAX_DISTANCE`], so a layer at full
/// spread matches every opaque color.
pub const MAX_SPREAD: f64 = 500.0;

/// Layer id that legacy layer lists use to mark the raw-frame underlay.
pub const UNDERLAY_SENTINEL_ID: i64 = -1;

fn yes() -> bool {
    true
}

/// One classification rule: blocks whose sampled color lies within `spread` of `target` are
/// drawn as `symbol` in `foreground` over a `background` fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique id within a stack.
    pub id: u32,
    /// Glyph stamped at the block center.
    pub symbol: char,
    /// Glyph color.
    #[serde(alias = "fg")]
    pub foreground: Color,
    /// Block fill color.
    #[serde(alias = "bg")]
    pub background: Color,
    /// Color this layer matches against.
    pub target: Color,
    /// Maximum RGB distance from `target` that still matches, in `[0, MAX_SPREAD]`.
    pub spread: f64,
    /// Hidden layers never take part in classification.
    #[serde(default = "yes")]
    pub visible: bool,
    /// Whether the block rectangle is filled with `background` before the glyph is drawn.
    #[serde(default = "yes", alias = "bgEnabled")]
    pub fill_background: bool,
}

impl Layer {
    /// Visible layer with black glyphs on a white fill and a spread of 100.
    pub fn new(id: u32, symbol: char, target: Color) -> Self {
        Self {
            id,
            symbol,
            foreground: Color::BLACK,
            background: Color::WHITE,
            target,
            spread: 100.0,
            visible: true,
            fill_background: true,
        }
    }

    /// Replace the spread radius.
    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = spread;
        self
    }

    /// Replace glyph and fill colors.
    pub fn with_colors(mut self, foreground: Color, background: Color) -> Self {
        self.foreground = foreground;
        self.background = background;
        self
    }

    /// Mark the layer hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Disable the block background fill.
    pub fn without_background(mut self) -> Self {
        self.fill_background = false;
        self
    }

    /// `true` when `color` lies within this layer's spread of its target.
    pub fn matches(&self, color: Color) -> bool {
        distance(color, self.target) <= self.spread
    }

    /// Check spread range and glyph.
    pub fn validate(&self) -> GifsciiResult<()> {
        if !self.spread.is_finite() || !(0.0..=MAX_SPREAD).contains(&self.spread) {
            return Err(GifsciiError::validation(format!(
                "layer {} spread must be within [0, {MAX_SPREAD}], got {}",
                self.id, self.spread
            )));
        }
        if self.symbol.is_control() {
            return Err(GifsciiError::validation(format!(
                "layer {} symbol must be a printable glyph",
                self.id
            )));
        }
        Ok(())
    }
}

/// Ordered layers; insertion order is priority order, lowest priority first.
///
/// When several visible layers match a color the one furthest down the list wins.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack from layers in priority order, validating each one and id uniqueness.
    pub fn from_layers(layers: Vec<Layer>) -> GifsciiResult<Self> {
        let stack = Self { layers };
        stack.validate()?;
        Ok(stack)
    }

    /// Default authoring stack: `@` on black, `#` on red, `*` on green and a hidden `%` on blue.
    pub fn starter() -> Self {
        Self {
            layers: vec![
                Layer::new(0, '@', Color::BLACK),
                Layer::new(1, '#', Color::rgb(255, 0, 0))
                    .with_colors(Color::WHITE, Color::BLACK),
                Layer::new(2, '*', Color::rgb(0, 255, 0)),
                Layer::new(3, '%', Color::rgb(0, 0, 255))
                    .with_colors(Color::rgb(0, 0, 255), Color::WHITE)
                    .hidden(),
            ],
        }
    }

    /// Convert a legacy layer list, where an entry with id `-1` toggles the underlay.
    ///
    /// Returns the stack without the sentinel plus the sentinel's visibility (`false` when absent).
    pub fn from_legacy(layers: Vec<LegacyLayer>) -> GifsciiResult<(Self, bool)> {
        let mut underlay = None;
        let mut out = Vec::with_capacity(layers.len());
        for legacy in layers {
            if legacy.id == UNDERLAY_SENTINEL_ID {
                if underlay.is_some() {
                    return Err(GifsciiError::validation(
                        "legacy layer list has more than one underlay entry",
                    ));
                }
                underlay = Some(legacy.visible);
                continue;
            }
            out.push(legacy.into_layer()?);
        }
        Ok((Self::from_layers(out)?, underlay.unwrap_or(false)))
    }

    /// Number of layers, visible or not.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// `true` when the stack holds no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers in priority order, lowest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Visible layers in priority order, lowest first.
    pub fn visible(&self) -> impl DoubleEndedIterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.visible)
    }

    /// Look up a layer by id.
    pub fn get(&self, id: u32) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Smallest id greater than every id in the stack.
    pub fn next_id(&self) -> u32 {
        self.layers
            .iter()
            .map(|l| l.id.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Append a layer at the highest priority.
    pub fn push(&mut self, layer: Layer) -> GifsciiResult<()> {
        layer.validate()?;
        if self.get(layer.id).is_some() {
            return Err(GifsciiError::validation(format!(
                "layer id {} is already in use",
                layer.id
            )));
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Remove and return the layer with `id`.
    pub fn remove(&mut self, id: u32) -> GifsciiResult<Layer> {
        let idx = self.position(id)?;
        Ok(self.layers.remove(idx))
    }

    /// Edit the layer with `id` in place. The edit is discarded if the result fails validation.
    pub fn update(&mut self, id: u32, edit: impl FnOnce(&mut Layer)) -> GifsciiResult<()> {
        let idx = self.position(id)?;
        let mut edited = self.layers[idx].clone();
        edit(&mut edited);
        edited.validate()?;
        if edited.id != id && self.get(edited.id).is_some() {
            return Err(GifsciiError::validation(format!(
                "layer id {} is already in use",
                edited.id
            )));
        }
        self.layers[idx] = edited;
        Ok(())
    }

    /// Show or hide the layer with `id`.
    pub fn set_visible(&mut self, id: u32, visible: bool) -> GifsciiResult<()> {
        self.update(id, |l| l.visible = visible)
    }

    /// Move the layer with `id` to `index` (clamped to the end), changing its priority.
    pub fn move_to(&mut self, id: u32, index: usize) -> GifsciiResult<()> {
        let from = self.position(id)?;
        let layer = self.layers.remove(from);
        let to = index.min(self.layers.len());
        self.layers.insert(to, layer);
        Ok(())
    }

    /// Validate every layer and check ids are unique.
    pub fn validate(&self) -> GifsciiResult<()> {
        let mut seen = std::collections::HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            layer.validate()?;
            if !seen.insert(layer.id) {
                return Err(GifsciiError::validation(format!(
                    "duplicate layer id {}",
                    layer.id
                )));
            }
        }
        Ok(())
    }

    fn position(&self, id: u32) -> GifsciiResult<usize> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| GifsciiError::validation(format!("no layer with id {id}")))
    }
}

/// Layer record in the older list format, with string colors and a signed id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyLayer {
    /// Layer id; `-1` marks the underlay entry.
    pub id: i64,
    /// Glyph text; must hold exactly one character except on the underlay entry.
    pub symbol: String,
    /// Glyph color as hex text.
    pub fg: String,
    /// Fill color as hex text.
    pub bg: String,
    /// Target color as hex text.
    pub target: String,
    /// Spread radius.
    pub spread: f64,
    /// Visibility (for the underlay entry: whether the raw frame is painted).
    pub visible: bool,
    /// Background fill toggle; absent means enabled.
    #[serde(default, rename = "bgEnabled", skip_serializing_if = "Option::is_none")]
    pub bg_enabled: Option<bool>,
}

impl LegacyLayer {
    fn into_layer(self) -> GifsciiResult<Layer> {
        let id = u32::try_from(self.id).map_err(|_| {
            GifsciiError::validation(format!("legacy layer id {} is out of range", self.id))
        })?;
        let mut chars = self.symbol.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(GifsciiError::validation(format!(
                    "legacy layer {id} symbol must be a single character, got {:?}",
                    self.symbol
                )));
            }
        };
        let layer = Layer {
            id,
            symbol,
            foreground: parse_color(&self.fg)?,
            background: parse_color(&self.bg)?,
            target: parse_color(&self.target)?,
            spread: self.spread,
            visible: self.visible,
            fill_background: self.bg_enabled.unwrap_or(true),
        };
        layer.validate()?;
        Ok(layer)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layers/stack.rs"]
mod tests;
