use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use resvg::tiny_skia;

use crate::color::Color;
use crate::foundation::error::{GifsciiError, GifsciiResult};

/// Font database shared by every glyph atlas of a run.
#[derive(Clone)]
pub struct GlyphFonts {
    db: Arc<usvg::fontdb::Database>,
}

impl GlyphFonts {
    /// System fonts.
    pub fn system() -> Self {
        Self::with_dirs(std::iter::empty::<&Path>())
    }

    /// System fonts plus every `.ttf`/`.otf`/`.ttc` file directly inside `dirs`.
    pub fn with_dirs<P: AsRef<Path>>(dirs: impl IntoIterator<Item = P>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir.as_ref());
        }
        if db.faces().next().is_none() {
            tracing::warn!("no fonts found; glyphs will render as empty cells");
        } else {
            pin_monospace_family(&mut db);
        }
        Self { db: Arc::new(db) }
    }

    /// Database without any faces. Glyphs rasterize to empty cells.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(usvg::fontdb::Database::new()),
        }
    }

    /// Number of loaded font faces.
    pub fn face_count(&self) -> usize {
        self.db.faces().count()
    }
}

impl fmt::Debug for GlyphFonts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphFonts")
            .field("faces", &self.face_count())
            .finish()
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "font dir not readable");
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            tracing::debug!(path = %path.display(), %err, "skipping font file");
        }
    }
}

// Glyph SVGs ask for `monospace`; point the generic family at a face that actually exists.
fn pin_monospace_family(db: &mut usvg::fontdb::Database) {
    let query = usvg::fontdb::Query {
        families: &[usvg::fontdb::Family::Monospace],
        ..Default::default()
    };
    if db.query(&query).is_some() {
        return;
    }
    let family = db
        .faces()
        .find(|face| face.monospaced)
        .or_else(|| db.faces().next())
        .and_then(|face| face.families.first())
        .map(|(name, _)| name.clone());
    if let Some(name) = family {
        tracing::debug!(family = %name, "using fallback monospace family");
        db.set_monospace_family(name);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GlyphKey {
    glyph: char,
    cell_bits: u64,
    color: Color,
}

/// Rasterized glyph cell, centered on its pixmap.
pub(crate) struct GlyphCell {
    pub(crate) pixmap: tiny_skia::Pixmap,
}

/// Cache of rasterized glyph cells keyed by glyph, cell size and color.
///
/// One atlas lives for one surface owner (a live display or one export worker); nothing is shared
/// across atlases except the font database.
pub struct GlyphAtlas {
    fonts: GlyphFonts,
    cells: HashMap<GlyphKey, Option<GlyphCell>>,
}

impl GlyphAtlas {
    /// Empty atlas over `fonts`.
    pub fn new(fonts: GlyphFonts) -> Self {
        Self {
            fonts,
            cells: HashMap::new(),
        }
    }

    /// Number of cached cells, including blank glyphs.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` when nothing has been rasterized yet.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell for `glyph`, rasterizing it on first use. `None` for whitespace.
    pub(crate) fn cell(
        &mut self,
        glyph: char,
        cell_size: f64,
        color: Color,
    ) -> GifsciiResult<Option<&GlyphCell>> {
        let key = GlyphKey {
            glyph,
            cell_bits: cell_size.to_bits(),
            color,
        };
        if !self.cells.contains_key(&key) {
            let cell = rasterize_glyph(&self.fonts, glyph, cell_size, color)?;
            self.cells.insert(key, cell);
        }
        Ok(self.cells.get(&key).and_then(Option::as_ref))
    }
}

impl fmt::Debug for GlyphAtlas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphAtlas")
            .field("fonts", &self.fonts)
            .field("cells", &self.cells.len())
            .finish()
    }
}

/// Side of the square pixmap a glyph of `cell_size` is rasterized into. Twice the cell so wide
/// glyphs are not clipped.
pub(crate) fn cell_extent(cell_size: f64) -> u32 {
    (cell_size * 2.0).ceil().clamp(1.0, 4096.0) as u32
}

fn rasterize_glyph(
    fonts: &GlyphFonts,
    glyph: char,
    cell_size: f64,
    color: Color,
) -> GifsciiResult<Option<GlyphCell>> {
    if glyph.is_whitespace() || !cell_size.is_finite() || cell_size <= 0.0 {
        return Ok(None);
    }

    let side = cell_extent(cell_size);
    let mid = f64::from(side) / 2.0;
    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{side}" height="{side}" "#,
            r#"viewBox="0 0 {side} {side}">"#,
            r#"<text x="{mid}" y="{mid}" font-family="monospace" font-size="{size}" "#,
            r#"text-anchor="middle" dominant-baseline="central" fill="{fill}">{text}</text>"#,
            "</svg>"
        ),
        side = side,
        mid = mid,
        size = cell_size,
        fill = color.to_hex(),
        text = escape_xml(glyph),
    );

    let opts = usvg::Options {
        fontdb: fonts.db.clone(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts)
        .with_context(|| format!("parse glyph svg for {glyph:?}"))?;

    let mut pixmap = tiny_skia::Pixmap::new(side, side).ok_or_else(|| {
        GifsciiError::missing_surface(format!("failed to allocate {side}x{side} glyph pixmap"))
    })?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
    Ok(Some(GlyphCell { pixmap }))
}

fn escape_xml(glyph: char) -> String {
    match glyph {
        '&' => "&amp;".to_owned(),
        '<' => "&lt;".to_owned(),
        '>' => "&gt;".to_owned(),
        '"' => "&quot;".to_owned(),
        '\'' => "&apos;".to_owned(),
        c => c.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/glyph.rs"]
mod tests;
