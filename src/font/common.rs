//! Types shared by all font sets: glyph handles, metric records and the
//! abstraction over a single loaded font file.

use std::collections::HashMap;

/// An opaque handle to a glyph inside one face. The core never interprets it;
/// it is produced by a [`Face`](crate::font::common::Face) and handed back to
/// the backend through the draw list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlyphId(pub u16);

impl From<GlyphId> for u16 {
    fn from(gid: GlyphId) -> u16 {
        gid.0
    }
}

/// Glyph measurements in the TeX box convention, at a resolved point size and
/// dpi. `height` is the full extent of the outline; `iceberg` is the part of
/// it above the baseline (FreeType's `horiBearingY`), so the depth of a glyph
/// is `-(iceberg - height)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// horizontal distance to the origin of the next glyph
    pub advance: f64,
    /// width of the outline
    pub width: f64,
    /// total height of the outline
    pub height: f64,
    /// left edge of the outline relative to the glyph origin
    pub xmin: f64,
    /// right edge of the outline relative to the glyph origin
    pub xmax: f64,
    /// bottom of the outline, positive above the baseline
    pub ymin: f64,
    /// top of the outline, positive above the baseline
    pub ymax: f64,
    /// extent of the outline above the baseline
    pub iceberg: f64,
    /// whether the glyph leans and needs italic correction
    pub slanted: bool,
}

/// Everything a backend needs to actually draw one glyph, plus the metrics
/// the layout engine consumed. Opaque to the box model itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphInfo {
    /// name of the concrete face the glyph was resolved in, e.g. `"cmmi10"`
    pub face: String,
    /// the glyph inside that face
    pub glyph: GlyphId,
    /// point size the metrics were computed at
    pub fontsize: f64,
    /// dots per inch the metrics were computed at
    pub dpi: f64,
    /// vertical offset applied to the outline (the cmex10 correction)
    pub offset: f64,
    /// the measurements of the glyph
    pub metrics: Metrics,
}

/// Raw measurements of one glyph as a face reports them, already scaled to a
/// point size and dpi but before any font-set policy (offsets, slanting) is
/// applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMetrics {
    pub advance: f64,
    pub width: f64,
    pub height: f64,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    /// extent above the baseline (`horiBearingY`)
    pub bearing_y: f64,
}

/// One loaded font file. Implementations live outside the core (see the
/// `ttfparser-fontparser` feature for one); the reference font sets are
/// generic over this trait.
pub trait Face {
    /// The PostScript name of the face, e.g. `"Cmex10"`. Used by font sets to
    /// key policy decisions and reported to backends through
    /// [`GlyphInfo::face`].
    fn postscript_name(&self) -> &str;

    /// Looks up the glyph for a code point in the face's character map.
    fn glyph_index(&self, codepoint: u32) -> Option<GlyphId>;

    /// Measures a glyph at the given point size and dpi.
    fn glyph_metrics(&self, glyph: GlyphId, fontsize: f64, dpi: f64) -> Option<RawMetrics>;

    /// Pair kerning between two glyphs of this face, in points.
    fn kerning(&self, _left: GlyphId, _right: GlyphId, _fontsize: f64, _dpi: f64) -> f64 {
        0.0
    }

    /// The x-height of the face at the given size, if the face records one.
    fn x_height(&self, _fontsize: f64, _dpi: f64) -> Option<f64> {
        None
    }
}

/// A collection of loaded faces keyed by basename (`"cmr10"`,
/// `"STIXGeneral"`, ...). Loading and file discovery happen outside the core;
/// the font sets only ever look faces up here.
#[derive(Debug, Default)]
pub struct FaceSet<F> {
    faces: HashMap<String, F>,
}

impl<F: Face> FaceSet<F> {
    pub fn new() -> FaceSet<F> {
        FaceSet { faces: HashMap::new() }
    }

    /// Registers a face under a basename, replacing any previous face with
    /// that name.
    pub fn insert(&mut self, name: impl Into<String>, face: F) {
        self.faces.insert(name.into(), face);
    }

    pub fn face(&self, name: &str) -> Option<&F> {
        self.faces.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.faces.contains_key(name)
    }
}
