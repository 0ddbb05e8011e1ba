//! A [`Face`](crate::font::common::Face) over the `ttf-parser` crate.
//!
//! Metric conversion follows the FreeType sizing convention: one em of the
//! face maps to `fontsize * dpi / 72` device points.

use crate::font::common::{Face, GlyphId, RawMetrics};

/// One TrueType/OpenType face parsed by `ttf-parser`. The face borrows the
/// font file bytes for `'f`.
pub struct TtfFace<'f> {
    face: ttf_parser::Face<'f>,
    postscript_name: String,
}

impl<'f> TtfFace<'f> {
    /// Wraps a parsed face. The PostScript name is passed in rather than
    /// extracted so that faces without a usable `name` table can still be
    /// keyed (it decides, among other things, the cmex10 baseline
    /// correction).
    pub fn new(face: ttf_parser::Face<'f>, postscript_name: impl Into<String>) -> TtfFace<'f> {
        TtfFace { face, postscript_name: postscript_name.into() }
    }

    /// Parses a face from raw font file bytes.
    pub fn parse(
        data: &'f [u8],
        index: u32,
        postscript_name: impl Into<String>,
    ) -> Result<TtfFace<'f>, ttf_parser::FaceParsingError> {
        Ok(TtfFace::new(ttf_parser::Face::parse(data, index)?, postscript_name))
    }

    fn scale(&self, fontsize: f64, dpi: f64) -> f64 {
        fontsize * dpi / 72.0 / f64::from(self.face.units_per_em())
    }
}

impl<'f> Face for TtfFace<'f> {
    fn postscript_name(&self) -> &str {
        &self.postscript_name
    }

    fn glyph_index(&self, codepoint: u32) -> Option<GlyphId> {
        let c = char::from_u32(codepoint)?;
        self.face.glyph_index(c).map(|gid| GlyphId(gid.0))
    }

    fn glyph_metrics(&self, glyph: GlyphId, fontsize: f64, dpi: f64) -> Option<RawMetrics> {
        let gid = ttf_parser::GlyphId(glyph.0);
        let scale = self.scale(fontsize, dpi);
        let advance = f64::from(self.face.glyph_hor_advance(gid)?) * scale;
        // Whitespace glyphs carry no outline; report an empty box.
        let bbox = self.face.glyph_bounding_box(gid).unwrap_or(ttf_parser::Rect {
            x_min: 0,
            y_min: 0,
            x_max: 0,
            y_max: 0,
        });
        let xmin = f64::from(bbox.x_min) * scale;
        let xmax = f64::from(bbox.x_max) * scale;
        let ymin = f64::from(bbox.y_min) * scale;
        let ymax = f64::from(bbox.y_max) * scale;
        Some(RawMetrics {
            advance,
            width: xmax - xmin,
            height: ymax - ymin,
            xmin,
            xmax,
            ymin,
            ymax,
            bearing_y: ymax,
        })
    }

    fn kerning(&self, left: GlyphId, right: GlyphId, fontsize: f64, dpi: f64) -> f64 {
        let scale = self.scale(fontsize, dpi);
        let left = ttf_parser::GlyphId(left.0);
        let right = ttf_parser::GlyphId(right.0);
        let kern = self
            .face
            .tables()
            .kern
            .iter()
            .flat_map(|table| table.subtables)
            .filter(|subtable| subtable.horizontal && !subtable.variable)
            .find_map(|subtable| subtable.glyphs_kerning(left, right));
        kern.map_or(0.0, |value| f64::from(value) * scale)
    }

    fn x_height(&self, fontsize: f64, dpi: f64) -> Option<f64> {
        let x_height = self.face.x_height()?;
        Some(f64::from(x_height) * self.scale(fontsize, dpi))
    }
}
