//! The layer shared by all TrueType-backed font sets: the glyph-info cache,
//! metric assembly (including the cmex10 vertical offset correction),
//! pair kerning and the hardcoded underline thickness.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{FontError, FontResult};
use crate::font::common::{Face, FaceSet, GlyphId, GlyphInfo, Metrics};
use crate::font::{FontAlias, FontClass};

type InfoKey = (FontAlias, FontClass, String, u64, u64);

/// A generic base for all font setups that use TrueType faces. The concrete
/// sets ([`BakomaFonts`](crate::font::BakomaFonts),
/// [`UnicodeFonts`](crate::font::UnicodeFonts), ...) resolve symbols to a
/// (face, glyph) pair and delegate metric assembly and caching here.
#[derive(Debug)]
pub struct TruetypeFonts<F> {
    faces: Rc<FaceSet<F>>,
    default_style: FontClass,
    cache: RefCell<HashMap<InfoKey, GlyphInfo>>,
}

impl<F: Face> TruetypeFonts<F> {
    pub fn new(faces: Rc<FaceSet<F>>, default_style: FontClass) -> TruetypeFonts<F> {
        TruetypeFonts { faces, default_style, cache: RefCell::new(HashMap::new()) }
    }

    pub fn faces(&self) -> &FaceSet<F> {
        &self.faces
    }

    pub fn default_style(&self) -> FontClass {
        self.default_style
    }

    /// The cmex10 glyphs sit on a displaced baseline; everything else needs
    /// no offset.
    fn offset_for(face: &F, scaled_height: f64, dpi: f64) -> f64 {
        if face.postscript_name().eq_ignore_ascii_case("cmex10") {
            scaled_height / 2.0 + 4.0 * dpi / 72.0
        } else {
            0.0
        }
    }

    /// Assembles the [`GlyphInfo`] for a resolved glyph, applying the
    /// baseline offset to the vertical metrics.
    pub(crate) fn build_info(
        &self,
        face_name: &str,
        glyph: GlyphId,
        symbol: &str,
        fontsize: f64,
        dpi: f64,
        slanted: bool,
    ) -> FontResult<GlyphInfo> {
        let face = self
            .faces
            .face(face_name)
            .ok_or_else(|| FontError::MissingFace(face_name.to_string()))?;
        let raw = face.glyph_metrics(glyph, fontsize, dpi).ok_or_else(|| {
            FontError::MissingGlyph { face: face_name.to_string(), symbol: symbol.to_string() }
        })?;
        let offset = Self::offset_for(face, raw.height, dpi);
        let metrics = Metrics {
            advance: raw.advance,
            width: raw.width,
            height: raw.height,
            xmin: raw.xmin,
            xmax: raw.xmax,
            ymin: raw.ymin + offset,
            ymax: raw.ymax + offset,
            iceberg: raw.bearing_y + offset,
            slanted,
        };
        Ok(GlyphInfo {
            face: face_name.to_string(),
            glyph,
            fontsize,
            dpi,
            offset,
            metrics,
        })
    }

    /// Memoised symbol resolution: metric records are immutable once
    /// inserted, so lookups may be replayed freely.
    pub(crate) fn cached<G>(
        &self,
        font: FontAlias,
        font_class: FontClass,
        symbol: &str,
        fontsize: f64,
        dpi: f64,
        compute: G,
    ) -> FontResult<GlyphInfo>
    where
        G: FnOnce() -> FontResult<GlyphInfo>,
    {
        let key = (font, font_class, symbol.to_string(), fontsize.to_bits(), dpi.to_bits());
        if let Some(info) = self.cache.borrow().get(&key) {
            return Ok(info.clone());
        }
        let info = compute()?;
        self.cache.borrow_mut().insert(key, info.clone());
        Ok(info)
    }

    /// Pair kerning between two resolved glyphs: only within one face at one
    /// size.
    pub(crate) fn kern_between(&self, left: &GlyphInfo, right: &GlyphInfo) -> f64 {
        if left.face == right.face && left.fontsize == right.fontsize {
            if let Some(face) = self.faces.face(&left.face) {
                return face.kerning(left.glyph, right.glyph, left.fontsize, left.dpi);
            }
        }
        0.0
    }

    /// The x-height a face reports, if it is loaded and records one.
    pub(crate) fn face_x_height(&self, face_name: &str, fontsize: f64, dpi: f64) -> Option<f64> {
        self.faces.face(face_name)?.x_height(fontsize, dpi)
    }

    /// The rule thickness. This used to come from the font metrics, but that
    /// information is too unreliable, so it is hardcoded.
    pub fn underline_thickness(&self, fontsize: f64, dpi: f64) -> f64 {
        ((0.75 / 12.0) * fontsize * dpi) / 72.0
    }
}
