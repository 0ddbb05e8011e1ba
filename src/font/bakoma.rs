//! The Computer Modern / BaKoMa font set.
//!
//! Symbols are strewn about a number of font files, each of which has its
//! own proprietary 8-bit encoding; `latex_to_bakoma` knows where everything
//! lives. The set carries a baked-in table of pre-sized delimiter variants
//! and falls back to the STIX fonts for anything Computer Modern does not
//! cover.

use std::rc::Rc;

use crate::error::FontResult;
use crate::font::common::{Face, FaceSet, GlyphInfo};
use crate::font::data;
use crate::font::stix::StixFonts;
use crate::font::truetype::TruetypeFonts;
use crate::font::{FontAlias, FontClass, FontProvider, SLANTED_SYMBOLS};

static FONTMAP: &[(FontAlias, &str)] = map! {
    FontAlias::Cal => "cmsy10",
    FontAlias::Rm => "cmr10",
    FontAlias::Tt => "cmtt10",
    FontAlias::It => "cmmi10",
    FontAlias::Bf => "cmb10",
    FontAlias::Sf => "cmss10",
    FontAlias::Ex => "cmex10",
};

fn face_name(alias: FontAlias) -> Option<&'static str> {
    FONTMAP
        .iter()
        .find(|&&(key, _)| key == alias)
        .map(|&(_, name)| name)
}

/// The BaKoMa TrueType rendition of the Computer Modern fonts.
#[derive(Debug)]
pub struct BakomaFonts<F> {
    base: TruetypeFonts<F>,
    fallback: StixFonts<F>,
}

impl<F: Face> BakomaFonts<F> {
    /// Builds the font set over already-loaded faces, keyed by their
    /// basenames (`cmr10`, `cmmi10`, ...). STIX faces in the same set serve
    /// as the fallback.
    pub fn new(faces: Rc<FaceSet<F>>, default_style: FontClass) -> BakomaFonts<F> {
        BakomaFonts {
            base: TruetypeFonts::new(Rc::clone(&faces), default_style),
            fallback: StixFonts::new(faces, default_style),
        }
    }

    fn resolve(
        &self,
        font: FontAlias,
        font_class: FontClass,
        symbol: &str,
        fontsize: f64,
        dpi: f64,
    ) -> FontResult<GlyphInfo> {
        let alias = if font == FontAlias::Default { FontAlias::Rm } else { font };

        if let Some((basename, code)) = data::latex_to_bakoma(symbol) {
            if face_name(alias).is_some() {
                let slanted = basename == "cmmi10" || SLANTED_SYMBOLS.contains(&symbol);
                if let Some(face) = self.base.faces().face(basename) {
                    if let Some(glyph) = face.glyph_index(code) {
                        return self.base.build_info(basename, glyph, symbol, fontsize, dpi, slanted);
                    }
                }
            }
        } else {
            let mut chars = symbol.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                let slanted = alias == FontAlias::It;
                let basename = face_name(alias).unwrap_or_else(|| alias.as_str());
                if let Some(face) = self.base.faces().face(basename) {
                    if let Some(glyph) = face.glyph_index(c as u32) {
                        return self.base.build_info(basename, glyph, symbol, fontsize, dpi, slanted);
                    }
                }
            }
        }

        self.fallback.get_info(font, font_class, symbol, fontsize, dpi)
    }
}

impl<F: Face> FontProvider for BakomaFonts<F> {
    fn get_info(
        &self,
        font: FontAlias,
        font_class: FontClass,
        symbol: &str,
        fontsize: f64,
        dpi: f64,
    ) -> FontResult<GlyphInfo> {
        self.base.cached(font, font_class, symbol, fontsize, dpi, || {
            self.resolve(font, font_class, symbol, fontsize, dpi)
        })
    }

    fn get_kern(
        &self,
        font1: FontAlias,
        class1: FontClass,
        sym1: &str,
        fontsize1: f64,
        font2: FontAlias,
        class2: FontClass,
        sym2: &str,
        fontsize2: f64,
        dpi: f64,
    ) -> f64 {
        if font1 != font2 || fontsize1 != fontsize2 {
            return 0.0;
        }
        match (
            self.get_info(font1, class1, sym1, fontsize1, dpi),
            self.get_info(font2, class2, sym2, fontsize2, dpi),
        ) {
            (Ok(left), Ok(right)) => self.base.kern_between(&left, &right),
            _ => 0.0,
        }
    }

    fn get_xheight(&self, font: FontAlias, fontsize: f64, dpi: f64) -> f64 {
        let alias = if font == FontAlias::Default { FontAlias::Rm } else { font };
        if let Some(name) = face_name(alias) {
            if let Some(x_height) = self.base.face_x_height(name, fontsize, dpi) {
                return x_height;
            }
        }
        // Some faces do not record an x-height; fall back to measuring 'x'.
        self.get_metrics(font, self.base.default_style(), "x", fontsize, dpi)
            .map(|metrics| metrics.iceberg)
            .unwrap_or(0.0)
    }

    fn get_underline_thickness(&self, _font: FontAlias, fontsize: f64, dpi: f64) -> f64 {
        self.base.underline_thickness(fontsize, dpi)
    }

    fn get_sized_alternatives(&self, font: FontAlias, symbol: &str) -> Vec<(FontAlias, String)> {
        match data::bakoma_size_alternatives(symbol) {
            Some(alternatives) => alternatives
                .iter()
                .map(|&(alias, code)| (alias, code.to_string()))
                .collect(),
            None => vec![(font, symbol.to_string())],
        }
    }

    fn default_style(&self) -> FontClass {
        self.base.default_style()
    }

    fn fontset_id(&self) -> &str {
        "bakoma"
    }
}
