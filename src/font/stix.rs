//! Unicode font sets: generic Unicode lookup ([`UnicodeFonts`]) and the
//! STIX-specific refinements ([`StixFonts`], [`StixSansFonts`]).
//!
//! The STIX sets add "virtual fonts": complete alphanumeric character sets
//! with different styles at special Unicode code points, such as blackboard
//! bold, realised by remapping through binary-searched range tables. They
//! also handle the discrete `STIXSizeN` delimiter faces as sized
//! alternatives.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{FontError, FontResult};
use crate::font::bakoma::BakomaFonts;
use crate::font::common::{Face, FaceSet, GlyphInfo};
use crate::font::data;
use crate::font::truetype::TruetypeFonts;
use crate::font::{get_unicode_index, FontAlias, FontClass, FontProvider, SLANTED_SYMBOLS};

/// How a set realises logical styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VirtualMode {
    /// no remapping: the faces carry the styles themselves
    Plain,
    /// the STIX range tables, optionally converting everything to sans
    Stix { sans: bool },
}

/// A font set with generic Unicode glyph lookup. While some reasonably
/// complete Unicode fonts may work in some situations, the only one with a
/// complete set of math symbols is STIX; this set falls back on the BaKoMa
/// fonts when a required symbol cannot be found.
#[derive(Debug)]
pub struct UnicodeFonts<F> {
    base: TruetypeFonts<F>,
    fontmap: HashMap<FontAlias, String>,
    use_cmex: bool,
    virtual_mode: VirtualMode,
    cm_fallback: Option<Box<BakomaFonts<F>>>,
    alt_cache: RefCell<HashMap<String, Vec<(FontAlias, String)>>>,
    id: &'static str,
}

impl<F: Face> UnicodeFonts<F> {
    /// Builds a generic Unicode set over already-loaded faces. `fontmap`
    /// names the face serving each alias; `cmex10` is consulted for big
    /// operators and added to the map when absent. Lookups that fail fall
    /// back to the BaKoMa faces of the same `FaceSet`.
    pub fn new(
        faces: Rc<FaceSet<F>>,
        mut fontmap: HashMap<FontAlias, String>,
        default_style: FontClass,
    ) -> UnicodeFonts<F> {
        fontmap.entry(FontAlias::Ex).or_insert_with(|| "cmex10".to_string());
        UnicodeFonts {
            base: TruetypeFonts::new(Rc::clone(&faces), default_style),
            fontmap,
            use_cmex: true,
            virtual_mode: VirtualMode::Plain,
            cm_fallback: Some(Box::new(BakomaFonts::new(faces, default_style))),
            alt_cache: RefCell::new(HashMap::new()),
            id: "unicode",
        }
    }

    fn new_stix(faces: Rc<FaceSet<F>>, default_style: FontClass, sans: bool) -> UnicodeFonts<F> {
        let mut fontmap = HashMap::new();
        fontmap.insert(FontAlias::Rm, "STIXGeneral".to_string());
        fontmap.insert(FontAlias::It, "STIXGeneral-Italic".to_string());
        fontmap.insert(FontAlias::Bf, "STIXGeneral-Bold".to_string());
        fontmap.insert(FontAlias::NonUniRm, "STIXNonUnicode".to_string());
        fontmap.insert(FontAlias::NonUniIt, "STIXNonUnicode-Italic".to_string());
        fontmap.insert(FontAlias::NonUniBf, "STIXNonUnicode-Bold".to_string());
        fontmap.insert(FontAlias::StixSize(0), "STIXGeneral".to_string());
        for i in 1..6u8 {
            fontmap.insert(FontAlias::StixSize(i), format!("STIXSize{}", i));
        }
        UnicodeFonts {
            base: TruetypeFonts::new(faces, default_style),
            fontmap,
            use_cmex: false,
            virtual_mode: VirtualMode::Stix { sans },
            cm_fallback: None,
            alt_cache: RefCell::new(HashMap::new()),
            id: if sans { "stixsans" } else { "stix" },
        }
    }

    fn is_stix(&self) -> bool {
        matches!(self.virtual_mode, VirtualMode::Stix { .. })
    }

    fn face_name(&self, alias: FontAlias) -> Option<&str> {
        if let Some(name) = self.fontmap.get(&alias) {
            return Some(name.as_str());
        }
        match alias {
            FontAlias::Default | FontAlias::Regular => Some("default"),
            _ => None,
        }
    }

    /// Realises logical styles that are actually embedded in other faces.
    fn map_virtual_font(
        &self,
        alias: FontAlias,
        font_class: FontClass,
        uniindex: u32,
    ) -> (FontAlias, u32) {
        let sans = match self.virtual_mode {
            VirtualMode::Plain => return (alias, uniindex),
            VirtualMode::Stix { sans } => sans,
        };

        let mut mapping = data::stix_virtual_font(alias);
        let mut doing_sans_conversion = false;
        if sans
            && mapping.is_none()
            && !matches!(alias, FontAlias::Regular | FontAlias::Default)
        {
            mapping = data::stix_virtual_font(FontAlias::Sf);
            doing_sans_conversion = true;
        }

        let (mut alias, uniindex) = match mapping {
            Some(virtual_font) => {
                match data::remap_virtual(virtual_font.ranges(font_class), uniindex) {
                    Some((font, remapped)) => (font, remapped),
                    // This will resolve to a dummy character.
                    None if !doing_sans_conversion => (self.base.default_style().into(), 0x1),
                    None => (alias, uniindex),
                }
            }
            None => (alias, uniindex),
        };

        // Private use area glyphs live in the companion faces.
        if (0xE000..=0xF8FF).contains(&uniindex) {
            alias = match alias {
                FontAlias::Rm => FontAlias::NonUniRm,
                FontAlias::It => FontAlias::NonUniIt,
                FontAlias::Bf => FontAlias::NonUniBf,
                other => other,
            };
        }

        (alias, uniindex)
    }

    fn lookup(
        &self,
        alias: FontAlias,
        symbol: &str,
        uniindex: u32,
        fontsize: f64,
        dpi: f64,
    ) -> Option<FontResult<GlyphInfo>> {
        let slanted = alias == FontAlias::It || SLANTED_SYMBOLS.contains(&symbol);
        let face_name = self.face_name(alias)?;
        let face = self.base.faces().face(face_name)?;
        let glyph = face.glyph_index(uniindex)?;
        Some(self.base.build_info(face_name, glyph, symbol, fontsize, dpi, slanted))
    }

    fn resolve(
        &self,
        font: FontAlias,
        font_class: FontClass,
        symbol: &str,
        fontsize: f64,
        dpi: f64,
    ) -> FontResult<GlyphInfo> {
        let mut found = false;
        let mut alias = font;
        let mut uniindex = '?' as u32;

        if self.use_cmex {
            if let Some(code) = data::latex_to_cmex(symbol) {
                alias = FontAlias::Ex;
                uniindex = code;
                found = true;
            }
        }

        if !found {
            match get_unicode_index(symbol) {
                Ok(index) => {
                    uniindex = index;
                    found = true;
                }
                Err(_) => {
                    warn!("no TeX to Unicode mapping for {:?}", symbol);
                }
            }
        }

        let (mapped_alias, mapped_index) = self.map_virtual_font(alias, font_class, uniindex);

        if found {
            let mut new_alias = mapped_alias;
            // Only characters in the Letter class italicize in 'it' mode;
            // Greek capitals are set Roman.
            if new_alias == FontAlias::It && mapped_index < 0x10000 {
                if let Some(c) = char::from_u32(mapped_index) {
                    let greek_capital = (0x391..=0x3A9).contains(&mapped_index);
                    if !c.is_alphabetic() || greek_capital {
                        new_alias = FontAlias::Rm;
                    }
                }
            }
            if let Some(result) = self.lookup(new_alias, symbol, mapped_index, fontsize, dpi) {
                return result;
            }
        }

        if let Some(fallback) = &self.cm_fallback {
            warn!("substituting a Computer Modern glyph for {:?}", symbol);
            return fallback.get_info(font, FontClass::It, symbol, fontsize, dpi);
        }
        if matches!(font, FontAlias::It | FontAlias::Regular) && self.is_stix() {
            return self.resolve(FontAlias::Rm, font_class, symbol, fontsize, dpi);
        }

        warn!(
            "font '{}' has no glyph for {:?}, substituting a dummy symbol",
            font.as_str(),
            symbol
        );
        // The currency character, for lack of anything better.
        self.lookup(FontAlias::Rm, symbol, 0xA4, fontsize, dpi)
            .unwrap_or_else(|| {
                Err(FontError::MissingGlyph {
                    face: self.face_name(FontAlias::Rm).unwrap_or("rm").to_string(),
                    symbol: symbol.to_string(),
                })
            })
    }

    fn stix_sized_alternatives(
        &self,
        font: FontAlias,
        symbol: &str,
    ) -> Vec<(FontAlias, String)> {
        if let Some(cached) = self.alt_cache.borrow().get(symbol) {
            return cached.clone();
        }
        let fallback = vec![(font, symbol.to_string())];
        let Ok(uniindex) = get_unicode_index(symbol) else {
            return fallback;
        };
        // Angle brackets stand in for the unsizable '<' and '>'.
        let uniindex = match uniindex {
            0x3C => 0x27E8,
            0x3E => 0x27E9,
            other => other,
        };
        let Some(symbol_char) = char::from_u32(uniindex) else {
            return fallback;
        };

        let mut alternatives = Vec::new();
        for i in 0..6u8 {
            let alias = FontAlias::StixSize(i);
            let present = self
                .face_name(alias)
                .and_then(|name| self.base.faces().face(name))
                .and_then(|face| face.glyph_index(uniindex))
                .is_some();
            if present {
                alternatives.push((alias, symbol_char.to_string()));
            }
        }
        // The largest radical in STIX has bad metrics that disconnect it
        // from the stem.
        if symbol == r"\__sqrt__" {
            alternatives.pop();
        }
        if alternatives.is_empty() {
            return fallback;
        }
        self.alt_cache.borrow_mut().insert(symbol.to_string(), alternatives.clone());
        alternatives
    }
}

impl<F: Face> FontProvider for UnicodeFonts<F> {
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
        if let Some(name) = self.face_name(font) {
            if let Some(x_height) = self.base.face_x_height(name, fontsize, dpi) {
                return x_height;
            }
        }
        self.get_metrics(font, self.base.default_style(), "x", fontsize, dpi)
            .map(|metrics| metrics.iceberg)
            .unwrap_or(0.0)
    }

    fn get_underline_thickness(&self, _font: FontAlias, fontsize: f64, dpi: f64) -> f64 {
        self.base.underline_thickness(fontsize, dpi)
    }

    fn get_sized_alternatives(&self, font: FontAlias, symbol: &str) -> Vec<(FontAlias, String)> {
        if self.is_stix() {
            return self.stix_sized_alternatives(font, symbol);
        }
        match &self.cm_fallback {
            Some(fallback) => fallback.get_sized_alternatives(font, symbol),
            None => vec![(font, symbol.to_string())],
        }
    }

    fn default_style(&self) -> FontClass {
        self.base.default_style()
    }

    fn fontset_id(&self) -> &str {
        self.id
    }
}

/// The STIX font set: Unicode lookup plus virtual fonts and the discrete
/// `STIXSizeN` delimiter faces.
#[derive(Debug)]
pub struct StixFonts<F> {
    inner: UnicodeFonts<F>,
}

impl<F: Face> StixFonts<F> {
    pub fn new(faces: Rc<FaceSet<F>>, default_style: FontClass) -> StixFonts<F> {
        StixFonts { inner: UnicodeFonts::new_stix(faces, default_style, false) }
    }
}

/// The STIX font set with everything converted to the sans-serif variants.
#[derive(Debug)]
pub struct StixSansFonts<F> {
    inner: UnicodeFonts<F>,
}

impl<F: Face> StixSansFonts<F> {
    pub fn new(faces: Rc<FaceSet<F>>, default_style: FontClass) -> StixSansFonts<F> {
        StixSansFonts { inner: UnicodeFonts::new_stix(faces, default_style, true) }
    }
}

macro_rules! delegate_provider {
    ($ty:ident) => {
        impl<F: Face> FontProvider for $ty<F> {
            fn get_info(
                &self,
                font: FontAlias,
                font_class: FontClass,
                symbol: &str,
                fontsize: f64,
                dpi: f64,
            ) -> FontResult<GlyphInfo> {
                self.inner.get_info(font, font_class, symbol, fontsize, dpi)
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
                self.inner
                    .get_kern(font1, class1, sym1, fontsize1, font2, class2, sym2, fontsize2, dpi)
            }

            fn get_xheight(&self, font: FontAlias, fontsize: f64, dpi: f64) -> f64 {
                self.inner.get_xheight(font, fontsize, dpi)
            }

            fn get_underline_thickness(&self, font: FontAlias, fontsize: f64, dpi: f64) -> f64 {
                self.inner.get_underline_thickness(font, fontsize, dpi)
            }

            fn get_sized_alternatives(
                &self,
                font: FontAlias,
                symbol: &str,
            ) -> Vec<(FontAlias, String)> {
                self.inner.get_sized_alternatives(font, symbol)
            }

            fn default_style(&self) -> FontClass {
                self.inner.default_style()
            }

            fn fontset_id(&self) -> &str {
                self.inner.fontset_id()
            }
        }
    };
}

delegate_provider!(StixFonts);
delegate_provider!(StixSansFonts);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::common::{GlyphId, RawMetrics};

    /// A face whose charmap is a fixed list of code points, with linear
    /// metrics.
    struct ListFace {
        name: &'static str,
        codepoints: Vec<u32>,
    }

    impl Face for ListFace {
        fn postscript_name(&self) -> &str {
            self.name
        }

        fn glyph_index(&self, codepoint: u32) -> Option<GlyphId> {
            self.codepoints
                .iter()
                .position(|&c| c == codepoint)
                .map(|i| GlyphId(i as u16))
        }

        fn glyph_metrics(&self, _glyph: GlyphId, fontsize: f64, dpi: f64) -> Option<RawMetrics> {
            let em = fontsize * dpi / 72.0;
            Some(RawMetrics {
                advance: 0.5 * em,
                width: 0.45 * em,
                height: 0.6 * em,
                xmin: 0.02 * em,
                xmax: 0.47 * em,
                ymin: 0.0,
                ymax: 0.6 * em,
                bearing_y: 0.6 * em,
            })
        }
    }

    fn stix_set() -> StixFonts<ListFace> {
        let mut faces = FaceSet::new();
        faces.insert(
            "STIXGeneral",
            ListFace {
                name: "STIXGeneral",
                codepoints: vec![0x41, 0x61, 0x78, 0x3D, 0x6D, 0x2102, 0x1D538, 0x1D552, 0xA4],
            },
        );
        faces.insert(
            "STIXGeneral-Italic",
            ListFace { name: "STIXGeneral-Italic", codepoints: vec![0x41, 0x61] },
        );
        StixFonts::new(Rc::new(faces), FontClass::It)
    }

    #[test]
    fn blackboard_remaps_to_math_alphanumerics() {
        let fonts = stix_set();
        let info = fonts
            .get_info(FontAlias::Bb, FontClass::Rm, "C", 12.0, 100.0)
            .unwrap();
        assert_eq!(info.face, "STIXGeneral");
        // U+2102 is at position 5 in the test charmap.
        assert_eq!(info.glyph, GlyphId(5));

        let info = fonts
            .get_info(FontAlias::Bb, FontClass::Rm, "A", 12.0, 100.0)
            .unwrap();
        assert_eq!(info.glyph, GlyphId(6));
    }

    #[test]
    fn missing_glyph_substitutes_the_dummy() {
        let fonts = stix_set();
        // 'z' maps to U+1D56B which the test face lacks; the dummy U+00A4
        // sits at position 8.
        let info = fonts
            .get_info(FontAlias::Bb, FontClass::Rm, "z", 12.0, 100.0)
            .unwrap();
        assert_eq!(info.glyph, GlyphId(8));
    }

    #[test]
    fn metric_lookups_are_cached() {
        let fonts = stix_set();
        let first = fonts
            .get_info(FontAlias::Rm, FontClass::Rm, "x", 12.0, 100.0)
            .unwrap();
        let second = fonts
            .get_info(FontAlias::Rm, FontClass::Rm, "x", 12.0, 100.0)
            .unwrap();
        assert_eq!(first, second);
    }
}
