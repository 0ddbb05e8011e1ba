//! The font side of the typesetter: the [`FontProvider`] contract the core
//! consumes, and the reference font sets implementing it.
//!
//! The layout engine never touches font files. Everything it needs (glyph
//! metrics, kern pairs, x-height, underline thickness, sized alternatives for
//! stretchy delimiters) goes through [`FontProvider`]. Three reference
//! providers are included:
//!
//!   - [`BakomaFonts`] : the Computer Modern / BaKoMa TrueType files with
//!     their proprietary 8-bit encodings and the baked-in table of pre-sized
//!     delimiter variants.
//!   - [`UnicodeFonts`] : generic Unicode lookup over any reasonably complete
//!     math font, with optional fallback to BaKoMa.
//!   - [`StixFonts`] / [`StixSansFonts`] : Unicode lookup plus the STIX
//!     "virtual fonts", which remap logical styles (blackboard, fraktur, ...)
//!     onto the physical STIX faces.
//!
//! All providers are generic over [`Face`](common::Face), the abstraction of
//! one loaded font file; actual font parsing lives behind the
//! `ttfparser-fontparser` feature in [`backend`].

/// Contains types and utilities shared between font sets: glyph handles,
/// metric records, the `Face` abstraction.
pub mod common;
/// Implementations of the [`Face`](common::Face) trait for font parsing
/// crates, like `ttf-parser`.
pub mod backend;

mod truetype;
mod bakoma;
mod stix;
pub mod data;

pub use self::common::{Face, FaceSet, GlyphId, GlyphInfo, Metrics, RawMetrics};
pub use self::truetype::TruetypeFonts;
pub use self::bakoma::BakomaFonts;
pub use self::stix::{StixFonts, StixSansFonts, UnicodeFonts};

use crate::error::{FontError, FontResult};

/// Symbols that lean even in upright faces and need the slant treatment for
/// script placement.
pub(crate) static SLANTED_SYMBOLS: &[&str] = &[r"\int", r"\oint"];

/// A TeX font alias as used by the parser state and the symbol tables. The
/// concrete face a given alias maps to is a policy of the font set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontAlias {
    /// whatever the font set considers its text font
    Default,
    /// alias of `Default` in the reference font sets
    Regular,
    /// roman
    Rm,
    /// italic
    It,
    /// bold
    Bf,
    /// calligraphic / script
    Cal,
    /// typewriter
    Tt,
    /// sans-serif
    Sf,
    /// the extension font holding big operators and sized delimiters
    Ex,
    /// blackboard bold (virtual on STIX)
    Bb,
    /// fraktur (virtual on STIX)
    Frak,
    /// script (virtual on STIX)
    Scr,
    /// circled characters (virtual on STIX)
    Circled,
    /// STIX private-use-area companion of `Rm`
    NonUniRm,
    /// STIX private-use-area companion of `It`
    NonUniIt,
    /// STIX private-use-area companion of `Bf`
    NonUniBf,
    /// one of the discrete STIX delimiter-size faces, 0 (text size) to 5
    StixSize(u8),
}

impl FontAlias {
    /// The alias written in a formula (`\rm`, `\mathbb{..}`, ...), if any.
    /// This is the set the parser accepts as font switches.
    pub fn from_name(name: &str) -> Option<FontAlias> {
        Some(match name {
            "rm" => FontAlias::Rm,
            "cal" => FontAlias::Cal,
            "it" => FontAlias::It,
            "tt" => FontAlias::Tt,
            "sf" => FontAlias::Sf,
            "bf" => FontAlias::Bf,
            "default" => FontAlias::Default,
            "bb" => FontAlias::Bb,
            "frak" => FontAlias::Frak,
            "circled" => FontAlias::Circled,
            "scr" => FontAlias::Scr,
            "regular" => FontAlias::Regular,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            FontAlias::Default => "default",
            FontAlias::Regular => "regular",
            FontAlias::Rm => "rm",
            FontAlias::It => "it",
            FontAlias::Bf => "bf",
            FontAlias::Cal => "cal",
            FontAlias::Tt => "tt",
            FontAlias::Sf => "sf",
            FontAlias::Ex => "ex",
            FontAlias::Bb => "bb",
            FontAlias::Frak => "frak",
            FontAlias::Scr => "scr",
            FontAlias::Circled => "circled",
            FontAlias::NonUniRm => "nonunirm",
            FontAlias::NonUniIt => "nonuniit",
            FontAlias::NonUniBf => "nonunibf",
            FontAlias::StixSize(0) => "stixsize0",
            FontAlias::StixSize(1) => "stixsize1",
            FontAlias::StixSize(2) => "stixsize2",
            FontAlias::StixSize(3) => "stixsize3",
            FontAlias::StixSize(4) => "stixsize4",
            FontAlias::StixSize(_) => "stixsize5",
        }
    }
}

/// The font class tracked alongside the alias in the parser state. Assigning
/// `rm`, `it` or `bf` as the font also updates the class; other aliases leave
/// it alone. Virtual-font remapping keys on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontClass {
    Rm,
    It,
    Bf,
}

impl FontClass {
    pub fn as_str(&self) -> &'static str {
        match *self {
            FontClass::Rm => "rm",
            FontClass::It => "it",
            FontClass::Bf => "bf",
        }
    }
}

impl From<FontClass> for FontAlias {
    fn from(class: FontClass) -> FontAlias {
        match class {
            FontClass::Rm => FontAlias::Rm,
            FontClass::It => FontAlias::It,
            FontClass::Bf => FontAlias::Bf,
        }
    }
}

/// Return the Unicode code point of a symbol as the parser writes it: a
/// single character (`"a"`), a TeX command (`"\pi"`), or backslash-escaped
/// punctuation (`"\$"`).
///
/// `-` maps to U+2212 MINUS SIGN: per UTF #25 the minus sign is the preferred
/// representation of the unary and binary minus, usually longer than a
/// hyphen.
pub fn get_unicode_index(symbol: &str) -> FontResult<u32> {
    if symbol == "-" {
        return Ok(0x2212);
    }
    let mut chars = symbol.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(c as u32);
    }
    let stripped = symbol.trim_matches('\\');
    let mut chars = stripped.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(c as u32);
    }
    data::tex2uni(stripped)
        .ok_or_else(|| FontError::UnknownSymbol(symbol.to_string()))
}

/// The measurement and lookup service the core consumes; see the reference
/// implementations in this module. Symbols arrive as the parser wrote them:
/// a single character or a TeX command with its backslash.
pub trait FontProvider {
    /// Resolves a symbol to a concrete glyph with its metrics and draw
    /// handle.
    fn get_info(
        &self,
        font: FontAlias,
        font_class: FontClass,
        symbol: &str,
        fontsize: f64,
        dpi: f64,
    ) -> FontResult<GlyphInfo>;

    /// The metrics of a resolved symbol.
    fn get_metrics(
        &self,
        font: FontAlias,
        font_class: FontClass,
        symbol: &str,
        fontsize: f64,
        dpi: f64,
    ) -> FontResult<Metrics> {
        self.get_info(font, font_class, symbol, fontsize, dpi)
            .map(|info| info.metrics)
    }

    /// Pair kerning between two resolved symbols, in points. Zero unless the
    /// font set knows better.
    #[allow(clippy::too_many_arguments)]
    fn get_kern(
        &self,
        _font1: FontAlias,
        _class1: FontClass,
        _sym1: &str,
        _fontsize1: f64,
        _font2: FontAlias,
        _class2: FontClass,
        _sym2: &str,
        _fontsize2: f64,
        _dpi: f64,
    ) -> f64 {
        0.0
    }

    /// The x-height of the aliased face at the given size.
    fn get_xheight(&self, font: FontAlias, fontsize: f64, dpi: f64) -> f64;

    /// The rule thickness used for fraction bars, radicals and script
    /// spacing, at the given size.
    fn get_underline_thickness(&self, font: FontAlias, fontsize: f64, dpi: f64) -> f64;

    /// The discrete size variants of a stretchy symbol, smallest first. The
    /// default is the symbol itself as its only variant.
    fn get_sized_alternatives(&self, font: FontAlias, symbol: &str) -> Vec<(FontAlias, String)> {
        vec![(font, symbol.to_string())]
    }

    /// The style applied inside math mode when no explicit font was set.
    fn default_style(&self) -> FontClass {
        FontClass::It
    }

    /// A short identifier of the font set, used to key the formula cache.
    fn fontset_id(&self) -> &str {
        "custom"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_index_of_plain_chars() {
        assert_eq!(get_unicode_index("a"), Ok(0x61));
        assert_eq!(get_unicode_index("Ω"), Ok(0x3A9));
        assert_eq!(get_unicode_index("-"), Ok(0x2212));
    }

    #[test]
    fn unicode_index_of_commands() {
        assert_eq!(get_unicode_index(r"\alpha"), Ok(0x3B1));
        assert_eq!(get_unicode_index(r"\rightarrow"), Ok(0x2192));
        assert_eq!(get_unicode_index(r"\$"), Ok(0x24));
        assert!(get_unicode_index(r"\nosuchcommand").is_err());
    }
}
