//! Shared test support: a deterministic font provider with synthetic
//! metrics, so layout behaviour can be asserted without any font files.

#![allow(dead_code)]

use mathtex::error::FontResult;
use mathtex::font::{
    get_unicode_index, FontAlias, FontClass, FontProvider, GlyphId, GlyphInfo, Metrics,
};
use mathtex::Formula;

/// A font set with purely synthetic, linear metrics.
///
/// Conventions (all in em, one em being `fontsize * dpi / 72` points):
///
///   - lowercase letters are 0.44 high, ascenders reach 0.68, descenders
///     0.20 below the baseline; digits are 0.62 high with no depth;
///   - `=` spans y 0.22..0.40, so the math axis sits at 0.31;
///   - big operators span y -0.30..0.75, the integrals -0.50..1.10 and are
///     slanted;
///   - delimiters span y -0.23..0.72 and come in four sizes, each `#k`
///     variant 1.45x taller than the previous;
///   - the glyph handle is the Unicode code point, so tests can identify
///     glyphs in the draw list;
///   - the only kern pair is (A, V) at -0.06 em.
pub struct TestFonts;

const BIG_OPERATORS: &[&str] = &[
    r"\sum", r"\prod", r"\coprod", r"\bigcap", r"\bigcup", r"\bigsqcup",
    r"\bigvee", r"\bigwedge", r"\bigodot", r"\bigotimes", r"\bigoplus",
    r"\biguplus",
];

const SIZED_SYMBOLS: &[&str] = &[
    "(", ")", "[", "]", "{", "}", "/", "|", "<", ">", r"\langle", r"\rangle",
    r"\lfloor", r"\rfloor", r"\lceil", r"\rceil", r"\backslash", r"\vert",
    r"\|", r"\uparrow", r"\downarrow", r"\Uparrow", r"\Downarrow",
    r"\updownarrow", r"\Updownarrow", r"\__sqrt__", r"\widehat",
    r"\widetilde",
];

/// An unscaled glyph box, in em.
struct GlyphBox {
    advance: f64,
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
}

/// Splits the `sym#k` encoding of a sized variant.
fn split_variant(symbol: &str) -> (&str, i32) {
    match symbol.rsplit_once('#') {
        Some((base, k)) if !base.is_empty() => match k.parse() {
            Ok(k) => (base, k),
            Err(_) => (symbol, 0),
        },
        _ => (symbol, 0),
    }
}

fn base_box(symbol: &str, codepoint: u32) -> GlyphBox {
    match symbol {
        " " => return GlyphBox { advance: 0.33, xmin: 0.0, xmax: 0.0, ymin: 0.0, ymax: 0.0 },
        "m" => return GlyphBox { advance: 0.82, xmin: 0.03, xmax: 0.79, ymin: 0.0, ymax: 0.44 },
        "=" => return GlyphBox { advance: 0.56, xmin: 0.04, xmax: 0.52, ymin: 0.22, ymax: 0.40 },
        r"\int" | r"\oint" => {
            return GlyphBox { advance: 0.60, xmin: 0.05, xmax: 0.55, ymin: -0.50, ymax: 1.10 }
        }
        r"\__sqrt__" => {
            return GlyphBox { advance: 0.65, xmin: 0.02, xmax: 0.62, ymin: -0.25, ymax: 0.85 }
        }
        r"\widehat" | r"\widetilde" => {
            return GlyphBox { advance: 0.50, xmin: 0.02, xmax: 0.48, ymin: 0.55, ymax: 0.72 }
        }
        _ => {}
    }
    if BIG_OPERATORS.contains(&symbol) {
        return GlyphBox { advance: 1.0, xmin: 0.05, xmax: 0.95, ymin: -0.30, ymax: 0.75 };
    }
    if SIZED_SYMBOLS.contains(&symbol) {
        return GlyphBox { advance: 0.42, xmin: 0.06, xmax: 0.36, ymin: -0.23, ymax: 0.72 };
    }
    // Combining accents sit above the x-height already.
    if (0x300..=0x30F).contains(&codepoint) || codepoint == 0x20D7 {
        return GlyphBox { advance: 0.05, xmin: 0.05, xmax: 0.35, ymin: 0.55, ymax: 0.72 };
    }
    match char::from_u32(codepoint) {
        Some(c) if c.is_ascii_digit() => {
            GlyphBox { advance: 0.50, xmin: 0.04, xmax: 0.46, ymin: 0.0, ymax: 0.62 }
        }
        Some(c) if c.is_ascii_lowercase() || (0x3B1..=0x3C9).contains(&codepoint) => {
            let (ymin, ymax) = match c {
                'b' | 'd' | 'f' | 'h' | 'k' | 'l' | 't' => (0.0, 0.68),
                'g' | 'j' | 'p' | 'q' | 'y' => (-0.20, 0.44),
                _ => (0.0, 0.44),
            };
            GlyphBox { advance: 0.52, xmin: 0.03, xmax: 0.49, ymin, ymax }
        }
        Some(c) if c.is_ascii_uppercase() || (0x391..=0x3A9).contains(&codepoint) => {
            GlyphBox { advance: 0.60, xmin: 0.03, xmax: 0.55, ymin: 0.0, ymax: 0.66 }
        }
        _ => GlyphBox { advance: 0.50, xmin: 0.03, xmax: 0.47, ymin: 0.0, ymax: 0.60 },
    }
}

fn em(fontsize: f64, dpi: f64) -> f64 {
    fontsize * dpi / 72.0
}

impl FontProvider for TestFonts {
    fn get_info(
        &self,
        font: FontAlias,
        _font_class: FontClass,
        symbol: &str,
        fontsize: f64,
        dpi: f64,
    ) -> FontResult<GlyphInfo> {
        let em = em(fontsize, dpi);
        let (base, k) = split_variant(symbol);
        let codepoint = get_unicode_index(base)?;
        let b = base_box(base, codepoint);
        let vscale = 1.45f64.powi(k);
        let hscale = 1.12f64.powi(k);

        let xmin = b.xmin * hscale * em;
        let xmax = b.xmax * hscale * em;
        let ymin = b.ymin * vscale * em;
        let ymax = b.ymax * vscale * em;
        let slanted = font == FontAlias::It
            || base == r"\int"
            || base == r"\oint";
        let metrics = Metrics {
            advance: b.advance * hscale * em,
            width: xmax - xmin,
            height: ymax - ymin,
            xmin,
            xmax,
            ymin,
            ymax,
            iceberg: ymax,
            slanted,
        };
        Ok(GlyphInfo {
            face: font.as_str().to_string(),
            glyph: GlyphId(codepoint as u16),
            fontsize,
            dpi,
            offset: 0.0,
            metrics,
        })
    }

    fn get_kern(
        &self,
        font1: FontAlias,
        _class1: FontClass,
        sym1: &str,
        fontsize1: f64,
        font2: FontAlias,
        _class2: FontClass,
        sym2: &str,
        fontsize2: f64,
        dpi: f64,
    ) -> f64 {
        if font1 == font2 && fontsize1 == fontsize2 && sym1 == "A" && sym2 == "V" {
            -0.06 * em(fontsize1, dpi)
        } else {
            0.0
        }
    }

    fn get_xheight(&self, _font: FontAlias, fontsize: f64, dpi: f64) -> f64 {
        0.44 * em(fontsize, dpi)
    }

    fn get_underline_thickness(&self, _font: FontAlias, fontsize: f64, dpi: f64) -> f64 {
        ((0.75 / 12.0) * fontsize * dpi) / 72.0
    }

    fn get_sized_alternatives(&self, font: FontAlias, symbol: &str) -> Vec<(FontAlias, String)> {
        if SIZED_SYMBOLS.contains(&symbol) {
            vec![
                (font, symbol.to_string()),
                (FontAlias::Ex, format!("{}#1", symbol)),
                (FontAlias::Ex, format!("{}#2", symbol)),
                (FontAlias::Ex, format!("{}#3", symbol)),
            ]
        } else {
            vec![(font, symbol.to_string())]
        }
    }

    fn default_style(&self) -> FontClass {
        FontClass::It
    }

    fn fontset_id(&self) -> &str {
        "test"
    }
}

/// Typesets at the reference 12 pt / 100 dpi.
pub fn formula(tex: &str) -> Formula {
    let _ = env_logger::builder().is_test(true).try_init();
    match Formula::new(tex, &TestFonts, 12.0, 100.0) {
        Ok(formula) => formula,
        Err(err) => panic!("{:?} failed to typeset: {}", tex, err),
    }
}

/// One em at the reference size, in points.
pub fn ref_em() -> f64 {
    em(12.0, 100.0)
}

/// The rule thickness at the reference size, in points.
pub fn ref_thickness() -> f64 {
    TestFonts.get_underline_thickness(FontAlias::It, 12.0, 100.0)
}
