//! Static symbol tables consumed by the font sets.
//!
//! Four tables live here:
//!
//!   - [`tex2uni`]: TeX command name (without backslash) to Unicode code
//!     point. This is what makes `\alpha` mean something.
//!   - [`latex_to_bakoma`]: symbol to (face, code) in the BaKoMa fonts'
//!     proprietary 8-bit encodings (the classic OT1/OML/OMS/OMX layouts).
//!   - [`latex_to_cmex`]: big operators to their display-size slots in
//!     cmex10, used by the Unicode font set when cmex usage is enabled.
//!   - [`stix_virtual_fonts`](stix_virtual_font): range tables realising
//!     logical styles (blackboard, fraktur, script, ...) by remapping code
//!     points onto the physical STIX faces.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::font::FontAlias;

/// Look up the Unicode code point of a TeX command name (no backslash).
pub fn tex2uni(name: &str) -> Option<u32> {
    static TABLE: OnceLock<HashMap<&'static str, u32>> = OnceLock::new();
    TABLE
        .get_or_init(|| TEX2UNI.iter().cloned().collect())
        .get(name)
        .copied()
}

/// Look up a symbol (as written, backslash included) in the BaKoMa encoding
/// tables. Returns the face basename and the code in that face's charmap.
pub fn latex_to_bakoma(symbol: &str) -> Option<(&'static str, u32)> {
    static TABLE: OnceLock<HashMap<&'static str, (&'static str, u32)>> = OnceLock::new();
    TABLE
        .get_or_init(|| LATEX_TO_BAKOMA.iter().cloned().collect())
        .get(symbol)
        .copied()
}

/// Look up a big-operator symbol in the cmex10 display-size slots.
pub fn latex_to_cmex(symbol: &str) -> Option<u32> {
    static TABLE: OnceLock<HashMap<&'static str, u32>> = OnceLock::new();
    TABLE
        .get_or_init(|| LATEX_TO_CMEX.iter().cloned().collect())
        .get(symbol)
        .copied()
}

/// The BaKoMa fonts contain pre-sized alternatives for the delimiters; the
/// auto-sizing glyph selection walks these smallest first. The `char` is the
/// code of the variant in the target face's charmap.
pub fn bakoma_size_alternatives(symbol: &str) -> Option<&'static [(FontAlias, char)]> {
    BAKOMA_SIZE_ALTERNATIVES
        .iter()
        .find(|&&(sym, _)| sym == symbol)
        .map(|&(_, alts)| alts)
}

static TEX2UNI: &[(&str, u32)] = map! {
    // Lowercase Greek
    "alpha" => 0x3B1, "beta" => 0x3B2, "gamma" => 0x3B3, "delta" => 0x3B4,
    "epsilon" => 0x3B5, "zeta" => 0x3B6, "eta" => 0x3B7, "theta" => 0x3B8,
    "iota" => 0x3B9, "kappa" => 0x3BA, "lambda" => 0x3BB, "mu" => 0x3BC,
    "nu" => 0x3BD, "xi" => 0x3BE, "omicron" => 0x3BF, "pi" => 0x3C0,
    "rho" => 0x3C1, "sigma" => 0x3C3, "tau" => 0x3C4, "upsilon" => 0x3C5,
    "phi" => 0x3D5, "chi" => 0x3C7, "psi" => 0x3C8, "omega" => 0x3C9,
    "varepsilon" => 0x3F5, "vartheta" => 0x3D1, "varpi" => 0x3D6,
    "varrho" => 0x3F1, "varsigma" => 0x3C2, "varphi" => 0x3C6,
    // Uppercase Greek
    "Gamma" => 0x393, "Delta" => 0x394, "Theta" => 0x398, "Lambda" => 0x39B,
    "Xi" => 0x39E, "Pi" => 0x3A0, "Sigma" => 0x3A3, "Upsilon" => 0x3A5,
    "Phi" => 0x3A6, "Psi" => 0x3A8, "Omega" => 0x3A9,
    // Binary operators
    "pm" => 0xB1, "mp" => 0x2213, "times" => 0xD7, "div" => 0xF7,
    "ast" => 0x2217, "star" => 0x22C6, "circ" => 0x2218, "bullet" => 0x2219,
    "cdot" => 0x22C5, "cap" => 0x2229, "cup" => 0x222A, "uplus" => 0x228E,
    "sqcap" => 0x2293, "sqcup" => 0x2294, "vee" => 0x2228, "wedge" => 0x2227,
    "setminus" => 0x2216, "wr" => 0x2240, "diamond" => 0x22C4,
    "bigtriangleup" => 0x25B3, "bigtriangledown" => 0x25BD,
    "triangleleft" => 0x25C1, "triangleright" => 0x25B7,
    "lhd" => 0x22B2, "rhd" => 0x22B3, "unlhd" => 0x22B4, "unrhd" => 0x22B5,
    "oplus" => 0x2295, "ominus" => 0x2296, "otimes" => 0x2297,
    "oslash" => 0x2298, "odot" => 0x2299, "bigcirc" => 0x25CB,
    "dagger" => 0x2020, "ddagger" => 0x2021, "amalg" => 0x2A3F,
    // Relations
    "leq" => 0x2264, "geq" => 0x2265, "equiv" => 0x2261, "models" => 0x22A7,
    "prec" => 0x227A, "succ" => 0x227B, "sim" => 0x223C, "perp" => 0x27C2,
    "preceq" => 0x2AAF, "succeq" => 0x2AB0, "simeq" => 0x2243,
    "mid" => 0x2223, "ll" => 0x226A, "gg" => 0x226B, "asymp" => 0x224D,
    "parallel" => 0x2225, "subset" => 0x2282, "supset" => 0x2283,
    "approx" => 0x2248, "bowtie" => 0x22C8, "subseteq" => 0x2286,
    "supseteq" => 0x2287, "cong" => 0x2245, "Join" => 0x2A1D,
    "sqsubset" => 0x228F, "sqsupset" => 0x2290, "neq" => 0x2260,
    "ne" => 0x2260, "smile" => 0x2323, "sqsubseteq" => 0x2291,
    "sqsupseteq" => 0x2292, "doteq" => 0x2250, "frown" => 0x2322,
    "in" => 0x2208, "ni" => 0x220B, "propto" => 0x221D, "vdash" => 0x22A2,
    "dashv" => 0x22A3,
    // Dots
    "dots" => 0x2026, "ldots" => 0x2026, "cdots" => 0x22EF,
    "vdots" => 0x22EE, "ddots" => 0x22F1, "ldotp" => 0x2E, "cdotp" => 0x22C5,
    // Arrows
    "leftarrow" => 0x2190, "Leftarrow" => 0x21D0, "rightarrow" => 0x2192,
    "Rightarrow" => 0x21D2, "leftrightarrow" => 0x2194,
    "Leftrightarrow" => 0x21D4, "mapsto" => 0x21A6,
    "longleftarrow" => 0x27F5, "Longleftarrow" => 0x27F8,
    "longrightarrow" => 0x27F6, "Longrightarrow" => 0x27F9,
    "longleftrightarrow" => 0x27F7, "Longleftrightarrow" => 0x27FA,
    "longmapsto" => 0x27FC, "hookleftarrow" => 0x21A9,
    "hookrightarrow" => 0x21AA, "leftharpoonup" => 0x21BC,
    "leftharpoondown" => 0x21BD, "rightharpoonup" => 0x21C0,
    "rightharpoondown" => 0x21C1, "rightleftharpoons" => 0x21CC,
    "uparrow" => 0x2191, "Uparrow" => 0x21D1, "downarrow" => 0x2193,
    "Downarrow" => 0x21D3, "updownarrow" => 0x2195, "Updownarrow" => 0x21D5,
    "nearrow" => 0x2197, "searrow" => 0x2198, "swarrow" => 0x2199,
    "nwarrow" => 0x2196, "leadsto" => 0x21DD, "to" => 0x2192,
    "gets" => 0x2190,
    // Big operators
    "sum" => 0x2211, "prod" => 0x220F, "coprod" => 0x2210,
    "bigcap" => 0x22C2, "bigcup" => 0x22C3, "bigsqcup" => 0x2A06,
    "bigvee" => 0x22C1, "bigwedge" => 0x22C0, "bigodot" => 0x2A00,
    "bigotimes" => 0x2A02, "bigoplus" => 0x2A01, "biguplus" => 0x2A04,
    "int" => 0x222B, "oint" => 0x222E,
    // Delimiters
    "lfloor" => 0x230A, "rfloor" => 0x230B, "lceil" => 0x2308,
    "rceil" => 0x2309, "langle" => 0x27E8, "rangle" => 0x27E9,
    "backslash" => 0x5C, "vert" => 0x7C, "Vert" => 0x2016,
    "lbrace" => 0x7B, "rbrace" => 0x7D, "lbrack" => 0x5B, "rbrack" => 0x5D,
    // Accents (combining forms)
    "combininggraveaccent" => 0x300, "combiningacuteaccent" => 0x301,
    "circumflexaccent" => 0x302, "combiningtilde" => 0x303,
    "combiningoverline" => 0x304, "combiningbreve" => 0x306,
    "combiningdotabove" => 0x307, "combiningdiaeresis" => 0x308,
    "combiningrightarrowabove" => 0x20D7,
    "widehat" => 0x302, "widetilde" => 0x303,
    // Miscellaneous
    "infty" => 0x221E, "nabla" => 0x2207, "partial" => 0x2202,
    "forall" => 0x2200, "exists" => 0x2203, "neg" => 0xAC,
    "emptyset" => 0x2205, "Re" => 0x211C, "Im" => 0x2111, "wp" => 0x2118,
    "aleph" => 0x2135, "hbar" => 0x210F, "ell" => 0x2113, "imath" => 0x131,
    "jmath" => 0x237, "prime" => 0x2032, "angle" => 0x2220, "top" => 0x22A4,
    "bot" => 0x22A5, "flat" => 0x266D, "natural" => 0x266E,
    "sharp" => 0x266F, "clubsuit" => 0x2663, "diamondsuit" => 0x2662,
    "heartsuit" => 0x2661, "spadesuit" => 0x2660, "surd" => 0x221A,
    "triangle" => 0x25B3, "land" => 0x2227, "lor" => 0x2228,
    "colon" => 0x3A, "AA" => 0xC5, "degree" => 0xB0,
    "__sqrt__" => 0x221A,
};

static LATEX_TO_BAKOMA: &[(&str, (&str, u32))] = map! {
    // cmr10: uppercase Greek and text accents (OT1 layout)
    r"\Gamma" => ("cmr10", 0x00), r"\Delta" => ("cmr10", 0x01),
    r"\Theta" => ("cmr10", 0x02), r"\Lambda" => ("cmr10", 0x03),
    r"\Xi" => ("cmr10", 0x04), r"\Pi" => ("cmr10", 0x05),
    r"\Sigma" => ("cmr10", 0x06), r"\Upsilon" => ("cmr10", 0x07),
    r"\Phi" => ("cmr10", 0x08), r"\Psi" => ("cmr10", 0x09),
    r"\Omega" => ("cmr10", 0x0A),
    r"\combininggraveaccent" => ("cmr10", 0x12),
    r"\combiningacuteaccent" => ("cmr10", 0x13),
    r"\combiningbreve" => ("cmr10", 0x15),
    r"\combiningoverline" => ("cmr10", 0x16),
    r"\circumflexaccent" => ("cmr10", 0x5E),
    r"\combiningdotabove" => ("cmr10", 0x5F),
    r"\combiningtilde" => ("cmr10", 0x7E),
    r"\combiningdiaeresis" => ("cmr10", 0x7F),
    r"\$" => ("cmr10", 0x24), r"\%" => ("cmr10", 0x25),
    r"\[" => ("cmr10", 0x5B), r"\]" => ("cmr10", 0x5D),
    // cmmi10: lowercase Greek, letter-like symbols (OML layout)
    r"\alpha" => ("cmmi10", 0x0B), r"\beta" => ("cmmi10", 0x0C),
    r"\gamma" => ("cmmi10", 0x0D), r"\delta" => ("cmmi10", 0x0E),
    r"\epsilon" => ("cmmi10", 0x0F), r"\zeta" => ("cmmi10", 0x10),
    r"\eta" => ("cmmi10", 0x11), r"\theta" => ("cmmi10", 0x12),
    r"\iota" => ("cmmi10", 0x13), r"\kappa" => ("cmmi10", 0x14),
    r"\lambda" => ("cmmi10", 0x15), r"\mu" => ("cmmi10", 0x16),
    r"\nu" => ("cmmi10", 0x17), r"\xi" => ("cmmi10", 0x18),
    r"\pi" => ("cmmi10", 0x19), r"\rho" => ("cmmi10", 0x1A),
    r"\sigma" => ("cmmi10", 0x1B), r"\tau" => ("cmmi10", 0x1C),
    r"\upsilon" => ("cmmi10", 0x1D), r"\phi" => ("cmmi10", 0x1E),
    r"\chi" => ("cmmi10", 0x1F), r"\psi" => ("cmmi10", 0x20),
    r"\omega" => ("cmmi10", 0x21), r"\varepsilon" => ("cmmi10", 0x22),
    r"\vartheta" => ("cmmi10", 0x23), r"\varpi" => ("cmmi10", 0x24),
    r"\varrho" => ("cmmi10", 0x25), r"\varsigma" => ("cmmi10", 0x26),
    r"\varphi" => ("cmmi10", 0x27),
    r"\leftharpoonup" => ("cmmi10", 0x28),
    r"\leftharpoondown" => ("cmmi10", 0x29),
    r"\rightharpoonup" => ("cmmi10", 0x2A),
    r"\rightharpoondown" => ("cmmi10", 0x2B),
    r"\partial" => ("cmmi10", 0x40), r"\ell" => ("cmmi10", 0x60),
    r"\imath" => ("cmmi10", 0x7B), r"\jmath" => ("cmmi10", 0x7C),
    r"\wp" => ("cmmi10", 0x7D),
    r"\combiningrightarrowabove" => ("cmmi10", 0x7E),
    // cmsy10: operators, relations, arrows (OMS layout)
    "-" => ("cmsy10", 0x00), r"\cdot" => ("cmsy10", 0x01),
    r"\times" => ("cmsy10", 0x02), r"\ast" => ("cmsy10", 0x03),
    r"\div" => ("cmsy10", 0x04), r"\diamond" => ("cmsy10", 0x05),
    r"\pm" => ("cmsy10", 0x06), r"\mp" => ("cmsy10", 0x07),
    r"\oplus" => ("cmsy10", 0x08), r"\ominus" => ("cmsy10", 0x09),
    r"\otimes" => ("cmsy10", 0x0A), r"\oslash" => ("cmsy10", 0x0B),
    r"\odot" => ("cmsy10", 0x0C), r"\bigcirc" => ("cmsy10", 0x0D),
    r"\circ" => ("cmsy10", 0x0E), r"\bullet" => ("cmsy10", 0x0F),
    r"\asymp" => ("cmsy10", 0x10), r"\equiv" => ("cmsy10", 0x11),
    r"\subseteq" => ("cmsy10", 0x12), r"\supseteq" => ("cmsy10", 0x13),
    r"\leq" => ("cmsy10", 0x14), r"\geq" => ("cmsy10", 0x15),
    r"\preceq" => ("cmsy10", 0x16), r"\succeq" => ("cmsy10", 0x17),
    r"\sim" => ("cmsy10", 0x18), r"\approx" => ("cmsy10", 0x19),
    r"\subset" => ("cmsy10", 0x1A), r"\supset" => ("cmsy10", 0x1B),
    r"\ll" => ("cmsy10", 0x1C), r"\gg" => ("cmsy10", 0x1D),
    r"\prec" => ("cmsy10", 0x1E), r"\succ" => ("cmsy10", 0x1F),
    r"\leftarrow" => ("cmsy10", 0x20), r"\rightarrow" => ("cmsy10", 0x21),
    r"\to" => ("cmsy10", 0x21),
    r"\uparrow" => ("cmsy10", 0x22), r"\downarrow" => ("cmsy10", 0x23),
    r"\leftrightarrow" => ("cmsy10", 0x24), r"\nearrow" => ("cmsy10", 0x25),
    r"\searrow" => ("cmsy10", 0x26), r"\simeq" => ("cmsy10", 0x27),
    r"\Leftarrow" => ("cmsy10", 0x28), r"\Rightarrow" => ("cmsy10", 0x29),
    r"\Uparrow" => ("cmsy10", 0x2A), r"\Downarrow" => ("cmsy10", 0x2B),
    r"\Leftrightarrow" => ("cmsy10", 0x2C), r"\nwarrow" => ("cmsy10", 0x2D),
    r"\swarrow" => ("cmsy10", 0x2E), r"\propto" => ("cmsy10", 0x2F),
    r"\prime" => ("cmsy10", 0x30), r"\infty" => ("cmsy10", 0x31),
    r"\in" => ("cmsy10", 0x32), r"\ni" => ("cmsy10", 0x33),
    r"\forall" => ("cmsy10", 0x38), r"\exists" => ("cmsy10", 0x39),
    r"\neg" => ("cmsy10", 0x3A), r"\emptyset" => ("cmsy10", 0x3B),
    r"\Re" => ("cmsy10", 0x3C), r"\Im" => ("cmsy10", 0x3D),
    r"\top" => ("cmsy10", 0x3E), r"\bot" => ("cmsy10", 0x3F),
    r"\aleph" => ("cmsy10", 0x40),
    r"\cup" => ("cmsy10", 0x5B), r"\cap" => ("cmsy10", 0x5C),
    r"\uplus" => ("cmsy10", 0x5D), r"\wedge" => ("cmsy10", 0x5E),
    r"\vee" => ("cmsy10", 0x5F), r"\land" => ("cmsy10", 0x5E),
    r"\lor" => ("cmsy10", 0x5F),
    r"\vdash" => ("cmsy10", 0x60), r"\dashv" => ("cmsy10", 0x61),
    r"\lfloor" => ("cmsy10", 0x62), r"\rfloor" => ("cmsy10", 0x63),
    r"\lceil" => ("cmsy10", 0x64), r"\rceil" => ("cmsy10", 0x65),
    r"\lbrace" => ("cmsy10", 0x66), r"\rbrace" => ("cmsy10", 0x67),
    "{" => ("cmsy10", 0x66), "}" => ("cmsy10", 0x67),
    r"\{" => ("cmsy10", 0x66), r"\}" => ("cmsy10", 0x67),
    r"\langle" => ("cmsy10", 0x68), r"\rangle" => ("cmsy10", 0x69),
    "|" => ("cmsy10", 0x6A), r"\|" => ("cmsy10", 0x6B),
    r"\vert" => ("cmsy10", 0x6A), r"\Vert" => ("cmsy10", 0x6B),
    r"\updownarrow" => ("cmsy10", 0x6C), r"\Updownarrow" => ("cmsy10", 0x6D),
    r"\backslash" => ("cmsy10", 0x6E), r"\wr" => ("cmsy10", 0x6F),
    r"\surd" => ("cmsy10", 0x70), r"\amalg" => ("cmsy10", 0x71),
    r"\nabla" => ("cmsy10", 0x72),
    r"\sqcup" => ("cmsy10", 0x74), r"\sqcap" => ("cmsy10", 0x75),
    r"\sqsubseteq" => ("cmsy10", 0x76), r"\sqsupseteq" => ("cmsy10", 0x77),
    r"\dagger" => ("cmsy10", 0x79), r"\ddagger" => ("cmsy10", 0x7A),
    r"\clubsuit" => ("cmsy10", 0x7C), r"\diamondsuit" => ("cmsy10", 0x7D),
    r"\heartsuit" => ("cmsy10", 0x7E), r"\spadesuit" => ("cmsy10", 0x7F),
    // cmex10: big operators and the radical (OMX layout, text sizes)
    r"\sum" => ("cmex10", 0x50), r"\prod" => ("cmex10", 0x51),
    r"\int" => ("cmex10", 0x52), r"\bigcup" => ("cmex10", 0x53),
    r"\bigcap" => ("cmex10", 0x54), r"\biguplus" => ("cmex10", 0x55),
    r"\bigwedge" => ("cmex10", 0x56), r"\bigvee" => ("cmex10", 0x57),
    r"\coprod" => ("cmex10", 0x60), r"\oint" => ("cmex10", 0x48),
    r"\bigodot" => ("cmex10", 0x4A), r"\bigoplus" => ("cmex10", 0x4C),
    r"\bigotimes" => ("cmex10", 0x4E), r"\bigsqcup" => ("cmex10", 0x46),
    r"\__sqrt__" => ("cmex10", 0x70),
    // cmtt10
    r"\_" => ("cmtt10", 0x5F),
};

static LATEX_TO_CMEX: &[(&str, u32)] = map! {
    r"\sum" => 0x58, r"\prod" => 0x59, r"\coprod" => 0x61,
    r"\int" => 0x5A, r"\oint" => 0x49,
    r"\bigcap" => 0x5C, r"\bigcup" => 0x5B, r"\bigsqcup" => 0x47,
    r"\bigvee" => 0x5F, r"\bigwedge" => 0x5E,
    r"\bigodot" => 0x4B, r"\bigoplus" => 0x4D, r"\bigotimes" => 0x4F,
    r"\biguplus" => 0x5D,
};

static BAKOMA_SIZE_ALTERNATIVES: &[(&str, &[(FontAlias, char)])] = map! {
    "(" => &[
        (FontAlias::Rm, '('), (FontAlias::Ex, '\u{a1}'), (FontAlias::Ex, '\u{b3}'),
        (FontAlias::Ex, '\u{b5}'), (FontAlias::Ex, '\u{c3}'),
    ],
    ")" => &[
        (FontAlias::Rm, ')'), (FontAlias::Ex, '\u{a2}'), (FontAlias::Ex, '\u{b4}'),
        (FontAlias::Ex, '\u{b6}'), (FontAlias::Ex, '\u{21}'),
    ],
    "{" => &[
        (FontAlias::Cal, '{'), (FontAlias::Ex, '\u{a9}'), (FontAlias::Ex, '\u{6e}'),
        (FontAlias::Ex, '\u{bd}'), (FontAlias::Ex, '\u{28}'),
    ],
    "}" => &[
        (FontAlias::Cal, '}'), (FontAlias::Ex, '\u{aa}'), (FontAlias::Ex, '\u{6f}'),
        (FontAlias::Ex, '\u{be}'), (FontAlias::Ex, '\u{29}'),
    ],
    // The fourth size of '[' is missing from the BaKoMa fonts, so it is
    // omitted for both '[' and ']'.
    "[" => &[
        (FontAlias::Rm, '['), (FontAlias::Ex, '\u{a3}'), (FontAlias::Ex, '\u{68}'),
        (FontAlias::Ex, '\u{22}'),
    ],
    "]" => &[
        (FontAlias::Rm, ']'), (FontAlias::Ex, '\u{a4}'), (FontAlias::Ex, '\u{69}'),
        (FontAlias::Ex, '\u{23}'),
    ],
    r"\lfloor" => &[
        (FontAlias::Ex, '\u{a5}'), (FontAlias::Ex, '\u{6a}'),
        (FontAlias::Ex, '\u{b9}'), (FontAlias::Ex, '\u{24}'),
    ],
    r"\rfloor" => &[
        (FontAlias::Ex, '\u{a6}'), (FontAlias::Ex, '\u{6b}'),
        (FontAlias::Ex, '\u{ba}'), (FontAlias::Ex, '\u{25}'),
    ],
    r"\lceil" => &[
        (FontAlias::Ex, '\u{a7}'), (FontAlias::Ex, '\u{6c}'),
        (FontAlias::Ex, '\u{bb}'), (FontAlias::Ex, '\u{26}'),
    ],
    r"\rceil" => &[
        (FontAlias::Ex, '\u{a8}'), (FontAlias::Ex, '\u{6d}'),
        (FontAlias::Ex, '\u{bc}'), (FontAlias::Ex, '\u{27}'),
    ],
    r"\langle" => &[
        (FontAlias::Ex, '\u{ad}'), (FontAlias::Ex, '\u{44}'),
        (FontAlias::Ex, '\u{bf}'), (FontAlias::Ex, '\u{2a}'),
    ],
    r"\rangle" => &[
        (FontAlias::Ex, '\u{ae}'), (FontAlias::Ex, '\u{45}'),
        (FontAlias::Ex, '\u{c0}'), (FontAlias::Ex, '\u{2b}'),
    ],
    r"\__sqrt__" => &[
        (FontAlias::Ex, '\u{70}'), (FontAlias::Ex, '\u{71}'),
        (FontAlias::Ex, '\u{72}'), (FontAlias::Ex, '\u{73}'),
    ],
    r"\backslash" => &[
        (FontAlias::Ex, '\u{b2}'), (FontAlias::Ex, '\u{2f}'),
        (FontAlias::Ex, '\u{c2}'), (FontAlias::Ex, '\u{2d}'),
    ],
    "/" => &[
        (FontAlias::Rm, '/'), (FontAlias::Ex, '\u{b1}'), (FontAlias::Ex, '\u{2e}'),
        (FontAlias::Ex, '\u{cb}'), (FontAlias::Ex, '\u{2c}'),
    ],
    r"\widehat" => &[
        (FontAlias::Rm, '\u{5e}'), (FontAlias::Ex, '\u{62}'),
        (FontAlias::Ex, '\u{63}'), (FontAlias::Ex, '\u{64}'),
    ],
    r"\widetilde" => &[
        (FontAlias::Rm, '\u{7e}'), (FontAlias::Ex, '\u{65}'),
        (FontAlias::Ex, '\u{66}'), (FontAlias::Ex, '\u{67}'),
    ],
    "<" => &[(FontAlias::Cal, 'h'), (FontAlias::Ex, 'D')],
    ">" => &[(FontAlias::Cal, 'i'), (FontAlias::Ex, 'E')],
};

/// One remapped code-point range of a virtual font: `start..=end` maps onto
/// `target..` in the `font` face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualRange {
    pub start: u32,
    pub end: u32,
    pub font: FontAlias,
    pub target: u32,
}

/// A virtual font is either one range table, or one per font class.
#[derive(Debug, Clone, Copy)]
pub enum VirtualFont {
    Uniform(&'static [VirtualRange]),
    ByClass {
        rm: &'static [VirtualRange],
        it: &'static [VirtualRange],
        bf: &'static [VirtualRange],
    },
}

impl VirtualFont {
    pub fn ranges(&self, class: crate::font::FontClass) -> &'static [VirtualRange] {
        use crate::font::FontClass;
        match *self {
            VirtualFont::Uniform(ranges) => ranges,
            VirtualFont::ByClass { rm, it, bf } => match class {
                FontClass::Rm => rm,
                FontClass::It => it,
                FontClass::Bf => bf,
            },
        }
    }
}

macro_rules! vrange {
    ($start:expr, $end:expr, $font:ident, $target:expr) => {
        VirtualRange { start: $start, end: $end, font: FontAlias::$font, target: $target }
    };
}

// Blackboard bold. The Letterlike Symbols block carries C, H, N, P, Q, R, Z;
// everything else sits in Mathematical Alphanumeric Symbols.
const STIX_BB: &[VirtualRange] = &[
    vrange!(0x30, 0x39, Rm, 0x1D7D8),
    vrange!(0x41, 0x42, Rm, 0x1D538),
    vrange!(0x43, 0x43, Rm, 0x2102),
    vrange!(0x44, 0x47, Rm, 0x1D53B),
    vrange!(0x48, 0x48, Rm, 0x210D),
    vrange!(0x49, 0x4D, Rm, 0x1D540),
    vrange!(0x4E, 0x4E, Rm, 0x2115),
    vrange!(0x4F, 0x4F, Rm, 0x1D546),
    vrange!(0x50, 0x51, Rm, 0x2119),
    vrange!(0x52, 0x52, Rm, 0x211D),
    vrange!(0x53, 0x59, Rm, 0x1D54A),
    vrange!(0x5A, 0x5A, Rm, 0x2124),
    vrange!(0x61, 0x7A, Rm, 0x1D552),
];

// Script. B, E, F, H, I, L, M, R (and e, g, o) live in Letterlike Symbols.
const STIX_CAL: &[VirtualRange] = &[
    vrange!(0x41, 0x41, Rm, 0x1D49C),
    vrange!(0x42, 0x42, Rm, 0x212C),
    vrange!(0x43, 0x44, Rm, 0x1D49E),
    vrange!(0x45, 0x46, Rm, 0x2130),
    vrange!(0x47, 0x47, Rm, 0x1D4A2),
    vrange!(0x48, 0x48, Rm, 0x210B),
    vrange!(0x49, 0x49, Rm, 0x2110),
    vrange!(0x4A, 0x4B, Rm, 0x1D4A5),
    vrange!(0x4C, 0x4C, Rm, 0x2112),
    vrange!(0x4D, 0x4D, Rm, 0x2133),
    vrange!(0x4E, 0x51, Rm, 0x1D4A9),
    vrange!(0x52, 0x52, Rm, 0x211B),
    vrange!(0x53, 0x5A, Rm, 0x1D4AE),
    vrange!(0x61, 0x64, Rm, 0x1D4B6),
    vrange!(0x65, 0x65, Rm, 0x212F),
    vrange!(0x66, 0x66, Rm, 0x1D4BB),
    vrange!(0x67, 0x67, Rm, 0x210A),
    vrange!(0x68, 0x6E, Rm, 0x1D4BD),
    vrange!(0x6F, 0x6F, Rm, 0x2134),
    vrange!(0x70, 0x7A, Rm, 0x1D4C5),
];

const STIX_SCR_BF: &[VirtualRange] = &[
    vrange!(0x41, 0x5A, Rm, 0x1D4D0),
    vrange!(0x61, 0x7A, Rm, 0x1D4EA),
];

// Fraktur. C, H, I, R, Z are in Letterlike Symbols.
const STIX_FRAK: &[VirtualRange] = &[
    vrange!(0x41, 0x42, Rm, 0x1D504),
    vrange!(0x43, 0x43, Rm, 0x212D),
    vrange!(0x44, 0x47, Rm, 0x1D507),
    vrange!(0x48, 0x48, Rm, 0x210C),
    vrange!(0x49, 0x49, Rm, 0x2111),
    vrange!(0x4A, 0x51, Rm, 0x1D50D),
    vrange!(0x52, 0x52, Rm, 0x211C),
    vrange!(0x53, 0x59, Rm, 0x1D516),
    vrange!(0x5A, 0x5A, Rm, 0x2128),
    vrange!(0x61, 0x7A, Rm, 0x1D51E),
];

const STIX_FRAK_BF: &[VirtualRange] = &[
    vrange!(0x41, 0x5A, Rm, 0x1D56C),
    vrange!(0x61, 0x7A, Rm, 0x1D586),
];

// Math italic; h is Planck's constant in Letterlike Symbols.
const STIX_IT: &[VirtualRange] = &[
    vrange!(0x41, 0x5A, Rm, 0x1D434),
    vrange!(0x61, 0x67, Rm, 0x1D44E),
    vrange!(0x68, 0x68, Rm, 0x210E),
    vrange!(0x69, 0x7A, Rm, 0x1D456),
    vrange!(0x391, 0x3A9, Rm, 0x1D6E2),
    vrange!(0x3B1, 0x3C9, Rm, 0x1D6FC),
];

const STIX_BF: &[VirtualRange] = &[
    vrange!(0x30, 0x39, Rm, 0x1D7CE),
    vrange!(0x41, 0x5A, Rm, 0x1D400),
    vrange!(0x61, 0x7A, Rm, 0x1D41A),
    vrange!(0x391, 0x3A9, Rm, 0x1D6A8),
    vrange!(0x3B1, 0x3C9, Rm, 0x1D6C2),
];

const STIX_SF: &[VirtualRange] = &[
    vrange!(0x30, 0x39, Rm, 0x1D7E2),
    vrange!(0x41, 0x5A, Rm, 0x1D5A0),
    vrange!(0x61, 0x7A, Rm, 0x1D5BA),
];

const STIX_CIRCLED: &[VirtualRange] = &[
    vrange!(0x30, 0x30, Rm, 0x24EA),
    vrange!(0x31, 0x39, Rm, 0x2460),
    vrange!(0x41, 0x5A, Rm, 0x24B6),
    vrange!(0x61, 0x7A, Rm, 0x24D0),
];

static STIX_BB_FONT: VirtualFont =
    VirtualFont::ByClass { rm: STIX_BB, it: STIX_BB, bf: STIX_BB };
static STIX_CAL_FONT: VirtualFont = VirtualFont::Uniform(STIX_CAL);
static STIX_SCR_FONT: VirtualFont =
    VirtualFont::ByClass { rm: STIX_CAL, it: STIX_CAL, bf: STIX_SCR_BF };
static STIX_FRAK_FONT: VirtualFont =
    VirtualFont::ByClass { rm: STIX_FRAK, it: STIX_FRAK, bf: STIX_FRAK_BF };
static STIX_IT_FONT: VirtualFont = VirtualFont::Uniform(STIX_IT);
static STIX_BF_FONT: VirtualFont = VirtualFont::Uniform(STIX_BF);
static STIX_SF_FONT: VirtualFont = VirtualFont::Uniform(STIX_SF);
static STIX_CIRCLED_FONT: VirtualFont = VirtualFont::Uniform(STIX_CIRCLED);

/// The STIX virtual-font table for a logical style, if that style is
/// virtual.
pub fn stix_virtual_font(alias: FontAlias) -> Option<&'static VirtualFont> {
    match alias {
        FontAlias::Bb => Some(&STIX_BB_FONT),
        FontAlias::Cal => Some(&STIX_CAL_FONT),
        FontAlias::Scr => Some(&STIX_SCR_FONT),
        FontAlias::Frak => Some(&STIX_FRAK_FONT),
        FontAlias::It => Some(&STIX_IT_FONT),
        FontAlias::Bf => Some(&STIX_BF_FONT),
        FontAlias::Sf => Some(&STIX_SF_FONT),
        FontAlias::Circled => Some(&STIX_CIRCLED_FONT),
        _ => None,
    }
}

/// Binary search of a virtual-font range table, returning the remapped
/// (face, code point) when `codepoint` falls in a range.
pub fn remap_virtual(ranges: &[VirtualRange], codepoint: u32) -> Option<(FontAlias, u32)> {
    let mut lo = 0;
    let mut hi = ranges.len();
    while lo < hi {
        let mid = (lo + hi) / 2;
        let range = &ranges[mid];
        if codepoint < range.start {
            hi = mid;
        } else if codepoint <= range.end {
            return Some((range.font, codepoint - range.start + range.target));
        } else {
            lo = mid + 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontClass;

    #[test]
    fn virtual_ranges_are_sorted_and_disjoint() {
        let tables: &[&[VirtualRange]] = &[
            STIX_BB, STIX_CAL, STIX_SCR_BF, STIX_FRAK, STIX_FRAK_BF,
            STIX_IT, STIX_BF, STIX_SF, STIX_CIRCLED,
        ];
        for table in tables {
            for range in table.iter() {
                assert!(range.start <= range.end);
            }
            for pair in table.windows(2) {
                assert!(pair[0].end < pair[1].start);
            }
        }
    }

    #[test]
    fn blackboard_letterlike_exceptions() {
        assert_eq!(remap_virtual(STIX_BB, 'C' as u32), Some((FontAlias::Rm, 0x2102)));
        assert_eq!(remap_virtual(STIX_BB, 'R' as u32), Some((FontAlias::Rm, 0x211D)));
        assert_eq!(remap_virtual(STIX_BB, 'A' as u32), Some((FontAlias::Rm, 0x1D538)));
        assert_eq!(remap_virtual(STIX_BB, 'B' as u32), Some((FontAlias::Rm, 0x1D539)));
        assert_eq!(remap_virtual(STIX_BB, 'z' as u32), Some((FontAlias::Rm, 0x1D56B)));
        assert_eq!(remap_virtual(STIX_BB, '@' as u32), None);
    }

    #[test]
    fn fraktur_class_selection() {
        let font = stix_virtual_font(FontAlias::Frak).unwrap();
        assert_eq!(
            remap_virtual(font.ranges(FontClass::Rm), 'A' as u32),
            Some((FontAlias::Rm, 0x1D504))
        );
        assert_eq!(
            remap_virtual(font.ranges(FontClass::Bf), 'A' as u32),
            Some((FontAlias::Rm, 0x1D56C))
        );
    }

    #[test]
    fn tables_have_no_duplicate_keys() {
        let mut names: Vec<&str> = TEX2UNI.iter().map(|&(name, _)| name).collect();
        names.sort_unstable();
        let len = names.len();
        names.dedup();
        assert_eq!(len, names.len());
    }

    #[test]
    fn spec_symbols_resolve() {
        for sym in ["alpha", "sum", "int", "rightarrow", "leq", "infty", "__sqrt__"] {
            assert!(tex2uni(sym).is_some(), "missing tex2uni entry for {}", sym);
        }
        assert_eq!(latex_to_bakoma(r"\alpha"), Some(("cmmi10", 0x0B)));
        assert!(bakoma_size_alternatives("(").is_some());
        assert!(bakoma_size_alternatives(r"\__sqrt__").unwrap().len() == 4);
    }
}
