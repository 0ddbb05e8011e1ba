//! Symbol classification used by the parser: which symbols get operator
//! spacing, which stack their scripts above and below, which commands are
//! accents, and the widths of the explicit spacing commands.
//!
//! Symbols are classified by their written form: a single character or a TeX
//! command including its backslash, exactly as they appear in the token
//! stream.

use crate::font::FontAlias;

pub static BINARY_OPERATORS: &[&str] = &[
    "+", "*",
    r"\pm", r"\sqcap", r"\rhd",
    r"\mp", r"\sqcup", r"\unlhd",
    r"\times", r"\vee", r"\unrhd",
    r"\div", r"\wedge", r"\oplus",
    r"\ast", r"\setminus", r"\ominus",
    r"\star", r"\wr", r"\otimes",
    r"\circ", r"\diamond", r"\oslash",
    r"\bullet", r"\bigtriangleup", r"\odot",
    r"\cdot", r"\bigtriangledown", r"\bigcirc",
    r"\cap", r"\triangleleft", r"\dagger",
    r"\cup", r"\triangleright", r"\ddagger",
    r"\uplus", r"\lhd", r"\amalg",
];

pub static RELATION_SYMBOLS: &[&str] = &[
    "=", "<", ">", ":",
    r"\leq", r"\geq", r"\equiv", r"\models",
    r"\prec", r"\succ", r"\sim", r"\perp",
    r"\preceq", r"\succeq", r"\simeq", r"\mid",
    r"\ll", r"\gg", r"\asymp", r"\parallel",
    r"\subset", r"\supset", r"\approx", r"\bowtie",
    r"\subseteq", r"\supseteq", r"\cong", r"\Join",
    r"\sqsubset", r"\sqsupset", r"\neq", r"\smile",
    r"\sqsubseteq", r"\sqsupseteq", r"\doteq", r"\frown",
    r"\in", r"\ni", r"\propto",
    r"\vdash", r"\dashv", r"\dots",
];

pub static ARROW_SYMBOLS: &[&str] = &[
    r"\leftarrow", r"\longleftarrow", r"\uparrow",
    r"\Leftarrow", r"\Longleftarrow", r"\Uparrow",
    r"\rightarrow", r"\longrightarrow", r"\downarrow",
    r"\Rightarrow", r"\Longrightarrow", r"\Downarrow",
    r"\leftrightarrow", r"\longleftrightarrow", r"\updownarrow",
    r"\Leftrightarrow", r"\Longleftrightarrow", r"\Updownarrow",
    r"\mapsto", r"\longmapsto", r"\nearrow",
    r"\hookleftarrow", r"\hookrightarrow", r"\searrow",
    r"\leftharpoonup", r"\rightharpoonup", r"\swarrow",
    r"\leftharpoondown", r"\rightharpoondown", r"\nwarrow",
    r"\rightleftharpoons", r"\leadsto",
];

/// Binary operators, relations and arrows all get 0.2 em of space on both
/// sides.
pub fn is_spaced_symbol(symbol: &str) -> bool {
    BINARY_OPERATORS.contains(&symbol)
        || RELATION_SYMBOLS.contains(&symbol)
        || ARROW_SYMBOLS.contains(&symbol)
}

/// Punctuation gets 0.2 em of space after it only.
pub static PUNCTUATION_SYMBOLS: &[&str] = &[",", ";", ".", "!", r"\ldotp", r"\cdotp"];

/// Symbols whose scripts stack above and below instead of to the side.
pub static OVERUNDER_SYMBOLS: &[&str] = &[
    r"\sum", r"\prod", r"\coprod", r"\bigcap", r"\bigcup", r"\bigsqcup",
    r"\bigvee", r"\bigwedge", r"\bigodot", r"\bigotimes", r"\bigoplus",
    r"\biguplus",
];

/// Function names whose scripts stack above and below.
pub static OVERUNDER_FUNCTIONS: &[&str] = &["lim", "liminf", "limsup", "sup", "max", "min"];

/// Symbols whose subscript drops by the nucleus depth (big slanted
/// integrals).
pub static DROPSUB_SYMBOLS: &[&str] = &[r"\int", r"\oint"];

pub static FUNCTION_NAMES: &[&str] = &[
    "arccos", "csc", "ker", "min", "arcsin", "deg", "lg", "Pr", "arctan",
    "det", "lim", "sec", "arg", "dim", "liminf", "sin", "cos", "exp",
    "limsup", "sinh", "cosh", "gcd", "ln", "sup", "cot", "hom", "log",
    "tan", "coth", "inf", "max", "tanh",
];

/// Delimiters valid on either side of `\left`/`\right`. `.` omits the
/// delimiter.
pub static AMBI_DELIM: &[&str] = &[
    "|", r"\|", "/", r"\backslash", r"\uparrow", r"\downarrow",
    r"\updownarrow", r"\Uparrow", r"\Downarrow", r"\Updownarrow", ".",
];

pub static LEFT_DELIM: &[&str] = &["(", "[", "{", "<", r"\lfloor", r"\langle", r"\lceil"];

pub static RIGHT_DELIM: &[&str] = &[")", "]", "}", ">", r"\rfloor", r"\rangle", r"\rceil"];

/// Maps an accent command name to the combining symbol that draws it.
pub static ACCENT_MAP: &[(&str, &str)] = map! {
    "hat" => r"\circumflexaccent",
    "breve" => r"\combiningbreve",
    "bar" => r"\combiningoverline",
    "grave" => r"\combininggraveaccent",
    "acute" => r"\combiningacuteaccent",
    "ddot" => r"\combiningdiaeresis",
    "tilde" => r"\combiningtilde",
    "dot" => r"\combiningdotabove",
    "vec" => r"\combiningrightarrowabove",
    "\"" => r"\combiningdiaeresis",
    "`" => r"\combininggraveaccent",
    "'" => r"\combiningacuteaccent",
    "~" => r"\combiningtilde",
    "." => r"\combiningdotabove",
    "^" => r"\circumflexaccent",
    "overrightarrow" => r"\rightarrow",
    "overleftarrow" => r"\leftarrow",
};

pub fn accent_symbol(name: &str) -> Option<&'static str> {
    ACCENT_MAP
        .iter()
        .find(|&&(accent, _)| accent == name)
        .map(|&(_, symbol)| symbol)
}

/// Accents realised through width-sized glyph alternatives.
pub static WIDE_ACCENTS: &[&str] = &["widehat", "widetilde"];

pub fn is_accent(name: &str) -> bool {
    WIDE_ACCENTS.contains(&name) || accent_symbol(name).is_some()
}

/// Width of the explicit spacing commands, in em, keyed by the command name
/// after the backslash.
pub static SPACE_WIDTHS: &[(&str, f64)] = map! {
    " " => 0.3,
    "," => 0.4,
    ";" => 0.8,
    "quad" => 1.6,
    "qquad" => 3.2,
    "!" => -0.4,
    "/" => 0.4,
};

pub fn space_width(name: &str) -> Option<f64> {
    SPACE_WIDTHS
        .iter()
        .find(|&&(space, _)| space == name)
        .map(|&(_, width)| width)
}

/// One character stacked over another, like the ring of `\AA`. Each half is
/// (font override, symbol, size scale); `space` separates them in multiples
/// of the underline thickness.
pub struct CharOverChar {
    pub under: (Option<FontAlias>, &'static str, f64),
    pub over: (Option<FontAlias>, &'static str, f64),
    pub space: f64,
}

static CHAR_OVER_CHARS: &[(&str, CharOverChar)] = &[(
    "AA",
    CharOverChar {
        under: (Some(FontAlias::Rm), "A", 1.0),
        over: (None, r"\circ", 0.5),
        space: 0.0,
    },
)];

pub fn char_over_char(name: &str) -> Option<&'static CharOverChar> {
    CHAR_OVER_CHARS
        .iter()
        .find(|&&(key, _)| key == name)
        .map(|&(_, ref entry)| entry)
}

/// The characters legal as bare symbols in math mode: ASCII graphics plus
/// anything past U+0080.
pub fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            ' ' | '+' | '-' | '*' | '/' | '<' | '>' | '=' | ':' | ',' | '.' | ';' | '!' | '\''
                | '@' | '(' | ')' | '[' | ']' | '|'
        )
        || ('\u{80}'..='\u{1ffff}').contains(&c)
}

/// Punctuation that may be backslash-escaped to a literal symbol.
pub fn is_escapable_char(c: char) -> bool {
    matches!(c, '%' | '$' | '{' | '}' | '[' | ']' | '_' | '|')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_classes_are_disjoint_where_it_matters() {
        for sym in PUNCTUATION_SYMBOLS {
            assert!(!is_spaced_symbol(sym), "{} both spaced and punctuation", sym);
        }
        for sym in OVERUNDER_SYMBOLS {
            assert!(!is_spaced_symbol(sym), "{} both spaced and overunder", sym);
        }
    }

    #[test]
    fn accents_resolve() {
        assert_eq!(accent_symbol("hat"), Some(r"\circumflexaccent"));
        assert_eq!(accent_symbol("'"), Some(r"\combiningacuteaccent"));
        assert!(is_accent("widehat"));
        assert!(!is_accent("frac"));
    }

    #[test]
    fn space_widths_match_tex() {
        assert_eq!(space_width("quad"), Some(1.6));
        assert_eq!(space_width("!"), Some(-0.4));
        assert_eq!(space_width("x"), None);
    }
}
