//! Defines the error types for the different phases of typesetting a formula.
//!   - [`ParseError`] : syntax error in the formula provided (mismatched brackets, unknown command).
//!   - [`FontError`] : errors that have to do with the font set provided (missing face, no such glyph).
//!   - [`BackendError`] : errors raised by an output backend (unsupported save format).

use std::fmt;

use crate::render::OutputFormat;

/// Result type for the [`ParseError`]
pub type ParseResult<T> = ::std::result::Result<T, ParseError>;
/// Result type for the [`FontError`]
pub type FontResult<T> = ::std::result::Result<T, FontError>;

/// Syntax error in the formula provided (mismatched brackets, unknown command).
///
/// Every variant carries the byte offset into the input at which parsing failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The grammar expected a particular token at this position.
    /// The first field is a human-readable description of the expectation.
    Expected {
        /// what the grammar wanted to see, e.g. `"end of math '$'"`
        expected: &'static str,
        /// byte offset into the input
        position: usize,
    },
    /// A TeX command that is in no symbol or command table.
    UnknownSymbol {
        /// the symbol as written, e.g. `\foobar`
        symbol: String,
        /// byte offset into the input
        position: usize,
    },
    /// Two or more subscripts attached to the same nucleus, e.g. `x_1_2`.
    DoubleSubscript {
        /// byte offset into the input
        position: usize,
    },
    /// Two or more superscripts attached to the same nucleus, e.g. `x^1^2`.
    DoubleSuperscript {
        /// byte offset into the input
        position: usize,
    },
    /// More than two script operators in a row; braces are needed to disambiguate.
    TooManyScripts {
        /// byte offset into the input
        position: usize,
    },
}

impl ParseError {
    /// The byte offset into the input at which the error occurred.
    pub fn position(&self) -> usize {
        match *self {
            ParseError::Expected { position, .. }
            | ParseError::UnknownSymbol { position, .. }
            | ParseError::DoubleSubscript { position }
            | ParseError::DoubleSuperscript { position }
            | ParseError::TooManyScripts { position } => position,
        }
    }
}

/// Errors having to do with the font set provided.
#[derive(Debug, Clone, PartialEq)]
pub enum FontError {
    /// The font set has no face under this name (e.g. "cmr10" was never loaded).
    MissingFace(String),
    /// The face does not contain a glyph for the resolved code point.
    MissingGlyph {
        /// the face that was consulted
        face: String,
        /// the symbol as written in the formula
        symbol: String,
    },
    /// The symbol has no TeX-to-Unicode mapping.
    UnknownSymbol(String),
}

/// Errors raised by an output backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The backend does not support saving to the requested format.
    Unavailable(OutputFormat),
    /// Writing the output file failed.
    Io(String),
}

/// A generic error type covering any error that may happen while typesetting.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// a parse error
    Parse(ParseError),
    /// a font set error
    Font(FontError),
    /// a backend error
    Backend(BackendError),
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Parse(e)
    }
}
impl From<FontError> for Error {
    fn from(e: FontError) -> Self {
        Error::Font(e)
    }
}
impl From<BackendError> for Error {
    fn from(e: BackendError) -> Self {
        Error::Backend(e)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ParseError::*;
        match *self {
            Expected { expected, position } =>
                write!(f, "expected {} at offset {}", expected, position),
            UnknownSymbol { ref symbol, position } =>
                write!(f, "unknown symbol `{}` at offset {}", symbol, position),
            DoubleSubscript { position } =>
                write!(f, "double subscript at offset {}", position),
            DoubleSuperscript { position } =>
                write!(f, "double superscript at offset {}", position),
            TooManyScripts { position } =>
                write!(f, "subscript/superscript sequence too long at offset {}; use braces {{ }} to remove ambiguity", position),
        }
    }
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::FontError::*;
        match *self {
            MissingFace(ref name) =>
                write!(f, "the font set has no face named '{}'", name),
            MissingGlyph { ref face, ref symbol } =>
                write!(f, "face '{}' has no glyph for '{}'", face, symbol),
            UnknownSymbol(ref sym) =>
                write!(f, "'{}' is not a valid Unicode character or TeX symbol", sym),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::BackendError::*;
        match *self {
            Unavailable(format) =>
                write!(f, "the selected backend cannot save as {:?}", format),
            Io(ref msg) =>
                write!(f, "failed to write output: {}", msg),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Parse(ref e) => e.fmt(f),
            Error::Font(ref e) => e.fmt(f),
            Error::Backend(ref e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {}
impl std::error::Error for ParseError {}
impl std::error::Error for FontError {}
impl std::error::Error for BackendError {}
