//! Parses strings containing LaTeX-like math expressions into a packed
//! [`Hlist`] ready for shipping.
//!
//! The parser handles full strings *containing* math: raw text may appear
//! outside of pairs of `$`, and is set verbatim in the ambient font. The
//! grammar inside math mode is modelled directly on TeX's, though it cuts a
//! few corners:
//!
//! ```text
//! expression := non_math ( '$' math? '$' non_math )*
//! math       := ( auto_delim | simple )+
//! simple     := space | custom_space | font_switch | subsuper
//! subsuper   := [placeable] ( ('_'|'^') placeable ){0,2} | placeable
//! placeable  := function | symbol | accent | group | frac | stackrel
//!             | binom | genfrac | sqrt | operatorname | c_over_c
//! group      := [latex_font_prefix] '{' ( auto_delim | simple )* '}'
//! auto_delim := '\left' delim ( auto_delim | simple+ ) '\right' delim
//! ```
//!
//! The parser keeps a stack of [`State`] frames (font alias, font class,
//! point size, dpi), pushed and popped at groups, `\left..\right` and
//! math/non-math transitions. Since node construction bakes the state into
//! the tree, the packrat memo over `placeable` (see [`memo`]) is keyed by
//! position *and* state.

pub mod symbols;
mod lexer;
mod memo;

use std::collections::HashMap;

use crate::error::{ParseError, ParseResult};
use crate::font::{FontAlias, FontClass, FontProvider};
use crate::layout::builders::{auto_height_char, auto_width_char, hcentered, SubSuperCluster};
use crate::layout::packer::PackMode;
use crate::layout::{
    Char, Glue, Hlist, Kern, Node, Rule, State, Vlist, DELTA, SCRIPT_SPACE, SUB1, SUBDROP, SUP1,
};
use crate::parser::memo::{Memo, MemoEntry, MemoRule};
use crate::parser::symbols::CharOverChar;

/// Parses `input` into a packed root [`Hlist`], resolving glyphs through
/// `fonts` at the given point size and resolution. This is the API entry
/// point for parsing.
pub fn parse<F: FontProvider>(
    input: &str,
    fonts: &F,
    fontsize: f64,
    dpi: f64,
) -> ParseResult<Hlist> {
    Parser::new(input, fonts, fontsize, dpi).parse()
}

/// A parser over one input string. The lifetime `'i` is the borrow of the
/// input, `'f` the borrow of the font provider.
pub struct Parser<'i, 'f, F> {
    pub(crate) full_input: &'i str,
    pub(crate) input: &'i str,
    fonts: &'f F,
    default_style: FontClass,
    state_stack: Vec<State>,
    em_width_cache: HashMap<(FontAlias, u64, u64), f64>,
    memo: Memo,
}

impl<'i, 'f, F: FontProvider> Parser<'i, 'f, F> {
    pub fn new(input: &'i str, fonts: &'f F, fontsize: f64, dpi: f64) -> Self {
        Parser {
            full_input: input,
            input,
            default_style: fonts.default_style(),
            fonts,
            state_stack: vec![State::new(FontAlias::Default, FontClass::Rm, fontsize, dpi)],
            em_width_cache: HashMap::new(),
            memo: Memo::new(),
        }
    }

    // ------------------------------------------------------------------
    // State stack
    // ------------------------------------------------------------------

    /// The current state is always the top of the stack.
    fn state(&self) -> State {
        *self.state_stack.last().expect("parser state stack underflow")
    }

    fn state_mut(&mut self) -> &mut State {
        self.state_stack.last_mut().expect("parser state stack underflow")
    }

    fn push_state(&mut self) {
        let top = self.state();
        self.state_stack.push(top);
    }

    fn pop_state(&mut self) {
        self.state_stack.pop();
    }

    // ------------------------------------------------------------------
    // Grammar driver
    // ------------------------------------------------------------------

    /// Parses the whole input. The result is the root horizontal list
    /// holding alternating non-math and math segments.
    pub fn parse(mut self) -> ParseResult<Hlist> {
        let mut nodes = vec![self.non_math()?];
        while !self.input.is_empty() {
            if !self.try_parse_char('$') {
                return Err(ParseError::Expected { expected: "'$'", position: self.pos() });
            }
            if let Some(math) = self.math()? {
                nodes.push(math);
            }
            if !self.try_parse_char('$') {
                return Err(ParseError::Expected {
                    expected: "end of math '$'",
                    position: self.pos(),
                });
            }
            nodes.push(self.non_math()?);
        }
        Ok(Hlist::new(nodes, self.fonts))
    }

    /// Raw text up to the next unescaped `$` (or the end of input), set
    /// verbatim in the ambient font. Entering math afterwards, so the state
    /// is pushed and the font set to the provider's default style.
    fn non_math(&mut self) -> ParseResult<Node> {
        let start_pos = self.pos();
        let mut chars = self.input.char_indices();
        let mut end = self.input.len();
        while let Some((i, c)) = chars.next() {
            if c == '$' {
                end = i;
                break;
            }
            if c == '\\' {
                // An escaped dollar is consumed as part of the text.
                if let Some((_, '$')) = chars.clone().next() {
                    chars.next();
                }
            }
        }
        let (raw, rest) = self.input.split_at(end);
        self.input = rest;

        let text = raw.replace(r"\$", "$");
        let state = self.state();
        let mut nodes = Vec::with_capacity(text.chars().count());
        for c in text.chars() {
            let ch = Char::new(c.encode_utf8(&mut [0u8; 4]), &state, self.fonts).map_err(|_| {
                ParseError::UnknownSymbol { symbol: c.to_string(), position: start_pos }
            })?;
            nodes.push(Node::Char(ch));
        }
        let hlist = Hlist::new(nodes, self.fonts);

        self.push_state();
        let default_style = self.default_style;
        self.state_mut().set_font(default_style.into());
        Ok(Node::Hlist(hlist))
    }

    /// One `$ .. $` segment: one or more delimited groups or simple
    /// productions, wrapped in a single list. Returns `None` (and leaves the
    /// math state pushed) when the segment is empty.
    fn math(&mut self) -> ParseResult<Option<Node>> {
        let mut nodes = Vec::new();
        let mut consumed = false;
        loop {
            if let Some(node) = self.auto_delim()? {
                nodes.push(node);
                consumed = true;
                continue;
            }
            match self.simple()? {
                Some(mut produced) => {
                    nodes.append(&mut produced);
                    consumed = true;
                }
                None => break,
            }
        }
        if !consumed {
            return Ok(None);
        }
        let hlist = Hlist::new(nodes, self.fonts);
        self.pop_state();
        Ok(Some(Node::Hlist(hlist)))
    }

    /// space | custom_space | font_switch | subsuper. Font switches produce
    /// no nodes but change the state for the rest of the group.
    fn simple(&mut self) -> ParseResult<Option<Vec<Node>>> {
        self.consume_whitespace();
        if self.peek_char() == Some('\\') {
            let save = self.pos();
            if let Some(name) = self.control_sequence() {
                if let Some(percentage) = symbols::space_width(name) {
                    return Ok(Some(vec![self.make_space(percentage)?]));
                }
                if name == "hspace" {
                    return self.custom_space().map(Some);
                }
                if let Some(alias) = FontAlias::from_name(name) {
                    self.state_mut().set_font(alias);
                    return Ok(Some(Vec::new()));
                }
                self.seek(save);
            }
        }
        self.subsuper()
    }

    /// `\hspace{n}` with `n` in em.
    fn custom_space(&mut self) -> ParseResult<Vec<Node>> {
        let position = self.pos();
        self.consume_whitespace();
        if !self.try_parse_char('{') {
            return Err(ParseError::Expected { expected: r"\hspace{n}", position });
        }
        self.consume_whitespace();
        let amount = self
            .parse_float()
            .ok_or(ParseError::Expected { expected: r"\hspace{n}", position })?;
        self.consume_whitespace();
        if !self.try_parse_char('}') {
            return Err(ParseError::Expected { expected: r"\hspace{n}", position });
        }
        Ok(vec![self.make_space(amount)?])
    }

    /// All spaces are relative to the advance of `m` in the current font,
    /// cached per (font, size, dpi).
    fn make_space(&mut self, percentage: f64) -> ParseResult<Node> {
        let state = self.state();
        let key = (state.font, state.fontsize.to_bits(), state.dpi.to_bits());
        let width = match self.em_width_cache.get(&key) {
            Some(&width) => width,
            None => {
                let metrics = self
                    .fonts
                    .get_metrics(state.font, self.default_style, "m", state.fontsize, state.dpi)
                    .map_err(|_| ParseError::UnknownSymbol {
                        symbol: "m".to_string(),
                        position: self.pos(),
                    })?;
                self.em_width_cache.insert(key, metrics.advance);
                metrics.advance
            }
        };
        Ok(Node::Kern(Kern::new(width * percentage)))
    }

    /// `[placeable] ( ('_'|'^') placeable ){0,2}`. With no scripts this is
    /// just the placeable; with scripts the cluster is resolved into its
    /// placed form.
    fn subsuper(&mut self) -> ParseResult<Option<Vec<Node>>> {
        let nucleus = self.placeable()?;
        let mut cluster = SubSuperCluster::new(nucleus);
        let mut ops = 0;
        loop {
            self.consume_whitespace();
            let op = match self.peek_char() {
                Some('_') => '_',
                Some('^') => '^',
                _ => break,
            };
            let position = self.pos();
            if ops == 2 {
                return Err(ParseError::TooManyScripts { position });
            }
            self.parse_char();
            self.consume_whitespace();
            let argument_position = self.pos();
            let argument = self.placeable()?.ok_or(ParseError::Expected {
                expected: "a subscript/superscript argument",
                position: argument_position,
            })?;
            if op == '_' {
                if cluster.sub.is_some() {
                    return Err(ParseError::DoubleSubscript { position });
                }
                cluster.sub = Some(argument);
            } else {
                if cluster.sup.is_some() {
                    return Err(ParseError::DoubleSuperscript { position });
                }
                cluster.sup = Some(argument);
            }
            ops += 1;
        }
        if ops == 0 {
            return Ok(cluster.nucleus.map(|node| vec![node]));
        }
        let node = self.place_scripts(cluster)?;
        Ok(Some(vec![node]))
    }

    /// The alternation every script argument and group body re-enters,
    /// memoised per (position, state).
    fn placeable(&mut self) -> ParseResult<Option<Node>> {
        self.consume_whitespace();
        let position = self.pos();
        let state = self.state();
        if let Some(entry) = self.memo.get(MemoRule::Placeable, position, &state).cloned() {
            return match entry {
                MemoEntry::Match { node, end } => {
                    self.seek(end);
                    Ok(Some(node))
                }
                MemoEntry::NoMatch => {
                    self.seek(position);
                    Ok(None)
                }
                MemoEntry::Fail(err) => Err(err),
            };
        }
        let result = self.placeable_uncached(position);
        let entry = match &result {
            Ok(Some(node)) => MemoEntry::Match { node: node.clone(), end: self.pos() },
            Ok(None) => MemoEntry::NoMatch,
            Err(err) => MemoEntry::Fail(err.clone()),
        };
        self.memo.insert(MemoRule::Placeable, position, &state, entry);
        result
    }

    fn placeable_uncached(&mut self, position: usize) -> ParseResult<Option<Node>> {
        match self.peek_char() {
            None => Ok(None),
            Some('{') => self.group(None).map(Some),
            Some('\\') => {
                let Some(name) = self.control_sequence() else {
                    return Ok(None);
                };
                // Structural commands and the simple-level productions end
                // the current placeable; their owners handle them.
                if name == "left"
                    || name == "right"
                    || name == "hspace"
                    || symbols::space_width(name).is_some()
                    || FontAlias::from_name(name).is_some()
                {
                    self.seek(position);
                    return Ok(None);
                }
                if let Some(alias) =
                    name.strip_prefix("math").and_then(FontAlias::from_name)
                {
                    self.consume_whitespace();
                    if self.peek_char() != Some('{') {
                        return Err(ParseError::Expected {
                            expected: "'{' after a font command",
                            position: self.pos(),
                        });
                    }
                    return self.group(Some(alias)).map(Some);
                }
                match name {
                    "frac" => self.frac().map(Some),
                    "stackrel" => self.stackrel().map(Some),
                    "binom" => self.binom().map(Some),
                    "genfrac" => self.genfrac().map(Some),
                    "sqrt" => self.sqrt().map(Some),
                    "operatorname" => self.operatorname().map(Some),
                    _ => {
                        if symbols::FUNCTION_NAMES.contains(&name) {
                            return self.function(name).map(Some);
                        }
                        if let Some(entry) = symbols::char_over_char(name) {
                            return self.c_over_c(entry).map(Some);
                        }
                        if symbols::is_accent(name) {
                            return self.accent(name, position).map(Some);
                        }
                        let end = self.pos();
                        let written = &self.full_input[position..end];
                        let mut name_chars = name.chars();
                        let escaped_punct = matches!(
                            (name_chars.next(), name_chars.next()),
                            (Some(c), None) if symbols::is_escapable_char(c)
                        );
                        if escaped_punct || crate::font::data::tex2uni(name).is_some() {
                            return self.symbol(written, position).map(Some);
                        }
                        Err(ParseError::UnknownSymbol {
                            symbol: written.to_string(),
                            position,
                        })
                    }
                }
            }
            Some(c) if symbols::is_symbol_char(c) => {
                self.parse_char();
                let written = self.full_input;
                self.symbol(&written[position..self.pos()], position).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// A bare symbol. Binary operators and relations get 0.2 em on both
    /// sides, punctuation on the right only.
    fn symbol(&mut self, written: &str, position: usize) -> ParseResult<Node> {
        let state = self.state();
        let ch = Char::new(written, &state, self.fonts).map_err(|_| {
            ParseError::UnknownSymbol { symbol: written.to_string(), position }
        })?;
        if symbols::is_spaced_symbol(written) {
            let hlist = Hlist::unkerned(vec![
                self.make_space(0.2)?,
                Node::Char(ch),
                self.make_space(0.2)?,
            ]);
            Ok(Node::Hlist(hlist))
        } else if symbols::PUNCTUATION_SYMBOLS.contains(&written) {
            let hlist = Hlist::unkerned(vec![Node::Char(ch), self.make_space(0.2)?]);
            Ok(Node::Hlist(hlist))
        } else {
            Ok(Node::Char(ch))
        }
    }

    /// `{ .. }` with an optional `\mathrm`-style font prefix applied for the
    /// duration of the group.
    fn group(&mut self, font_prefix: Option<FontAlias>) -> ParseResult<Node> {
        self.consume_whitespace();
        let position = self.pos();
        if !self.try_parse_char('{') {
            return Err(ParseError::Expected { expected: "'{'", position });
        }
        self.push_state();
        if let Some(alias) = font_prefix {
            self.state_mut().set_font(alias);
        }
        let mut nodes = Vec::new();
        loop {
            if let Some(node) = self.auto_delim()? {
                nodes.push(node);
                continue;
            }
            match self.simple()? {
                Some(mut produced) => nodes.append(&mut produced),
                None => break,
            }
        }
        self.consume_whitespace();
        if !self.try_parse_char('}') {
            return Err(ParseError::Expected { expected: "'}'", position: self.pos() });
        }
        self.pop_state();
        Ok(Node::Hlist(Hlist::new(nodes, self.fonts)))
    }

    /// A group argument where the grammar demands one, e.g. the numerator of
    /// `\frac`.
    fn required_group(&mut self, expected: &'static str) -> ParseResult<Node> {
        self.consume_whitespace();
        let mut font_prefix = None;
        if self.peek_char() == Some('\\') {
            let save = self.pos();
            match self.control_sequence().and_then(|name| {
                name.strip_prefix("math").and_then(FontAlias::from_name)
            }) {
                Some(alias) => font_prefix = Some(alias),
                None => self.seek(save),
            }
        }
        self.consume_whitespace();
        if self.peek_char() != Some('{') {
            return Err(ParseError::Expected { expected, position: self.pos() });
        }
        self.group(font_prefix)
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    /// A function name like `\sin`: upright roman, thin-spaced, and tagged
    /// so the over/under functions stack their limits.
    fn function(&mut self, name: &str) -> ParseResult<Node> {
        self.push_state();
        self.state_mut().set_font(FontAlias::Rm);
        let result = (|| -> ParseResult<Hlist> {
            let mut nodes = vec![self.make_space(0.2)?];
            let state = self.state();
            for c in name.chars() {
                let ch = Char::new(c.encode_utf8(&mut [0u8; 4]), &state, self.fonts).map_err(
                    |_| ParseError::UnknownSymbol { symbol: c.to_string(), position: self.pos() },
                )?;
                nodes.push(Node::Char(ch));
            }
            nodes.push(self.make_space(0.2)?);
            Ok(Hlist::new(nodes, self.fonts))
        })();
        self.pop_state();
        let mut hlist = result?;
        hlist.function_name = Some(name.to_string());
        Ok(Node::Hlist(hlist))
    }

    /// `\operatorname{..}` sets its letters as a function name.
    fn operatorname(&mut self) -> ParseResult<Node> {
        let position = self.pos();
        self.consume_whitespace();
        if !self.try_parse_char('{') {
            return Err(ParseError::Expected { expected: r"\operatorname{value}", position });
        }
        self.consume_whitespace();
        let Some(letters) = self.parse_letters() else {
            return Err(ParseError::Expected { expected: r"\operatorname{value}", position });
        };
        let name = letters.to_string();
        self.consume_whitespace();
        if !self.try_parse_char('}') {
            return Err(ParseError::Expected { expected: r"\operatorname{value}", position });
        }
        self.function(&name)
    }

    /// A composed symbol like `\AA`: one half centered over the other.
    fn c_over_c(&mut self, entry: &CharOverChar) -> ParseResult<Node> {
        let state = self.state();
        let thickness =
            self.fonts.get_underline_thickness(state.font, state.fontsize, state.dpi);

        let mut over_state = state;
        if let Some(font) = entry.over.0 {
            over_state.set_font(font);
        }
        over_state.fontsize *= entry.over.2;
        let over = Char::accent(entry.over.1, &over_state, self.fonts).map_err(|_| {
            ParseError::UnknownSymbol { symbol: entry.over.1.to_string(), position: self.pos() }
        })?;

        let mut under_state = state;
        if let Some(font) = entry.under.0 {
            under_state.set_font(font);
        }
        under_state.fontsize *= entry.under.2;
        let under = Char::new(entry.under.1, &under_state, self.fonts).map_err(|_| {
            ParseError::UnknownSymbol { symbol: entry.under.1.to_string(), position: self.pos() }
        })?;

        let width = over.width.max(under.width);

        let mut over_centered = hcentered(vec![Node::Accent(over)]);
        over_centered.hpack(width, PackMode::Exactly);

        let mut under_centered = hcentered(vec![Node::Char(under)]);
        under_centered.hpack(width, PackMode::Exactly);

        let vlist = Vlist::new(vec![
            Node::Hlist(over_centered),
            Node::Rule(Rule::vbox(0.0, thickness * entry.space)),
            Node::Hlist(under_centered),
        ]);
        Ok(Node::Vlist(vlist))
    }

    /// `\hat x` and friends: the accent centered in the symbol's width,
    /// separated by twice the rule thickness.
    fn accent(&mut self, name: &str, position: usize) -> ParseResult<Node> {
        let argument_position = self.pos();
        let sym = self.placeable()?.ok_or(ParseError::Expected {
            expected: "an accent argument",
            position: argument_position,
        })?;

        let state = self.state();
        let thickness =
            self.fonts.get_underline_thickness(state.font, state.fontsize, state.dpi);
        let sym_width = sym.width();

        let accent_node = if symbols::WIDE_ACCENTS.contains(&name) {
            let written = format!("\\{}", name);
            let hlist = auto_width_char(&written, sym_width, &state, self.fonts, true)
                .map_err(|_| ParseError::UnknownSymbol { symbol: written.clone(), position })?;
            Node::Hlist(hlist)
        } else {
            let symbol = symbols::accent_symbol(name).expect("checked by caller");
            let ch = Char::accent(symbol, &state, self.fonts).map_err(|_| {
                ParseError::UnknownSymbol { symbol: symbol.to_string(), position }
            })?;
            Node::Accent(ch)
        };

        let mut centered = hcentered(vec![accent_node]);
        centered.hpack(sym_width, PackMode::Exactly);

        let vlist = Vlist::new(vec![
            Node::Hlist(centered),
            Node::Rule(Rule::vbox(0.0, thickness * 2.0)),
            Node::Hlist(Hlist::new(vec![sym], self.fonts)),
        ]);
        Ok(Node::Vlist(vlist))
    }

    // ------------------------------------------------------------------
    // Fractions
    // ------------------------------------------------------------------

    fn frac(&mut self) -> ParseResult<Node> {
        let state = self.state();
        let thickness =
            self.fonts.get_underline_thickness(state.font, state.fontsize, state.dpi);
        let num = self.required_group(r"\frac{num}{den}")?;
        let den = self.required_group(r"\frac{num}{den}")?;
        self.genfrac_layout("", "", thickness, num, den)
    }

    fn stackrel(&mut self) -> ParseResult<Node> {
        let num = self.required_group(r"\stackrel{num}{den}")?;
        let den = self.required_group(r"\stackrel{num}{den}")?;
        self.genfrac_layout("", "", 0.0, num, den)
    }

    fn binom(&mut self) -> ParseResult<Node> {
        let num = self.required_group(r"\binom{num}{den}")?;
        let den = self.required_group(r"\binom{num}{den}")?;
        self.genfrac_layout("(", ")", 0.0, num, den)
    }

    fn genfrac(&mut self) -> ParseResult<Node> {
        const EXPECTED: &str = r"\genfrac{ldelim}{rdelim}{rulesize}{style}{num}{den}";
        let position = self.pos();

        let ldelim = self.genfrac_delim(EXPECTED, symbols::LEFT_DELIM, &[])?;
        let rdelim = self.genfrac_delim(EXPECTED, symbols::RIGHT_DELIM, &[r"\}"])?;

        self.consume_whitespace();
        if !self.try_parse_char('{') {
            return Err(ParseError::Expected { expected: EXPECTED, position });
        }
        self.consume_whitespace();
        let rule = self
            .parse_float()
            .ok_or(ParseError::Expected { expected: "a rule thickness", position: self.pos() })?;
        self.consume_whitespace();
        if !self.try_parse_char('}') {
            return Err(ParseError::Expected { expected: EXPECTED, position });
        }

        // The style argument is parsed as a group and ignored.
        let _style = self.required_group(EXPECTED)?;
        let num = self.required_group(EXPECTED)?;
        let den = self.required_group(EXPECTED)?;
        self.genfrac_layout(&ldelim, &rdelim, rule, num, den)
    }

    /// One brace-wrapped delimiter of `\genfrac`, possibly empty.
    fn genfrac_delim(
        &mut self,
        expected: &'static str,
        sided: &[&str],
        extra: &[&str],
    ) -> ParseResult<String> {
        self.consume_whitespace();
        let position = self.pos();
        if !self.try_parse_char('{') {
            return Err(ParseError::Expected { expected, position });
        }
        self.consume_whitespace();
        if self.try_parse_char('}') {
            return Ok(String::new());
        }
        let token = self
            .read_symbol_token()
            .ok_or(ParseError::Expected { expected: "a delimiter", position })?;
        // A plain `}` would close the brace group; only the escaped form is a
        // valid right delimiter here.
        let valid = (symbols::AMBI_DELIM.contains(&token)
            || sided.contains(&token)
            || extra.contains(&token))
            && token != "}";
        if !valid {
            return Err(ParseError::Expected { expected: "a delimiter", position });
        }
        let token = token.to_string();
        self.consume_whitespace();
        if !self.try_parse_char('}') {
            return Err(ParseError::Expected { expected, position });
        }
        Ok(token)
    }

    /// The shared layout of `\frac`, `\stackrel`, `\binom` and `\genfrac`:
    /// numerator over denominator around a rule, the rule centered on the
    /// midline of `=`, the whole optionally wrapped in auto-sized
    /// delimiters.
    fn genfrac_layout(
        &mut self,
        ldelim: &str,
        rdelim: &str,
        rule: f64,
        mut num: Node,
        mut den: Node,
    ) -> ParseResult<Node> {
        let state = self.state();
        let thickness =
            self.fonts.get_underline_thickness(state.font, state.fontsize, state.dpi);

        num.shrink(self.fonts);
        den.shrink(self.fonts);
        let width = num.width().max(den.width());

        let mut cnum = hcentered(vec![num]);
        cnum.hpack(width, PackMode::Exactly);
        let mut cden = hcentered(vec![den]);
        cden.hpack(width, PackMode::Exactly);
        let cden_height = cden.height;

        let mut vlist = Vlist::new(vec![
            Node::Hlist(cnum),
            Node::Rule(Rule::vbox(0.0, thickness * 2.0)),
            Node::Rule(Rule::hrule(rule)),
            Node::Rule(Rule::vbox(0.0, thickness * 2.0)),
            Node::Hlist(cden),
        ]);

        // Shift so the fraction line sits in the middle of the equals sign.
        let metrics = self
            .fonts
            .get_metrics(state.font, self.default_style, "=", state.fontsize, state.dpi)
            .map_err(|_| ParseError::UnknownSymbol {
                symbol: "=".to_string(),
                position: self.pos(),
            })?;
        let shift = cden_height - ((metrics.ymax + metrics.ymin) / 2.0 - thickness * 3.0);
        vlist.shift_amount = shift;

        let result = Hlist::new(
            vec![Node::Vlist(vlist), Node::Rule(Rule::hbox(thickness * 2.0))],
            self.fonts,
        );
        if !ldelim.is_empty() || !rdelim.is_empty() {
            let ldelim = if ldelim.is_empty() { "." } else { ldelim };
            let rdelim = match rdelim {
                "" => ".",
                r"\}" => "}",
                other => other,
            };
            return self.auto_sized_delimiter(ldelim, vec![Node::Hlist(result)], rdelim);
        }
        Ok(Node::Hlist(result))
    }

    // ------------------------------------------------------------------
    // Radicals
    // ------------------------------------------------------------------

    fn sqrt(&mut self) -> ParseResult<Node> {
        let position = self.pos();
        self.consume_whitespace();

        let mut root = None;
        if self.try_parse_char('[') {
            self.consume_whitespace();
            let digits = self.parse_digits().ok_or(ParseError::Expected {
                expected: "an integer radical index",
                position: self.pos(),
            })?;
            root = Some(digits.to_string());
            self.consume_whitespace();
            if !self.try_parse_char(']') {
                return Err(ParseError::Expected { expected: "']'", position: self.pos() });
            }
        }
        let body = self.required_group(r"\sqrt{value}")?;

        let state = self.state();
        let thickness =
            self.fonts.get_underline_thickness(state.font, state.fontsize, state.dpi);

        // Determine the height of the body, with a little extra so it does
        // not seem cramped.
        let height = body.height() - body.shift_amount() + thickness * 5.0;
        let depth = body.depth() + body.shift_amount() + thickness * 2.0;
        let check = auto_height_char(r"\__sqrt__", height, depth, &state, self.fonts)
            .map_err(|_| ParseError::UnknownSymbol {
                symbol: r"\__sqrt__".to_string(),
                position,
            })?;
        let height = check.height - check.shift_amount;
        let depth = check.depth + check.shift_amount;
        let check_width = check.width;

        // Stretch the glue between the vinculum and the body.
        let mut rightside = Vlist::new(vec![
            Node::Rule(Rule::hrule(thickness)),
            Node::Glue(Glue::fill()),
            body,
        ]);
        rightside.vpack(
            height + (state.fontsize * state.dpi) / 1200.0,
            PackMode::Exactly,
            f64::INFINITY,
        );

        // Add the index and shift it upward so it sits above the tick.
        let root_node = match root {
            None => Node::Rule(Rule::hbox(check_width * 0.5)),
            Some(digits) => {
                let mut nodes = Vec::with_capacity(digits.len());
                for c in digits.chars() {
                    let ch =
                        Char::new(c.encode_utf8(&mut [0u8; 4]), &state, self.fonts).map_err(
                            |_| ParseError::UnknownSymbol {
                                symbol: c.to_string(),
                                position,
                            },
                        )?;
                    nodes.push(Node::Char(ch));
                }
                let mut index = Node::Hlist(Hlist::new(nodes, self.fonts));
                index.shrink(self.fonts);
                index.shrink(self.fonts);
                index
            }
        };
        let mut root_vlist =
            Vlist::new(vec![Node::Hlist(Hlist::new(vec![root_node], self.fonts))]);
        root_vlist.shift_amount = -height * 0.6;

        let hlist = Hlist::new(
            vec![
                Node::Vlist(root_vlist),
                // Negative kerning puts the index over the tick.
                Node::Kern(Kern::new(-check_width * 0.5)),
                Node::Hlist(check),
                Node::Vlist(rightside),
            ],
            self.fonts,
        );
        Ok(Node::Hlist(hlist))
    }

    // ------------------------------------------------------------------
    // Auto-sized delimiters
    // ------------------------------------------------------------------

    /// `\left X .. \right Y`, where the body is either a nested delimited
    /// group or a run of simple productions.
    fn auto_delim(&mut self) -> ParseResult<Option<Node>> {
        let save = self.pos();
        self.consume_whitespace();
        match self.control_sequence() {
            Some("left") => {}
            _ => {
                self.seek(save);
                return Ok(None);
            }
        }

        let front = self.delimiter(symbols::LEFT_DELIM)?;

        let mut middle = Vec::new();
        if let Some(nested) = self.auto_delim()? {
            middle.push(nested);
        } else {
            loop {
                match self.simple()? {
                    Some(mut produced) => middle.append(&mut produced),
                    None => break,
                }
            }
            if middle.is_empty() {
                return Err(ParseError::Expected {
                    expected: r"math between \left and \right",
                    position: self.pos(),
                });
            }
        }

        self.consume_whitespace();
        let position = self.pos();
        match self.control_sequence() {
            Some("right") => {}
            _ => {
                return Err(ParseError::Expected { expected: r"'\right'", position });
            }
        }
        let back = self.delimiter(symbols::RIGHT_DELIM)?;

        self.auto_sized_delimiter(&front, middle, &back).map(Some)
    }

    /// One delimiter token after `\left` or `\right`.
    fn delimiter(&mut self, sided: &[&str]) -> ParseResult<String> {
        self.consume_whitespace();
        let position = self.pos();
        let token = self
            .read_symbol_token()
            .ok_or(ParseError::Expected { expected: "a delimiter", position })?;
        if symbols::AMBI_DELIM.contains(&token) || sided.contains(&token) {
            Ok(token.to_string())
        } else {
            Err(ParseError::Expected { expected: "a delimiter", position })
        }
    }

    /// Wraps content in delimiters sized to its extent. `.` omits the
    /// delimiter on that side.
    fn auto_sized_delimiter(
        &mut self,
        front: &str,
        middle: Vec<Node>,
        back: &str,
    ) -> ParseResult<Node> {
        let state = self.state();
        let height = middle.iter().map(Node::height).fold(f64::MIN, f64::max);
        let depth = middle.iter().map(Node::depth).fold(f64::MIN, f64::max);

        let mut parts = Vec::with_capacity(middle.len() + 2);
        if front != "." {
            let hlist = auto_height_char(front, height, depth, &state, self.fonts).map_err(
                |_| ParseError::UnknownSymbol { symbol: front.to_string(), position: self.pos() },
            )?;
            parts.push(Node::Hlist(hlist));
        }
        parts.extend(middle);
        if back != "." {
            let hlist = auto_height_char(back, height, depth, &state, self.fonts).map_err(
                |_| ParseError::UnknownSymbol { symbol: back.to_string(), position: self.pos() },
            )?;
            parts.push(Node::Hlist(hlist));
        }
        Ok(Node::Hlist(Hlist::new(parts, self.fonts)))
    }

    // ------------------------------------------------------------------
    // Script placement
    // ------------------------------------------------------------------

    fn is_overunder(&self, nucleus: &Node) -> bool {
        match nucleus {
            Node::Char(c) => symbols::OVERUNDER_SYMBOLS.contains(&c.symbol.as_str()),
            Node::Hlist(h) => h
                .function_name
                .as_deref()
                .map_or(false, |name| symbols::OVERUNDER_FUNCTIONS.contains(&name)),
            _ => false,
        }
    }

    fn is_dropsub(&self, nucleus: &Node) -> bool {
        match nucleus {
            Node::Char(c) => symbols::DROPSUB_SYMBOLS.contains(&c.symbol.as_str()),
            _ => false,
        }
    }

    fn is_slanted(&self, nucleus: &Node) -> bool {
        match nucleus {
            Node::Char(c) => c.is_slanted(),
            _ => false,
        }
    }

    /// Places the scripts of a cluster: over/under symbols stack them above
    /// and below, everything else sets them to the side with the classic
    /// shift rules (node757 and friends).
    fn place_scripts(&mut self, cluster: SubSuperCluster) -> ParseResult<Node> {
        let SubSuperCluster { nucleus, mut sub, mut sup } = cluster;
        let fonts = self.fonts;
        let state = self.state();
        let rule_thickness =
            fonts.get_underline_thickness(state.font, state.fontsize, state.dpi);
        let x_height = fonts.get_xheight(state.font, state.fontsize, state.dpi);

        let nucleus = nucleus.unwrap_or(Node::Rule(Rule::hbox(0.0)));

        // Over/under symbols, such as sum or product.
        if self.is_overunder(&nucleus) {
            let mut vlist_children = Vec::new();
            let mut shift = 0.0;
            let mut width = nucleus.width();
            if let Some(s) = sup.as_mut() {
                s.shrink(fonts);
                width = width.max(s.width());
            }
            if let Some(s) = sub.as_mut() {
                s.shrink(fonts);
                width = width.max(s.width());
            }

            if let Some(s) = sup.take() {
                let mut hlist = hcentered(vec![s]);
                hlist.hpack(width, PackMode::Exactly);
                vlist_children.push(Node::Hlist(hlist));
                vlist_children.push(Node::Kern(Kern::new(rule_thickness * 3.0)));
            }
            let nucleus_depth = nucleus.depth();
            let mut hlist = hcentered(vec![nucleus]);
            hlist.hpack(width, PackMode::Exactly);
            vlist_children.push(Node::Hlist(hlist));
            if let Some(s) = sub.take() {
                let mut hlist = hcentered(vec![s]);
                hlist.hpack(width, PackMode::Exactly);
                shift = hlist.height;
                vlist_children.push(Node::Kern(Kern::new(rule_thickness * 3.0)));
                vlist_children.push(Node::Hlist(hlist));
            }
            let mut vlist = Vlist::new(vlist_children);
            vlist.shift_amount = shift + nucleus_depth;
            return Ok(Node::Hlist(Hlist::new(vec![Node::Vlist(vlist)], fonts)));
        }

        // Regular sub/superscripts.
        let mut shift_up = nucleus.height() - SUBDROP * x_height;
        let mut shift_down = if self.is_dropsub(&nucleus) {
            nucleus.depth() + SUBDROP * x_height
        } else {
            SUBDROP * x_height
        };
        let nucleus_slanted = self.is_slanted(&nucleus);

        let script: Node = match (sub.take(), sup.take()) {
            (Some(mut sub), None) => {
                // node757
                sub.shrink(fonts);
                let mut x = Hlist::new(vec![sub], fonts);
                shift_down = shift_down.max(SUB1 * x_height);
                let clr = x.height - (x_height * 4.0).abs() / 5.0;
                shift_down = shift_down.max(clr);
                x.shift_amount = shift_down;
                Node::Hlist(x)
            }
            (sub, Some(mut sup)) => {
                sup.shrink(fonts);
                let mut x = Hlist::new(
                    vec![sup, Node::Kern(Kern::new(SCRIPT_SPACE * x_height))],
                    fonts,
                );
                shift_up = shift_up.max(SUP1 * x_height);
                let clr = x.depth + x_height.abs() / 4.0;
                shift_up = shift_up.max(clr);
                match sub {
                    None => {
                        x.shift_amount = -shift_up;
                        Node::Hlist(x)
                    }
                    Some(mut sub) => {
                        // Both sub and superscript.
                        sub.shrink(fonts);
                        let y = Hlist::new(vec![sub], fonts);
                        shift_down = shift_down.max(SUB1 * x_height);
                        let clr = 2.0 * rule_thickness
                            - ((shift_up - x.depth) - (y.height - shift_down));
                        if clr > 0.0 {
                            shift_up += clr;
                            shift_down += clr;
                        }
                        if nucleus_slanted {
                            x.shift_amount = DELTA * (shift_up + shift_down);
                        }
                        let kern = (shift_up - x.depth) - (y.height - shift_down);
                        let mut v = Vlist::new(vec![
                            Node::Hlist(x),
                            Node::Kern(Kern::new(kern)),
                            Node::Hlist(y),
                        ]);
                        v.shift_amount = shift_down;
                        Node::Vlist(v)
                    }
                }
            }
            (None, None) => unreachable!("place_scripts is only called with a script"),
        };

        Ok(Node::Hlist(Hlist::new(vec![nucleus, script], fonts)))
    }
}

#[cfg(test)]
impl<'i> Parser<'i, 'static, ()> {
    /// A parser over nothing but its input slice, for lexer-level tests.
    pub(crate) fn carcass(input: &'i str) -> Parser<'i, 'static, ()> {
        Parser {
            full_input: input,
            input,
            fonts: &(),
            default_style: FontClass::It,
            state_stack: vec![State::new(FontAlias::Default, FontClass::Rm, 12.0, 100.0)],
            em_width_cache: HashMap::new(),
            memo: Memo::new(),
        }
    }
}
