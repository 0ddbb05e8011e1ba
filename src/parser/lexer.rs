//! Low-level input handling for the parser: characters, control sequences,
//! numbers. These are methods on [`Parser`](super::Parser) that only touch
//! the input slice, never the node tree or the state stack.

use super::Parser;

impl<'i, 'f, F> Parser<'i, 'f, F> {
    /// Byte offset of the current position in the original input, for error
    /// reporting and memoisation.
    pub(crate) fn pos(&self) -> usize {
        self.full_input.len() - self.input.len()
    }

    /// Re-anchors the input at a byte offset previously obtained from
    /// [`Parser::pos`].
    pub(crate) fn seek(&mut self, position: usize) {
        self.input = &self.full_input[position..];
    }

    pub(crate) fn peek_char(&self) -> Option<char> {
        self.input.chars().next()
    }

    /// Advances through the input so that the first character pointed to is
    /// not whitespace.
    pub(crate) fn consume_whitespace(&mut self) {
        self.input = self.input.trim_start();
    }

    /// If the next char equals the argument, consume it and return true.
    pub(crate) fn try_parse_char(&mut self, character: char) -> bool {
        let mut chars = self.input.chars();
        if chars.next() == Some(character) {
            self.input = chars.as_str();
            true
        } else {
            false
        }
    }

    /// Consumes and returns the next char, if any.
    pub(crate) fn parse_char(&mut self) -> Option<char> {
        let mut chars = self.input.chars();
        let result = chars.next();
        self.input = chars.as_str();
        result
    }

    /// Attempts to parse a control sequence like `\bla`, returning `bla`.
    /// A command is either a maximal run of ASCII letters or exactly one
    /// other character (so `\$` and `\ ` are commands too). Does not advance
    /// when the input does not start with a backslash.
    pub(crate) fn control_sequence(&mut self) -> Option<&'i str> {
        let mut chars = self.input.chars();
        if chars.next() != Some('\\') {
            return None;
        }

        let start_command = chars.as_str();
        let character = chars.next()?;

        if !character.is_ascii_alphabetic() {
            let suffix = chars.as_str();
            self.input = suffix;
            return Some(diff_slices(start_command, suffix));
        }

        let mut end_command = chars.as_str();
        while chars.next().map_or(false, |c| c.is_ascii_alphabetic()) {
            end_command = chars.as_str();
        }

        self.input = end_command;
        Some(diff_slices(start_command, end_command))
    }

    /// A maximal run of ASCII digits, as used for `\sqrt[3]{..}` indices.
    pub(crate) fn parse_digits(&mut self) -> Option<&'i str> {
        let end = self.input.find(|c: char| !c.is_ascii_digit()).unwrap_or(self.input.len());
        if end == 0 {
            return None;
        }
        let (digits, rest) = self.input.split_at(end);
        self.input = rest;
        Some(digits)
    }

    /// A maximal run of ASCII letters, as used for `\operatorname{..}`.
    pub(crate) fn parse_letters(&mut self) -> Option<&'i str> {
        let end = self
            .input
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(self.input.len());
        if end == 0 {
            return None;
        }
        let (letters, rest) = self.input.split_at(end);
        self.input = rest;
        Some(letters)
    }

    /// A floating point literal: `[-+]?([0-9]+.?[0-9]*|.[0-9]+)`.
    pub(crate) fn parse_float(&mut self) -> Option<f64> {
        let mut end = 0;
        let bytes = self.input.as_bytes();
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
        if end == digits_start {
            return None;
        }
        let (text, rest) = self.input.split_at(end);
        match text.parse::<f64>() {
            Ok(value) => {
                self.input = rest;
                Some(value)
            }
            Err(_) => None,
        }
    }

    /// Reads one symbol token: either a backslash command (returned with its
    /// backslash) or a single character. Used for delimiters.
    pub(crate) fn read_symbol_token(&mut self) -> Option<&'i str> {
        if self.peek_char() == Some('\\') {
            let before = self.input;
            self.control_sequence()?;
            Some(diff_slices(before, self.input))
        } else {
            let c = self.peek_char()?;
            let (token, rest) = self.input.split_at(c.len_utf8());
            self.input = rest;
            Some(token)
        }
    }
}

/// Assuming `suffix` is a suffix of `slice`, returns the prefix of `slice`
/// that ends just before the first character of `suffix`.
fn diff_slices<'a>(slice: &'a str, suffix: &'a str) -> &'a str {
    &slice[..(slice.len() - suffix.len())]
}

#[cfg(test)]
mod tests {
    use super::super::Parser;
    use super::diff_slices;

    #[test]
    fn diff_slices_takes_the_consumed_prefix() {
        let whole = "alpha rest";
        let suffix = &whole[5..];
        assert_eq!(diff_slices(whole, suffix), "alpha");
    }

    #[test]
    fn lex_try_char() {
        fn remaining_input(input: &str, character: char) -> (bool, String) {
            let mut parser = Parser::carcass(input);
            let outcome = parser.try_parse_char(character);
            (outcome, parser.input.to_string())
        }

        assert_eq!(remaining_input("{ rere", '{'), (true, " rere".to_string()));
        assert_eq!(remaining_input("} rere", '{'), (false, "} rere".to_string()));
        assert_eq!(remaining_input("", '{'), (false, String::new()));
    }

    #[test]
    fn lex_control_sequence() {
        let tests = [
            (r"\cal 0", Some("cal"), " 0"),
            (r"\$ 0", Some("$"), " 0"),
            (r"\cal{} 0", Some("cal"), "{} 0"),
            (r"\c{} 0", Some("c"), "{} 0"),
            (r"\ +1", Some(" "), "+1"),
            (r"_1", None, "_1"),
        ];

        for (input, name, remainder) in tests {
            eprintln!("Input: {:?}", input);
            let mut parser = Parser::carcass(input);
            let control_sequence = parser.control_sequence();
            assert_eq!(control_sequence, name);
            assert_eq!(parser.input, remainder);
        }
    }

    #[test]
    fn lex_float() {
        let cases = [
            ("0.5 }", Some(0.5), " }"),
            ("-1.25x", Some(-1.25), "x"),
            (".5", Some(0.5), ""),
            ("+12", Some(12.0), ""),
            ("abc", None, "abc"),
        ];
        for (input, expected, remainder) in cases {
            let mut parser = Parser::carcass(input);
            assert_eq!(parser.parse_float(), expected);
            assert_eq!(parser.input, remainder);
        }
    }

    #[test]
    fn lex_symbol_token() {
        let mut parser = Parser::carcass(r"\lfloor x");
        assert_eq!(parser.read_symbol_token(), Some(r"\lfloor"));
        assert_eq!(parser.input, " x");

        let mut parser = Parser::carcass("(x");
        assert_eq!(parser.read_symbol_token(), Some("("));
        assert_eq!(parser.input, "x");
    }

    #[test]
    fn lex_consume_whitespace() {
        fn remainder_after(input: &str) -> String {
            let mut parser = Parser::carcass(input);
            parser.consume_whitespace();
            parser.input.to_string()
        }

        assert_eq!(remainder_after("   2"), "2");
        assert_eq!(remainder_after(" \t ç  "), "ç  ");
        assert_eq!(remainder_after(""), "");
        assert_eq!(remainder_after("abc "), "abc ");
    }
}
