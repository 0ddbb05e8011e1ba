//! Packrat memoisation for the parser.
//!
//! The `placeable` production is the alternation every script argument and
//! group re-enters; memoising it keeps deeply nested subscripts linear. A
//! memo entry is only valid for the parser state it was computed in (node
//! construction bakes the current font, size and dpi into the tree), so the
//! key includes a digest of the state frame. `placeable` is state-balanced
//! (every push inside it is popped), which is what makes its results safe to
//! replay.

use std::collections::HashMap;

use crate::error::ParseError;
use crate::font::{FontAlias, FontClass};
use crate::layout::{Node, State};

/// The memoised productions. Only `placeable` today; the key shape leaves
/// room for more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MemoRule {
    Placeable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct StateKey {
    font: FontAlias,
    font_class: FontClass,
    fontsize_bits: u64,
    dpi_bits: u64,
}

impl From<&State> for StateKey {
    fn from(state: &State) -> StateKey {
        StateKey {
            font: state.font,
            font_class: state.font_class,
            fontsize_bits: state.fontsize.to_bits(),
            dpi_bits: state.dpi.to_bits(),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum MemoEntry {
    /// The production matched, yielding this node and leaving the input at
    /// this byte offset.
    Match { node: Node, end: usize },
    /// The production did not match; the input is left where it started.
    NoMatch,
    /// The production failed hard.
    Fail(ParseError),
}

#[derive(Debug, Default)]
pub(crate) struct Memo {
    table: HashMap<(MemoRule, usize, StateKey), MemoEntry>,
}

impl Memo {
    pub fn new() -> Memo {
        Memo::default()
    }

    pub fn get(&self, rule: MemoRule, position: usize, state: &State) -> Option<&MemoEntry> {
        self.table.get(&(rule, position, StateKey::from(state)))
    }

    pub fn insert(&mut self, rule: MemoRule, position: usize, state: &State, entry: MemoEntry) {
        self.table.insert((rule, position, StateKey::from(state)), entry);
    }
}
