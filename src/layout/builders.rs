//! Convenience constructors over the raw node types: centered lists, the
//! script cluster assembled while parsing, and the auto-sized characters
//! used for stretchy delimiters, radicals and wide accents.

use crate::error::FontResult;
use crate::font::FontProvider;
use crate::layout::{Char, Glue, Hlist, Node, State};

/// An `Hlist` whose contents are centered within its enclosing box, by
/// surrounding them with stretch-shrink glue. The caller re-packs it to the
/// enclosing width with `hpack(width, Exactly)`.
pub fn hcentered(elements: Vec<Node>) -> Hlist {
    let mut children = Vec::with_capacity(elements.len() + 2);
    children.push(Node::Glue(Glue::ss()));
    children.extend(elements);
    children.push(Node::Glue(Glue::ss()));
    Hlist::unkerned(children)
}

/// The intermediate gathered while parsing a `subsuper` production: a
/// nucleus with up to one subscript and one superscript, not yet placed.
/// Script placement consumes it and produces the final `Hlist`.
#[derive(Debug, Default)]
pub struct SubSuperCluster {
    pub nucleus: Option<Node>,
    pub sub: Option<Node>,
    pub sup: Option<Node>,
}

impl SubSuperCluster {
    pub fn new(nucleus: Option<Node>) -> SubSuperCluster {
        SubSuperCluster { nucleus, sub: None, sup: None }
    }
}

/// Creates a character as close to the given height and depth as possible.
/// With a font carrying multiple height versions of some characters (such as
/// the BaKoMa fonts) the correct glyph is selected from the sized
/// alternatives, then rescaled so its total height matches the target; with
/// a single-variant font this degenerates to a scaled glyph.
pub fn auto_height_char<F: FontProvider>(
    symbol: &str,
    height: f64,
    depth: f64,
    state: &State,
    fonts: &F,
) -> FontResult<Hlist> {
    let alternatives = fonts.get_sized_alternatives(state.font, symbol);
    let target_total = height + depth;

    let mut state = *state;
    let mut chosen = None;
    for (font, sym) in &alternatives {
        state.font = *font;
        let ch = Char::new(sym, &state, fonts)?;
        let big_enough = ch.height + ch.depth >= target_total;
        chosen = Some((ch, sym));
        if big_enough {
            break;
        }
    }
    // The alternatives list is never empty: the provider falls back to the
    // symbol itself.
    let (ch, sym) = chosen.expect("no sized alternatives");

    let total = ch.height + ch.depth;
    let ch = if total > 0.0 {
        state.fontsize *= target_total / total;
        Char::new(sym, &state, fonts)?
    } else {
        ch
    };

    let shift = depth - ch.depth;
    let mut hlist = Hlist::new(vec![Node::Char(ch)], fonts);
    hlist.shift_amount = shift;
    Ok(hlist)
}

/// Creates a character as close to the given width as possible, used for
/// wide accents. `accent` selects accent metric handling for the resulting
/// glyph.
pub fn auto_width_char<F: FontProvider>(
    symbol: &str,
    width: f64,
    state: &State,
    fonts: &F,
    accent: bool,
) -> FontResult<Hlist> {
    let make = |sym: &str, state: &State| -> FontResult<Char> {
        if accent {
            Char::accent(sym, state, fonts)
        } else {
            Char::new(sym, state, fonts)
        }
    };

    let alternatives = fonts.get_sized_alternatives(state.font, symbol);

    let mut state = *state;
    let mut chosen = None;
    for (font, sym) in &alternatives {
        state.font = *font;
        let ch = make(sym, &state)?;
        let big_enough = ch.width >= width;
        chosen = Some((ch, sym));
        if big_enough {
            break;
        }
    }
    let (ch, sym) = chosen.expect("no sized alternatives");

    let ch = if ch.width > 0.0 {
        state.fontsize *= width / ch.width;
        make(sym, &state)?
    } else {
        ch
    };

    let node = if accent { Node::Accent(ch) } else { Node::Char(ch) };
    Ok(Hlist::new(vec![node], fonts))
}
