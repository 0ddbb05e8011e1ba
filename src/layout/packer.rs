//! Packaging: `hpack` and `vpack` finalise the dimensions of horizontal and
//! vertical lists and compute their glue setting, and the kerning pass
//! inserts `Kern` nodes between characters.

use crate::font::FontProvider;
use crate::layout::{Glue, Hlist, Kern, Node, Vlist};

/// Whether a requested dimension is the final one or an addition to the
/// natural one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackMode {
    /// the requested dimension is the final dimension
    Exactly,
    /// the final dimension is the natural dimension plus the requested one
    Additional,
}

/// A helper to determine the highest order of glue used by the members of a
/// list. Used by `vpack` and `hpack`.
fn determine_order(totals: &[f64; 4]) -> usize {
    for i in (1..4).rev() {
        if totals[i] != 0.0 {
            return i;
        }
    }
    0
}

struct GlueSetting {
    glue_set: f64,
    glue_sign: i8,
    glue_order: usize,
}

fn set_glue(x: f64, sign: i8, totals: &[f64; 4], error_type: &str, non_empty: bool, what: &str) -> GlueSetting {
    let o = determine_order(totals);
    let mut setting = GlueSetting { glue_set: 0.0, glue_sign: sign, glue_order: o };
    if totals[o] != 0.0 {
        setting.glue_set = x / totals[o];
    } else {
        setting.glue_sign = 0;
    }
    if o == 0 && non_empty {
        warn!("{} {} by {:.2}pt", error_type, what, x.abs());
    }
    setting
}

impl Hlist {
    /// Builds a horizontal list from children, inserting kerning between
    /// characters, and packs it at its natural width.
    pub fn new<F: FontProvider>(children: Vec<Node>, fonts: &F) -> Hlist {
        let children = Hlist::kern_pass(children, fonts);
        Hlist::from_children(children)
    }

    /// Builds a horizontal list without a kerning pass, as used for manually
    /// spaced material (centered boxes, spaced operators).
    pub fn unkerned(children: Vec<Node>) -> Hlist {
        Hlist::from_children(children)
    }

    fn from_children(children: Vec<Node>) -> Hlist {
        let mut hlist = Hlist {
            children,
            width: 0.0,
            height: 0.0,
            depth: 0.0,
            shift_amount: 0.0,
            glue_set: 0.0,
            glue_sign: 0,
            glue_order: 0,
            size: 0,
            function_name: None,
        };
        hlist.hpack(0.0, PackMode::Additional);
        hlist
    }

    /// Inserts [`Kern`] nodes between [`Char`](crate::layout::Char) nodes to
    /// set kerning. The characters themselves determine the amount of
    /// kerning they need (`Char::get_kerning`); this pass just rebuilds the
    /// child list in the correct way.
    fn kern_pass<F: FontProvider>(children: Vec<Node>, fonts: &F) -> Vec<Node> {
        let mut new_children = Vec::with_capacity(children.len());
        let mut iter = children.into_iter().peekable();
        while let Some(elem) = iter.next() {
            let kerning = elem.get_kerning(iter.peek(), fonts);
            new_children.push(elem);
            if kerning != 0.0 {
                new_children.push(Node::Kern(Kern::new(kerning)));
            }
        }
        new_children
    }

    /// The main duty of `hpack` is to compute the dimensions of the
    /// resulting box, and to adjust the glue if one of those dimensions is
    /// pre-specified. The computed sizes normally enclose all of the
    /// material inside the new box, but some items may stick out if negative
    /// glue is used, if the box is overfull, or if a `Vlist` includes other
    /// boxes that have been shifted left.
    ///
    /// `hpack(w, Exactly)` produces a box whose width is exactly `w`, while
    /// `hpack(w, Additional)` yields a box whose width is the natural width
    /// plus `w`.
    pub fn hpack(&mut self, w: f64, mode: PackMode) {
        let mut h: f64 = 0.0;
        let mut d: f64 = 0.0;
        let mut x: f64 = 0.0;
        let mut total_stretch = [0.0f64; 4];
        let mut total_shrink = [0.0f64; 4];

        for p in &self.children {
            match p {
                Node::Char(c) | Node::Accent(c) => {
                    x += c.width;
                    h = h.max(c.height);
                    d = d.max(c.depth);
                }
                Node::Rule(r) => {
                    x += r.width;
                    if !r.height.is_infinite() && !r.depth.is_infinite() {
                        h = h.max(r.height);
                        d = d.max(r.depth);
                    }
                }
                Node::Hlist(_) | Node::Vlist(_) => {
                    x += p.width();
                    let (height, depth) = (p.height(), p.depth());
                    if !height.is_infinite() && !depth.is_infinite() {
                        let s = p.shift_amount();
                        h = h.max(height - s);
                        d = d.max(depth + s);
                    }
                }
                Node::Glue(Glue { spec, .. }) => {
                    x += spec.width;
                    total_stretch[spec.stretch_order] += spec.stretch;
                    total_shrink[spec.shrink_order] += spec.shrink;
                }
                Node::Kern(k) => {
                    x += k.width;
                }
            }
        }
        self.height = h;
        self.depth = d;

        let mut w = w;
        if mode == PackMode::Additional {
            w += x;
        }
        self.width = w;
        let x = w - x;

        if x == 0.0 {
            self.glue_sign = 0;
            self.glue_order = 0;
            self.glue_set = 0.0;
            return;
        }
        let setting = if x > 0.0 {
            set_glue(x, 1, &total_stretch, "Overfull", !self.children.is_empty(), "hbox")
        } else {
            set_glue(x, -1, &total_shrink, "Underfull", !self.children.is_empty(), "hbox")
        };
        self.glue_set = setting.glue_set;
        self.glue_sign = setting.glue_sign;
        self.glue_order = setting.glue_order;
    }
}

impl Vlist {
    /// Builds a vertical list from children, packed at its natural height.
    pub fn new(children: Vec<Node>) -> Vlist {
        let mut vlist = Vlist {
            children,
            width: 0.0,
            height: 0.0,
            depth: 0.0,
            shift_amount: 0.0,
            glue_set: 0.0,
            glue_sign: 0,
            glue_order: 0,
            size: 0,
        };
        vlist.vpack(0.0, PackMode::Additional, f64::INFINITY);
        vlist
    }

    /// The vertical analogue of [`Hlist::hpack`]. `max_depth` clamps the
    /// depth inherited from the last box; any excess is absorbed into the
    /// height.
    ///
    /// # Panics
    ///
    /// A `Char` in a vertical list indicates a bug in the parser and panics.
    pub fn vpack(&mut self, h: f64, mode: PackMode, max_depth: f64) {
        let mut w: f64 = 0.0;
        let mut d: f64 = 0.0;
        let mut x: f64 = 0.0;
        let mut total_stretch = [0.0f64; 4];
        let mut total_shrink = [0.0f64; 4];

        for p in &self.children {
            match p {
                Node::Rule(_) | Node::Hlist(_) | Node::Vlist(_) => {
                    x += d + p.height();
                    d = p.depth();
                    let width = p.width();
                    if !width.is_infinite() {
                        let s = p.shift_amount();
                        w = w.max(width + s);
                    }
                }
                Node::Glue(Glue { spec, .. }) => {
                    x += d;
                    d = 0.0;
                    x += spec.width;
                    total_stretch[spec.stretch_order] += spec.stretch;
                    total_shrink[spec.shrink_order] += spec.shrink;
                }
                Node::Kern(k) => {
                    x += d + k.width;
                    d = 0.0;
                }
                Node::Char(_) | Node::Accent(_) => {
                    panic!("internal typesetting error: Char node found in Vlist");
                }
            }
        }

        self.width = w;
        if d > max_depth {
            x += d - max_depth;
            self.depth = max_depth;
        } else {
            self.depth = d;
        }

        let mut h = h;
        if mode == PackMode::Additional {
            h += x;
        }
        self.height = h;
        let x = h - x;

        if x == 0.0 {
            self.glue_sign = 0;
            self.glue_order = 0;
            self.glue_set = 0.0;
            return;
        }
        let setting = if x > 0.0 {
            set_glue(x, 1, &total_stretch, "Overfull", !self.children.is_empty(), "vbox")
        } else {
            set_glue(x, -1, &total_shrink, "Underfull", !self.children.is_empty(), "vbox")
        };
        self.glue_set = setting.glue_set;
        self.glue_sign = setting.glue_sign;
        self.glue_order = setting.glue_order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Glue, Kern, Node, Rule};

    fn kern(width: f64) -> Node {
        Node::Kern(Kern::new(width))
    }

    #[test]
    fn hpack_natural_width() {
        let mut hlist = Hlist::unkerned(vec![
            kern(2.0),
            Node::Rule(Rule::new(3.0, 5.0, 1.0)),
            kern(1.5),
        ]);
        hlist.hpack(0.0, PackMode::Additional);
        assert_close!(hlist.width, 6.5, 1e-12);
        assert_close!(hlist.height, 5.0, 1e-12);
        assert_close!(hlist.depth, 1.0, 1e-12);
        assert_eq!(hlist.glue_sign, 0);
    }

    #[test]
    fn hpack_exactly_stretches_glue() {
        let mut hlist = Hlist::unkerned(vec![Node::Glue(Glue::fil()), kern(4.0)]);
        hlist.hpack(10.0, PackMode::Exactly);
        assert_close!(hlist.width, 10.0, 1e-12);
        assert_eq!(hlist.glue_sign, 1);
        assert_eq!(hlist.glue_order, 1);
        assert_close!(hlist.glue_set, 6.0, 1e-12);
    }

    #[test]
    fn hpack_underflow_sets_shrink_sign() {
        let mut hlist = Hlist::unkerned(vec![Node::Glue(Glue::ss()), kern(4.0)]);
        hlist.hpack(1.0, PackMode::Exactly);
        assert_eq!(hlist.glue_sign, -1);
        assert_eq!(hlist.glue_order, 1);
        assert_close!(hlist.glue_set, 3.0, 1e-12);
    }

    #[test]
    fn hpack_additional_adds_to_natural() {
        let mut hlist = Hlist::unkerned(vec![kern(4.0), Node::Glue(Glue::fil())]);
        hlist.hpack(2.0, PackMode::Additional);
        assert_close!(hlist.width, 6.0, 1e-12);
        assert_eq!(hlist.glue_sign, 1);
    }

    #[test]
    fn vpack_depth_comes_from_last_box() {
        let mut vlist = Vlist::new(vec![
            Node::Rule(Rule::new(2.0, 3.0, 1.0)),
            Node::Rule(Rule::new(4.0, 2.0, 0.5)),
        ]);
        vlist.vpack(0.0, PackMode::Additional, f64::INFINITY);
        // natural height: 3 + (1 + 2) = 6, depth of the last box is 0.5
        assert_close!(vlist.height, 6.0, 1e-12);
        assert_close!(vlist.depth, 0.5, 1e-12);
        assert_close!(vlist.width, 4.0, 1e-12);
    }

    #[test]
    fn vpack_clamps_depth_into_height() {
        let mut vlist = Vlist::new(vec![Node::Rule(Rule::new(2.0, 3.0, 2.0))]);
        vlist.vpack(0.0, PackMode::Additional, 0.5);
        assert_close!(vlist.depth, 0.5, 1e-12);
        assert_close!(vlist.height, 4.5, 1e-12);
    }

    #[test]
    fn glue_orders_prefer_highest() {
        let mut hlist = Hlist::unkerned(vec![
            Node::Glue(Glue::fil()),
            Node::Glue(Glue::fill()),
            kern(1.0),
        ]);
        hlist.hpack(5.0, PackMode::Exactly);
        assert_eq!(hlist.glue_order, 2);
        assert_close!(hlist.glue_set, 4.0, 1e-12);
    }

    #[test]
    #[should_panic(expected = "Char node found in Vlist")]
    fn char_in_vlist_panics() {
        use crate::font::{GlyphId, GlyphInfo, Metrics};
        let metrics = Metrics {
            advance: 1.0,
            width: 1.0,
            height: 1.0,
            xmin: 0.0,
            xmax: 1.0,
            ymin: 0.0,
            ymax: 1.0,
            iceberg: 1.0,
            slanted: false,
        };
        let ch = crate::layout::Char {
            symbol: "x".to_string(),
            font: crate::font::FontAlias::It,
            font_class: crate::font::FontClass::It,
            fontsize: 12.0,
            dpi: 100.0,
            size: 0,
            width: 1.0,
            height: 1.0,
            depth: 0.0,
            info: GlyphInfo {
                face: "test".to_string(),
                glyph: GlyphId(1),
                fontsize: 12.0,
                dpi: 100.0,
                offset: 0.0,
                metrics,
            },
        };
        let _ = Vlist::new(vec![Node::Char(ch)]);
    }
}
