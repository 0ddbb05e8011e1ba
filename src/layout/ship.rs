//! Shipping: the final pass that converts the packed box tree into
//! absolute-positioned glyph and rectangle instructions.
//!
//! Since boxes can be inside of boxes inside of boxes, the main work is done
//! by two mutually recursive routines, `hlist_out` and `vlist_out`, which
//! traverse the `Hlist` and `Vlist` nodes inside of horizontal and vertical
//! boxes. The global variables TeX uses to store state while shipping have
//! become fields here. Shipping is read-only: running it twice over the same
//! tree produces identical output.

use crate::font::GlyphInfo;
use crate::geometry::{BBox, Rect};
use crate::layout::{Glue, Hlist, Node, Vlist};

/// One positioned glyph of the flat draw list, `y` on the baseline the glyph
/// sits on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippedGlyph {
    pub x: f64,
    pub y: f64,
    pub info: GlyphInfo,
}

/// The flat draw list: filled rectangles, positioned glyphs and the bounding
/// box of all emitted ink.
pub type DrawList = (Vec<Rect>, Vec<ShippedGlyph>, BBox);

/// Converts a packed box tree into a flat draw list, with the root baseline
/// at `oy + root.height` and the left edge at `ox`.
///
/// Re-running with `ox = -bbox.x_min` of a first run recentres the output so
/// the leftmost ink is at x = 0.
pub fn ship(ox: f64, oy: f64, root: &Hlist) -> DrawList {
    let mut state = Ship {
        max_push: 0,
        cur_s: 0,
        cur_v: 0.0,
        cur_h: 0.0,
        off_h: ox,
        off_v: oy + root.height,
        rects: Vec::new(),
        glyphs: Vec::new(),
        bbox: BBox::at_origin(),
    };
    state.hlist_out(root);
    (state.rects, state.glyphs, state.bbox)
}

struct Ship {
    /// deepest nesting of push commands so far
    max_push: usize,
    cur_s: usize,
    cur_v: f64,
    cur_h: f64,
    off_h: f64,
    off_v: f64,
    rects: Vec<Rect>,
    glyphs: Vec<ShippedGlyph>,
    bbox: BBox,
}

fn clamp(value: f64) -> f64 {
    value.clamp(-1_000_000_000.0, 1_000_000_000.0)
}

impl Ship {
    fn hlist_out(&mut self, hbox: &Hlist) {
        let mut cur_g: f64 = 0.0;
        let mut cur_glue: f64 = 0.0;
        let glue_order = hbox.glue_order;
        let glue_sign = hbox.glue_sign;
        let base_line = self.cur_v;
        self.cur_s += 1;
        self.max_push = self.max_push.max(self.cur_s);

        for p in &hbox.children {
            match p {
                Node::Char(c) => {
                    let ox = self.cur_h + self.off_h;
                    let oy = self.cur_v + self.off_v;
                    let m = c.info.metrics;
                    self.glyphs.push(ShippedGlyph { x: ox, y: oy, info: c.info.clone() });
                    self.bbox.expand(ox + m.xmin, oy - m.ymin, ox + m.xmax, oy - m.ymax);
                    self.cur_h += c.width;
                }
                Node::Accent(c) => {
                    // Accents are already offset correctly from the baseline
                    // in TrueType fonts; undo the bearing so the outline
                    // lands in the accent's box.
                    let ox = self.cur_h + self.off_h;
                    let oy = self.cur_v + self.off_v;
                    let m = c.info.metrics;
                    self.glyphs.push(ShippedGlyph {
                        x: ox - m.xmin,
                        y: oy + m.ymin,
                        info: c.info.clone(),
                    });
                    self.bbox.expand(ox + m.xmin, oy - m.ymin, ox + m.xmax, oy - m.ymax);
                    self.cur_h += c.width;
                }
                Node::Kern(k) => {
                    self.cur_h += k.width;
                }
                Node::Hlist(_) | Node::Vlist(_) => {
                    // node623
                    let empty = match p {
                        Node::Hlist(h) => h.children.is_empty(),
                        Node::Vlist(v) => v.children.is_empty(),
                        _ => unreachable!(),
                    };
                    if empty {
                        self.cur_h += p.width();
                    } else {
                        let edge = self.cur_h;
                        self.cur_v = base_line + p.shift_amount();
                        match p {
                            Node::Hlist(h) => self.hlist_out(h),
                            Node::Vlist(v) => self.vlist_out(v),
                            _ => unreachable!(),
                        }
                        self.cur_h = edge + p.width();
                        self.cur_v = base_line;
                    }
                }
                Node::Rule(r) => {
                    // node624. The rule sits on the enclosing list's
                    // baseline, its running dimensions resolved against the
                    // enclosing box.
                    let mut rule_height = r.height;
                    let mut rule_depth = r.depth;
                    let rule_width = r.width;
                    if rule_height.is_infinite() {
                        rule_height = hbox.height;
                    }
                    if rule_depth.is_infinite() {
                        rule_depth = hbox.depth;
                    }
                    if rule_height > 0.0 && rule_width > 0.0 {
                        let x = self.cur_h + self.off_h;
                        let top = base_line - rule_height + self.off_v;
                        let bottom = base_line + rule_depth + self.off_v;
                        let rect = Rect::new(x, top, x + rule_width, bottom);
                        self.rects.push(rect);
                        self.bbox.expand(rect.x1, rect.y1, rect.x2, rect.y2);
                    }
                    self.cur_h += rule_width;
                }
                Node::Glue(Glue { spec, .. }) => {
                    // node625
                    let mut rule_width = spec.width - cur_g;
                    if glue_sign != 0 {
                        if glue_sign == 1 {
                            if spec.stretch_order == glue_order {
                                cur_glue += spec.stretch;
                                cur_g = clamp(hbox.glue_set * cur_glue).round();
                            }
                        } else if spec.shrink_order == glue_order {
                            cur_glue += spec.shrink;
                            cur_g = clamp(hbox.glue_set * cur_glue).round();
                        }
                    }
                    rule_width += cur_g;
                    self.cur_h += rule_width;
                }
            }
        }
        self.cur_s -= 1;
    }

    fn vlist_out(&mut self, vbox: &Vlist) {
        let mut cur_g: f64 = 0.0;
        let mut cur_glue: f64 = 0.0;
        let glue_order = vbox.glue_order;
        let glue_sign = vbox.glue_sign;
        self.cur_s += 1;
        self.max_push = self.max_push.max(self.cur_s);
        let left_edge = self.cur_h;
        self.cur_v -= vbox.height;

        for p in &vbox.children {
            match p {
                Node::Kern(k) => {
                    self.cur_v += k.width;
                }
                Node::Hlist(_) | Node::Vlist(_) => {
                    let empty = match p {
                        Node::Hlist(h) => h.children.is_empty(),
                        Node::Vlist(v) => v.children.is_empty(),
                        _ => unreachable!(),
                    };
                    if empty {
                        self.cur_v += p.height() + p.depth();
                    } else {
                        self.cur_v += p.height();
                        self.cur_h = left_edge + p.shift_amount();
                        let save_v = self.cur_v;
                        match p {
                            Node::Hlist(h) => self.hlist_out(h),
                            Node::Vlist(v) => self.vlist_out(v),
                            _ => unreachable!(),
                        }
                        self.cur_v = save_v + p.depth();
                        self.cur_h = left_edge;
                    }
                }
                Node::Rule(r) => {
                    let rule_height = r.height;
                    let rule_depth = r.depth;
                    let mut rule_width = r.width;
                    if rule_width.is_infinite() {
                        rule_width = vbox.width;
                    }
                    let total = rule_height + rule_depth;
                    self.cur_v += total;
                    if total > 0.0 && rule_width > 0.0 {
                        let x = self.cur_h + self.off_h;
                        let bottom = self.cur_v + self.off_v;
                        let rect = Rect::new(x, bottom - total, x + rule_width, bottom);
                        self.rects.push(rect);
                        self.bbox.expand(rect.x1, rect.y1, rect.x2, rect.y2);
                    }
                }
                Node::Glue(Glue { spec, .. }) => {
                    let mut rule_height = spec.width - cur_g;
                    if glue_sign != 0 {
                        if glue_sign == 1 {
                            if spec.stretch_order == glue_order {
                                cur_glue += spec.stretch;
                                cur_g = clamp(vbox.glue_set * cur_glue).round();
                            }
                        } else if spec.shrink_order == glue_order {
                            cur_glue += spec.shrink;
                            cur_g = clamp(vbox.glue_set * cur_glue).round();
                        }
                    }
                    rule_height += cur_g;
                    self.cur_v += rule_height;
                }
                Node::Char(_) | Node::Accent(_) => {
                    panic!("internal typesetting error: Char node found in vlist");
                }
            }
        }
        self.cur_s -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::packer::PackMode;
    use crate::layout::{Hlist, Kern, Node, Rule, Vlist};

    #[test]
    fn running_rule_width_resolves_to_enclosing_vlist() {
        let inner = Node::Rule(Rule::hrule(1.0));
        // Width-only box: sets the vlist width without emitting ink.
        let spacer = Node::Rule(Rule::new(6.0, 0.0, 0.0));
        let vlist = Vlist::new(vec![spacer, inner]);
        let root = Hlist::unkerned(vec![Node::Vlist(vlist)]);

        let (rects, glyphs, _bbox) = ship(0.0, 0.0, &root);
        assert!(glyphs.is_empty());
        assert_eq!(rects.len(), 1);
        assert_close!(rects[0].width(), 6.0, 1e-12);
        assert_close!(rects[0].height(), 1.0, 1e-12);
    }

    #[test]
    fn running_rule_height_resolves_to_enclosing_hlist() {
        let tall = Node::Rule(Rule::new(2.0, 5.0, 1.0));
        let running = Node::Rule(Rule::new(0.5, f64::INFINITY, f64::INFINITY));
        let root = Hlist::unkerned(vec![tall, running]);

        let (rects, _glyphs, _bbox) = ship(0.0, 0.0, &root);
        assert_eq!(rects.len(), 2);
        assert_close!(rects[1].height(), 6.0, 1e-12);
    }

    #[test]
    fn zero_dimension_boxes_emit_no_ink() {
        let vlist = Vlist::new(vec![
            Node::Rule(Rule::vbox(0.0, 2.0)),
            Node::Rule(Rule::new(3.0, 1.0, 0.0)),
        ]);
        let root = Hlist::unkerned(vec![Node::Rule(Rule::hbox(4.0)), Node::Vlist(vlist)]);
        let (rects, _glyphs, _bbox) = ship(0.0, 0.0, &root);
        assert_eq!(rects.len(), 1);
        // The hbox spacer advanced the cursor before the vlist.
        assert_close!(rects[0].x1, 4.0, 1e-12);
    }

    #[test]
    fn shipping_is_idempotent() {
        let vlist = Vlist::new(vec![
            Node::Rule(Rule::new(2.0, 1.0, 0.0)),
            Node::Kern(Kern::new(0.5)),
            Node::Rule(Rule::new(3.0, 1.5, 0.0)),
        ]);
        let root = Hlist::unkerned(vec![Node::Vlist(vlist), Node::Rule(Rule::new(1.0, 1.0, 0.0))]);

        let first = ship(0.0, 0.0, &root);
        let second = ship(0.0, 0.0, &root);
        assert_eq!(first.0, second.0);
        assert_eq!(first.2, second.2);
    }

    #[test]
    fn glue_set_amounts_are_rounded() {
        let mut hlist = Hlist::unkerned(vec![
            Node::Glue(crate::layout::Glue::fil()),
            Node::Rule(Rule::new(2.0, 1.0, 0.0)),
        ]);
        hlist.hpack(7.3, PackMode::Exactly);
        let root = Hlist::unkerned(vec![Node::Hlist(hlist)]);
        let (rects, _glyphs, _bbox) = ship(0.0, 0.0, &root);
        // 5.3pt of stretch rounds to a whole device unit.
        assert_close!(rects[0].x1, 5.0, 1e-12);
    }
}
