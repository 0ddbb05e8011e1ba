//! The TeX-like box model.
//!
//! The following is based directly on the document 'woven' from the TeX82
//! source code, also available in printed form:
//!
//!    Knuth, Donald E.. 1986.  Computers and Typesetting, Volume B:
//!    TeX: The Program.  Addison-Wesley Professional.
//!
//! The most relevant "chapters" are:
//!    Data structures for boxes and their friends
//!    Shipping pages out ([`ship`](ship::ship))
//!    Packaging (hpack and vpack, in [`packer`])
//!    Data structures for math mode
//!    Subroutines for math mode
//!    Typesetting math formulas
//!
//! A [`Node`] is a tagged union rather than a class hierarchy; `hpack`,
//! `vpack` and the shipper dispatch on it with `match`. Every node carries a
//! `size` level: 0 is normal, each level up shrinks the node by
//! [`SHRINK_FACTOR`] until [`NUM_SIZE_LEVELS`] is reached. Dimensions are in
//! points; `height` is above the baseline, `depth` below.

pub mod builders;
pub mod packer;
pub mod ship;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::FontResult;
use crate::font::{FontAlias, FontClass, FontProvider, GlyphInfo};

/// How much text shrinks when going to the next-smallest level.
/// [`GROW_FACTOR`] must be the inverse of [`SHRINK_FACTOR`].
pub const SHRINK_FACTOR: f64 = 0.7;
/// The inverse of [`SHRINK_FACTOR`].
pub const GROW_FACTOR: f64 = 1.0 / SHRINK_FACTOR;
/// The number of different sizes of chars to use, beyond which they will not
/// get any smaller.
pub const NUM_SIZE_LEVELS: i32 = 6;
/// Percentage of x-height of additional horizontal space after sub/superscripts.
pub const SCRIPT_SPACE: f64 = 0.2;
/// Percentage of x-height that sub/superscripts drop below the baseline.
pub const SUBDROP: f64 = 0.3;
/// Percentage of x-height that superscripts rise above the baseline.
pub const SUP1: f64 = 0.5;
/// Percentage of x-height that subscripts drop below the baseline.
pub const SUB1: f64 = 0.0;
/// Percentage by which superscripts are offset horizontally relative to the
/// subscript when the nucleus is slanted.
pub const DELTA: f64 = 0.18;

/// The typographic context a node is built in: the current font alias and
/// class, the point size and the output resolution. The parser keeps a stack
/// of these; every `Char` snapshots the one current at its creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub font: FontAlias,
    pub font_class: FontClass,
    pub fontsize: f64,
    pub dpi: f64,
}

impl State {
    pub fn new(font: FontAlias, font_class: FontClass, fontsize: f64, dpi: f64) -> State {
        State { font, font_class, fontsize, dpi }
    }

    /// Assigning `rm`, `it` or `bf` also sets the font class; other aliases
    /// leave the class unchanged.
    pub fn set_font(&mut self, font: FontAlias) {
        match font {
            FontAlias::Rm => self.font_class = FontClass::Rm,
            FontAlias::It => self.font_class = FontClass::It,
            FontAlias::Bf => self.font_class = FontClass::Bf,
            _ => {}
        }
        self.font = font;
    }
}

/// A node in the TeX box model.
#[derive(Debug, Clone)]
pub enum Node {
    /// A single glyph at a resolved font and size.
    Char(Char),
    /// An accent glyph. Accents are already offset from the baseline in
    /// TrueType fonts, so their box is the outline bounding box and their
    /// depth is zero.
    Accent(Char),
    /// Fixed spacing, horizontal in an `Hlist`, vertical in a `Vlist`.
    Kern(Kern),
    /// Elastic spacing.
    Glue(Glue),
    /// A solid filled rectangle; also doubles as the invisible spacer boxes
    /// (`Hbox`, `Vbox`) whose zero dimensions keep them from producing ink.
    Rule(Rule),
    /// A horizontal list of nodes.
    Hlist(Hlist),
    /// A vertical list of nodes.
    Vlist(Vlist),
}

/// A single character. Unlike TeX, the font information and metrics are
/// stored with each `Char` so the packer and shipper never consult the font
/// service. TeX boxes have a width, height and depth, unlike TrueType which
/// uses a full bounding box and an advance; the metrics are converted to the
/// TeX way, and the advance (when different from the width) becomes a `Kern`
/// when the `Char` is added to its parent `Hlist`.
#[derive(Debug, Clone)]
pub struct Char {
    /// the symbol as written: a single character or a TeX command
    pub symbol: String,
    pub font: FontAlias,
    pub font_class: FontClass,
    pub fontsize: f64,
    pub dpi: f64,
    pub size: i32,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// resolved glyph handle and metrics, refreshed on size changes
    pub info: GlyphInfo,
}

impl Char {
    pub fn new<F: FontProvider>(symbol: &str, state: &State, fonts: &F) -> FontResult<Char> {
        let info = fonts.get_info(state.font, state.font_class, symbol, state.fontsize, state.dpi)?;
        let metrics = info.metrics;
        let width = if symbol == " " { metrics.advance } else { metrics.width };
        Ok(Char {
            symbol: symbol.to_string(),
            font: state.font,
            font_class: state.font_class,
            fontsize: state.fontsize,
            dpi: state.dpi,
            size: 0,
            width,
            height: metrics.iceberg,
            depth: -(metrics.iceberg - metrics.height),
            info,
        })
    }

    /// An accent glyph: the box is the outline bounding box, depth is zero.
    pub fn accent<F: FontProvider>(symbol: &str, state: &State, fonts: &F) -> FontResult<Char> {
        let mut ch = Char::new(symbol, state, fonts)?;
        ch.update_accent_metrics();
        Ok(ch)
    }

    fn update_accent_metrics(&mut self) {
        let metrics = self.info.metrics;
        self.width = metrics.xmax - metrics.xmin;
        self.height = metrics.ymax - metrics.ymin;
        self.depth = 0.0;
    }

    pub fn is_slanted(&self) -> bool {
        self.info.metrics.slanted
    }

    /// The kerning to insert after this character: the difference between the
    /// advance and the used width (italic correction), plus the pair kern
    /// against the following character when there is one.
    pub fn get_kerning<F: FontProvider>(&self, next: Option<&Node>, fonts: &F) -> f64 {
        let advance = self.info.metrics.advance - self.width;
        let kern = match next {
            Some(Node::Char(c)) | Some(Node::Accent(c)) => fonts.get_kern(
                self.font,
                self.font_class,
                &self.symbol,
                self.fontsize,
                c.font,
                c.font_class,
                &c.symbol,
                c.fontsize,
                self.dpi,
            ),
            _ => 0.0,
        };
        advance + kern
    }

    fn refresh_info<F: FontProvider>(&mut self, fonts: &F) {
        if let Ok(info) =
            fonts.get_info(self.font, self.font_class, &self.symbol, self.fontsize, self.dpi)
        {
            self.info = info;
        }
    }

    fn shrink<F: FontProvider>(&mut self, fonts: &F) {
        self.size += 1;
        if self.size < NUM_SIZE_LEVELS {
            self.fontsize *= SHRINK_FACTOR;
            self.width *= SHRINK_FACTOR;
            self.height *= SHRINK_FACTOR;
            self.depth *= SHRINK_FACTOR;
            self.refresh_info(fonts);
        }
    }

    fn grow<F: FontProvider>(&mut self, fonts: &F) {
        self.size -= 1;
        self.fontsize *= GROW_FACTOR;
        self.width *= GROW_FACTOR;
        self.height *= GROW_FACTOR;
        self.depth *= GROW_FACTOR;
        self.refresh_info(fonts);
    }
}

/// Fixed spacing. The width is normally negative between letters like A and
/// V when the font designer said they look better closer together. In a
/// vertical list the width denotes vertical spacing.
#[derive(Debug, Clone)]
pub struct Kern {
    pub width: f64,
    pub size: i32,
}

impl Kern {
    pub fn new(width: f64) -> Kern {
        Kern { width, size: 0 }
    }
}

/// Elastic spacing. Most of the information lives in the shared
/// [`GlueSpec`]; the named specs are interned and copied on write when size
/// scaling mutates them.
#[derive(Debug, Clone)]
pub struct Glue {
    pub spec: Rc<GlueSpec>,
    pub size: i32,
}

impl Glue {
    pub fn new(kind: GlueKind) -> Glue {
        Glue { spec: GlueSpec::named(kind), size: 0 }
    }

    /// First-order infinitely stretchable glue.
    pub fn fil() -> Glue {
        Glue::new(GlueKind::Fil)
    }

    /// Second-order infinitely stretchable glue.
    pub fn fill() -> Glue {
        Glue::new(GlueKind::Fill)
    }

    /// Stretch-shrink glue, used to center material in a box.
    pub fn ss() -> Glue {
        Glue::new(GlueKind::Ss)
    }

    fn shrink(&mut self) {
        self.size += 1;
        if self.size < NUM_SIZE_LEVELS && self.spec.width != 0.0 {
            Rc::make_mut(&mut self.spec).width *= SHRINK_FACTOR;
        }
    }

    fn grow(&mut self) {
        self.size -= 1;
        if self.spec.width != 0.0 {
            Rc::make_mut(&mut self.spec).width *= GROW_FACTOR;
        }
    }
}

/// The elastic description of a piece of [`Glue`]: a natural width plus
/// stretch and shrink components, each at an order of infinity (0 = finite,
/// 1-3 = progressively larger).
#[derive(Debug, Clone, PartialEq)]
pub struct GlueSpec {
    pub width: f64,
    pub stretch: f64,
    pub stretch_order: usize,
    pub shrink: f64,
    pub shrink_order: usize,
}

/// The named glue presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlueKind {
    Fil,
    Fill,
    Filll,
    NegFil,
    NegFill,
    NegFilll,
    Empty,
    Ss,
}

impl GlueSpec {
    pub fn new(width: f64, stretch: f64, stretch_order: usize, shrink: f64, shrink_order: usize) -> GlueSpec {
        GlueSpec { width, stretch, stretch_order, shrink, shrink_order }
    }

    fn preset(kind: GlueKind) -> GlueSpec {
        match kind {
            GlueKind::Fil => GlueSpec::new(0.0, 1.0, 1, 0.0, 0),
            GlueKind::Fill => GlueSpec::new(0.0, 1.0, 2, 0.0, 0),
            GlueKind::Filll => GlueSpec::new(0.0, 1.0, 3, 0.0, 0),
            GlueKind::NegFil => GlueSpec::new(0.0, 0.0, 0, 1.0, 1),
            GlueKind::NegFill => GlueSpec::new(0.0, 0.0, 0, 1.0, 2),
            GlueKind::NegFilll => GlueSpec::new(0.0, 0.0, 0, 1.0, 3),
            GlueKind::Empty => GlueSpec::new(0.0, 0.0, 0, 0.0, 0),
            GlueKind::Ss => GlueSpec::new(0.0, 1.0, 1, -1.0, 1),
        }
    }

    /// The interned spec for a named preset. Copies are made on size scaling
    /// (`Rc::make_mut`), so the pool entries stay pristine.
    pub fn named(kind: GlueKind) -> Rc<GlueSpec> {
        thread_local! {
            static POOL: RefCell<HashMap<GlueKind, Rc<GlueSpec>>> =
                RefCell::new(HashMap::new());
        }
        POOL.with(|pool| {
            pool.borrow_mut()
                .entry(kind)
                .or_insert_with(|| Rc::new(GlueSpec::preset(kind)))
                .clone()
        })
    }
}

/// A solid black rectangle with width, height and depth, as in an `Hlist`.
/// If any dimension is `f64::INFINITY` the actual value is determined by
/// running the rule up to the boundary of the innermost enclosing box, a
/// "running dimension". The width is never running in an `Hlist`, the height
/// and depth are never running in a `Vlist`. With all-zero or partially zero
/// dimensions this type also serves as the invisible `Hbox`/`Vbox` spacers.
#[derive(Debug, Clone)]
pub struct Rule {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub size: i32,
}

impl Rule {
    pub fn new(width: f64, height: f64, depth: f64) -> Rule {
        Rule { width, height, depth, size: 0 }
    }

    /// A full-width horizontal rule of the given total thickness, split
    /// evenly above and below the baseline.
    pub fn hrule(thickness: f64) -> Rule {
        Rule::new(f64::INFINITY, thickness * 0.5, thickness * 0.5)
    }

    /// A box with only height and depth (zero width).
    pub fn vbox(height: f64, depth: f64) -> Rule {
        Rule::new(0.0, height, depth)
    }

    /// A box with only width (zero height and depth).
    pub fn hbox(width: f64) -> Rule {
        Rule::new(width, 0.0, 0.0)
    }

    fn shrink(&mut self) {
        self.size += 1;
        if self.size < NUM_SIZE_LEVELS {
            self.width *= SHRINK_FACTOR;
            self.height *= SHRINK_FACTOR;
            self.depth *= SHRINK_FACTOR;
        }
    }

    fn grow(&mut self) {
        self.size -= 1;
        self.width *= GROW_FACTOR;
        self.height *= GROW_FACTOR;
        self.depth *= GROW_FACTOR;
    }
}

/// A horizontal list of nodes. Dimensions and the glue setting are computed
/// by [`hpack`](Hlist::hpack) at construction.
#[derive(Debug, Clone)]
pub struct Hlist {
    pub children: Vec<Node>,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// vertical offset inside an `Hlist`, horizontal inside a `Vlist`
    pub shift_amount: f64,
    /// the glue setting of this list
    pub glue_set: f64,
    /// 0: normal, -1: shrinking, 1: stretching
    pub glue_sign: i8,
    /// the order of infinity (0-3) for the glue
    pub glue_order: usize,
    pub size: i32,
    /// set on the lists built for `\sin`-style function names, so the script
    /// placement can recognise the over/under functions (`lim`, `max`, ...)
    pub function_name: Option<String>,
}

/// A vertical list of nodes. Dimensions and the glue setting are computed by
/// [`vpack`](Vlist::vpack) at construction.
#[derive(Debug, Clone)]
pub struct Vlist {
    pub children: Vec<Node>,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub shift_amount: f64,
    pub glue_set: f64,
    pub glue_sign: i8,
    pub glue_order: usize,
    pub size: i32,
}

impl Node {
    pub fn width(&self) -> f64 {
        match *self {
            Node::Char(ref c) | Node::Accent(ref c) => c.width,
            Node::Kern(ref k) => k.width,
            Node::Glue(ref g) => g.spec.width,
            Node::Rule(ref r) => r.width,
            Node::Hlist(ref h) => h.width,
            Node::Vlist(ref v) => v.width,
        }
    }

    pub fn height(&self) -> f64 {
        match *self {
            Node::Char(ref c) | Node::Accent(ref c) => c.height,
            Node::Kern(_) | Node::Glue(_) => 0.0,
            Node::Rule(ref r) => r.height,
            Node::Hlist(ref h) => h.height,
            Node::Vlist(ref v) => v.height,
        }
    }

    pub fn depth(&self) -> f64 {
        match *self {
            Node::Char(ref c) | Node::Accent(ref c) => c.depth,
            Node::Kern(_) | Node::Glue(_) => 0.0,
            Node::Rule(ref r) => r.depth,
            Node::Hlist(ref h) => h.depth,
            Node::Vlist(ref v) => v.depth,
        }
    }

    pub fn shift_amount(&self) -> f64 {
        match *self {
            Node::Hlist(ref h) => h.shift_amount,
            Node::Vlist(ref v) => v.shift_amount,
            _ => 0.0,
        }
    }

    pub fn set_shift_amount(&mut self, shift: f64) {
        match *self {
            Node::Hlist(ref mut h) => h.shift_amount = shift,
            Node::Vlist(ref mut v) => v.shift_amount = shift,
            _ => {}
        }
    }

    /// Shrinks one level smaller. Beyond [`NUM_SIZE_LEVELS`] levels, things
    /// no longer get smaller.
    pub fn shrink<F: FontProvider>(&mut self, fonts: &F) {
        match *self {
            Node::Char(ref mut c) => c.shrink(fonts),
            Node::Accent(ref mut c) => {
                c.shrink(fonts);
                c.update_accent_metrics();
            }
            Node::Kern(ref mut k) => {
                k.size += 1;
                if k.size < NUM_SIZE_LEVELS {
                    k.width *= SHRINK_FACTOR;
                }
            }
            Node::Glue(ref mut g) => g.shrink(),
            Node::Rule(ref mut r) => r.shrink(),
            Node::Hlist(ref mut h) => {
                for child in &mut h.children {
                    child.shrink(fonts);
                }
                h.size += 1;
                if h.size < NUM_SIZE_LEVELS {
                    h.width *= SHRINK_FACTOR;
                    h.height *= SHRINK_FACTOR;
                    h.depth *= SHRINK_FACTOR;
                    h.shift_amount *= SHRINK_FACTOR;
                    h.glue_set *= SHRINK_FACTOR;
                }
            }
            Node::Vlist(ref mut v) => {
                for child in &mut v.children {
                    child.shrink(fonts);
                }
                v.size += 1;
                if v.size < NUM_SIZE_LEVELS {
                    v.width *= SHRINK_FACTOR;
                    v.height *= SHRINK_FACTOR;
                    v.depth *= SHRINK_FACTOR;
                    v.shift_amount *= SHRINK_FACTOR;
                    v.glue_set *= SHRINK_FACTOR;
                }
            }
        }
    }

    /// Grows one level larger. There is no limit to how big something can
    /// get.
    pub fn grow<F: FontProvider>(&mut self, fonts: &F) {
        match *self {
            Node::Char(ref mut c) => c.grow(fonts),
            Node::Accent(ref mut c) => {
                c.grow(fonts);
                c.update_accent_metrics();
            }
            Node::Kern(ref mut k) => {
                k.size -= 1;
                k.width *= GROW_FACTOR;
            }
            Node::Glue(ref mut g) => g.grow(),
            Node::Rule(ref mut r) => r.grow(),
            Node::Hlist(ref mut h) => {
                for child in &mut h.children {
                    child.grow(fonts);
                }
                h.size -= 1;
                h.width *= GROW_FACTOR;
                h.height *= GROW_FACTOR;
                h.depth *= GROW_FACTOR;
                h.shift_amount *= GROW_FACTOR;
                h.glue_set *= GROW_FACTOR;
            }
            Node::Vlist(ref mut v) => {
                for child in &mut v.children {
                    child.grow(fonts);
                }
                v.size -= 1;
                v.width *= GROW_FACTOR;
                v.height *= GROW_FACTOR;
                v.depth *= GROW_FACTOR;
                v.shift_amount *= GROW_FACTOR;
                v.glue_set *= GROW_FACTOR;
            }
        }
    }

    /// The kerning to insert between this node and the next one. Only
    /// characters kern; everything else contributes nothing.
    pub(crate) fn get_kerning<F: FontProvider>(&self, next: Option<&Node>, fonts: &F) -> f64 {
        match *self {
            Node::Char(ref c) | Node::Accent(ref c) => c.get_kerning(next, fonts),
            _ => 0.0,
        }
    }
}
