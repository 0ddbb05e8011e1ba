/*! # A TeX-style mathematical formula typesetter.

This library takes a string containing LaTeX-like math (e.g. `$\frac{\pi}{4}$`)
and produces a geometric layout: a flat list of positioned glyphs and filled
rectangles, ready for a rasterizer or vector backend to paint. It implements
the classical TeX box-and-glue model (`hpack`, `vpack` and `ship` from
Appendix H / Volume B) over a grammar modelled on TeX's math mode.

Text outside `$..$` pairs is set verbatim in the ambient font; math inside
them gets the full treatment: kerning, sub/superscript placement, fractions,
radicals, auto-sized delimiters and accents.

## Basic usage

Two collaborators must be supplied: a font set implementing
[`FontProvider`](crate::font::FontProvider) (glyph metrics, kern pairs, sized
alternatives) and, to paint, a [`Backend`](crate::render::Backend) sink. The
reference font sets ([`BakomaFonts`](crate::font::BakomaFonts),
[`StixFonts`](crate::font::StixFonts), ...) are generic over
[`Face`](crate::font::Face), one loaded font file; enable the
`ttfparser-fontparser` feature for a ready-made `Face` over the `ttf-parser`
crate.

```no_run
use std::rc::Rc;
use mathtex::font::{BakomaFonts, Face, FaceSet, FontClass, GlyphId, RawMetrics};
use mathtex::render::Scene;

struct MyFace;
impl Face for MyFace {
    fn postscript_name(&self) -> &str { "cmr10" }
    fn glyph_index(&self, codepoint: u32) -> Option<GlyphId> {
        Some(GlyphId(codepoint as u16))
    }
    fn glyph_metrics(&self, _glyph: GlyphId, _fontsize: f64, _dpi: f64) -> Option<RawMetrics> {
        // Real metrics come from a font parser; see the
        // `ttfparser-fontparser` feature.
        unimplemented!()
    }
}

let mut faces = FaceSet::new();
faces.insert("cmr10", MyFace);
let fonts = BakomaFonts::new(Rc::new(faces), FontClass::It);

let formula = mathtex::Formula::new(r"$x^2 + \sqrt{y}$", &fonts, 12.0, 100.0)?;
println!("{} x {} pt", formula.width(), formula.height() + formula.depth());

let mut scene = Scene::new();
formula.render_to(&mut scene);
# Ok::<(), mathtex::Error>(())
```

## Pipeline

A call to [`Formula::new`] is a wrapper around two steps that can be driven
separately for more control:

  1. [`parser::parse`] turns the expression into a packed box tree
     ([`layout::Hlist`]); this is where fonts, sizes and script levels are
     resolved.
  2. [`layout::ship::ship`] flattens the tree into absolute-positioned glyph
     records and rectangles, plus a bounding box. The formula runs it twice:
     once to measure, once recentred so the leftmost ink sits at x = 0.

All coordinates are in points (1 pt = 1/72 inch); at the backend boundary Y
grows downward and every glyph `y` is its baseline.
*/

#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate log;

#[macro_use]
mod macros;

#[deny(missing_docs)]
pub mod error;
#[deny(missing_docs)]
pub mod geometry;
pub mod layout;
#[warn(missing_docs)]
pub mod parser;
pub mod render;
pub mod util;

pub mod font;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

pub use crate::error::Error;
pub use crate::geometry::{BBox, Rect};
pub use crate::layout::ship::ShippedGlyph;
pub use crate::render::{Backend, OutputFormat, Scene};

use crate::font::FontProvider;
use crate::layout::ship::ship;
use crate::layout::Hlist;
use crate::util::BoundedCache;

/// A parsed, laid-out and shipped formula: its dimensions and its flat draw
/// list. The packed box tree is kept so it can be re-shipped or inspected.
#[derive(Debug, Clone)]
pub struct Formula {
    boxmodel: Hlist,
    rects: Vec<Rect>,
    glyphs: Vec<ShippedGlyph>,
    bbox: BBox,
    width: f64,
    height: f64,
    depth: f64,
    fontsize: f64,
    dpi: f64,
}

impl Formula {
    /// Typesets `expression` with the given font set at `fontsize` points
    /// and `dpi` dots per inch.
    pub fn new<F: FontProvider>(
        expression: &str,
        fonts: &F,
        fontsize: f64,
        dpi: f64,
    ) -> Result<Formula, Error> {
        let boxmodel = parser::parse(expression, fonts, fontsize, dpi)?;
        Ok(Formula::from_boxmodel(boxmodel, fontsize, dpi))
    }

    /// Like [`Formula::new`], consulting and filling a [`FormulaCache`]
    /// keyed by the expression and typesetting parameters. Shipping always
    /// re-runs; only the parse is reused.
    pub fn with_cache<F: FontProvider>(
        expression: &str,
        fonts: &F,
        fontsize: f64,
        dpi: f64,
        cache: &mut FormulaCache,
    ) -> Result<Formula, Error> {
        let key = FormulaCache::key(expression, fonts, fontsize, dpi);
        if let Some(boxmodel) = cache.entries.get(key) {
            return Ok(Formula::from_boxmodel(boxmodel.clone(), fontsize, dpi));
        }
        let boxmodel = parser::parse(expression, fonts, fontsize, dpi)?;
        cache.entries.insert(key, boxmodel.clone());
        Ok(Formula::from_boxmodel(boxmodel, fontsize, dpi))
    }

    /// Ships the tree twice: the first pass measures, the second recentres
    /// so the leftmost ink is at x = 0.
    fn from_boxmodel(boxmodel: Hlist, fontsize: f64, dpi: f64) -> Formula {
        let (_, _, bbox) = ship(0.0, 0.0, &boxmodel);
        let (rects, glyphs, bbox) = ship(-bbox.x_min, 0.0, &boxmodel);
        Formula {
            width: bbox.x_max - bbox.x_min,
            height: boxmodel.height,
            depth: boxmodel.depth,
            rects,
            glyphs,
            bbox,
            boxmodel,
            fontsize,
            dpi,
        }
    }

    /// Width of the ink, in points.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Extent above the baseline, in points.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Extent below the baseline, in points.
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// The point size the formula was typeset at.
    pub fn fontsize(&self) -> f64 {
        self.fontsize
    }

    /// The resolution the formula was typeset at.
    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// The flat draw list: rectangles, glyphs, and the bounding box of all
    /// ink.
    pub fn draw_list(&self) -> (&[Rect], &[ShippedGlyph], BBox) {
        (&self.rects, &self.glyphs, self.bbox)
    }

    /// The packed box tree the draw list was shipped from.
    pub fn boxmodel(&self) -> &Hlist {
        &self.boxmodel
    }

    /// Pushes the canvas size and the draw list to a backend.
    pub fn render_to<B: Backend + ?Sized>(&self, backend: &mut B) {
        backend.set_canvas_size(self.width, self.height, self.depth, self.dpi);
        backend.render(&self.glyphs, &self.rects);
    }

    /// Renders through `backend` and saves to `path`. Fails with
    /// [`BackendError::Unavailable`](crate::error::BackendError::Unavailable)
    /// when the backend does not support `format`.
    pub fn save<B: Backend + ?Sized>(
        &self,
        backend: &mut B,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), Error> {
        self.render_to(backend);
        backend.save(path, format)?;
        Ok(())
    }
}

/// A bounded cache of parsed box trees, keyed by (expression, font set,
/// size, dpi, default style). Eviction is insertion-order on overflow.
/// Concurrent access requires external synchronisation.
#[derive(Debug, Clone)]
pub struct FormulaCache {
    entries: BoundedCache<Hlist>,
}

impl FormulaCache {
    /// The default capacity of 50 formulas.
    pub fn new() -> FormulaCache {
        FormulaCache::with_capacity(50)
    }

    pub fn with_capacity(capacity: usize) -> FormulaCache {
        FormulaCache { entries: BoundedCache::new(capacity) }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key<F: FontProvider>(expression: &str, fonts: &F, fontsize: f64, dpi: f64) -> u64 {
        let mut hasher = DefaultHasher::new();
        expression.hash(&mut hasher);
        fonts.fontset_id().hash(&mut hasher);
        fontsize.to_bits().hash(&mut hasher);
        dpi.to_bits().hash(&mut hasher);
        fonts.default_style().hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for FormulaCache {
    fn default() -> FormulaCache {
        FormulaCache::new()
    }
}

/// Typesets a formula at 12 pt / 100 dpi and renders it to the given
/// backend.
pub fn render<F: FontProvider, B: Backend + ?Sized>(
    expression: &str,
    fonts: &F,
    backend: &mut B,
) -> Result<(), Error> {
    const DEFAULT_FONT_SIZE: f64 = 12.0;
    const DEFAULT_DPI: f64 = 100.0;

    let formula = Formula::new(expression, fonts, DEFAULT_FONT_SIZE, DEFAULT_DPI)?;
    formula.render_to(backend);
    Ok(())
}
