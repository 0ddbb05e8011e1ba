//! The output seam: a [`Backend`] receives the flat draw list and turns it
//! into pixels or vector output. The core never rasterizes; it only pushes
//! canvas dimensions, positioned glyphs and filled rectangles across this
//! trait.
//!
//! Coordinates handed to a backend follow the device convention: the origin
//! is the top-left of the canvas, Y grows downward, and every glyph `y` is
//! the baseline the glyph sits on.

pub mod scene;

pub use self::scene::Scene;

use std::path::Path;

use crate::error::BackendError;
use crate::geometry::Rect;
use crate::layout::ship::ShippedGlyph;

/// The output formats a backend may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Png,
    Pdf,
    Ps,
    Svg,
}

/// A sink for rendered formulas.
pub trait Backend {
    /// Announces the extent of the upcoming draw list: total width, height
    /// above the baseline, depth below it, and the resolution everything was
    /// computed at.
    fn set_canvas_size(&mut self, width: f64, height: f64, depth: f64, dpi: f64);

    /// Receives the draw list. Called once per formula, after
    /// [`set_canvas_size`](Backend::set_canvas_size).
    fn render(&mut self, glyphs: &[ShippedGlyph], rects: &[Rect]);

    /// The formats [`save`](Backend::save) accepts.
    fn formats(&self) -> &[OutputFormat] {
        &[]
    }

    /// Writes the rendered output to a file. The default implementation
    /// supports no format at all.
    fn save(&mut self, _path: &Path, format: OutputFormat) -> Result<(), BackendError> {
        Err(BackendError::Unavailable(format))
    }
}
