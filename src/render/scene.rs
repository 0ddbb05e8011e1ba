//! A recording backend: keeps the draw list instead of painting it. Useful
//! for tests, for diffing renders, and as the smallest possible example of
//! the [`Backend`](crate::render::Backend) contract.

use crate::geometry::Rect;
use crate::layout::ship::ShippedGlyph;
use crate::render::Backend;

/// Records everything pushed through the [`Backend`](crate::render::Backend)
/// interface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub dpi: f64,
    pub glyphs: Vec<ShippedGlyph>,
    pub rects: Vec<Rect>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }
}

impl Backend for Scene {
    fn set_canvas_size(&mut self, width: f64, height: f64, depth: f64, dpi: f64) {
        self.width = width;
        self.height = height;
        self.depth = depth;
        self.dpi = dpi;
    }

    fn render(&mut self, glyphs: &[ShippedGlyph], rects: &[Rect]) {
        self.glyphs = glyphs.to_vec();
        self.rects = rects.to_vec();
    }
}
