//! Geometric primitives shared by the shipper and the backends.
//!
//! All coordinates are in points (1 pt = 1/72 inch). At the backend boundary
//! Y grows downward: `y1 < y2` means `y1` is above `y2` on the output surface.

/// An axis-aligned filled rectangle, as emitted by the shipper for fraction
/// bars, radical vincula and explicit rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// left edge
    pub x1: f64,
    /// top edge
    pub y1: f64,
    /// right edge
    pub x2: f64,
    /// bottom edge
    pub y2: f64,
}

impl Rect {
    /// A rectangle from its left/top and right/bottom edges.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Rect {
        Rect { x1, y1, x2, y2 }
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// A bounding box accumulated during shipping.
///
/// The box always contains the origin: the shipper seeds it with a degenerate
/// box at (0, 0) before any ink is recorded, so `x_min <= 0 <= x_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// minimal x-value
    pub x_min: f64,
    /// minimal y-value
    pub y_min: f64,
    /// maximal x-value
    pub x_max: f64,
    /// maximal y-value
    pub y_max: f64,
}

impl BBox {
    /// A degenerate box containing only the origin.
    pub fn at_origin() -> BBox {
        BBox { x_min: 0.0, y_min: 0.0, x_max: 0.0, y_max: 0.0 }
    }

    /// Grows the box to contain the rectangle spanned by two opposite
    /// corners. The corners may be given in any order.
    pub fn expand(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.x_min = self.x_min.min(x1.min(x2));
        self.y_min = self.y_min.min(y1.min(y2));
        self.x_max = self.x_max.max(x1.max(x2));
        self.y_max = self.y_max.max(y1.max(y2));
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// The unsigned distance between the top and the bottom of the box.
    pub fn total_height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_expand_accepts_unordered_corners() {
        let mut bbox = BBox::at_origin();
        bbox.expand(3.0, 7.0, 1.0, -2.0);
        assert_eq!(bbox, BBox { x_min: 0.0, y_min: -2.0, x_max: 3.0, y_max: 7.0 });

        bbox.expand(-4.0, 0.0, -4.0, 0.0);
        assert_eq!(bbox.x_min, -4.0);
        assert_eq!(bbox.width(), 7.0);
    }
}
