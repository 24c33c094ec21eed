//! Physical units and point-space rectangles
//!
//! All conversions between millimetres and PDF points live here. Rectangles
//! are expressed in PDF user space: points, origin at the bottom-left corner
//! of the canvas, Y increasing upward.

use serde::Serialize;

/// PDF user-space units per inch
pub const POINTS_PER_INCH: f64 = 72.0;

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// A4 sheet width in millimetres
pub const A4_WIDTH_MM: f64 = 210.0;

/// A4 sheet height in millimetres
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Tolerance for comparing point-space coordinates.
///
/// Rectangles that share an edge must not count as overlapping even when
/// the two sides were computed through different float paths.
pub const GEOMETRY_EPSILON_PT: f64 = 1e-6;

/// Convert millimetres to PDF points
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * (POINTS_PER_INCH / MM_PER_INCH)
}

/// Convert PDF points to millimetres
pub fn pt_to_mm(pt: f64) -> f64 {
    pt * (MM_PER_INCH / POINTS_PER_INCH)
}

/// Width/height pair in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Size of a sheet given in millimetres
    pub fn from_mm(width_mm: f64, height_mm: f64) -> Self {
        Self::new(mm_to_pt(width_mm), mm_to_pt(height_mm))
    }

    /// A4 portrait
    pub fn a4() -> Self {
        Self::from_mm(A4_WIDTH_MM, A4_HEIGHT_MM)
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Full-canvas rectangle anchored at the origin
    pub fn as_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Axis-aligned rectangle in point space (bottom-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Bottom edge
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when every coordinate is finite and both sides are positive
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Interior intersection test. Touching edges do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() - GEOMETRY_EPSILON_PT
            && other.x < self.right() - GEOMETRY_EPSILON_PT
            && self.y < other.top() - GEOMETRY_EPSILON_PT
            && other.y < self.top() - GEOMETRY_EPSILON_PT
    }

    /// Containment test with edge tolerance
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - GEOMETRY_EPSILON_PT
            && other.y >= self.y - GEOMETRY_EPSILON_PT
            && other.right() <= self.right() + GEOMETRY_EPSILON_PT
            && other.top() <= self.top() + GEOMETRY_EPSILON_PT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_pt_a4() {
        assert!((mm_to_pt(210.0) - 595.276).abs() < 1e-3);
        assert!((mm_to_pt(297.0) - 841.890).abs() < 1e-3);
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_pt_mm_inverse() {
        let mm = 99.1;
        assert!((pt_to_mm(mm_to_pt(mm)) - mm).abs() < 1e-9);
    }

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let above = Rect::new(0.0, 10.0 - 1e-9, 10.0, 10.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&above));
    }

    #[test]
    fn test_overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_contains() {
        let canvas = Size::a4().as_rect();
        assert!(canvas.contains(&Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert!(!canvas.contains(&Rect::new(500.0, 0.0, 100.0, 100.0)));
        assert!(!canvas.contains(&Rect::new(-1.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_rect_validity() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(0.0, 0.0, 0.0, 1.0).is_valid());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
    }
}
