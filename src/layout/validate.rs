//! Startup geometry validation
//!
//! A layout is checked exactly once, when the service is configured. The
//! resulting [`ValidatedLayout`] carries the precomputed rectangles so that
//! requests never recompute geometry.

use serde::Serialize;

use super::error::{LayoutError, LayoutResult};
use super::geometry::{Rect, Size};
use super::quadrant::{QuadrantId, QuadrantLayout};

/// Quadrant rectangles proven to fit the canvas without overlapping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedLayout {
    canvas: Size,
    rects: [Rect; 4],
}

impl ValidatedLayout {
    /// Canvas size in points
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Rectangle for a quadrant
    pub fn rect(&self, id: QuadrantId) -> Rect {
        self.rects[id.index()]
    }

    /// All rectangles in placement order (A, B, C, D)
    pub fn rects(&self) -> impl Iterator<Item = (QuadrantId, Rect)> + '_ {
        QuadrantId::ALL.into_iter().map(|id| (id, self.rects[id.index()]))
    }
}

/// Validate a layout: every quadrant configured once, inside the canvas,
/// and no two quadrants overlapping.
pub fn validate(layout: &QuadrantLayout) -> LayoutResult<ValidatedLayout> {
    for id in QuadrantId::ALL {
        match layout.positions.iter().filter(|p| p.id == id).count() {
            0 => return Err(LayoutError::MissingQuadrant(id)),
            1 => {}
            _ => return Err(LayoutError::DuplicateQuadrant(id)),
        }
    }

    let canvas = layout.canvas();
    let bounds = canvas.as_rect();

    let mut rects = [Rect::new(0.0, 0.0, 0.0, 0.0); 4];
    for id in QuadrantId::ALL {
        let rect = layout.rect(id)?;
        if !rect.is_valid() || !bounds.contains(&rect) {
            return Err(LayoutError::OutOfBounds { quadrant: id, rect });
        }
        rects[id.index()] = rect;
    }

    for (i, first) in QuadrantId::ALL.iter().enumerate() {
        for second in &QuadrantId::ALL[i + 1..] {
            if rects[first.index()].intersects(&rects[second.index()]) {
                return Err(LayoutError::Overlap {
                    first: *first,
                    second: *second,
                });
            }
        }
    }

    tracing::debug!(
        canvas_width_pt = canvas.width,
        canvas_height_pt = canvas.height,
        zoom = layout.zoom,
        anchor = ?layout.anchor,
        "Quadrant layout validated"
    );

    Ok(ValidatedLayout { canvas, rects })
}
