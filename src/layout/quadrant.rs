//! Quadrant layout engine
//!
//! Quadrant positions are design coordinates in millimetres measured from
//! the top-left corner of the sheet. The engine turns them into point-space
//! rectangles in the canvas's bottom-up coordinate system.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{LayoutError, LayoutResult};
use super::geometry::{mm_to_pt, Rect, Size, A4_HEIGHT_MM, A4_WIDTH_MM};

/// Nominal quadrant width in millimetres
pub const QUADRANT_WIDTH_MM: f64 = 99.1;

/// Nominal quadrant height in millimetres
pub const QUADRANT_HEIGHT_MM: f64 = 139.0;

/// One of the four output regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuadrantId {
    A,
    B,
    C,
    D,
}

impl QuadrantId {
    /// All quadrants in placement order
    pub const ALL: [QuadrantId; 4] = [QuadrantId::A, QuadrantId::B, QuadrantId::C, QuadrantId::D];

    pub fn index(self) -> usize {
        match self {
            QuadrantId::A => 0,
            QuadrantId::B => 1,
            QuadrantId::C => 2,
            QuadrantId::D => 3,
        }
    }
}

impl fmt::Display for QuadrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuadrantId::A => "A",
            QuadrantId::B => "B",
            QuadrantId::C => "C",
            QuadrantId::D => "D",
        };
        f.write_str(name)
    }
}

impl FromStr for QuadrantId {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(QuadrantId::A),
            "B" => Ok(QuadrantId::B),
            "C" => Ok(QuadrantId::C),
            "D" => Ok(QuadrantId::D),
            _ => Err(LayoutError::UnknownQuadrant(s.to_string())),
        }
    }
}

/// Which point of the nominal rectangle stays fixed when zooming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    /// The configured position is the rectangle's top-left corner
    #[default]
    TopLeft,
    /// Zoom about the geometric centre of the nominal rectangle
    Center,
}

impl FromStr for AnchorMode {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "top_left" | "topleft" => Ok(AnchorMode::TopLeft),
            "center" | "centre" => Ok(AnchorMode::Center),
            _ => Err(LayoutError::UnknownAnchor(s.to_string())),
        }
    }
}

/// Design position of a quadrant (millimetres, top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadrantPosition {
    pub id: QuadrantId,
    pub x_mm: f64,
    pub y_mm: f64,
}

impl QuadrantPosition {
    pub const fn new(id: QuadrantId, x_mm: f64, y_mm: f64) -> Self {
        Self { id, x_mm, y_mm }
    }
}

/// Fixed A4 quadrant positions
pub const A4_POSITIONS: [QuadrantPosition; 4] = [
    QuadrantPosition::new(QuadrantId::A, 3.0, 10.0),
    QuadrantPosition::new(QuadrantId::B, 105.0, 10.0),
    QuadrantPosition::new(QuadrantId::C, 3.0, 149.0),
    QuadrantPosition::new(QuadrantId::D, 105.0, 149.0),
];

/// Quadrant geometry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadrantLayout {
    /// Canvas width in millimetres
    pub canvas_width_mm: f64,
    /// Canvas height in millimetres
    pub canvas_height_mm: f64,
    /// Nominal quadrant width in millimetres
    pub quadrant_width_mm: f64,
    /// Nominal quadrant height in millimetres
    pub quadrant_height_mm: f64,
    /// Configured quadrant positions
    pub positions: Vec<QuadrantPosition>,
    /// Zoom applied when no explicit zoom is requested
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Anchor applied when no explicit anchor is requested
    #[serde(default)]
    pub anchor: AnchorMode,
}

fn default_zoom() -> f64 {
    1.0
}

impl Default for QuadrantLayout {
    fn default() -> Self {
        Self::a4()
    }
}

impl QuadrantLayout {
    /// The fixed A4 quadrant sheet
    pub fn a4() -> Self {
        Self {
            canvas_width_mm: A4_WIDTH_MM,
            canvas_height_mm: A4_HEIGHT_MM,
            quadrant_width_mm: QUADRANT_WIDTH_MM,
            quadrant_height_mm: QUADRANT_HEIGHT_MM,
            positions: A4_POSITIONS.to_vec(),
            zoom: 1.0,
            anchor: AnchorMode::TopLeft,
        }
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_anchor(mut self, anchor: AnchorMode) -> Self {
        self.anchor = anchor;
        self
    }

    /// Canvas size in points
    pub fn canvas(&self) -> Size {
        Size::from_mm(self.canvas_width_mm, self.canvas_height_mm)
    }

    /// Look up the configured position of a quadrant
    pub fn position(&self, id: QuadrantId) -> LayoutResult<&QuadrantPosition> {
        self.positions
            .iter()
            .find(|p| p.id == id)
            .ok_or(LayoutError::MissingQuadrant(id))
    }

    /// Rectangle for a quadrant named by string (e.g. from configuration)
    pub fn rect_for_name(&self, name: &str, zoom: f64, anchor: AnchorMode) -> LayoutResult<Rect> {
        let id: QuadrantId = name.parse()?;
        self.rect_for(id, zoom, anchor)
    }

    /// Rectangle using the layout's configured zoom and anchor
    pub fn rect(&self, id: QuadrantId) -> LayoutResult<Rect> {
        self.rect_for(id, self.zoom, self.anchor)
    }

    /// Compute the point-space rectangle of a quadrant.
    ///
    /// `zoom` scales the nominal size about the anchor point; the anchor
    /// itself never moves.
    pub fn rect_for(&self, id: QuadrantId, zoom: f64, anchor: AnchorMode) -> LayoutResult<Rect> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(LayoutError::InvalidZoom(zoom));
        }

        let canvas = self.canvas();
        if !canvas.is_valid() {
            return Err(LayoutError::InvalidDimension(format!(
                "canvas {}x{} mm",
                self.canvas_width_mm, self.canvas_height_mm
            )));
        }

        let nominal_w = mm_to_pt(self.quadrant_width_mm);
        let nominal_h = mm_to_pt(self.quadrant_height_mm);
        if !(nominal_w.is_finite() && nominal_h.is_finite() && nominal_w > 0.0 && nominal_h > 0.0) {
            return Err(LayoutError::InvalidDimension(format!(
                "quadrant {}x{} mm",
                self.quadrant_width_mm, self.quadrant_height_mm
            )));
        }

        let position = self.position(id)?;
        let target_w = nominal_w * zoom;
        let target_h = nominal_h * zoom;

        let rect = match anchor {
            AnchorMode::TopLeft => {
                let x = mm_to_pt(position.x_mm);
                let y = canvas.height - mm_to_pt(position.y_mm) - target_h;
                Rect::new(x, y, target_w, target_h)
            }
            AnchorMode::Center => {
                let cx_mm = position.x_mm + self.quadrant_width_mm / 2.0;
                let cy_mm = position.y_mm + self.quadrant_height_mm / 2.0;
                let cx = mm_to_pt(cx_mm);
                let cy = canvas.height - mm_to_pt(cy_mm);
                Rect::new(cx - target_w / 2.0, cy - target_h / 2.0, target_w, target_h)
            }
        };

        Ok(rect)
    }
}
