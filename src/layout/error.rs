//! Layout configuration errors

use thiserror::Error;

use super::geometry::Rect;
use super::quadrant::QuadrantId;

/// Configuration errors raised while building or validating a quadrant layout
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Unknown quadrant: {0}")]
    UnknownQuadrant(String),

    #[error("Quadrant {0} is not configured")]
    MissingQuadrant(QuadrantId),

    #[error("Quadrant {0} is configured more than once")]
    DuplicateQuadrant(QuadrantId),

    #[error("Unknown anchor mode: {0}")]
    UnknownAnchor(String),

    #[error("Invalid zoom factor: {0}")]
    InvalidZoom(f64),

    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("Quadrant {quadrant} lies outside the canvas: {rect:?}")]
    OutOfBounds { quadrant: QuadrantId, rect: Rect },

    #[error("Quadrants {first} and {second} overlap")]
    Overlap { first: QuadrantId, second: QuadrantId },
}

pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
