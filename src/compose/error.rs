//! Composition error types

use thiserror::Error;

use crate::document::DocumentError;
use crate::layout::LayoutError;
use crate::render::PoolError;

/// Failure of the rasterize → layout → composite pipeline.
///
/// Any variant leaves the caller's session untouched.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A single placement could not be drawn; the whole composite fails
    #[error("Placement {index} failed: {reason}")]
    Placement { index: usize, reason: String },

    #[error("Nothing to compose")]
    Empty,

    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),

    #[error("Failed to write PDF: {0}")]
    Write(String),

    #[error("Rasterization failed: {0}")]
    Document(#[from] DocumentError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Worker pool error: {0}")]
    Pool(#[from] PoolError),
}

pub type ComposeResult<T> = std::result::Result<T, ComposeError>;
