//! Quadrant composition
//!
//! - `compositor`: draws page images into rectangles of a single PDF page
//! - `pipeline`: rasterizes two documents and places their pages A–D

mod compositor;
mod error;
mod pipeline;

pub use compositor::{fit_within, Composite, PdfCompositor, Placement};
pub use error::{ComposeError, ComposeResult};
pub use pipeline::ComposePipeline;
