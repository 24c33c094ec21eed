//! Quadrant layout
//!
//! Converts the fixed millimetre design of the output sheet into PDF point
//! space and verifies, once at startup, that the configured quadrants fit the
//! canvas without overlapping.
//!
//! ```text
//!  top-left origin (mm)            bottom-left origin (pt)
//!  ┌───────────┬───────────┐       ┌───────────┬───────────┐
//!  │  A (3,10) │ B (105,10)│       │     A     │     B     │
//!  ├───────────┼───────────┤  ──►  ├───────────┼───────────┤
//!  │ C (3,149) │D (105,149)│       │     C     │     D     │
//!  └───────────┴───────────┘       └───────────┴───────────┘
//! ```

mod error;
pub mod geometry;
mod quadrant;
mod validate;

pub use error::{LayoutError, LayoutResult};
pub use geometry::{mm_to_pt, pt_to_mm, Rect, Size, GEOMETRY_EPSILON_PT};
pub use quadrant::{
    AnchorMode, QuadrantId, QuadrantLayout, QuadrantPosition, A4_POSITIONS, QUADRANT_HEIGHT_MM,
    QUADRANT_WIDTH_MM,
};
pub use validate::{validate, ValidatedLayout};
