//! quadrant-press
//!
//! Combines the first two pages of two PDFs onto one A4 sheet, one page per
//! quadrant, behind a per-sender confirm step.
//!
//! # Modules
//!
//! - `layout`: millimetre design → point-space rectangles, validated once
//! - `document`: opening and validating inbound PDFs
//! - `render`: MuPDF rasterization on a bounded blocking pool
//! - `compose`: single-page PDF composition and the A–D pipeline
//! - `session`: per-sender state machine
//! - `artifact`: storage of finished composites
//! - `delivery`: hand-off of finished composites to the transport
//! - `routes`: HTTP surface

pub mod artifact;
pub mod compose;
pub mod config;
pub mod delivery;
pub mod document;
pub mod error;
pub mod layout;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
