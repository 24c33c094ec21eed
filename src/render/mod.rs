//! Page rasterization
//!
//! - `image`: RGB/RGBA page images and colour normalization
//! - `rasterizer`: MuPDF page rendering
//! - `pool`: bounded blocking worker pool for CPU-bound jobs

mod image;
mod pool;
mod rasterizer;

pub use self::image::{image_from_samples, normalize_color, pt_to_px, px_to_pt, PageImage};
pub use pool::{default_workers, PoolError, PoolStats, RenderPool};
pub use rasterizer::{
    check_dpi, MuPdfRasterizer, PageRasterizer, DEFAULT_DPI, MAX_DPI, MIN_DPI, PAGES_PER_DOCUMENT,
};
