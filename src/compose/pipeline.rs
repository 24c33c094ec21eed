//! Rasterize → layout → composite
//!
//! Page mapping is fixed: first document pages 1 and 2 go to quadrants A
//! and B, second document pages 1 and 2 go to C and D.

use std::sync::Arc;
use std::time::Instant;

use crate::document::{DocumentError, SourceDocument};
use crate::layout::{QuadrantId, ValidatedLayout};
use crate::render::{check_dpi, PageImage, PageRasterizer, RenderPool, PAGES_PER_DOCUMENT};

use super::compositor::{Composite, PdfCompositor, Placement};
use super::error::{ComposeError, ComposeResult};

/// Composition pipeline shared by all sessions
#[derive(Clone)]
pub struct ComposePipeline {
    layout: Arc<ValidatedLayout>,
    rasterizer: Arc<dyn PageRasterizer>,
    compositor: PdfCompositor,
    pool: RenderPool,
    dpi: u32,
}

impl ComposePipeline {
    pub fn new(
        layout: ValidatedLayout,
        rasterizer: Arc<dyn PageRasterizer>,
        pool: RenderPool,
        dpi: u32,
    ) -> Result<Self, DocumentError> {
        check_dpi(dpi)?;
        Ok(Self {
            layout: Arc::new(layout),
            rasterizer,
            compositor: PdfCompositor::new(),
            pool,
            dpi,
        })
    }

    pub fn layout(&self) -> &ValidatedLayout {
        &self.layout
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn pool(&self) -> &RenderPool {
        &self.pool
    }

    /// Render the leading pages of one document on the pool
    pub async fn rasterize(&self, document: &SourceDocument) -> ComposeResult<Vec<PageImage>> {
        let rasterizer = Arc::clone(&self.rasterizer);
        let source = document.clone();
        let dpi = self.dpi;

        let images = self
            .pool
            .run(move || rasterizer.render(&source, PAGES_PER_DOCUMENT, dpi))
            .await??;

        if images.len() != PAGES_PER_DOCUMENT {
            return Err(ComposeError::Document(DocumentError::RenderError(format!(
                "expected {} pages, rasterizer produced {}",
                PAGES_PER_DOCUMENT,
                images.len()
            ))));
        }
        Ok(images)
    }

    /// Compose the first two pages of both documents onto one sheet
    pub async fn run(
        &self,
        first: &SourceDocument,
        second: &SourceDocument,
    ) -> ComposeResult<Composite> {
        let started = Instant::now();

        let (first_pages, second_pages) =
            futures::try_join!(self.rasterize(first), self.rasterize(second))?;

        let pages: Vec<PageImage> = first_pages.into_iter().chain(second_pages).collect();
        let layout = Arc::clone(&self.layout);
        let compositor = self.compositor.clone();

        let composite = self
            .pool
            .run(move || {
                let placements: Vec<Placement<'_>> = QuadrantId::ALL
                    .iter()
                    .zip(pages.iter())
                    .map(|(id, image)| Placement {
                        image,
                        target: layout.rect(*id),
                    })
                    .collect();
                compositor.compose(layout.canvas(), &placements)
            })
            .await??;

        tracing::info!(
            first = %first.id(),
            second = %second.id(),
            bytes = composite.bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Composed quadrant sheet"
        );

        Ok(composite)
    }
}

impl std::fmt::Debug for ComposePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposePipeline")
            .field("dpi", &self.dpi)
            .field("pool", &self.pool.stats())
            .finish_non_exhaustive()
    }
}
