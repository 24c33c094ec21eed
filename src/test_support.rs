//! Fakes shared by unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{DynamicImage, ImageBuffer, Rgb};
use parking_lot::{Condvar, Mutex};

use crate::artifact::{CompositeResult, MemoryArtifactStore};
use crate::compose::ComposePipeline;
use crate::delivery::{Delivery, DeliveryError};
use crate::document::{DocumentError, DocumentResult, DocumentSource, SourceDocument};
use crate::layout::{validate, QuadrantLayout};
use crate::render::{PageImage, PageRasterizer, RenderPool};
use crate::session::{InMemorySessionStore, SessionManager};

/// Bytes the fake source accepts as a document of `pages` pages
pub fn fake_pdf(pages: usize) -> Vec<u8> {
    format!("pdf:{}", pages).into_bytes()
}

/// Reads the page count from `pdf:N`; anything else is invalid
#[derive(Debug, Default)]
pub struct FakeSource;

impl DocumentSource for FakeSource {
    fn open(&self, bytes: Vec<u8>) -> DocumentResult<SourceDocument> {
        let pages = std::str::from_utf8(&bytes)
            .ok()
            .and_then(|s| s.strip_prefix("pdf:"))
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| DocumentError::InvalidDocument("not a PDF".to_string()))?;
        Ok(SourceDocument::new(bytes, pages))
    }
}

/// Renders every page as a small solid image
#[derive(Debug, Default)]
pub struct SolidRasterizer {
    calls: AtomicUsize,
}

impl SolidRasterizer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PageRasterizer for SolidRasterizer {
    fn render(
        &self,
        document: &SourceDocument,
        first_n: usize,
        dpi: u32,
    ) -> DocumentResult<Vec<PageImage>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        document.ensure_pages(first_n)?;
        Ok((0..first_n)
            .map(|i| {
                let shade = (i * 60) as u8;
                PageImage::new(
                    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(20, 28, Rgb([shade, 0, 0]))),
                    dpi,
                )
            })
            .collect())
    }
}

/// Fails a fixed number of renders, then behaves like [`SolidRasterizer`]
#[derive(Debug)]
pub struct FailingRasterizer {
    failures_left: AtomicUsize,
    inner: SolidRasterizer,
}

impl FailingRasterizer {
    pub fn always() -> Self {
        Self::times(usize::MAX)
    }

    pub fn times(failures: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(failures),
            inner: SolidRasterizer::default(),
        }
    }
}

impl PageRasterizer for FailingRasterizer {
    fn render(
        &self,
        document: &SourceDocument,
        first_n: usize,
        dpi: u32,
    ) -> DocumentResult<Vec<PageImage>> {
        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DocumentError::RenderError("simulated failure".to_string()));
        }
        self.inner.render(document, first_n, dpi)
    }
}

/// Blocks every render until [`GatedRasterizer::open`] is called, then
/// behaves like [`SolidRasterizer`]. Waits give up after ten seconds so a
/// failed test cannot hang the runtime.
#[derive(Debug, Default)]
pub struct GatedRasterizer {
    open: Mutex<bool>,
    released: Condvar,
    inner: SolidRasterizer,
}

impl GatedRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self) {
        *self.open.lock() = true;
        self.released.notify_all();
    }
}

impl PageRasterizer for GatedRasterizer {
    fn render(
        &self,
        document: &SourceDocument,
        first_n: usize,
        dpi: u32,
    ) -> DocumentResult<Vec<PageImage>> {
        {
            let mut open = self.open.lock();
            while !*open {
                if self
                    .released
                    .wait_for(&mut open, Duration::from_secs(10))
                    .timed_out()
                {
                    break;
                }
            }
        }
        self.inner.render(document, first_n, dpi)
    }
}

/// Records deliveries instead of sending them
#[derive(Debug, Default)]
pub struct RecordingDelivery {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingDelivery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// `(recipient, artifact id)` pairs in send order
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait::async_trait]
impl Delivery for RecordingDelivery {
    async fn send(&self, result: &CompositeResult, recipient: &str) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Failed {
                recipient: recipient.to_string(),
                reason: "transport unavailable".to_string(),
            });
        }
        self.sent
            .lock()
            .push((recipient.to_string(), result.id.clone()));
        Ok(())
    }
}

pub fn pipeline(rasterizer: Arc<dyn PageRasterizer>) -> ComposePipeline {
    let layout = validate(&QuadrantLayout::a4()).expect("contract layout is valid");
    ComposePipeline::new(layout, rasterizer, RenderPool::new(2), 72).expect("72 dpi is valid")
}

/// Manager wired to fakes
pub struct Harness {
    pub manager: SessionManager,
    pub store: Arc<InMemorySessionStore>,
    pub artifacts: MemoryArtifactStore,
    pub delivery: Arc<RecordingDelivery>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_rasterizer(Arc::new(SolidRasterizer::default()))
    }

    pub fn with_rasterizer(rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self::build(rasterizer, Arc::new(RecordingDelivery::new()))
    }

    pub fn build(rasterizer: Arc<dyn PageRasterizer>, delivery: Arc<RecordingDelivery>) -> Self {
        let artifacts = MemoryArtifactStore::new();
        let store = Arc::new(InMemorySessionStore::new());
        let manager = SessionManager::with_store(
            store.clone(),
            pipeline(rasterizer),
            Arc::new(FakeSource),
            Arc::new(artifacts.clone()),
            delivery.clone(),
        );
        Self {
            manager,
            store,
            artifacts,
            delivery,
        }
    }
}
