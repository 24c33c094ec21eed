//! Source documents and the seam that opens them
//!
//! A [`SourceDocument`] keeps the raw bytes of an inbound file together with
//! its page count. MuPDF documents are not thread-safe, so the bytes are the
//! long-lived representation and a fresh MuPDF document is opened for each
//! operation through [`SourceDocument::with_doc`].

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use super::error::{DocumentError, DocumentResult};

/// Magic prefix of a PDF file
const PDF_MAGIC: &[u8] = b"%PDF";

/// MIME type handed to MuPDF when opening bytes
const PDF_MIME: &str = "application/pdf";

/// Validated inbound document
#[derive(Clone)]
pub struct SourceDocument {
    id: Uuid,
    bytes: Arc<Vec<u8>>,
    page_count: usize,
    lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("id", &self.id)
            .field("size", &self.bytes.len())
            .field("page_count", &self.page_count)
            .finish()
    }
}

impl SourceDocument {
    /// Wrap bytes whose page count is already known
    pub fn new(bytes: Vec<u8>, page_count: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            bytes: Arc::new(bytes),
            page_count,
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Fail with `InsufficientPages` unless the document has `required` pages
    pub fn ensure_pages(&self, required: usize) -> DocumentResult<()> {
        if self.page_count < required {
            return Err(DocumentError::InsufficientPages {
                required,
                found: self.page_count,
            });
        }
        Ok(())
    }

    /// Execute a closure against a freshly opened MuPDF document.
    ///
    /// Access to one document is serialized; distinct documents proceed in
    /// parallel.
    pub fn with_doc<F, R>(&self, f: F) -> DocumentResult<R>
    where
        F: FnOnce(&mupdf::Document) -> DocumentResult<R>,
    {
        let _guard = self.lock.lock();
        let doc = mupdf::Document::from_bytes(&self.bytes, PDF_MIME)?;
        f(&doc)
    }
}

/// Opens inbound bytes as a document
pub trait DocumentSource: Send + Sync {
    /// Parse and validate `bytes`. Fails with `InvalidDocument` on
    /// unreadable input.
    fn open(&self, bytes: Vec<u8>) -> DocumentResult<SourceDocument>;
}

/// MuPDF-backed PDF source
#[derive(Debug, Clone, Copy, Default)]
pub struct MuPdfSource;

impl DocumentSource for MuPdfSource {
    fn open(&self, bytes: Vec<u8>) -> DocumentResult<SourceDocument> {
        if !looks_like_pdf(&bytes) {
            return Err(DocumentError::InvalidDocument(
                "missing %PDF header".to_string(),
            ));
        }

        let doc = mupdf::Document::from_bytes(&bytes, PDF_MIME)
            .map_err(|e| DocumentError::InvalidDocument(e.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|e| DocumentError::InvalidDocument(e.to_string()))?;
        let page_count = usize::try_from(page_count).unwrap_or(0);

        Ok(SourceDocument::new(bytes, page_count))
    }
}

/// Check for the PDF header, allowing leading whitespace or junk bytes
/// within the first kilobyte as readers do.
fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(1024)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}
