//! Document error types

use thiserror::Error;

/// Errors raised while opening or rasterizing source documents
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Input bytes are not a readable document
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Document has fewer pages than the workflow consumes
    #[error("Document has {found} page(s), at least {required} required")]
    InsufficientPages { required: usize, found: usize },

    /// Rendering resolution outside the supported range
    #[error("Unsupported resolution: {0} dpi")]
    InvalidResolution(u32),

    /// Failed to render content
    #[error("Render error: {0}")]
    RenderError(String),

    /// MuPDF context error
    #[error("MuPDF context error: {0}")]
    ContextError(String),

    /// Image processing error
    #[error("Image error: {0}")]
    ImageError(String),

    /// Worker pool error
    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

impl DocumentError {
    /// True for errors caused by the submitted bytes rather than by the service
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            DocumentError::InvalidDocument(_) | DocumentError::InsufficientPages { .. }
        )
    }
}

/// Result type alias for document operations
pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

impl From<mupdf::Error> for DocumentError {
    fn from(err: mupdf::Error) -> Self {
        DocumentError::ContextError(err.to_string())
    }
}
