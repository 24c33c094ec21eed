//! Source documents
//!
//! Inbound bytes are validated once by a [`DocumentSource`] and then staged
//! as [`SourceDocument`]s until they are rasterized or discarded.

mod error;
mod source;

pub use error::{DocumentError, DocumentResult};
pub use source::{DocumentSource, MuPdfSource, SourceDocument};
