//! Composite artifact storage
//!
//! Finished sheets are kept under an opaque id (UUID v4, simple hex form).
//! Reads never modify a stored artifact.

mod local;
mod memory;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

pub use local::LocalArtifactStore;
pub use memory::MemoryArtifactStore;

/// Artifact store errors
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Invalid artifact id: {0}")]
    InvalidId(String),

    #[error("Artifact storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished composite and its retrieval id
#[derive(Debug, Clone)]
pub struct CompositeResult {
    pub id: String,
    pub bytes: Arc<Vec<u8>>,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
}

impl CompositeResult {
    /// Wrap freshly composed bytes under a new id
    pub fn new(bytes: Vec<u8>) -> Self {
        let sha256 = compute_hash(&bytes);
        Self {
            id: new_artifact_id(),
            bytes: Arc::new(bytes),
            sha256,
            created_at: Utc::now(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// File name used for downloads and on-disk storage
    pub fn file_name(&self) -> String {
        file_name(&self.id)
    }

    pub fn summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            id: self.id.clone(),
            size: self.size(),
            sha256: self.sha256.clone(),
            created_at: self.created_at,
        }
    }
}

/// Serializable view of a [`CompositeResult`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSummary {
    pub id: String,
    pub size: usize,
    pub sha256: String,
    pub created_at: DateTime<Utc>,
}

/// Storage backend for composites
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store bytes under a fresh id
    async fn put(&self, bytes: Vec<u8>) -> Result<CompositeResult, ArtifactError>;

    /// Fetch bytes by id
    async fn get(&self, id: &str) -> Result<Vec<u8>, ArtifactError>;
}

/// Generate a new artifact id
pub fn new_artifact_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Reject anything that is not a 32-character lowercase hex id
pub fn validate_id(id: &str) -> Result<(), ArtifactError> {
    let well_formed = id.len() == 32
        && id
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if !well_formed {
        return Err(ArtifactError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// Accept either a bare id or the `combined_{id}.pdf` file name
pub fn parse_id(raw: &str) -> Result<String, ArtifactError> {
    let id = raw
        .strip_prefix("combined_")
        .and_then(|rest| rest.strip_suffix(".pdf"))
        .unwrap_or(raw);
    validate_id(id)?;
    Ok(id.to_string())
}

pub fn file_name(id: &str) -> String {
    format!("combined_{}.pdf", id)
}

/// Compute SHA-256 hash of data
pub fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
