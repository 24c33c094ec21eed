//! Filesystem artifact store

use std::path::{Path, PathBuf};

use super::{file_name, validate_id, ArtifactError, ArtifactStore, CompositeResult};

/// Stores composites as `combined_{id}.pdf` in one directory
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    base_path: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn artifact_path(&self, id: &str) -> PathBuf {
        self.base_path.join(file_name(id))
    }
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn put(&self, bytes: Vec<u8>) -> Result<CompositeResult, ArtifactError> {
        tokio::fs::create_dir_all(&self.base_path).await?;

        let result = CompositeResult::new(bytes);
        let path = self.artifact_path(&result.id);
        tokio::fs::write(&path, result.bytes.as_slice()).await?;

        tracing::debug!(
            artifact_id = %result.id,
            path = %path.display(),
            size = result.size(),
            "Stored artifact"
        );

        Ok(result)
    }

    async fn get(&self, id: &str) -> Result<Vec<u8>, ArtifactError> {
        validate_id(id)?;
        match tokio::fs::read(self.artifact_path(id)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ArtifactError::NotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
