//! In-memory artifact store

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{validate_id, ArtifactError, ArtifactStore, CompositeResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    artifacts: Arc<RwLock<HashMap<String, Arc<Vec<u8>>>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.read().is_empty()
    }
}

#[async_trait::async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn put(&self, bytes: Vec<u8>) -> Result<CompositeResult, ArtifactError> {
        let result = CompositeResult::new(bytes);
        self.artifacts
            .write()
            .insert(result.id.clone(), Arc::clone(&result.bytes));
        Ok(result)
    }

    async fn get(&self, id: &str) -> Result<Vec<u8>, ArtifactError> {
        validate_id(id)?;
        self.artifacts
            .read()
            .get(id)
            .map(|bytes| bytes.as_ref().clone())
            .ok_or_else(|| ArtifactError::NotFound(id.to_string()))
    }
}
