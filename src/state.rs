//! Application state management

use std::sync::Arc;

use crate::artifact::{ArtifactStore, LocalArtifactStore};
use crate::compose::ComposePipeline;
use crate::config::Config;
use crate::delivery::{Delivery, LinkDelivery};
use crate::document::{DocumentSource, MuPdfSource};
use crate::error::ConfigurationError;
use crate::layout::validate;
use crate::render::{MuPdfRasterizer, PageRasterizer, RenderPool};
use crate::session::SessionManager;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    sessions: SessionManager,
}

impl AppState {
    /// Build the production state: MuPDF source and rasterizer, artifacts on
    /// disk, link delivery.
    ///
    /// The quadrant layout is validated here, once; an invalid layout is a
    /// startup error.
    pub fn new(config: Config) -> Result<Self, ConfigurationError> {
        let artifacts = Arc::new(LocalArtifactStore::new(config.artifacts.dir.clone()));
        let delivery = Arc::new(LinkDelivery::new(config.artifacts.base_url.clone()));
        Self::with_components(
            config,
            Arc::new(MuPdfSource),
            Arc::new(MuPdfRasterizer),
            artifacts,
            delivery,
        )
    }

    /// Build state around caller-supplied collaborators
    pub fn with_components(
        config: Config,
        source: Arc<dyn DocumentSource>,
        rasterizer: Arc<dyn PageRasterizer>,
        artifacts: Arc<dyn ArtifactStore>,
        delivery: Arc<dyn Delivery>,
    ) -> Result<Self, ConfigurationError> {
        let layout = validate(&config.quadrant_layout())?;
        let pool = RenderPool::new(config.render.workers);
        let pipeline =
            ComposePipeline::new(layout, rasterizer, pool, config.render.dpi)?;

        let sessions = SessionManager::new(pipeline, source, artifacts, delivery);

        Ok(Self {
            inner: Arc::new(AppStateInner { config, sessions }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the session manager
    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    /// Build the public download link for an artifact
    pub fn download_url(&self, id: &str) -> String {
        format!("{}/download/{}", self.config().artifacts.base_url, id)
    }
}
