//! Configuration management for quadrant-press

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::layout::{AnchorMode, QuadrantLayout};
use crate::render::{check_dpi, default_workers, DEFAULT_DPI};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub render: RenderConfig,
    pub layout: LayoutConfig,
    pub artifacts: ArtifactConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub dpi: u32,
    pub workers: usize,
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub zoom: f64,
    pub anchor: AnchorMode,
}

#[derive(Debug, Clone)]
pub struct ArtifactConfig {
    /// Directory holding `combined_{id}.pdf` files
    pub dir: PathBuf,
    /// Public base URL used in download links
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            render: RenderConfig {
                dpi: DEFAULT_DPI,
                workers: default_workers(),
            },
            layout: LayoutConfig {
                zoom: 1.0,
                anchor: AnchorMode::TopLeft,
            },
            artifacts: ArtifactConfig {
                dir: env::temp_dir(),
                base_url: "http://localhost:3000".to_string(),
            },
        }
    }
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// Unset variables take their defaults; malformed values are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        let port = match env::var("SERVER_PORT").or_else(|_| env::var("PORT")) {
            Ok(raw) => parse_var("SERVER_PORT", &raw)?,
            Err(_) => defaults.server.port,
        };

        let dpi = optional_var("DPI")?.unwrap_or(defaults.render.dpi);
        check_dpi(dpi).map_err(|e| ConfigError::Invalid {
            var: "DPI",
            value: dpi.to_string(),
            reason: e.to_string(),
        })?;

        let workers: usize = optional_var("RENDER_WORKERS")?.unwrap_or(defaults.render.workers);
        if workers == 0 {
            return Err(ConfigError::Invalid {
                var: "RENDER_WORKERS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let zoom: f64 = optional_var("LAYOUT_ZOOM")?.unwrap_or(defaults.layout.zoom);
        let anchor: AnchorMode = optional_var("LAYOUT_ANCHOR")?.unwrap_or(defaults.layout.anchor);

        let base_url = env::var("HOST_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port,
            },
            render: RenderConfig { dpi, workers },
            layout: LayoutConfig { zoom, anchor },
            artifacts: ArtifactConfig {
                dir: env::var("ARTIFACT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.artifacts.dir),
                base_url: base_url.trim_end_matches('/').to_string(),
            },
        })
    }

    /// Quadrant layout described by this configuration (not yet validated)
    pub fn quadrant_layout(&self) -> QuadrantLayout {
        QuadrantLayout::a4()
            .with_zoom(self.layout.zoom)
            .with_anchor(self.layout.anchor)
    }
}

fn optional_var<T>(var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => parse_var(var, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_var<T>(var: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
