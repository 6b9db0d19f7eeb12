//! Router configuration.

use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Default interval between pointer-move hit tests
pub const DEFAULT_THROTTLE_MS: f64 = 33.0;

/// Errors raised when saving router options
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Writing the file failed
    #[error("failed to write router options: {0}")]
    Io(#[from] io::Error),
    /// Serializing to TOML failed
    #[error("failed to serialize router options: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Options for a [`PointerEventRouter`](crate::PointerEventRouter)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Minimum accumulated frame time (ms) between pointer-move hit tests
    pub throttle_ms: f64,
    /// Ignore events from non-primary pointers
    pub primary_only: bool,
    /// Restrict hit testing to this part of the canvas
    pub viewport: Option<Viewport>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE_MS,
            primary_only: true,
            viewport: None,
        }
    }
}

impl RouterOptions {
    /// Builder: throttle interval
    pub fn with_throttle_ms(mut self, throttle_ms: f64) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    /// Builder: viewport
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Parse options from TOML
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let mut options: Self = toml::from_str(contents)?;
        options.sanitize();
        Ok(options)
    }

    /// Load options from a TOML file, falling back to defaults on errors
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(options) => options,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save options to a TOML file, creating parent directories
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    fn sanitize(&mut self) {
        if !self.throttle_ms.is_finite() || self.throttle_ms < 0.0 {
            warn!(
                throttle_ms = self.throttle_ms,
                "Invalid throttle interval; using {DEFAULT_THROTTLE_MS} ms"
            );
            self.throttle_ms = DEFAULT_THROTTLE_MS;
        }
    }
}
