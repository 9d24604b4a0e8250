//! Desktop configuration: window catalog, layout storage key, and initial viewport.

use std::collections::BTreeSet;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{Viewport, WindowConfig};
use crate::persistence::LAYOUT_STORAGE_KEY;

include!(concat!(env!("OUT_DIR"), "/window_catalog_generated.rs"));

#[derive(Debug, Error)]
/// Configuration parse and validation failures.
pub enum ConfigError {
    /// The TOML document could not be parsed into [`DesktopConfig`].
    #[error("invalid desktop config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A catalog entry had a blank id.
    #[error("window catalog entry {index} has an empty id")]
    EmptyWindowId {
        /// Position of the entry in the catalog.
        index: usize,
    },
    /// Two catalog entries shared an id.
    #[error("window id `{0}` appears more than once in the catalog")]
    DuplicateWindowId(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DesktopConfig {
    /// Storage key for the persisted layout snapshot.
    #[serde(default = "default_layout_key")]
    pub layout_key: String,
    /// Viewport assumed until the host reports its real size.
    #[serde(default)]
    pub viewport: Viewport,
    /// Window catalog in placement order.
    #[serde(default)]
    pub windows: Vec<WindowConfig>,
}

fn default_layout_key() -> String {
    LAYOUT_STORAGE_KEY.to_string()
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            layout_key: default_layout_key(),
            viewport: Viewport::default(),
            windows: Vec::new(),
        }
    }
}

impl DesktopConfig {
    /// Default configuration carrying the built-in window catalog.
    pub fn builtin() -> Self {
        Self {
            windows: builtin_window_catalog(),
            ..Self::default()
        }
    }

    /// Parses and validates a host-supplied TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed TOML, blank ids, or duplicate ids.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for (index, window) in self.windows.iter().enumerate() {
            if window.id.as_str().trim().is_empty() {
                return Err(ConfigError::EmptyWindowId { index });
            }
            if !seen.insert(window.id.as_str()) {
                return Err(ConfigError::DuplicateWindowId(window.id.to_string()));
            }
        }
        Ok(())
    }
}

/// The window catalog compiled from `window_catalog.toml`.
pub fn builtin_window_catalog() -> Vec<WindowConfig> {
    BUILTIN_WINDOW_CATALOG
        .iter()
        .map(|(id, default_open)| WindowConfig::new(*id, *default_open))
        .collect()
}
