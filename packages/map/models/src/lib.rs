#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map view configuration.
//!
//! The initial view (center, zoom range, tiles) and the marker palette are
//! defined in TOML. A default is embedded at compile time from
//! `config/default.toml`; deployments can point at their own file with
//! [`MapConfig::from_path`].

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Embedded default map configuration.
const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Errors that can occur while loading a map configuration.
#[derive(Debug, thiserror::Error)]
pub enum MapConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read map config {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for [`MapConfig`].
    #[error("Invalid map config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Initial map center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapCenter {
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
}

/// View and styling settings handed to the map widget.
///
/// Read from `snake_case` TOML keys, serialized to the API in `camelCase`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct MapConfig {
    /// Display name of the site layer.
    pub layer_name: String,
    /// Tile set identifier.
    pub tiles: String,
    /// Initial center; also the bound the view is constrained to.
    pub center: MapCenter,
    /// Initial zoom level.
    pub zoom_start: f64,
    /// Minimum zoom level.
    pub min_zoom: f64,
    /// Maximum zoom level.
    pub max_zoom: f64,
    /// Marker colors, indexed by style category.
    pub palette: Vec<String>,
}

impl MapConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`MapConfigError::Parse`] if the TOML is malformed or missing
    /// fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, MapConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`MapConfigError::Io`] if the file cannot be read, or
    /// [`MapConfigError::Parse`] if its contents are invalid.
    pub fn from_path(path: &Path) -> Result<Self, MapConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| MapConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    /// Loads `path` when given, otherwise the embedded default.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`MapConfig::from_path`].
    pub fn load(path: Option<&Path>) -> Result<Self, MapConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::from_path)
    }
}

impl Default for MapConfig {
    /// The embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed, which is a development
    /// error caught by the tests.
    fn default() -> Self {
        Self::from_toml(DEFAULT_CONFIG_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded map config: {e}"))
    }
}
