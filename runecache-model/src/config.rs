//! Model decode configuration
//!
//! Selects which derived data `post_process_with` builds. Loadable from a
//! TOML table:
//!
//! ```toml
//! compute_normals = true
//! compute_texture_coordinates = false
//! compute_skin_groups = true
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDecodeConfig {
    /// Derive vertex and face normals
    #[serde(default = "default_true")]
    pub compute_normals: bool,
    /// Derive per-face UV bases
    #[serde(default = "default_true")]
    pub compute_texture_coordinates: bool,
    /// Bucket vertex and face skins into groups
    #[serde(default = "default_true")]
    pub compute_skin_groups: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ModelDecodeConfig {
    fn default() -> Self {
        Self {
            compute_normals: true,
            compute_texture_coordinates: true,
            compute_skin_groups: true,
        }
    }
}

/// Config text that failed to parse
#[derive(Debug, Error)]
#[error("invalid model decode config: {0}")]
pub struct ConfigError(#[from] toml::de::Error);

impl ModelDecodeConfig {
    /// Decode without any post-processing
    pub fn raw() -> Self {
        Self {
            compute_normals: false,
            compute_texture_coordinates: false,
            compute_skin_groups: false,
        }
    }

    /// Parse from TOML; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
