//! Engine configuration.
//!
//! Configuration is plain data deserialized from JSON. Every field has a
//! default, so an empty object (or no file at all) yields a working setup.
//!
//! ```
//! use arbor_core::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "scene": { "max_point_lights": 8 } }"#).unwrap();
//! assert_eq!(config.scene.max_point_lights, 8);
//! assert!(config.scene.eager_propagation);
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::logging::DEFAULT_LOG_FILTER;

/// Number of point-light slots in the lighting shader's uniform array.
pub const DEFAULT_MAX_POINT_LIGHTS: usize = 50;

/// Settings consumed by the scene tree.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Maximum number of point lights a single light pass may write.
    pub max_point_lights: usize,
    /// Whether `apply_*` calls propagate absolute transforms immediately.
    pub eager_propagation: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_point_lights: DEFAULT_MAX_POINT_LIGHTS,
            eager_propagation: true,
        }
    }
}

impl SceneConfig {
    /// Reject settings no scene tree can run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_point_lights == 0 {
            return Err(Error::Config(
                "scene.max_point_lights must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Fallback tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Scene graph settings
    pub scene: SceneConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            scene: SceneConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, or the defaults if `path` does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.scene.validate()?;
        if self.log_filter.trim().is_empty() {
            return Err(Error::Config("log_filter must not be empty".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.scene.max_point_lights, 50);
        assert!(config.scene.eager_propagation);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_scene_section() {
        let config = EngineConfig::from_json(r#"{"scene": {"eager_propagation": false}}"#).unwrap();
        assert!(!config.scene.eager_propagation);
        assert_eq!(config.scene.max_point_lights, DEFAULT_MAX_POINT_LIGHTS);
    }

    #[test]
    fn test_zero_light_budget_rejected() {
        let err = EngineConfig::from_json(r#"{"scene": {"max_point_lights": 0}}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = EngineConfig::load_or_default("/definitely/not/here/arbor.json").unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
