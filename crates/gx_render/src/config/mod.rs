//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::render::systems::batching::FLOATS_PER_QUAD;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Painter configuration
///
/// Every field has a default, so partial files are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    /// Side length of every texture atlas page, in pixels
    pub atlas_page_size: u32,

    /// Vertex buffer budget in floats; bounds the quads per batch
    pub vertex_buffer_floats: usize,

    /// Preferred scene width in scene units
    pub preferred_scene_width: f32,

    /// Preferred scene height in scene units
    pub preferred_scene_height: f32,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            atlas_page_size: 512,
            vertex_buffer_floats: 0x10_0000,
            preferred_scene_width: 1280.0,
            preferred_scene_height: 720.0,
        }
    }
}

impl PainterConfig {
    /// Maximum number of quads one batch can hold
    pub fn max_quads_per_batch(&self) -> usize {
        self.vertex_buffer_floats / FLOATS_PER_QUAD
    }
}

impl Config for PainterConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quad_capacity() {
        let config = PainterConfig::default();
        assert_eq!(config.max_quads_per_batch(), 0x10_0000 / 96);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: PainterConfig = toml::from_str("atlas_page_size = 256").unwrap();
        assert_eq!(config.atlas_page_size, 256);
        assert_eq!(config.preferred_scene_width, 1280.0);
    }

    #[test]
    fn test_ron_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("gx_render_config_{}.ron", std::process::id()));
        let path = path.to_str().unwrap().to_string();

        let config = PainterConfig {
            atlas_page_size: 1024,
            ..PainterConfig::default()
        };
        config.save_to_file(&path).unwrap();
        let loaded = PainterConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = std::env::temp_dir().join(format!("gx_render_config_{}.json", std::process::id()));
        let path = path.to_str().unwrap().to_string();
        std::fs::write(&path, "{\"atlas_page_size\": 256}").unwrap();

        let err = PainterConfig::load_from_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, Err(ConfigError::UnsupportedFormat(_))));

        let err = PainterConfig::default().save_to_file(&path);
        assert!(matches!(err, Err(ConfigError::UnsupportedFormat(_))));
        assert!(!std::path::Path::new(&path).exists());
    }
}
