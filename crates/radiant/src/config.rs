//! Editor configuration loaded from TOML.
//!
//! Every field has a default, so an empty document is a valid config:
//!
//! ```toml
//! [grid]
//! size = 8
//!
//! [texture]
//! lock = false
//! default_scale = 0.5
//! default_size = 64
//!
//! [texture.sizes]
//! "textures/tex_misc/crate" = [128, 128]
//!
//! [world]
//! max_coord = 65536
//!
//! [csg]
//! subtract = "apex_pyramid"
//!
//! [map]
//! default_shader = "textures/tex_common/nodraw"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use radiant_brush::{DEFAULT_SHADER, DEFAULT_TEXTURE_SCALE, DEFAULT_TEXTURE_SIZE};
use radiant_csg::SubtractStrategy;
use radiant_math::DEFAULT_MAX_WORLD_COORD;

/// Errors loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML or a field of the wrong type.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value outside its valid range.
    #[error("Invalid value for {field}: {message}")]
    Invalid {
        /// Dotted field path.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Grid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Grid spacing in world units; also the hollow wall thickness.
    pub size: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { size: 8.0 }
    }
}

/// Texture projection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Keep textures fixed to the surface while transforming brushes.
    pub lock: bool,
    /// Scale of the default projection.
    pub default_scale: f64,
    /// Pixel size assumed for shaders not listed in `sizes`.
    pub default_size: u32,
    /// Pixel dimensions per full shader name.
    pub sizes: BTreeMap<String, [u32; 2]>,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            lock: false,
            default_scale: DEFAULT_TEXTURE_SCALE,
            default_size: DEFAULT_TEXTURE_SIZE,
            sizes: BTreeMap::new(),
        }
    }
}

/// World bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Half-size of the world cube.
    pub max_coord: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_coord: DEFAULT_MAX_WORLD_COORD,
        }
    }
}

/// CSG settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsgConfig {
    /// Fragmentation used by subtract.
    pub subtract: SubtractStrategy,
}

/// Map settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Shader for new faces.
    pub default_shader: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_shader: DEFAULT_SHADER.to_string(),
        }
    }
}

/// Complete editor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiantConfig {
    /// Grid settings.
    pub grid: GridConfig,
    /// Texture settings.
    pub texture: TextureConfig,
    /// World bounds.
    pub world: WorldConfig,
    /// CSG settings.
    pub csg: CsgConfig,
    /// Map settings.
    pub map: MapConfig,
}

impl RadiantConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.size.is_nan() || self.grid.size <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "grid.size",
                message: format!("must be positive, got {}", self.grid.size),
            });
        }
        if self.texture.default_scale == 0.0 {
            return Err(ConfigError::Invalid {
                field: "texture.default_scale",
                message: "must not be zero".to_string(),
            });
        }
        if self.world.max_coord.is_nan() || self.world.max_coord <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "world.max_coord",
                message: format!("must be positive, got {}", self.world.max_coord),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = RadiantConfig::from_toml_str("").unwrap();
        assert_eq!(config, RadiantConfig::default());
        assert_eq!(config.grid.size, 8.0);
        assert_eq!(config.csg.subtract, SubtractStrategy::ApexPyramid);
        assert_eq!(config.map.default_shader, DEFAULT_SHADER);
    }

    #[test]
    fn test_partial_document() {
        let config = RadiantConfig::from_toml_str(
            r#"
[grid]
size = 16

[texture]
lock = true

[texture.sizes]
"textures/tex_misc/crate" = [128, 256]

[csg]
subtract = "plane_sweep"
"#,
        )
        .unwrap();
        assert_eq!(config.grid.size, 16.0);
        assert!(config.texture.lock);
        assert_eq!(config.texture.default_scale, 0.5);
        assert_eq!(config.texture.sizes["textures/tex_misc/crate"], [128, 256]);
        assert_eq!(config.csg.subtract, SubtractStrategy::PlaneSweep);
    }

    #[test]
    fn test_invalid_grid() {
        let err = RadiantConfig::from_toml_str("[grid]\nsize = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "grid.size", .. }));
    }

    #[test]
    fn test_wrong_type() {
        let err = RadiantConfig::from_toml_str("[grid]\nsize = \"big\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
