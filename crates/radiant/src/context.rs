//! Editor state shared by every command.

use std::collections::BTreeMap;

use radiant_brush::{shader_from_map_name, Brush, TexDef};
use radiant_csg::SubtractStrategy;

use crate::config::RadiantConfig;

/// Grid, texture and CSG settings commands read instead of global state.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorContext {
    /// Grid spacing; hollow walls are this thick.
    pub grid_size: f64,
    /// Keep textures fixed to surfaces under transforms.
    pub texture_lock: bool,
    /// Scale of the default projection.
    pub default_scale: f64,
    /// Pixel size of shaders missing from `texture_sizes`.
    pub default_texture_size: u32,
    /// Pixel size per full shader name.
    pub texture_sizes: BTreeMap<String, [u32; 2]>,
    /// Half-size of the world cube.
    pub max_world_coord: f64,
    /// Fragmentation used by subtract.
    pub subtract_strategy: SubtractStrategy,
    /// Shader for new faces.
    pub default_shader: String,
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::from(&RadiantConfig::default())
    }
}

impl From<&RadiantConfig> for EditorContext {
    fn from(config: &RadiantConfig) -> Self {
        let texture_sizes = config
            .texture
            .sizes
            .iter()
            .map(|(name, size)| (shader_from_map_name(name), *size))
            .collect();
        Self {
            grid_size: config.grid.size,
            texture_lock: config.texture.lock,
            default_scale: config.texture.default_scale,
            default_texture_size: config.texture.default_size,
            texture_sizes,
            max_world_coord: config.world.max_coord,
            subtract_strategy: config.csg.subtract,
            default_shader: shader_from_map_name(&config.map.default_shader),
        }
    }
}

impl EditorContext {
    /// The projection new faces get.
    pub fn default_texdef(&self) -> TexDef {
        TexDef::with_scale(self.default_scale)
    }

    /// Pixel size of `shader`.
    pub fn texture_size(&self, shader: &str) -> (u32, u32) {
        match self.texture_sizes.get(shader) {
            Some([w, h]) => (*w, *h),
            None => (self.default_texture_size, self.default_texture_size),
        }
    }

    /// Give every face of `brush` its shader's texture size and the world
    /// bounds of this context.
    pub fn apply_to_brush(&self, brush: &mut Brush) {
        if brush.max_world_coord() != self.max_world_coord {
            brush.set_max_world_coord(self.max_world_coord);
        }
        brush.for_each_face_mut(|face| {
            let (w, h) = self.texture_size(face.shader_name());
            if face.shader().width() != f64::from(w) || face.shader().height() != f64::from(h) {
                face.set_texture_size(w, h);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_keyed_by_full_name() {
        let mut config = RadiantConfig::default();
        config.texture.sizes.insert("tex_misc/crate".to_string(), [128, 32]);
        let ctx = EditorContext::from(&config);
        assert_eq!(ctx.texture_size("textures/tex_misc/crate"), (128, 32));
        assert_eq!(ctx.texture_size("textures/other"), (64, 64));
    }

    #[test]
    fn test_default_texdef_scale() {
        let mut config = RadiantConfig::default();
        config.texture.default_scale = 0.25;
        let ctx = EditorContext::from(&config);
        assert_eq!(ctx.default_texdef().scale, [0.25, 0.25]);
    }
}
