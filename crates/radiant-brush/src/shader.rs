//! Shader (texture) assignment of a face.

use serde::{Deserialize, Serialize};

use crate::error::BrushError;
use crate::flags::ContentsFlagsValue;

/// Prefix every stored shader name carries.
pub const TEXTURE_PREFIX: &str = "textures/";

/// Shader given to faces that have none.
pub const DEFAULT_SHADER: &str = "textures/tex_common/nodraw";

/// Placeholder reported when no single shader is shared by a selection.
pub const SHADER_NOT_FOUND: &str = "$NONE";

/// Pixel size assumed for textures whose real size is unknown.
pub const DEFAULT_TEXTURE_SIZE: u32 = 64;

/// True if `name` can be stored in a map file.
///
/// Empty names and names containing whitespace, quotes, parentheses or
/// braces would break the map tokenizer.
pub fn shader_name_valid(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '(' | ')' | '{' | '}'))
}

/// Full shader name for a name read from a map file.
///
/// `NULL` and the empty string become [`DEFAULT_SHADER`]; names lacking the
/// texture prefix get it prepended.
pub fn shader_from_map_name(name: &str) -> String {
    if name.is_empty() || name == "NULL" {
        DEFAULT_SHADER.to_string()
    } else if name.starts_with(TEXTURE_PREFIX) {
        name.to_string()
    } else {
        format!("{TEXTURE_PREFIX}{name}")
    }
}

/// Shader name as written to a map file: prefix stripped, empty becomes `NULL`.
pub fn shader_to_map_name(name: &str) -> &str {
    let stripped = name.strip_prefix(TEXTURE_PREFIX).unwrap_or(name);
    if stripped.is_empty() {
        "NULL"
    } else {
        stripped
    }
}

/// Shader name, flags and texture size of one face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceShader {
    name: String,
    /// Content flags, surface flags and value.
    pub flags: ContentsFlagsValue,
    width: u32,
    height: u32,
}

impl Default for FaceShader {
    fn default() -> Self {
        Self::new(DEFAULT_SHADER)
    }
}

impl FaceShader {
    /// Shader with default flags and texture size.
    pub fn new(name: &str) -> Self {
        Self::with_flags(name, ContentsFlagsValue::default())
    }

    /// Shader with the given flags.
    pub fn with_flags(name: &str, flags: ContentsFlagsValue) -> Self {
        Self {
            name: shader_from_map_name(name),
            flags,
            width: DEFAULT_TEXTURE_SIZE,
            height: DEFAULT_TEXTURE_SIZE,
        }
    }

    /// Full shader name, including the texture prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the shader name.
    pub fn set_name(&mut self, name: &str) -> Result<(), BrushError> {
        if !shader_name_valid(name) {
            return Err(BrushError::InvalidShaderName(name.to_string()));
        }
        self.name = shader_from_map_name(name);
        Ok(())
    }

    /// Texture width in pixels.
    pub fn width(&self) -> f64 {
        self.width as f64
    }

    /// Texture height in pixels.
    pub fn height(&self) -> f64 {
        self.height as f64
    }

    /// Set the texture size. Zero sizes fall back to [`DEFAULT_TEXTURE_SIZE`].
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = if width == 0 { DEFAULT_TEXTURE_SIZE } else { width };
        self.height = if height == 0 { DEFAULT_TEXTURE_SIZE } else { height };
    }

    /// True if the face belongs to a detail brush.
    pub fn is_detail(&self) -> bool {
        self.flags.is_detail()
    }

    /// Set or clear the detail content bit.
    pub fn set_detail(&mut self, detail: bool) {
        self.flags.set_detail(detail);
    }
}
