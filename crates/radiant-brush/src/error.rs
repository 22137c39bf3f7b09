//! Error types for brush construction and editing.

use thiserror::Error;

/// Errors raised while building or editing brushes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrushError {
    /// Shader name that cannot be stored in a map file.
    #[error("Invalid shader name: {0:?}")]
    InvalidShaderName(String),

    /// The brush already holds the maximum number of faces.
    #[error("Brush face limit of {0} reached")]
    TooManyFaces(usize),

    /// Primitive side count outside the allowed range.
    #[error("{shape} needs between {min} and {max} sides, got {sides}")]
    InvalidSides {
        /// Primitive name.
        shape: &'static str,
        /// Smallest allowed side count.
        min: usize,
        /// Largest allowed side count.
        max: usize,
        /// Requested side count.
        sides: usize,
    },

    /// Bounding box with no volume.
    #[error("Degenerate bounds: {0}")]
    DegenerateBounds(String),

    /// Face index past the end of the brush.
    #[error("Face index {index} out of range for brush with {count} faces")]
    FaceIndex {
        /// Requested index.
        index: usize,
        /// Number of faces.
        count: usize,
    },
}

impl BrushError {
    /// Create a side count error.
    pub fn sides(shape: &'static str, min: usize, max: usize, sides: usize) -> Self {
        Self::InvalidSides {
            shape,
            min,
            max,
            sides,
        }
    }
}
