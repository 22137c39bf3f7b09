//! Error types for CSG operations.

use thiserror::Error;

/// Reasons a CSG operation leaves its inputs unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsgError {
    /// Merge needs at least two brushes.
    #[error("At least two brushes have to be selected, got {0}")]
    NotEnoughBrushes(usize),

    /// The merged brush would not be convex.
    #[error("Result would not be convex")]
    NotConvex,

    /// Two coincident faces carry different shaders.
    #[error("Coincident faces use different shaders: {0} and {1}")]
    ShaderMismatch(String, String),

    /// The merged brush would exceed the face limit.
    #[error("Result would have too many faces")]
    TooManyFaces,

    /// The split plane points are collinear.
    #[error("Split plane is degenerate")]
    InvalidPlane,
}
