#![warn(missing_docs)]

//! Plane-set brush solids for the radiant map editor.
//!
//! A [`Brush`] is a convex volume given by an ordered list of [`Face`]s.
//! Each face holds three points defining its plane, a [`FaceShader`] with
//! content/surface flags, and a [`TexDef`] texture projection. The brush
//! derives everything else (face polygons, edge adjacency, unique
//! edges/vertices and bounds) from the planes.
//!
//! # Example
//!
//! ```
//! use radiant_brush::{primitives, TexDef, DEFAULT_SHADER};
//! use radiant_math::{Aabb, Point3};
//!
//! let bounds = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(64.0, 64.0, 64.0));
//! let brush = primitives::cuboid(&bounds, DEFAULT_SHADER, &TexDef::default()).unwrap();
//! assert_eq!(brush.vertices().len(), 8);
//! ```

mod brush;
mod error;
mod face;
pub mod flags;
mod observer;
pub mod primitives;
mod shader;
mod texdef;
mod winding;

pub use brush::{next_edge, next_vertex, Brush, MAX_FACES};
pub use error::BrushError;
pub use face::{Face, FacePlane};
pub use flags::ContentsFlagsValue;
pub use observer::{BrushEvent, FaceVertexId};
pub use shader::{
    shader_from_map_name, shader_name_valid, shader_to_map_name, FaceShader,
    DEFAULT_SHADER, DEFAULT_TEXTURE_SIZE, SHADER_NOT_FOUND, TEXTURE_PREFIX,
};
pub use texdef::{
    axis_base, basis_for_normal, projection_axis_for_normal, ProjectionAxis, TexAxis, TexDef,
    DEFAULT_TEXTURE_SCALE,
};
pub use winding::{
    edge_is_degenerate, planes_concave, PlaneSide, SplitCounts, Winding, WindingVertex,
    MAX_POINTS_ON_WINDING,
};
