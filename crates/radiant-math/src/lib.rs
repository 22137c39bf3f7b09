#![warn(missing_docs)]

//! Math types for the radiant brush kernel.
//!
//! Thin wrappers around nalgebra providing the types the brush code works
//! in: points, vectors, planes, bounding boxes, affine transforms, and the
//! named tolerances every geometric comparison goes through.

use nalgebra::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

mod aabb;
mod plane;

pub use aabb::Aabb;
pub use plane::Plane3;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A vector in 2D texture space.
pub type Vec2 = Vector2<f64>;

/// A 4x4 matrix, column-vector convention (`m * p`).
pub type Mat4 = Matrix4<f64>;

/// Two plane normals are equal when every component differs by less than this.
/// Also used for plane distances.
pub const PLANE_EPSILON: f64 = 0.001;

/// Thickness of a plane when classifying points against it.
pub const ON_EPSILON: f64 = 1.0 / 256.0;

/// Tolerance for the straight-up / straight-down test when building a texture axis base.
pub const AXIS_BASE_EPSILON: f64 = 1e-6;

/// Plane points are snapped to multiples of this after a transform.
pub const QUANTISE_STEP: f64 = 1.0 / 65536.0;

/// Default half-size of the editable world.
pub const DEFAULT_MAX_WORLD_COORD: f64 = 65536.0;

/// Snap `value` to the nearest multiple of `step`.
pub fn snapped(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Snap a plane-point coordinate to [`QUANTISE_STEP`].
pub fn quantise(value: f64) -> f64 {
    snapped(value, QUANTISE_STEP)
}

/// Floating point modulus whose result has the sign of the modulus.
///
/// `float_mod(-16.0, 64.0) == 48.0`.
pub fn float_mod(value: f64, modulus: f64) -> f64 {
    let r = value % modulus;
    if r < 0.0 {
        r + modulus
    } else {
        r
    }
}

/// Component-wise equality within `epsilon`.
pub fn vec3_equal_epsilon(a: &Vec3, b: &Vec3, epsilon: f64) -> bool {
    (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon && (a.z - b.z).abs() < epsilon
}

/// Build a 4x4 affine matrix whose upper-left 3x3 columns are `x`, `y` and `z`.
pub fn matrix_from_axes(x: &Vec3, y: &Vec3, z: &Vec3) -> Mat4 {
    Matrix3::from_columns(&[*x, *y, *z]).to_homogeneous()
}

/// Build a translation matrix.
pub fn matrix_translation(t: &Vec3) -> Mat4 {
    Mat4::new_translation(t)
}

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Mat4,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::identity(),
        }
    }

    /// Wrap an existing matrix.
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self { matrix }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Mat4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Non-uniform scale by `(sx, sy, sz)`.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        let mut m = Mat4::identity();
        m[(0, 0)] = sx;
        m[(1, 1)] = sy;
        m[(2, 2)] = sz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Mat4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Compose: `self` then `other` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// True when the transform flips handedness (negative determinant of the
    /// linear part). Plane point order must be reversed under such a transform.
    pub fn is_mirror(&self) -> bool {
        self.matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0
    }

    /// Inverse of this transform, if it exists.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
