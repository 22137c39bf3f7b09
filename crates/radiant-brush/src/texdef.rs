//! Shift/scale/rotate texture projection.
//!
//! A face's texture coordinates come from two matrices: an axis-aligned
//! basis that drops the face's dominant axis (`basis_for_normal`), and the
//! texdef matrix that applies scale, rotation and shift in texture space
//! (`TexDef::to_transform`). All matrices are affine, column-vector convention.

use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

use radiant_math::{
    float_mod, matrix_from_axes, vec3_equal_epsilon, Aabb, Mat4, Plane3, Point3, Vec2, Vec3,
    AXIS_BASE_EPSILON,
};

use crate::winding::Winding;

/// Texture scale applied to freshly created faces.
pub const DEFAULT_TEXTURE_SCALE: f64 = 0.5;

/// The axis a face is projected along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionAxis {
    /// Project along X onto the YZ plane.
    X,
    /// Project along Y onto the XZ plane.
    Y,
    /// Project along Z onto the XY plane.
    Z,
}

/// The texture-space axis a flip applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TexAxis {
    /// Horizontal texture axis.
    S,
    /// Vertical texture axis.
    T,
}

impl TexAxis {
    fn index(self) -> usize {
        match self {
            TexAxis::S => 0,
            TexAxis::T => 1,
        }
    }
}

/// The projection axis most aligned with `normal`.
pub fn projection_axis_for_normal(normal: &Vec3) -> ProjectionAxis {
    let a = normal.abs();
    if a.x > a.y {
        if a.x > a.z {
            return ProjectionAxis::X;
        }
    } else if a.y > a.z {
        return ProjectionAxis::Y;
    }
    ProjectionAxis::Z
}

/// Transform from world space to the axis-aligned ST space of `normal`.
pub fn basis_for_normal(normal: &Vec3) -> Mat4 {
    match projection_axis_for_normal(normal) {
        ProjectionAxis::Z => Mat4::identity(),
        ProjectionAxis::Y => Mat4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, -1.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ),
        ProjectionAxis::X => Mat4::new(
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ),
    }
}

/// Two unit vectors spanning the plane of `normal`.
///
/// Straight up and straight down get fixed axes; every other normal is
/// derived with cross products against world up.
pub fn axis_base(normal: &Vec3) -> (Vec3, Vec3) {
    let up = Vec3::z();
    if vec3_equal_epsilon(normal, &up, AXIS_BASE_EPSILON) {
        (Vec3::y(), Vec3::x())
    } else if vec3_equal_epsilon(normal, &-up, AXIS_BASE_EPSILON) {
        (Vec3::y(), -Vec3::x())
    } else {
        let s = normal.cross(&up).normalize();
        let t = normal.cross(&s).normalize();
        (-s, t)
    }
}

fn transform_point(m: &Mat4, p: &Point3) -> Vec3 {
    let v = m * Vector4::new(p.x, p.y, p.z, 1.0);
    Vec3::new(v.x, v.y, v.z)
}

fn swap_axes(from: &Vec3, to: &Vec3) -> Mat4 {
    let (x, y, z) = (Vec3::x(), Vec3::y(), Vec3::z());
    if from.x != 0.0 && to.y != 0.0 {
        return matrix_from_axes(to, from, &z);
    }
    if from.x != 0.0 && to.z != 0.0 {
        return matrix_from_axes(to, &y, from);
    }
    if from.y != 0.0 && to.z != 0.0 {
        return matrix_from_axes(&x, to, from);
    }
    if from.y != 0.0 && to.x != 0.0 {
        return matrix_from_axes(from, to, &z);
    }
    if from.z != 0.0 && to.x != 0.0 {
        return matrix_from_axes(from, &y, to);
    }
    if from.z != 0.0 && to.y != 0.0 {
        return matrix_from_axes(&x, from, to);
    }
    log::warn!("unhandled texture axis swap {:?} -> {:?}", from, to);
    Mat4::identity()
}

fn reflection_for_plane45(plane: &Plane3, from: &Vec3, to: &Vec3) -> Mat4 {
    let n = plane.normal;
    let (first, second) = if (from.dot(&n) > 0.0) == (to.dot(&n) > 0.0) {
        (-from, -to)
    } else {
        (*from, *to)
    };
    let mut swap = swap_axes(&first, &second);
    swap[(0, 3)] = 2.0 * n.x * plane.dist;
    swap[(1, 3)] = 2.0 * n.y * plane.dist;
    swap[(2, 3)] = 2.0 * n.z * plane.dist;
    swap
}

/// Texture shift (pixels), scale (world units per pixel) and rotation (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TexDef {
    /// Offset in texture pixels along S and T.
    pub shift: [f64; 2],
    /// World units per texture pixel along S and T. Negative mirrors.
    pub scale: [f64; 2],
    /// Rotation in degrees.
    pub rotate: f64,
}

impl Default for TexDef {
    fn default() -> Self {
        Self::with_scale(DEFAULT_TEXTURE_SCALE)
    }
}

impl TexDef {
    /// Unshifted, unrotated projection with a uniform scale.
    pub fn with_scale(scale: f64) -> Self {
        Self {
            shift: [0.0, 0.0],
            scale: [scale, scale],
            rotate: 0.0,
        }
    }

    /// Matrix from axis-aligned ST space to normalised texture space for a
    /// texture of `width` x `height` pixels.
    pub fn to_transform(&self, width: f64, height: f64) -> Mat4 {
        let [scale_s, scale_t] = self
            .scale
            .map(|scale| if scale == 0.0 { DEFAULT_TEXTURE_SCALE } else { scale });
        let inv_s = 1.0 / (scale_s * width);
        let inv_t = 1.0 / (scale_t * -height);
        let (s, c) = (-self.rotate).to_radians().sin_cos();
        let mut m = Mat4::identity();
        m[(0, 0)] = c * inv_s;
        m[(1, 0)] = s * inv_t;
        m[(0, 1)] = -s * inv_s;
        m[(1, 1)] = c * inv_t;
        m[(0, 3)] = self.shift[0] / width;
        m[(1, 3)] = self.shift[1] / height;
        m
    }

    /// Recover shift/scale/rotate from a texture matrix.
    ///
    /// Returns `None` if the matrix collapses either texture axis.
    pub fn from_transform(width: f64, height: f64, m: &Mat4) -> Option<TexDef> {
        let s_axis = Vec2::new(m[(0, 0)], m[(0, 1)]);
        let t_axis = Vec2::new(m[(1, 0)], m[(1, 1)]);
        if s_axis.norm_squared() == 0.0 || t_axis.norm_squared() == 0.0 {
            return None;
        }

        let mut texdef = TexDef {
            shift: [m[(0, 3)] * width, m[(1, 3)] * height],
            scale: [(1.0 / s_axis.norm()) / width, (1.0 / t_axis.norm()) / height],
            rotate: -(-m[(0, 1)]).atan2(m[(0, 0)]).to_degrees(),
        };
        if texdef.rotate == -180.0 {
            texdef.rotate = 180.0;
        }

        // a positive 2d cross product means one axis is mirrored
        if s_axis.x * t_axis.y - s_axis.y * t_axis.x > 0.0 {
            if texdef.rotate >= 180.0 {
                texdef.rotate -= 180.0;
                texdef.scale[0] = -texdef.scale[0];
            } else {
                texdef.scale[1] = -texdef.scale[1];
            }
        }
        Some(texdef)
    }

    /// Reduce the shift modulo the texture size.
    pub fn normalise(&mut self, width: f64, height: f64) {
        self.shift[0] = float_mod(self.shift[0], width);
        self.shift[1] = float_mod(self.shift[1], height);
    }

    /// Add to the shift.
    pub fn shift_by(&mut self, s: f64, t: f64) {
        self.shift[0] += s;
        self.shift[1] += t;
    }

    /// Add to the scale.
    pub fn scale_by(&mut self, s: f64, t: f64) {
        self.scale[0] += s;
        self.scale[1] += t;
    }

    /// Add to the rotation, keeping it a whole number of degrees below 360.
    pub fn rotate_by(&mut self, angle: f64) {
        let r = ((self.rotate + angle).round() as i64).rem_euclid(360);
        self.rotate = r as f64;
    }

    /// Mirror the texture along one axis.
    pub fn flip(&mut self, axis: TexAxis) {
        self.scale[axis.index()] = -self.scale[axis.index()];
        self.rotate = (self.rotate + 180.0).rem_euclid(360.0);
    }

    /// Fill in texture coordinates, tangents and bitangents for `winding`.
    pub fn emit_texture_coordinates(
        &self,
        width: f64,
        height: f64,
        winding: &mut Winding,
        normal: &Vec3,
    ) {
        if winding.len() < 3 {
            return;
        }
        let local2tex = self.to_transform(width, height) * basis_for_normal(normal);
        let tangent = Vec3::new(local2tex[(0, 0)], local2tex[(0, 1)], local2tex[(0, 2)]).normalize();
        let bitangent =
            Vec3::new(local2tex[(1, 0)], local2tex[(1, 1)], local2tex[(1, 2)]).normalize();

        for v in winding.iter_mut() {
            let tc = transform_point(&local2tex, &v.vertex);
            v.texcoord = Vec2::new(tc.x, tc.y);
            v.tangent = tangent;
            v.bitangent = bitangent;
        }
    }

    /// Rescale and shift so the winding covers exactly `s_repeat` x `t_repeat`
    /// copies of the texture.
    pub fn fit(
        &mut self,
        width: f64,
        height: f64,
        normal: &Vec3,
        winding: &Winding,
        s_repeat: f64,
        t_repeat: f64,
    ) {
        if winding.len() < 3 {
            return;
        }
        let st2tex = self.to_transform(width, height);
        let local2tex = st2tex * basis_for_normal(normal);

        let mut bounds = Aabb::empty();
        for v in winding.iter() {
            bounds.include_point(&Point3::from(transform_point(&local2tex, &v.vertex)));
        }
        let mut origin = bounds.center().coords;
        let mut extents = bounds.extents();
        origin.z = 0.0;
        extents.z = 1.0;
        if extents.x == 0.0 || extents.y == 0.0 {
            return;
        }

        let perfect_origin = Vec3::new(s_repeat * 0.5, t_repeat * 0.5, 0.0);
        let perfect_extents = Vec3::new(s_repeat * 0.5, t_repeat * 0.5, 1.0);

        let matrix = Mat4::new_translation(&(origin - perfect_origin))
            * Mat4::new_translation(&perfect_origin)
            * Mat4::new_nonuniform_scaling(&extents.component_div(&perfect_extents))
            * Mat4::new_translation(&-perfect_origin);
        let Some(inverse) = matrix.try_inverse() else {
            return;
        };

        if let Some(fitted) = TexDef::from_transform(width, height, &(inverse * st2tex)) {
            *self = fitted;
            self.normalise(width, height);
        }
    }

    /// Update the projection so the texture stays fixed to the surface while
    /// `plane` is moved by `identity2transformed`.
    pub fn transform_locked(
        &mut self,
        width: f64,
        height: f64,
        plane: &Plane3,
        identity2transformed: &Mat4,
    ) {
        let normal_transformed = identity2transformed.transform_vector(&plane.normal);

        let identity2st_identity = basis_for_normal(&plane.normal);
        let transformed2st_transformed = basis_for_normal(&normal_transformed);

        let Some(st_transformed2identity) =
            (transformed2st_transformed * identity2transformed).try_inverse()
        else {
            return;
        };
        let Some(st_identity2identity) = identity2st_identity.try_inverse() else {
            return;
        };

        let original_axis = st_identity2identity.fixed_view::<3, 1>(0, 2).into_owned();
        let transformed_axis = st_transformed2identity.fixed_view::<3, 1>(0, 2).into_owned();

        let st_identity2st_original = self.to_transform(width, height);
        let mut identity2st_original = st_identity2st_original * identity2st_identity;

        if original_axis.dot(&transformed_axis) == 0.0 {
            // The projection axis flipped by 90 degrees, e.g. for a plane
            // X == Y either axis could have been chosen.
            let corrected = reflection_for_plane45(plane, &original_axis, &transformed_axis);
            identity2st_original *= corrected;
        }

        let st_transformed2st_original = identity2st_original * st_transformed2identity;
        if let Some(locked) = TexDef::from_transform(width, height, &st_transformed2st_original) {
            *self = locked;
            self.normalise(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::winding::WindingVertex;
    use approx::assert_relative_eq;
    use radiant_math::Transform;

    fn square_winding(z: f64, min: f64, max: f64) -> Winding {
        Winding::from_vertices(vec![
            WindingVertex::new(Point3::new(max, max, z), Some(0)),
            WindingVertex::new(Point3::new(max, min, z), Some(1)),
            WindingVertex::new(Point3::new(min, min, z), Some(2)),
            WindingVertex::new(Point3::new(min, max, z), Some(3)),
        ])
    }

    fn fract_close(a: f64, b: f64) -> bool {
        let d = (a - b).rem_euclid(1.0);
        d < 1e-6 || d > 1.0 - 1e-6
    }

    #[test]
    fn test_transform_round_trip() {
        let texdef = TexDef {
            shift: [8.0, 16.0],
            scale: [0.5, 0.25],
            rotate: 30.0,
        };
        let m = texdef.to_transform(64.0, 128.0);
        let back = TexDef::from_transform(64.0, 128.0, &m).unwrap();
        assert_relative_eq!(back.shift[0], 8.0, epsilon = 1e-9);
        assert_relative_eq!(back.shift[1], 16.0, epsilon = 1e-9);
        assert_relative_eq!(back.scale[0], 0.5, epsilon = 1e-9);
        assert_relative_eq!(back.scale[1], 0.25, epsilon = 1e-9);
        assert_relative_eq!(back.rotate, 30.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mirrored_scale_round_trip() {
        let texdef = TexDef {
            shift: [0.0, 0.0],
            scale: [-0.5, 0.5],
            rotate: 0.0,
        };
        let back = TexDef::from_transform(64.0, 64.0, &texdef.to_transform(64.0, 64.0)).unwrap();
        assert_relative_eq!(back.scale[0], -0.5, epsilon = 1e-9);
        assert_relative_eq!(back.scale[1], 0.5, epsilon = 1e-9);
        assert!(back.rotate.abs() < 1e-9);
    }

    #[test]
    fn test_normalise_shift() {
        let mut texdef = TexDef {
            shift: [-16.0, 80.0],
            ..TexDef::default()
        };
        texdef.normalise(64.0, 64.0);
        assert_eq!(texdef.shift, [48.0, 16.0]);
    }

    #[test]
    fn test_rotate_wraps() {
        let mut texdef = TexDef::default();
        texdef.rotate = 350.0;
        texdef.rotate_by(20.0);
        assert_eq!(texdef.rotate, 10.0);
        texdef.rotate_by(-30.0);
        assert_eq!(texdef.rotate, 340.0);
        texdef.rotate_by(-700.0);
        assert_eq!(texdef.rotate, 0.0);
    }

    #[test]
    fn test_zero_scale_uses_default() {
        let zero = TexDef {
            scale: [0.0, 0.0],
            ..TexDef::default()
        };
        let m = zero.to_transform(64.0, 64.0);
        assert!(m.iter().all(|v| v.is_finite()));
        assert_eq!(m, TexDef::default().to_transform(64.0, 64.0));
    }

    #[test]
    fn test_flip_twice_restores() {
        let original = TexDef {
            shift: [4.0, 0.0],
            scale: [0.5, -0.25],
            rotate: 90.0,
        };
        for axis in [TexAxis::S, TexAxis::T] {
            let mut texdef = original;
            texdef.flip(axis);
            assert_ne!(texdef, original);
            texdef.flip(axis);
            assert_eq!(texdef.scale, original.scale);
            assert_eq!(texdef.rotate.rem_euclid(360.0), original.rotate);
        }
    }

    #[test]
    fn test_projection_axis() {
        assert_eq!(projection_axis_for_normal(&Vec3::x()), ProjectionAxis::X);
        assert_eq!(projection_axis_for_normal(&-Vec3::y()), ProjectionAxis::Y);
        assert_eq!(projection_axis_for_normal(&Vec3::z()), ProjectionAxis::Z);
        // ties fall through to the later axis
        let diagonal = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert_eq!(projection_axis_for_normal(&diagonal), ProjectionAxis::Y);
    }

    #[test]
    fn test_axis_base() {
        let (s, t) = axis_base(&Vec3::z());
        assert_eq!((s, t), (Vec3::y(), Vec3::x()));
        let (s, t) = axis_base(&-Vec3::z());
        assert_eq!((s, t), (Vec3::y(), -Vec3::x()));
        let n = Vec3::x();
        let (s, t) = axis_base(&n);
        assert!(s.dot(&n).abs() < 1e-12);
        assert!(t.dot(&n).abs() < 1e-12);
        assert!(s.dot(&t).abs() < 1e-12);
    }

    #[test]
    fn test_emit_texture_coordinates() {
        let mut w = square_winding(64.0, -32.0, 32.0);
        TexDef::default().emit_texture_coordinates(64.0, 64.0, &mut w, &Vec3::z());
        assert_relative_eq!(w[0].texcoord.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(w[0].texcoord.y, -1.0, epsilon = 1e-12);
        assert_relative_eq!(w[0].tangent, Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(w[0].bitangent, -Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_fit_texture() {
        let mut w = square_winding(0.0, 0.0, 64.0);
        let mut texdef = TexDef::default();
        texdef.fit(64.0, 64.0, &Vec3::z(), &w, 1.0, 1.0);
        assert_relative_eq!(texdef.scale[0].abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(texdef.scale[1].abs(), 1.0, epsilon = 1e-9);

        texdef.emit_texture_coordinates(64.0, 64.0, &mut w, &Vec3::z());
        let (lo, hi) = w.iter().fold((f64::MAX, f64::MIN), |(lo, hi), v| {
            (lo.min(v.texcoord.x), hi.max(v.texcoord.x))
        });
        assert_relative_eq!(hi - lo, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_texture_lock_translation() {
        let plane = Plane3::new(Vec3::z(), 0.0);
        let w = square_winding(0.0, -32.0, 32.0);
        let mut before = w.clone();
        let texdef = TexDef::default();
        texdef.emit_texture_coordinates(64.0, 64.0, &mut before, &plane.normal);

        let t = Transform::translation(16.0, 0.0, 0.0);
        let mut locked = texdef;
        locked.transform_locked(64.0, 64.0, &plane, &t.matrix);

        let mut after = Winding::from_vertices(
            w.iter()
                .map(|v| WindingVertex::new(t.apply_point(&v.vertex), v.adjacent))
                .collect(),
        );
        locked.emit_texture_coordinates(64.0, 64.0, &mut after, &plane.normal);
        for (a, b) in before.iter().zip(after.iter()) {
            assert!(fract_close(a.texcoord.x, b.texcoord.x));
            assert!(fract_close(a.texcoord.y, b.texcoord.y));
        }
    }

    #[test]
    fn test_texture_lock_rotation() {
        let plane = Plane3::new(Vec3::z(), 0.0);
        let w = square_winding(0.0, 0.0, 48.0);
        let mut before = w.clone();
        let texdef = TexDef {
            shift: [3.0, 5.0],
            scale: [0.5, 0.5],
            rotate: 15.0,
        };
        texdef.emit_texture_coordinates(64.0, 64.0, &mut before, &plane.normal);

        let r = Transform::rotation_z(std::f64::consts::FRAC_PI_2);
        let mut locked = texdef;
        locked.transform_locked(64.0, 64.0, &plane, &r.matrix);

        let mut after = Winding::from_vertices(
            w.iter()
                .map(|v| WindingVertex::new(r.apply_point(&v.vertex), v.adjacent))
                .collect(),
        );
        locked.emit_texture_coordinates(64.0, 64.0, &mut after, &plane.normal);
        for (a, b) in before.iter().zip(after.iter()) {
            assert!(fract_close(a.texcoord.x, b.texcoord.x));
            assert!(fract_close(a.texcoord.y, b.texcoord.y));
        }
    }
}
