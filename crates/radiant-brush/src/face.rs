//! Brush faces: a plane given by three points, a shader and a texture projection.

use serde::{Deserialize, Serialize};

use radiant_math::{quantise, snapped, Mat4, Plane3, Point3, Transform};

use crate::error::BrushError;
use crate::flags::ContentsFlagsValue;
use crate::shader::FaceShader;
use crate::texdef::{TexAxis, TexDef};
use crate::winding::Winding;

/// A face plane stored as the three points it was defined with.
///
/// The points are kept so a plane survives save/load exactly; the derived
/// [`Plane3`] is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacePlane {
    points: [Point3; 3],
    #[serde(skip, default = "zero_plane")]
    plane: Plane3,
}

fn zero_plane() -> Plane3 {
    Plane3::new(radiant_math::Vec3::zeros(), 0.0)
}

impl FacePlane {
    /// Plane through three points.
    pub fn new(p0: Point3, p1: Point3, p2: Point3) -> Self {
        Self {
            points: [p0, p1, p2],
            plane: Plane3::from_points(&p0, &p1, &p2),
        }
    }

    /// The defining points.
    pub fn points(&self) -> &[Point3; 3] {
        &self.points
    }

    /// The derived plane.
    pub fn plane3(&self) -> Plane3 {
        self.plane
    }

    fn update(&mut self) {
        self.plane = Plane3::from_points(&self.points[0], &self.points[1], &self.points[2]);
    }

    /// Recompute the cached plane, e.g. after deserialization.
    pub fn refresh(&mut self) {
        self.update();
    }

    /// Swap the first and last point, flipping the plane.
    pub fn reverse(&mut self) {
        self.points.swap(0, 2);
        self.update();
    }

    /// Move the plane `offset` units along its normal.
    pub fn offset(&mut self, offset: f64) {
        let step = self.plane.normal * offset;
        for p in &mut self.points {
            *p += step;
        }
        self.update();
    }

    /// Transform the points, keeping the plane facing outwards under mirroring,
    /// and quantise the result.
    pub fn transform(&mut self, matrix: &Mat4, mirror: bool) {
        let t = Transform::from_matrix(*matrix);
        for p in &mut self.points {
            *p = t.apply_point(p);
        }
        if mirror {
            self.points.swap(0, 2);
        }
        for p in &mut self.points {
            for i in 0..3 {
                p[i] = quantise(p[i]);
            }
        }
        self.update();
    }

    /// Round every point coordinate to the grid.
    pub fn snap(&mut self, grid: f64) {
        for p in &mut self.points {
            for i in 0..3 {
                p[i] = snapped(p[i], grid);
            }
        }
        self.update();
    }
}

/// One face of a brush.
///
/// The face keeps a committed state (plane and texture projection) and a
/// live copy of both. Interactive transforms write to the live copy only;
/// [`Face::freeze_transform`] commits it and [`Face::revert_transform`]
/// discards it. The winding is always derived from the live plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    plane: FacePlane,
    plane_transformed: FacePlane,
    texdef: TexDef,
    texdef_transformed: TexDef,
    shader: FaceShader,
    winding: Winding,
}

impl Face {
    /// A face through three points with the given shader and projection.
    pub fn new(p0: Point3, p1: Point3, p2: Point3, shader: &str, texdef: TexDef) -> Self {
        Self::with_shader(p0, p1, p2, FaceShader::new(shader), texdef)
    }

    /// A face through three points with a complete shader.
    pub fn with_shader(
        p0: Point3,
        p1: Point3,
        p2: Point3,
        shader: FaceShader,
        texdef: TexDef,
    ) -> Self {
        let plane = FacePlane::new(p0, p1, p2);
        Self {
            plane_transformed: plane.clone(),
            plane,
            texdef,
            texdef_transformed: texdef,
            shader,
            winding: Winding::new(),
        }
    }

    /// The live plane, including any uncommitted transform.
    pub fn plane3(&self) -> Plane3 {
        self.plane_transformed.plane3()
    }

    /// The live defining points.
    pub fn plane_points(&self) -> &[Point3; 3] {
        self.plane_transformed.points()
    }

    /// The committed plane.
    pub fn committed_plane(&self) -> &FacePlane {
        &self.plane
    }

    /// The polygon this face contributes to the brush.
    pub fn winding(&self) -> &Winding {
        &self.winding
    }

    pub(crate) fn winding_mut(&mut self) -> &mut Winding {
        &mut self.winding
    }

    /// True if the face has a polygon with area.
    pub fn contributes(&self) -> bool {
        self.winding.len() > 2
    }

    /// True if every winding edge was cut by another face.
    pub fn is_bounded(&self) -> bool {
        self.winding.is_bounded()
    }

    /// The live texture projection.
    pub fn texdef(&self) -> &TexDef {
        &self.texdef_transformed
    }

    /// Replace the texture projection.
    pub fn set_texdef(&mut self, texdef: TexDef) {
        self.texdef = texdef;
        self.texdef_changed();
    }

    /// The shader.
    pub fn shader(&self) -> &FaceShader {
        &self.shader
    }

    /// Full shader name.
    pub fn shader_name(&self) -> &str {
        self.shader.name()
    }

    /// Replace the shader name.
    pub fn set_shader(&mut self, name: &str) -> Result<(), BrushError> {
        self.shader.set_name(name)?;
        self.emit_texture_coordinates();
        Ok(())
    }

    /// Set the texture size in pixels and re-project.
    pub fn set_texture_size(&mut self, width: u32, height: u32) {
        self.shader.set_size(width, height);
        self.emit_texture_coordinates();
    }

    /// Content flags, surface flags and value.
    pub fn flags(&self) -> &ContentsFlagsValue {
        &self.shader.flags
    }

    /// Write flags, keeping the bits `flags` marks as dirty.
    pub fn set_flags(&mut self, flags: &ContentsFlagsValue) {
        self.shader.flags.assign_masked(flags);
    }

    /// True if the detail content bit is set.
    pub fn is_detail(&self) -> bool {
        self.shader.is_detail()
    }

    /// Set or clear the detail content bit.
    pub fn set_detail(&mut self, detail: bool) {
        self.shader.set_detail(detail);
    }

    /// Apply `matrix` to the live state.
    ///
    /// The transform is applied to the committed plane, so repeated calls
    /// replace each other rather than accumulate.
    pub fn transform(&mut self, matrix: &Mat4, mirror: bool, texture_lock: bool) {
        self.texdef_transformed = self.texdef;
        if texture_lock {
            self.texdef_transformed.transform_locked(
                self.shader.width(),
                self.shader.height(),
                &self.plane.plane3(),
                matrix,
            );
        }
        self.plane_transformed = self.plane.clone();
        self.plane_transformed.transform(matrix, mirror);
    }

    /// Discard the live transform.
    pub fn revert_transform(&mut self) {
        self.plane_transformed = self.plane.clone();
        self.texdef_transformed = self.texdef;
    }

    /// Commit the live transform.
    pub fn freeze_transform(&mut self) {
        self.plane = self.plane_transformed.clone();
        self.texdef = self.texdef_transformed;
    }

    /// Call after editing the committed plane.
    pub fn plane_changed(&mut self) {
        self.revert_transform();
    }

    /// Move the committed plane along its normal.
    pub fn offset(&mut self, offset: f64) {
        self.plane.offset(offset);
        self.plane_changed();
    }

    /// Reverse the committed plane so the face bounds the opposite half-space.
    pub fn flip_winding(&mut self) {
        self.plane.reverse();
        self.plane_changed();
    }

    /// Snap the plane points to the grid. Faces without a polygon are left alone.
    pub fn snap_to(&mut self, grid: f64) {
        if self.contributes() {
            self.plane_transformed.snap(grid);
            self.freeze_transform();
        }
    }

    /// Recompute texture coordinates of the winding.
    pub fn emit_texture_coordinates(&mut self) {
        let normal = self.plane3().normal;
        self.texdef_transformed.emit_texture_coordinates(
            self.shader.width(),
            self.shader.height(),
            &mut self.winding,
            &normal,
        );
    }

    fn texdef_changed(&mut self) {
        self.texdef_transformed = self.texdef;
        self.emit_texture_coordinates();
    }

    /// Shift the texture by `(s, t)` pixels.
    pub fn shift_texdef(&mut self, s: f64, t: f64) {
        self.texdef.shift_by(s, t);
        self.texdef_changed();
    }

    /// Add `(s, t)` to the texture scale.
    pub fn scale_texdef(&mut self, s: f64, t: f64) {
        self.texdef.scale_by(s, t);
        self.texdef_changed();
    }

    /// Rotate the texture by `angle` degrees.
    pub fn rotate_texdef(&mut self, angle: f64) {
        self.texdef.rotate_by(angle);
        self.texdef_changed();
    }

    /// Mirror the texture along one axis.
    pub fn flip_texture(&mut self, axis: TexAxis) {
        self.texdef.flip(axis);
        self.texdef_changed();
    }

    /// Fit the texture so it repeats `s_repeat` x `t_repeat` times across the face.
    pub fn fit_texture(&mut self, s_repeat: f64, t_repeat: f64) {
        let normal = self.plane3().normal;
        self.texdef.fit(
            self.shader.width(),
            self.shader.height(),
            &normal,
            &self.winding,
            s_repeat,
            t_repeat,
        );
        self.texdef_changed();
    }

    /// Reset to the unshifted, unrotated projection with the given scale.
    pub fn set_default_projection(&mut self, scale: f64) {
        self.texdef = TexDef::with_scale(scale);
        self.texdef_changed();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiant_math::Vec3;

    fn top_face() -> Face {
        Face::new(
            Point3::new(64.0, 64.0, 64.0),
            Point3::new(64.0, -64.0, 64.0),
            Point3::new(-64.0, 64.0, 64.0),
            "tex_misc/crate",
            TexDef::default(),
        )
    }

    #[test]
    fn test_transform_then_revert() {
        let mut face = top_face();
        let t = Transform::translation(0.0, 0.0, 16.0);
        face.transform(&t.matrix, false, false);
        assert!((face.plane3().dist - 80.0).abs() < 1e-12);
        assert!((face.committed_plane().plane3().dist - 64.0).abs() < 1e-12);

        // transforms replace each other
        face.transform(&t.matrix, false, false);
        assert!((face.plane3().dist - 80.0).abs() < 1e-12);

        face.revert_transform();
        assert!((face.plane3().dist - 64.0).abs() < 1e-12);
    }

    #[test]
    fn test_freeze_commits() {
        let mut face = top_face();
        face.transform(&Transform::translation(0.0, 0.0, -32.0).matrix, false, false);
        face.freeze_transform();
        face.revert_transform();
        assert!((face.plane3().dist - 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_mirror_keeps_outward_normal() {
        let mut face = top_face();
        let mirror = Transform::scale(1.0, 1.0, -1.0);
        assert!(mirror.is_mirror());
        face.transform(&mirror.matrix, true, false);
        assert!((face.plane3().normal - -Vec3::z()).norm() < 1e-12);
        assert!((face.plane3().dist - 64.0).abs() < 1e-12);
    }

    #[test]
    fn test_offset_and_flip() {
        let mut face = top_face();
        face.offset(8.0);
        assert!((face.plane3().dist - 72.0).abs() < 1e-12);
        face.flip_winding();
        assert!((face.plane3().normal + Vec3::z()).norm() < 1e-12);
        assert!((face.plane3().dist + 72.0).abs() < 1e-12);
    }

    #[test]
    fn test_texture_lock_moves_shift() {
        let mut face = top_face();
        face.transform(&Transform::translation(16.0, 0.0, 0.0).matrix, false, true);
        assert!((face.texdef().shift[0] - 32.0).abs() < 1e-9);
        face.revert_transform();
        assert_eq!(face.texdef().shift[0], 0.0);
    }

    #[test]
    fn test_texture_edits() {
        let mut face = top_face();
        face.shift_texdef(8.0, 4.0);
        face.rotate_texdef(45.0);
        face.scale_texdef(0.5, 0.0);
        assert_eq!(face.texdef().shift, [8.0, 4.0]);
        assert_eq!(face.texdef().rotate, 45.0);
        assert_eq!(face.texdef().scale, [1.0, 0.5]);
        face.set_default_projection(0.25);
        assert_eq!(*face.texdef(), TexDef::with_scale(0.25));
    }
}
