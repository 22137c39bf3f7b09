//! Brush primitives: cuboid, prism, cone and sphere.
//!
//! Every builder returns an evaluated brush. Side-plane points are rounded
//! to whole units so the planes survive a save/load cycle exactly.

use std::f64::consts::PI;

use radiant_math::{Aabb, Point3, Vec3};

use crate::brush::{Brush, MAX_FACES};
use crate::error::BrushError;
use crate::texdef::TexDef;

/// Smallest side count for a prism.
pub const PRISM_MIN_SIDES: usize = 3;
/// Largest side count for a prism (two faces are taken by the caps).
pub const PRISM_MAX_SIDES: usize = MAX_FACES - 2;
/// Smallest side count for a cone.
pub const CONE_MIN_SIDES: usize = 3;
/// Largest side count for a cone.
pub const CONE_MAX_SIDES: usize = 32;
/// Smallest side count for a sphere.
pub const SPHERE_MIN_SIDES: usize = 3;
/// Largest side count for a sphere.
pub const SPHERE_MAX_SIDES: usize = 31;

fn check_sides(shape: &'static str, sides: usize, min: usize, max: usize) -> Result<(), BrushError> {
    if sides < min || sides > max {
        return Err(BrushError::sides(shape, min, max, sides));
    }
    Ok(())
}

fn check_bounds(bounds: &Aabb) -> Result<(), BrushError> {
    let e = bounds.extents();
    if bounds.is_empty() || e.x <= 0.0 || e.y <= 0.0 || e.z <= 0.0 {
        return Err(BrushError::DegenerateBounds(format!(
            "{:?} - {:?}",
            bounds.min, bounds.max
        )));
    }
    Ok(())
}

fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

fn spherical(theta: f64, phi: f64) -> Vec3 {
    Vec3::new(theta.cos() * phi.cos(), theta.sin() * phi.cos(), phi.sin())
}

/// An axis-aligned box filling `bounds`.
///
/// Faces are emitted +Z, +Y, +X, -Z, -Y, -X.
pub fn cuboid(bounds: &Aabb, shader: &str, texdef: &TexDef) -> Result<Brush, BrushError> {
    check_bounds(bounds)?;
    const BOX: [[usize; 2]; 3] = [[0, 1], [2, 0], [1, 2]];
    let mins = bounds.min;
    let maxs = bounds.max;

    let mut brush = Brush::new();
    brush.reserve(6);
    for axes in BOX {
        let mut p1 = maxs;
        let mut p2 = maxs;
        p2[axes[0]] = mins[axes[0]];
        p1[axes[1]] = mins[axes[1]];
        brush.add_plane(maxs, p1, p2, shader, *texdef);
    }
    for axes in BOX {
        let mut p1 = mins;
        let mut p2 = mins;
        p1[axes[0]] = maxs[axes[0]];
        p2[axes[1]] = maxs[axes[1]];
        brush.add_plane(mins, p1, p2, shader, *texdef);
    }
    Ok(brush.evaluated())
}

/// A prism with `sides` faces around `axis`, capped at both ends.
pub fn prism(
    bounds: &Aabb,
    sides: usize,
    axis: usize,
    shader: &str,
    texdef: &TexDef,
) -> Result<Brush, BrushError> {
    check_sides("prism", sides, PRISM_MIN_SIDES, PRISM_MAX_SIDES)?;
    check_bounds(bounds)?;
    let axis = axis.min(2);
    let (a1, a2) = ((axis + 1) % 3, (axis + 2) % 3);
    let mins = bounds.min;
    let maxs = bounds.max;
    let mid = bounds.center();
    let e = bounds.extents();
    let radius = e[a1].max(e[a2]);

    let mut brush = Brush::new();
    brush.reserve(sides + 2);

    let mut p = [Point3::origin(); 3];
    p[2][a1] = mins[a1];
    p[2][a2] = mins[a2];
    p[2][axis] = maxs[axis];
    p[1][a1] = maxs[a1];
    p[1][a2] = mins[a2];
    p[1][axis] = maxs[axis];
    p[0][a1] = maxs[a1];
    p[0][a2] = maxs[a2];
    p[0][axis] = maxs[axis];
    brush.add_plane(p[0], p[1], p[2], shader, *texdef);

    p[0][a1] = mins[a1];
    p[0][a2] = mins[a2];
    p[0][axis] = mins[axis];
    p[1][a1] = maxs[a1];
    p[1][a2] = mins[a2];
    p[1][axis] = mins[axis];
    p[2][a1] = maxs[a1];
    p[2][a2] = maxs[a2];
    p[2][axis] = mins[axis];
    brush.add_plane(p[0], p[1], p[2], shader, *texdef);

    for i in 0..sides {
        let (sv, cv) = (i as f64 * PI * 2.0 / sides as f64).sin_cos();

        p[0][a1] = round_half_up(mid[a1] + radius * cv);
        p[0][a2] = round_half_up(mid[a2] + radius * sv);
        p[0][axis] = mins[axis];

        p[1][a1] = p[0][a1];
        p[1][a2] = p[0][a2];
        p[1][axis] = maxs[axis];

        p[2][a1] = round_half_up(p[0][a1] - radius * sv);
        p[2][a2] = round_half_up(p[0][a2] + radius * cv);
        p[2][axis] = maxs[axis];

        brush.add_plane(p[0], p[1], p[2], shader, *texdef);
    }
    Ok(brush.evaluated())
}

/// A cone along Z with `sides` faces meeting at the top center.
pub fn cone(bounds: &Aabb, sides: usize, shader: &str, texdef: &TexDef) -> Result<Brush, BrushError> {
    check_sides("cone", sides, CONE_MIN_SIDES, CONE_MAX_SIDES)?;
    check_bounds(bounds)?;
    let mins = bounds.min;
    let maxs = bounds.max;
    let mid = bounds.center();
    let e = bounds.extents();
    let radius = e.x.max(e.y).max(e.z);

    let mut brush = Brush::new();
    brush.reserve(sides + 1);
    brush.add_plane(
        Point3::new(mins.x, mins.y, mins.z),
        Point3::new(maxs.x, mins.y, mins.z),
        Point3::new(maxs.x, maxs.y, mins.z),
        shader,
        *texdef,
    );

    for i in 0..sides {
        let (sv, cv) = (i as f64 * PI * 2.0 / sides as f64).sin_cos();
        let p0 = Point3::new(
            round_half_up(mid.x + radius * cv),
            round_half_up(mid.y + radius * sv),
            mins.z,
        );
        let p1 = Point3::new(mid.x, mid.y, maxs.z);
        let p2 = Point3::new(
            round_half_up(p0.x - radius * sv),
            round_half_up(p0.y + radius * cv),
            maxs.z,
        );
        brush.add_plane(p0, p1, p2, shader, *texdef);
    }
    Ok(brush.evaluated())
}

/// A sphere approximated by `sides` longitude bands of `sides` faces.
pub fn sphere(
    bounds: &Aabb,
    sides: usize,
    shader: &str,
    texdef: &TexDef,
) -> Result<Brush, BrushError> {
    check_sides("sphere", sides, SPHERE_MIN_SIDES, SPHERE_MAX_SIDES)?;
    check_bounds(bounds)?;
    let mid = bounds.center();
    let e = bounds.extents();
    let radius = e.x.max(e.y).max(e.z);
    let dt = 2.0 * PI / sides as f64;
    let dp = PI / sides as f64;

    let mut brush = Brush::new();
    brush.reserve(sides * sides);
    for i in 0..sides {
        for j in 0..sides - 1 {
            let t = i as f64 * dt;
            let p = j as f64 * dp - PI / 2.0;
            brush.add_plane(
                mid + spherical(t, p) * radius,
                mid + spherical(t, p + dp) * radius,
                mid + spherical(t + dt, p + dp) * radius,
                shader,
                *texdef,
            );
        }
    }

    let p = (sides - 1) as f64 * dp - PI / 2.0;
    for i in 0..sides {
        let t = i as f64 * dt;
        brush.add_plane(
            mid + spherical(t, p) * radius,
            mid + spherical(t + dt, p + dp) * radius,
            mid + spherical(t + dt, p) * radius,
            shader,
            *texdef,
        );
    }
    Ok(brush.evaluated())
}

/// Six boxes walling in the region between `mins` and `maxs`, 32 units thick.
pub fn region_brushes(mins: &Point3, maxs: &Point3, shader: &str) -> Result<Vec<Brush>, BrushError> {
    let pad = Vec3::new(32.0, 32.0, 32.0);
    let mut brushes = Vec::with_capacity(6);
    for i in 0..3 {
        let mut hi = maxs + pad;
        hi[i] = mins[i];
        brushes.push(cuboid(&Aabb::new(mins - pad, hi), shader, &TexDef::default())?);
    }
    for i in 0..3 {
        let mut lo = mins - pad;
        lo[i] = maxs[i];
        brushes.push(cuboid(&Aabb::new(lo, maxs + pad), shader, &TexDef::default())?);
    }
    Ok(brushes)
}
