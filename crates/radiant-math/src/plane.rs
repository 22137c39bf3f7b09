//! Planes stored as unit normal plus signed distance from the origin.

use std::ops::Neg;

use crate::{vec3_equal_epsilon, Point3, Vec3, PLANE_EPSILON};

/// An oriented plane `normal · p = dist`.
///
/// The half-space in front of the plane is the side the normal points to.
/// A brush face keeps the region *behind* its plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3 {
    /// Unit normal, or zero for a plane built from collinear points.
    pub normal: Vec3,
    /// Signed distance from the origin along the normal.
    pub dist: f64,
}

impl Plane3 {
    /// Construct from an explicit normal and distance.
    pub fn new(normal: Vec3, dist: f64) -> Self {
        Self { normal, dist }
    }

    /// Plane through three points, oriented by `(p0 - p1) × (p2 - p1)`.
    ///
    /// Collinear points give a zero normal; check [`Plane3::is_valid`].
    pub fn from_points(p0: &Point3, p1: &Point3, p2: &Point3) -> Self {
        let cross = (p0 - p1).cross(&(p2 - p1));
        let len = cross.norm();
        let normal = if len > 0.0 { cross / len } else { Vec3::zeros() };
        Self {
            normal,
            dist: normal.dot(&p0.coords),
        }
    }

    /// True if the normal has unit length.
    pub fn is_valid(&self) -> bool {
        (self.normal.norm_squared() - 1.0).abs() < 0.01
    }

    /// Signed distance of `p` from the plane, positive in front.
    pub fn distance_to(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.dist
    }

    /// Normal and distance both match `other` within [`PLANE_EPSILON`].
    pub fn coincides_with(&self, other: &Plane3) -> bool {
        vec3_equal_epsilon(&self.normal, &other.normal, PLANE_EPSILON)
            && (self.dist - other.dist).abs() < PLANE_EPSILON
    }

    /// Same plane, facing the other way.
    pub fn opposes(&self, other: &Plane3) -> bool {
        self.coincides_with(&-*other)
    }

    /// Returns true if `self` takes priority over `other` when both bound a brush.
    ///
    /// Planes with different normals never compete. For parallel planes facing
    /// the same way the one with the smaller distance is tighter and wins.
    pub fn inside(&self, other: &Plane3) -> bool {
        if vec3_equal_epsilon(&self.normal, &other.normal, PLANE_EPSILON) {
            return self.dist < other.dist;
        }
        true
    }

    /// If the normal is exactly a signed coordinate axis, return the axis index
    /// and the sign.
    pub fn axial(&self) -> Option<(usize, f64)> {
        (0..3).find_map(|i| {
            if self.normal[i] == 1.0 {
                Some((i, 1.0))
            } else if self.normal[i] == -1.0 {
                Some((i, -1.0))
            } else {
                None
            }
        })
    }

    /// The single point shared by three planes, if their normals are independent.
    pub fn intersect(a: &Plane3, b: &Plane3, c: &Plane3) -> Option<Point3> {
        let bc = b.normal.cross(&c.normal);
        let denom = a.normal.dot(&bc);
        if denom.abs() < 1e-12 {
            return None;
        }
        let ca = c.normal.cross(&a.normal);
        let ab = a.normal.cross(&b.normal);
        let p = (bc * a.dist + ca * b.dist + ab * c.dist) / denom;
        Some(Point3::from(p))
    }
}

impl Neg for Plane3 {
    type Output = Plane3;

    fn neg(self) -> Plane3 {
        Plane3::new(-self.normal, -self.dist)
    }
}
