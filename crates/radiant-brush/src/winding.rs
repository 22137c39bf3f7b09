//! Convex polygons cut out of a face plane by the other planes of a brush.
//!
//! Each vertex records which face created the edge that *starts* at it
//! (`adjacent`). Walking a winding with [`Winding::next`] and following the
//! adjacency of each edge gives the brush connectivity graph.

use std::ops::{AddAssign, Index, IndexMut};

use radiant_math::{Plane3, Point3, Vec2, Vec3, ON_EPSILON};

/// Hard cap on the number of points in a single winding.
pub const MAX_POINTS_ON_WINDING: usize = 64;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// More than [`ON_EPSILON`] in front.
    Front,
    /// More than [`ON_EPSILON`] behind.
    Back,
    /// Within [`ON_EPSILON`] of the plane.
    On,
}

impl PlaneSide {
    /// Classify a signed distance.
    pub fn classify(distance: f64) -> Self {
        if distance > ON_EPSILON {
            PlaneSide::Front
        } else if distance < -ON_EPSILON {
            PlaneSide::Back
        } else {
            PlaneSide::On
        }
    }
}

/// Vertex counts of one or more windings classified against a plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitCounts {
    /// Vertices in front.
    pub front: usize,
    /// Vertices behind.
    pub back: usize,
    /// Vertices on the plane.
    pub on: usize,
}

impl SplitCounts {
    /// The plane passes through the interior (vertices on both sides).
    pub fn straddles(&self) -> bool {
        self.front != 0 && self.back != 0
    }
}

impl AddAssign for SplitCounts {
    fn add_assign(&mut self, other: SplitCounts) {
        self.front += other.front;
        self.back += other.back;
        self.on += other.on;
    }
}

/// One corner of a winding.
#[derive(Debug, Clone, PartialEq)]
pub struct WindingVertex {
    /// Position.
    pub vertex: Point3,
    /// Texture coordinate, filled in by texture projection.
    pub texcoord: Vec2,
    /// Texture-space S axis.
    pub tangent: Vec3,
    /// Texture-space T axis.
    pub bitangent: Vec3,
    /// Index of the face that cut the edge from this vertex to the next.
    /// `None` while the edge still lies on the unbounded starting polygon.
    pub adjacent: Option<usize>,
}

impl WindingVertex {
    /// A vertex with no texture data.
    pub fn new(vertex: Point3, adjacent: Option<usize>) -> Self {
        Self {
            vertex,
            texcoord: Vec2::zeros(),
            tangent: Vec3::zeros(),
            bitangent: Vec3::zeros(),
            adjacent,
        }
    }
}

/// An ordered convex polygon, clockwise when viewed from the front of its plane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Winding {
    points: Vec<WindingVertex>,
}

impl Winding {
    /// An empty winding.
    pub fn new() -> Self {
        Self::default()
    }

    /// A winding over the given vertices.
    pub fn from_vertices(points: Vec<WindingVertex>) -> Self {
        Self { points }
    }

    /// A square on `plane` large enough to cover the world, `size` units
    /// from the plane's origin point along each in-plane axis.
    pub fn infinite(plane: &Plane3, size: f64) -> Self {
        let n = plane.normal;
        let mut max = -1.0;
        let mut axis = 0;
        for i in 0..3 {
            let d = n[i].abs();
            if d > max {
                max = d;
                axis = i;
            }
        }

        let mut vup = if axis == 2 { Vec3::x() } else { Vec3::z() };
        vup -= n * vup.dot(&n);
        vup.normalize_mut();

        let org = Point3::from(n * plane.dist);
        let vright = vup.cross(&n) * size;
        let vup = vup * size;

        Self {
            points: vec![
                WindingVertex::new(org - vright + vup, None),
                WindingVertex::new(org + vright + vup, None),
                WindingVertex::new(org + vright - vup, None),
                WindingVertex::new(org - vright - vup, None),
            ],
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in order.
    pub fn points(&self) -> &[WindingVertex] {
        &self.points
    }

    /// Iterate the points in order.
    pub fn iter(&self) -> std::slice::Iter<'_, WindingVertex> {
        self.points.iter()
    }

    /// Iterate the points mutably.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, WindingVertex> {
        self.points.iter_mut()
    }

    /// Append a point.
    pub fn push(&mut self, v: WindingVertex) {
        self.points.push(v);
    }

    /// Remove the point at `index`, shifting later points down.
    pub fn erase(&mut self, index: usize) {
        self.points.remove(index);
    }

    /// Drop all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Index of the point after `index`, wrapping.
    pub fn next(&self, index: usize) -> usize {
        if index + 1 == self.points.len() {
            0
        } else {
            index + 1
        }
    }

    /// Index of the first edge whose adjacent face is `face`.
    pub fn find_adjacent(&self, face: usize) -> Option<usize> {
        self.points.iter().position(|p| p.adjacent == Some(face))
    }

    /// Every edge was cut by a real face.
    pub fn is_bounded(&self) -> bool {
        self.points.iter().all(|p| p.adjacent.is_some())
    }

    /// Average of the points.
    pub fn centroid(&self) -> Point3 {
        if self.points.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .points
            .iter()
            .fold(Vec3::zeros(), |acc, p| acc + p.vertex.coords);
        Point3::from(sum / self.points.len() as f64)
    }

    /// Reverse the point order, keeping each edge tagged with its adjacent face.
    pub fn reverse(&mut self) {
        let n = self.points.len();
        if n < 2 {
            return;
        }
        let adjacency: Vec<Option<usize>> = self.points.iter().map(|p| p.adjacent).collect();
        self.points.reverse();
        // edge i -> i+1 after reversal is the old edge (n-2-i) -> (n-1-i)
        for i in 0..n {
            let old_start = (2 * n - 2 - i) % n;
            self.points[i].adjacent = adjacency[old_start];
        }
    }

    /// Keep the part of this winding in front of (or on) `clip_plane`.
    ///
    /// Edges created by the cut are tagged with `adjacent`. Returns an empty
    /// winding if the result would exceed [`MAX_POINTS_ON_WINDING`].
    pub fn clip(&self, clip_plane: &Plane3, adjacent: usize) -> Winding {
        let n = self.points.len();
        let mut clipped = Winding::new();
        if n == 0 {
            return clipped;
        }

        let distances: Vec<f64> = self
            .points
            .iter()
            .map(|p| clip_plane.distance_to(&p.vertex))
            .collect();

        for i in 0..n {
            let next = self.next(i);
            let side = PlaneSide::classify(distances[i]);
            let next_side = PlaneSide::classify(distances[next]);
            let vertex = &self.points[i];

            if side == PlaneSide::On {
                if next_side == PlaneSide::Back {
                    // this edge now lies along the clip plane
                    clipped.push(WindingVertex::new(vertex.vertex, Some(adjacent)));
                } else {
                    clipped.push(vertex.clone());
                }
                continue;
            }

            if side == PlaneSide::Front {
                clipped.push(vertex.clone());
            }

            if next_side == PlaneSide::On || next_side == side {
                continue;
            }
            if side == PlaneSide::Front && n == 2 {
                continue;
            }

            let mid = edge_intersection(
                &vertex.vertex,
                &self.points[next].vertex,
                distances[i],
                distances[next],
                clip_plane,
            );
            if side == PlaneSide::Front {
                clipped.push(WindingVertex::new(mid, Some(adjacent)));
            } else {
                clipped.push(WindingVertex::new(mid, vertex.adjacent));
            }
        }

        if clipped.len() > MAX_POINTS_ON_WINDING {
            log::warn!(
                "winding clip produced {} points, limit is {}",
                clipped.len(),
                MAX_POINTS_ON_WINDING
            );
            return Winding::new();
        }
        clipped
    }

    /// Count the points on each side of `plane`.
    pub fn classify_plane(&self, plane: &Plane3) -> SplitCounts {
        let mut counts = SplitCounts::default();
        for p in &self.points {
            match PlaneSide::classify(plane.distance_to(&p.vertex)) {
                PlaneSide::Front => counts.front += 1,
                PlaneSide::Back => counts.back += 1,
                PlaneSide::On => counts.on += 1,
            }
        }
        counts
    }

    /// True if no point lies in front of `plane`.
    pub fn is_behind(&self, plane: &Plane3) -> bool {
        self.points
            .iter()
            .all(|p| PlaneSide::classify(plane.distance_to(&p.vertex)) != PlaneSide::Front)
    }

    /// Two coplanar windings share a region of positive area.
    ///
    /// Both windings must lie in planes with the given `normal` (up to sign).
    /// Windings that only touch along an edge or at a corner do not overlap.
    pub fn overlaps_coplanar(&self, other: &Winding, normal: &Vec3) -> bool {
        if self.len() < 3 || other.len() < 3 {
            return false;
        }
        let a = project_dominant(&self.points, normal);
        let b = project_dominant(&other.points, normal);
        !has_separating_axis(&a, &b) && !has_separating_axis(&b, &a)
    }
}

impl Index<usize> for Winding {
    type Output = WindingVertex;

    fn index(&self, index: usize) -> &WindingVertex {
        &self.points[index]
    }
}

impl IndexMut<usize> for Winding {
    fn index_mut(&mut self, index: usize) -> &mut WindingVertex {
        &mut self.points[index]
    }
}

/// An edge shorter than [`ON_EPSILON`] is collapsed during B-Rep cleanup.
pub fn edge_is_degenerate(a: &Point3, b: &Point3) -> bool {
    (a - b).norm_squared() < ON_EPSILON * ON_EPSILON
}

/// True if either winding pokes out in front of the other's plane.
/// Two faces of one convex solid never do.
pub fn planes_concave(w1: &Winding, w2: &Winding, plane1: &Plane3, plane2: &Plane3) -> bool {
    !w1.is_behind(plane2) || !w2.is_behind(plane1)
}

fn edge_intersection(a: &Point3, b: &Point3, da: f64, db: f64, plane: &Plane3) -> Point3 {
    let t = da / (da - db);
    let mut mid = a + (b - a) * t;
    // keep axial cuts exactly on the plane
    if let Some((axis, sign)) = plane.axial() {
        mid[axis] = sign * plane.dist;
    }
    mid
}

fn project_dominant(points: &[WindingVertex], normal: &Vec3) -> Vec<Vec2> {
    let (u, v) = if normal.x.abs() >= normal.y.abs() && normal.x.abs() >= normal.z.abs() {
        (1, 2)
    } else if normal.y.abs() >= normal.z.abs() {
        (0, 2)
    } else {
        (0, 1)
    };
    points
        .iter()
        .map(|p| Vec2::new(p.vertex[u], p.vertex[v]))
        .collect()
}

fn has_separating_axis(edges_of: &[Vec2], other: &[Vec2]) -> bool {
    let n = edges_of.len();
    (0..n).any(|i| {
        let e = edges_of[(i + 1) % n] - edges_of[i];
        let axis = Vec2::new(-e.y, e.x);
        if axis.norm_squared() == 0.0 {
            return false;
        }
        let axis = axis.normalize();
        let (min_a, max_a) = project_range(edges_of, &axis);
        let (min_b, max_b) = project_range(other, &axis);
        max_a <= min_b + ON_EPSILON || max_b <= min_a + ON_EPSILON
    })
}

fn project_range(points: &[Vec2], axis: &Vec2) -> (f64, f64) {
    points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        let d = p.dot(axis);
        (lo.min(d), hi.max(d))
    })
}
