//! Subtract one convex brush from another.
//!
//! The difference of two convex solids is generally not convex, so the
//! result is a set of convex fragments that together cover the source minus
//! the cutter. Two strategies are provided; they do not produce identical
//! fragment sets for the same inputs.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use radiant_brush::{Brush, Face};
use radiant_math::{Aabb, Point3};

use crate::classify::classify_brush;

/// How a subtraction carves the source into fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtractStrategy {
    /// One fragment per cutter face: the source outside that face and inside
    /// the pyramid from the cutter's centroid through the face's edges.
    #[default]
    ApexPyramid,
    /// Peel fragments off the source one cutter plane at a time.
    PlaneSweep,
}

fn evaluated_aabb(brush: &Brush) -> Aabb {
    if brush.needs_evaluation() {
        brush.clone().evaluated().aabb()
    } else {
        brush.aabb()
    }
}

fn chop(brush: &mut Brush, p0: Point3, p1: Point3, p2: Point3, face: &Face) {
    brush.add_plane(p0, p1, p2, face.shader_name(), *face.texdef());
}

fn cleaned(brush: &Brush) -> Brush {
    let mut copy = brush.clone();
    copy.remove_empty_faces();
    copy
}

/// Subtract `cutter` from `source`.
///
/// Returns `None` if nothing was removed; the caller keeps `source` as is.
/// Otherwise returns the fragments that replace `source`, which may be
/// empty when the cutter swallows the source whole.
pub fn subtract(source: &Brush, cutter: &Brush, strategy: SubtractStrategy) -> Option<Vec<Brush>> {
    if !evaluated_aabb(source).intersects(&evaluated_aabb(cutter)) {
        return None;
    }
    match strategy {
        SubtractStrategy::ApexPyramid => subtract_apex(source, cutter),
        SubtractStrategy::PlaneSweep => subtract_sweep(source, cutter),
    }
}

fn subtract_apex(source: &Brush, cutter: &Brush) -> Option<Vec<Brush>> {
    let cutter = cleaned(cutter);
    let apex = cutter.centroid();
    let mut fragments = Vec::with_capacity(cutter.len());

    for face in cutter.faces().iter().filter(|f| f.contributes()) {
        let mut fragment = cleaned(source);
        let [p0, p1, p2] = *face.plane_points();

        chop(&mut fragment, p0, p2, p1, face);
        fragment.remove_empty_faces();

        let winding = face.winding();
        for j in 0..winding.len() {
            let a = winding[j].vertex;
            let b = winding[winding.next(j)].vertex;
            chop(&mut fragment, apex, b, a, face);
            fragment.remove_empty_faces();
        }

        if fragment.has_contributing_faces() {
            fragments.push(fragment);
        }
    }

    if fragments.is_empty() {
        None
    } else {
        Some(fragments)
    }
}

fn subtract_sweep(source: &Brush, cutter: &Brush) -> Option<Vec<Brush>> {
    let cutter = cleaned(cutter);
    let mut back = cleaned(source);
    let mut fragments = Vec::with_capacity(cutter.len());

    for face in cutter.faces().iter().filter(|f| f.contributes()) {
        let split = classify_brush(&back, &face.plane3());
        if split.straddles() {
            let [p0, p1, p2] = *face.plane_points();

            let mut fragment = back.clone();
            chop(&mut fragment, p0, p2, p1, face);
            fragment.remove_empty_faces();
            fragments.push(fragment);

            chop(&mut back, p0, p1, p2, face);
            back.remove_empty_faces();
        } else if split.back == 0 {
            // source lies wholly outside this face of the cutter
            return None;
        }
    }
    Some(fragments)
}

/// Subtract every cutter from `source` in turn.
///
/// Each cutter is applied to every fragment produced so far. Returns `None`
/// if no cutter removed anything.
pub fn subtract_all(
    source: &Brush,
    cutters: &[Brush],
    strategy: SubtractStrategy,
) -> Option<Vec<Brush>> {
    let mut buffer = vec![source.clone()];
    let mut changed = false;

    for cutter in cutters {
        let mut next = Vec::with_capacity(buffer.len());
        for brush in buffer {
            match subtract(&brush, cutter, strategy) {
                Some(fragments) => {
                    changed = true;
                    next.extend(fragments);
                }
                None => next.push(brush),
            }
        }
        buffer = next;
    }

    if !changed {
        return None;
    }
    for brush in &mut buffer {
        brush.remove_empty_faces();
        debug_assert!(!brush.is_empty(), "brush left with no faces after subtract");
    }
    Some(buffer)
}

/// [`subtract_all`] over many sources, in parallel.
pub fn subtract_from_each(
    sources: &[Brush],
    cutters: &[Brush],
    strategy: SubtractStrategy,
) -> Vec<Option<Vec<Brush>>> {
    sources
        .par_iter()
        .map(|source| subtract_all(source, cutters, strategy))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiant_brush::{primitives, TexDef, DEFAULT_SHADER};
    use radiant_math::Point3;

    fn cuboid(min: [f64; 3], max: [f64; 3]) -> Brush {
        primitives::cuboid(
            &Aabb::new(Point3::from(min), Point3::from(max)),
            DEFAULT_SHADER,
            &TexDef::default(),
        )
        .unwrap()
    }

    fn volume(brush: &Brush) -> f64 {
        // divergence theorem over the face fans
        let mut v = 0.0;
        for face in brush.faces().iter().filter(|f| f.contributes()) {
            let w = face.winding();
            let o = w[0].vertex.coords;
            for j in 1..w.len() - 1 {
                let a = w[j].vertex.coords;
                let b = w[j + 1].vertex.coords;
                v += o.dot(&a.cross(&b));
            }
        }
        (v / 6.0).abs()
    }

    fn total_volume(brushes: &[Brush]) -> f64 {
        brushes.iter().map(volume).sum()
    }

    #[test]
    fn test_disjoint_is_no_op() {
        let source = cuboid([0.0; 3], [64.0; 3]);
        let cutter = cuboid([128.0; 3], [192.0; 3]);
        for strategy in [SubtractStrategy::ApexPyramid, SubtractStrategy::PlaneSweep] {
            assert!(subtract(&source, &cutter, strategy).is_none());
        }
    }

    #[test]
    fn test_touching_is_no_op() {
        let source = cuboid([0.0; 3], [64.0; 3]);
        let cutter = cuboid([64.0, 0.0, 0.0], [128.0, 64.0, 64.0]);
        assert!(subtract(&source, &cutter, SubtractStrategy::ApexPyramid).is_none());
    }

    #[test]
    fn test_sweep_hole_through_wall() {
        let wall = cuboid([0.0, 0.0, 0.0], [256.0, 16.0, 128.0]);
        let door = cuboid([96.0, -16.0, 0.0], [160.0, 32.0, 96.0]);
        let fragments = subtract(&wall, &door, SubtractStrategy::PlaneSweep).unwrap();
        assert_eq!(fragments.len(), 3);
        let expected = 256.0 * 16.0 * 128.0 - 64.0 * 16.0 * 96.0;
        assert!((total_volume(&fragments) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_apex_corner_cut_preserves_volume() {
        let source = cuboid([0.0; 3], [64.0; 3]);
        let cutter = cuboid([32.0; 3], [96.0; 3]);
        let fragments = subtract(&source, &cutter, SubtractStrategy::ApexPyramid).unwrap();
        assert!(!fragments.is_empty());
        let expected = 64.0f64.powi(3) - 32.0f64.powi(3);
        assert!((total_volume(&fragments) - expected).abs() < 1e-3);
        let bounds = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(64.0, 64.0, 64.0));
        for fragment in &fragments {
            assert!(bounds.contains_aabb(&fragment.aabb(), 1e-6));
            assert!(volume(fragment) > 0.0);
        }
    }

    #[test]
    fn test_sweep_swallowed_source_vanishes() {
        let source = cuboid([16.0; 3], [48.0; 3]);
        let cutter = cuboid([0.0; 3], [64.0; 3]);
        let fragments = subtract(&source, &cutter, SubtractStrategy::PlaneSweep).unwrap();
        assert!(fragments.is_empty());
        // every apex fragment is empty, so the source is left alone
        assert!(subtract(&source, &cutter, SubtractStrategy::ApexPyramid).is_none());
    }

    #[test]
    fn test_subtract_all_double_buffers() {
        let source = cuboid([0.0; 3], [128.0; 3]);
        let cutters = [
            cuboid([-16.0, -16.0, 96.0], [144.0, 144.0, 144.0]),
            cuboid([-16.0, -16.0, -16.0], [144.0, 144.0, 32.0]),
        ];
        let fragments = subtract_all(&source, &cutters, SubtractStrategy::PlaneSweep).unwrap();
        let expected = 128.0 * 128.0 * 64.0;
        assert!((total_volume(&fragments) - expected).abs() < 1e-3);
        assert!(fragments.iter().all(|b| !b.is_empty()));

        let far = [cuboid([512.0; 3], [640.0; 3])];
        assert!(subtract_all(&source, &far, SubtractStrategy::ApexPyramid).is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sources = [cuboid([0.0; 3], [64.0; 3]), cuboid([256.0; 3], [320.0; 3])];
        let cutters = [cuboid([32.0; 3], [96.0; 3])];
        let results = subtract_from_each(&sources, &cutters, SubtractStrategy::ApexPyramid);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_some());
        assert!(results[1].is_none());
    }
}
