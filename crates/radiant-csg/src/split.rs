//! Split a brush with a plane.

use serde::{Deserialize, Serialize};

use radiant_brush::{Brush, TexDef};
use radiant_math::{Plane3, Point3};

use crate::classify::classify_brush;

/// Which side of the split plane survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Keep the part in front of the plane.
    Front,
    /// Keep the part behind the plane.
    Back,
    /// Keep both parts as separate brushes.
    #[default]
    FrontAndBack,
}

/// The cutting plane given by three points, plus the cap face's material.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlane {
    /// Plane points, oriented like a face plane.
    pub points: [Point3; 3],
    /// Shader of the cap face.
    pub shader: String,
    /// Texture projection of the cap face.
    pub texdef: TexDef,
}

impl SplitPlane {
    /// A split plane with the default projection.
    pub fn new(p0: Point3, p1: Point3, p2: Point3, shader: &str) -> Self {
        Self {
            points: [p0, p1, p2],
            shader: shader.to_string(),
            texdef: TexDef::default(),
        }
    }

    /// The plane through the points.
    pub fn plane3(&self) -> Plane3 {
        Plane3::from_points(&self.points[0], &self.points[1], &self.points[2])
    }
}

/// What splitting did to a brush.
#[derive(Debug, Clone)]
pub enum SplitOutcome {
    /// The plane misses the brush, or is degenerate.
    Untouched,
    /// The brush lies wholly on the classified back side and is deleted.
    Removed,
    /// The brush was cut.
    Split {
        /// The original brush, clipped to the kept side.
        kept: Brush,
        /// The opposite side, in [`SplitMode::FrontAndBack`] mode.
        fragment: Option<Brush>,
    },
}

/// Split `brush` with `split`.
///
/// In [`SplitMode::Front`] the brush is classified against the reversed
/// plane. A brush that does not straddle the plane is deleted when it lies
/// wholly behind the classification plane, unless both sides are kept.
pub fn split_brush(brush: &Brush, split: &SplitPlane, mode: SplitMode) -> SplitOutcome {
    let plane = split.plane3();
    if !plane.is_valid() {
        return SplitOutcome::Untouched;
    }

    let mut source = brush.clone();
    source.evaluate_brep();
    let classify_plane = if mode == SplitMode::Front { -plane } else { plane };
    let counts = classify_brush(&source, &classify_plane);

    if !counts.straddles() {
        if mode != SplitMode::FrontAndBack && counts.back != 0 {
            return SplitOutcome::Removed;
        }
        return SplitOutcome::Untouched;
    }

    let flags = source.flags();
    let [p0, p1, p2] = split.points;

    let fragment = if mode == SplitMode::FrontAndBack {
        let mut fragment = source.clone();
        if let Some(cap) = fragment.add_plane(p0, p1, p2, &split.shader, split.texdef) {
            cap.flip_winding();
            cap.set_flags(&flags);
        }
        fragment.remove_empty_faces();
        debug_assert!(!fragment.is_empty(), "brush left with no faces after split");
        Some(fragment)
    } else {
        None
    };

    let mut kept = source;
    if let Some(cap) = kept.add_plane(p0, p1, p2, &split.shader, split.texdef) {
        cap.set_flags(&flags);
        if mode == SplitMode::Front {
            cap.flip_winding();
        }
    }
    kept.remove_empty_faces();
    debug_assert!(!kept.is_empty(), "brush left with no faces after split");

    SplitOutcome::Split { kept, fragment }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiant_brush::{flags::surface, primitives, ContentsFlagsValue, DEFAULT_SHADER};
    use radiant_math::Aabb;

    fn cube() -> Brush {
        primitives::cuboid(
            &Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(64.0, 64.0, 64.0)),
            DEFAULT_SHADER,
            &TexDef::default(),
        )
        .unwrap()
    }

    /// Plane z = `z` facing up.
    fn horizontal(z: f64) -> SplitPlane {
        SplitPlane::new(
            Point3::new(0.0, 0.0, z),
            Point3::new(0.0, 64.0, z),
            Point3::new(64.0, 0.0, z),
            "tex_common/clip",
        )
    }

    #[test]
    fn test_split_front_and_back() {
        let SplitOutcome::Split { kept, fragment } =
            split_brush(&cube(), &horizontal(16.0), SplitMode::FrontAndBack)
        else {
            panic!("expected a split");
        };
        let fragment = fragment.unwrap();
        assert!((kept.aabb().max.z - 16.0).abs() < 1e-9);
        assert!((fragment.aabb().min.z - 16.0).abs() < 1e-9);
        assert!((fragment.aabb().max.z - 64.0).abs() < 1e-9);
        assert_eq!(kept.len(), 6);
        assert_eq!(fragment.len(), 6);
    }

    #[test]
    fn test_split_front_keeps_upper_part() {
        let SplitOutcome::Split { kept, fragment } =
            split_brush(&cube(), &horizontal(16.0), SplitMode::Front)
        else {
            panic!("expected a split");
        };
        assert!(fragment.is_none());
        assert!((kept.aabb().min.z - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_back_keeps_lower_part() {
        let SplitOutcome::Split { kept, .. } =
            split_brush(&cube(), &horizontal(16.0), SplitMode::Back)
        else {
            panic!("expected a split");
        };
        assert!((kept.aabb().max.z - 16.0).abs() < 1e-9);
        assert!(kept.faces().iter().any(|f| f.shader_name() == "textures/tex_common/clip"));
    }

    #[test]
    fn test_split_misses() {
        assert!(matches!(
            split_brush(&cube(), &horizontal(128.0), SplitMode::FrontAndBack),
            SplitOutcome::Untouched
        ));
        assert!(matches!(
            split_brush(&cube(), &horizontal(128.0), SplitMode::Back),
            SplitOutcome::Removed
        ));
        assert!(matches!(
            split_brush(&cube(), &horizontal(128.0), SplitMode::Front),
            SplitOutcome::Untouched
        ));
    }

    #[test]
    fn test_degenerate_plane() {
        let split = SplitPlane::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            DEFAULT_SHADER,
        );
        assert!(matches!(
            split_brush(&cube(), &split, SplitMode::Back),
            SplitOutcome::Untouched
        ));
    }

    #[test]
    fn test_cap_takes_brush_flags() {
        let mut brush = cube();
        brush.set_flags(&ContentsFlagsValue::new(surface::NODRAW, 0, 0, true));
        let SplitOutcome::Split { kept, .. } =
            split_brush(&brush, &horizontal(16.0), SplitMode::Back)
        else {
            panic!("expected a split");
        };
        assert!(kept.faces().iter().all(|f| f.flags().surface_flags == surface::NODRAW));
    }

    #[test]
    fn test_cap_copies_one_face_when_flags_differ() {
        let mut brush = cube();
        brush.set_flags(&ContentsFlagsValue::new(surface::HINT, 0, 0, true));
        brush
            .face_mut(0)
            .unwrap()
            .set_flags(&ContentsFlagsValue::new(surface::NODRAW, 0, 0, true));
        let SplitOutcome::Split { kept, fragment } =
            split_brush(&brush, &horizontal(16.0), SplitMode::FrontAndBack)
        else {
            panic!("expected a split");
        };
        for part in [kept, fragment.unwrap()] {
            let cap = part
                .faces()
                .iter()
                .find(|f| f.shader_name() == "textures/tex_common/clip")
                .unwrap();
            assert_eq!(cap.flags().surface_flags, surface::HINT);
            assert!(cap.flags().specified);
            assert!(!cap.flags().is_dirty());
        }
    }
}
