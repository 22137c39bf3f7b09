//! CSG, transform and prefab commands over the selection.
//!
//! Each command runs as a single undoable step and logs a summary through
//! `log::info!`.

use serde::{Deserialize, Serialize};

use radiant_brush::{primitives, Brush, BrushError};
use radiant_csg::{
    make_hollow, merge, split_brush, subtract_from_each, CsgError, SplitMode, SplitOutcome,
    SplitPlane,
};
use radiant_math::{Point3, Transform};

use crate::context::EditorContext;
use crate::scene::{NodeId, SceneGraph};

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

/// Outcome of [`csg_subtract`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtractReport {
    /// Selected brushes used as cutters.
    pub cutters: usize,
    /// Unselected brushes that were cut.
    pub before: usize,
    /// Fragments that replaced them.
    pub after: usize,
}

/// Subtract the selected brushes from every visible unselected brush.
///
/// Fragments are computed for all targets in parallel, then swapped into
/// the scene: each cut brush is replaced by its fragments under the same
/// entity.
pub fn csg_subtract(scene: &mut SceneGraph, ctx: &EditorContext) -> SubtractReport {
    let selected = scene.selected_brushes();
    if selected.is_empty() {
        log::info!("CSG Subtract: No brushes selected.");
        return SubtractReport::default();
    }
    log::info!("CSG Subtract: Subtracting {} brushes.", selected.len());

    let cutters: Vec<Brush> = selected
        .iter()
        .filter_map(|id| scene.brush(*id).cloned())
        .collect();
    let targets = scene.unselected_visible_brushes();
    let sources: Vec<Brush> = targets
        .iter()
        .filter_map(|id| scene.brush(*id).cloned())
        .collect();
    let results = subtract_from_each(&sources, &cutters, ctx.subtract_strategy);

    let mut report = SubtractReport {
        cutters: selected.len(),
        ..SubtractReport::default()
    };
    scene.undoable("brushSubtract", |scene| {
        for (id, result) in targets.iter().zip(results) {
            let Some(fragments) = result else {
                continue;
            };
            let Some(parent) = scene.parent(*id) else {
                continue;
            };
            report.before += 1;
            report.after += fragments.len();
            for fragment in fragments {
                scene.insert_brush(parent, fragment);
            }
            scene.remove_brush(*id);
        }
    });

    log::info!(
        "CSG Subtract: Result: {} {} from {} {}.",
        report.after,
        plural(report.after, "fragment", "fragments"),
        report.before,
        plural(report.before, "brush", "brushes"),
    );
    report
}

/// Replace the selected brushes by their convex union.
///
/// The merged brush goes under the entity of the most recently selected
/// brush and is selected. Nothing changes if the union is not convex.
pub fn csg_merge(scene: &mut SceneGraph, ctx: &EditorContext) -> Result<NodeId, CsgError> {
    let selected = scene.selected_brushes();
    if selected.is_empty() {
        log::info!("CSG Merge: No brushes selected.");
        return Err(CsgError::NotEnoughBrushes(0));
    }
    if selected.len() < 2 {
        log::info!("CSG Merge: At least two brushes have to be selected.");
        return Err(CsgError::NotEnoughBrushes(selected.len()));
    }
    log::info!("CSG Merge: Merging {} brushes.", selected.len());

    let brushes: Vec<Brush> = selected
        .iter()
        .filter_map(|id| scene.brush(*id).cloned())
        .collect();
    let mut merged = match merge(&brushes, true) {
        Ok(brush) => brush,
        Err(CsgError::NotConvex) => {
            log::warn!("CSG Merge: Failed - result would not be convex.");
            return Err(CsgError::NotConvex);
        }
        Err(e) => {
            log::warn!("CSG Merge: Failed - {e}.");
            return Err(e);
        }
    };
    ctx.apply_to_brush(&mut merged);

    let parent = match scene.ultimate_selected().and_then(|id| scene.parent(id)) {
        Some(parent) => parent,
        None => scene.worldspawn(),
    };
    let node = scene.undoable("brushMerge", |scene| {
        for id in &selected {
            scene.remove_brush(*id);
        }
        let node = scene.insert_brush(parent, merged);
        if let Some(node) = node {
            scene.select(node, true);
        }
        node
    });

    log::info!("CSG Merge: Succeeded.");
    node.ok_or(CsgError::NotEnoughBrushes(0))
}

/// Outcome of [`csg_make_hollow`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HollowReport {
    /// Brushes hollowed.
    pub hollowed: usize,
    /// Wall brushes created.
    pub walls: usize,
}

/// Replace every selected brush by walls one grid unit thick.
pub fn csg_make_hollow(scene: &mut SceneGraph, ctx: &EditorContext) -> HollowReport {
    let selected = scene.selected_brushes();
    let mut report = HollowReport::default();
    if selected.is_empty() {
        log::info!("CSG Hollow: No brushes selected.");
        return report;
    }

    scene.undoable("brushHollow", |scene| {
        for id in &selected {
            let (Some(brush), Some(parent)) = (scene.brush(*id), scene.parent(*id)) else {
                continue;
            };
            let walls = make_hollow(brush, ctx.grid_size);
            report.hollowed += 1;
            report.walls += walls.len();
            for wall in walls {
                scene.insert_brush(parent, wall);
            }
        }
        for id in &selected {
            scene.remove_brush(*id);
        }
    });

    log::info!(
        "CSG Hollow: {} {} from {} {}.",
        report.walls,
        plural(report.walls, "wall", "walls"),
        report.hollowed,
        plural(report.hollowed, "brush", "brushes"),
    );
    report
}

/// Outcome of [`split_selected`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitReport {
    /// Brushes the plane cut.
    pub split: usize,
    /// Brushes deleted for lying wholly on the discarded side.
    pub removed: usize,
    /// New brushes created for the opposite side.
    pub fragments: usize,
}

/// Split the selected brushes with the plane through `p0`, `p1`, `p2`.
///
/// The cap face uses `shader` and the default projection. In
/// [`SplitMode::FrontAndBack`] the far side becomes a new selected brush
/// under the same entity.
pub fn split_selected(
    scene: &mut SceneGraph,
    ctx: &EditorContext,
    points: [Point3; 3],
    shader: &str,
    mode: SplitMode,
) -> Result<SplitReport, CsgError> {
    let mut split = SplitPlane::new(points[0], points[1], points[2], shader);
    split.texdef = ctx.default_texdef();
    if !split.plane3().is_valid() {
        log::warn!("Split: the three points do not define a plane.");
        return Err(CsgError::InvalidPlane);
    }

    let selected = scene.selected_brushes();
    let mut report = SplitReport::default();
    scene.undoable("splitSelected", |scene| {
        for id in selected {
            let (Some(brush), Some(parent)) = (scene.brush(id), scene.parent(id)) else {
                continue;
            };
            match split_brush(brush, &split, mode) {
                SplitOutcome::Untouched => {}
                SplitOutcome::Removed => {
                    report.removed += 1;
                    scene.remove_brush(id);
                }
                SplitOutcome::Split { kept, fragment } => {
                    report.split += 1;
                    if let Some(mut fragment) = fragment {
                        ctx.apply_to_brush(&mut fragment);
                        report.fragments += 1;
                        if let Some(node) = scene.insert_brush(parent, fragment) {
                            scene.select(node, true);
                        }
                    }
                    let mut kept = kept;
                    ctx.apply_to_brush(&mut kept);
                    scene.edit_brush(id, |b| b.copy_from(&kept));
                }
            }
        }
    });

    log::info!(
        "Split: {} split, {} removed, {} new.",
        report.split,
        report.removed,
        report.fragments
    );
    Ok(report)
}

/// Transform the selected brushes and commit the result. Returns the number
/// of brushes moved.
pub fn transform_selected(
    scene: &mut SceneGraph,
    ctx: &EditorContext,
    transform: &Transform,
) -> usize {
    let selected = scene.selected_brushes();
    scene.undoable("transform", |scene| {
        for id in &selected {
            scene.edit_brush(*id, |b| {
                b.transform(&transform.matrix, ctx.texture_lock);
                b.freeze_transform();
            });
        }
    });
    selected.len()
}

/// Snap the plane points of the selected brushes to the grid.
pub fn snap_selected(scene: &mut SceneGraph, ctx: &EditorContext) -> usize {
    let selected = scene.selected_brushes();
    scene.undoable("snapToGrid", |scene| {
        for id in &selected {
            scene.edit_brush(*id, |b| b.snap_to(ctx.grid_size));
        }
    });
    selected.len()
}

/// Brush shape that can replace the most recently selected brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prefab {
    /// Axis-aligned box.
    Cuboid,
    /// Prism along the given axis (0, 1 or 2).
    Prism {
        /// Extrusion axis.
        axis: usize,
    },
    /// Cone pointing up Z.
    Cone,
    /// Faceted sphere.
    Sphere,
}

/// Rebuild the most recently selected brush as a prefab filling its bounds.
///
/// `sides` is ignored for [`Prefab::Cuboid`].
pub fn construct_prefab(
    scene: &mut SceneGraph,
    ctx: &EditorContext,
    prefab: Prefab,
    sides: usize,
    shader: &str,
) -> Result<(), BrushError> {
    let Some(id) = scene.ultimate_selected() else {
        return Ok(());
    };
    let Some(bounds) = scene.brush(id).map(Brush::aabb) else {
        return Ok(());
    };
    let texdef = ctx.default_texdef();
    let mut shape = match prefab {
        Prefab::Cuboid => primitives::cuboid(&bounds, shader, &texdef),
        Prefab::Prism { axis } => primitives::prism(&bounds, sides, axis, shader, &texdef),
        Prefab::Cone => primitives::cone(&bounds, sides, shader, &texdef),
        Prefab::Sphere => primitives::sphere(&bounds, sides, shader, &texdef),
    }
    .inspect_err(|e| log::warn!("{e}"))?;
    ctx.apply_to_brush(&mut shape);

    scene.undoable("brushPrefab", |scene| {
        scene.edit_brush(id, |b| b.copy_from(&shape));
    });
    Ok(())
}

/// Add six caulk walls enclosing the box `mins`..`maxs` to the world.
pub fn add_region_brushes(
    scene: &mut SceneGraph,
    ctx: &EditorContext,
    mins: &Point3,
    maxs: &Point3,
) -> Result<Vec<NodeId>, BrushError> {
    let brushes = primitives::region_brushes(mins, maxs, &ctx.default_shader)?;
    let world = scene.worldspawn();
    Ok(scene.undoable("regionBrushes", |scene| {
        brushes
            .into_iter()
            .filter_map(|mut b| {
                ctx.apply_to_brush(&mut b);
                scene.insert_brush(world, b)
            })
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiant_brush::{TexDef, DEFAULT_SHADER};
    use radiant_math::Aabb;

    fn cuboid(min: [f64; 3], max: [f64; 3]) -> Brush {
        primitives::cuboid(
            &Aabb::new(Point3::from(min), Point3::from(max)),
            DEFAULT_SHADER,
            &TexDef::default(),
        )
        .unwrap()
    }

    fn scene_with(brushes: &[Brush]) -> (SceneGraph, Vec<NodeId>) {
        let mut scene = SceneGraph::new();
        let world = scene.worldspawn();
        let ids = brushes
            .iter()
            .map(|b| scene.insert_brush(world, b.clone()).unwrap())
            .collect();
        (scene, ids)
    }

    #[test]
    fn test_subtract_without_selection() {
        let (mut scene, _) = scene_with(&[cuboid([0.0; 3], [64.0; 3])]);
        let report = csg_subtract(&mut scene, &EditorContext::default());
        assert_eq!(report, SubtractReport::default());
        assert!(!scene.can_undo());
    }

    #[test]
    fn test_subtract_replaces_target() {
        let (mut scene, ids) = scene_with(&[
            cuboid([0.0, 0.0, 0.0], [256.0, 16.0, 128.0]),
            cuboid([96.0, -16.0, 0.0], [160.0, 32.0, 96.0]),
        ]);
        scene.select(ids[1], true);
        let mut ctx = EditorContext::default();
        ctx.subtract_strategy = radiant_csg::SubtractStrategy::PlaneSweep;

        let report = csg_subtract(&mut scene, &ctx);
        assert_eq!(report, SubtractReport { cutters: 1, before: 1, after: 3 });
        assert!(scene.brush(ids[0]).is_none());
        assert!(scene.is_selected(ids[1]));
        assert_eq!(scene.brush_count(), 4);

        scene.undo();
        assert_eq!(scene.brush_count(), 2);
        assert!(scene.brush(ids[0]).is_some());
    }

    #[test]
    fn test_subtract_skips_hidden() {
        let (mut scene, ids) = scene_with(&[
            cuboid([0.0; 3], [64.0; 3]),
            cuboid([32.0; 3], [96.0; 3]),
        ]);
        scene.set_visible(ids[0], false);
        scene.select(ids[1], true);
        let report = csg_subtract(&mut scene, &EditorContext::default());
        assert_eq!(report.before, 0);
        assert!(scene.brush(ids[0]).is_some());
    }

    #[test]
    fn test_merge_selects_result() {
        let (mut scene, ids) = scene_with(&[
            cuboid([0.0; 3], [64.0; 3]),
            cuboid([64.0, 0.0, 0.0], [128.0, 64.0, 64.0]),
        ]);
        scene.select(ids[0], true);
        scene.select(ids[1], true);
        let node = csg_merge(&mut scene, &EditorContext::default()).unwrap();
        assert_eq!(scene.brush_count(), 1);
        assert!(scene.is_selected(node));
        assert_eq!(scene.selected_brushes(), vec![node]);
    }

    #[test]
    fn test_merge_failure_leaves_scene() {
        let (mut scene, ids) = scene_with(&[
            cuboid([0.0; 3], [64.0; 3]),
            cuboid([64.0, 0.0, 0.0], [128.0, 64.0, 32.0]),
        ]);
        let ctx = EditorContext::default();
        assert_eq!(csg_merge(&mut scene, &ctx), Err(CsgError::NotEnoughBrushes(0)));
        scene.select(ids[0], true);
        assert_eq!(csg_merge(&mut scene, &ctx), Err(CsgError::NotEnoughBrushes(1)));
        scene.select(ids[1], true);
        assert_eq!(csg_merge(&mut scene, &ctx), Err(CsgError::NotConvex));
        assert_eq!(scene.brush_count(), 2);
        assert!(!scene.can_undo());
    }

    #[test]
    fn test_split_both_sides() {
        let (mut scene, ids) = scene_with(&[cuboid([0.0; 3], [64.0; 3])]);
        scene.select(ids[0], true);
        let points = [
            Point3::new(0.0, 0.0, 16.0),
            Point3::new(0.0, 64.0, 16.0),
            Point3::new(64.0, 0.0, 16.0),
        ];
        let report = split_selected(
            &mut scene,
            &EditorContext::default(),
            points,
            "tex_common/clip",
            SplitMode::FrontAndBack,
        )
        .unwrap();
        assert_eq!(report, SplitReport { split: 1, removed: 0, fragments: 1 });
        assert_eq!(scene.brush_count(), 2);
        assert_eq!(scene.selected_brushes().len(), 2);
        assert!((scene.brush(ids[0]).unwrap().aabb().max.z - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_split_invalid_plane() {
        let (mut scene, _) = scene_with(&[cuboid([0.0; 3], [64.0; 3])]);
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(
            split_selected(&mut scene, &EditorContext::default(), [p, p, p], DEFAULT_SHADER, SplitMode::Back),
            Err(CsgError::InvalidPlane)
        );
    }

    #[test]
    fn test_transform_commits() {
        let (mut scene, ids) = scene_with(&[cuboid([0.0; 3], [64.0; 3])]);
        scene.select(ids[0], true);
        let moved = transform_selected(
            &mut scene,
            &EditorContext::default(),
            &Transform::translation(16.0, 0.0, 0.0),
        );
        assert_eq!(moved, 1);
        let brush = scene.brush(ids[0]).unwrap();
        assert!((brush.aabb().min.x - 16.0).abs() < 1e-9);
        scene.undo();
        assert!(scene.brush(ids[0]).unwrap().aabb().min.x.abs() < 1e-9);
    }

    #[test]
    fn test_prefab_replaces_brush() {
        let (mut scene, ids) = scene_with(&[cuboid([0.0; 3], [64.0; 3])]);
        scene.select(ids[0], true);
        let ctx = EditorContext::default();
        construct_prefab(&mut scene, &ctx, Prefab::Prism { axis: 2 }, 8, DEFAULT_SHADER).unwrap();
        assert_eq!(scene.brush(ids[0]).unwrap().len(), 10);

        let err = construct_prefab(&mut scene, &ctx, Prefab::Cone, 64, DEFAULT_SHADER);
        assert!(err.is_err());
        assert_eq!(scene.brush(ids[0]).unwrap().len(), 10);
    }

    #[test]
    fn test_region_brushes() {
        let mut scene = SceneGraph::new();
        let ids = add_region_brushes(
            &mut scene,
            &EditorContext::default(),
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(256.0, 256.0, 256.0),
        )
        .unwrap();
        assert_eq!(ids.len(), 6);
        assert!(scene.can_undo());
    }
}
