#![warn(missing_docs)]

//! Brush editing for the radiant map editor.
//!
//! A [`SceneGraph`] holds the entities and brushes of a loaded map together
//! with selection, visibility and undo history. Commands in this crate
//! operate on the selection, read grid and texture settings from an
//! [`EditorContext`], and record one undo step each.
//!
//! # Example
//!
//! ```no_run
//! use radiant::{csg_make_hollow, EditorContext, RadiantConfig, SceneGraph};
//!
//! let config = RadiantConfig::load("radiant.toml").unwrap();
//! let ctx = EditorContext::from(&config);
//! let doc = radiant_map::read_map("maps/room.map").unwrap();
//!
//! let mut scene = SceneGraph::from_document(&doc, &ctx);
//! for id in scene.brush_ids() {
//!     scene.select(id, true);
//! }
//! let report = csg_make_hollow(&mut scene, &ctx);
//! println!("{} walls", report.walls);
//!
//! radiant_map::write_map(&scene.to_document(), "maps/room_hollow.map").unwrap();
//! ```

mod commands;
mod config;
mod context;
mod scene;
mod surface;
mod undo;

pub use commands::{
    add_region_brushes, construct_prefab, csg_make_hollow, csg_merge, csg_subtract,
    snap_selected, split_selected, transform_selected, HollowReport, Prefab, SplitReport,
    SubtractReport,
};
pub use config::{
    ConfigError, CsgConfig, GridConfig, MapConfig, RadiantConfig, TextureConfig, WorldConfig,
};
pub use context::EditorContext;
pub use scene::{EntityId, EntityNode, NodeId, SceneEvent, SceneGraph, SubscriberId};
pub use surface::{
    find_replace_shader, fit_texture_selected, flip_texture_selected, natural_texture_selected,
    rotate_texture_selected, scale_texture_selected, select_by_shader, set_detail_selected,
    set_flags_selected, set_shader_selected, set_texdef_selected, shift_texture_selected,
    unique_flags, unique_shader, unique_texdef, ShaderSelection,
};
pub use undo::{UndoStack, DEFAULT_UNDO_LIMIT};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use radiant_brush::Brush;
    use radiant_map::{read_map_from_buffer, write_map_to_buffer};
    use radiant_math::Point3;

    const MAP: &str = r#"{
"classname" "worldspawn"
{
( 0 0 64 ) ( 0 1 64 ) ( 1 0 64 ) tex_misc/floor 0 0 0 0.5 0.5
( 0 128 0 ) ( 1 128 0 ) ( 0 128 1 ) tex_misc/floor 0 0 0 0.5 0.5
( 128 0 0 ) ( 128 0 1 ) ( 128 1 0 ) tex_misc/floor 0 0 0 0.5 0.5
( 0 0 0 ) ( 1 0 0 ) ( 0 1 0 ) tex_misc/floor 0 0 0 0.5 0.5
( 0 0 0 ) ( 0 0 1 ) ( 1 0 0 ) tex_misc/floor 0 0 0 0.5 0.5
( 0 0 0 ) ( 0 1 0 ) ( 0 0 1 ) tex_misc/floor 0 0 0 0.5 0.5
}
{
( 0 0 96 ) ( 0 1 96 ) ( 1 0 96 ) tex_common/clip 0 0 0 0.5 0.5
( 0 96 0 ) ( 1 96 0 ) ( 0 96 1 ) tex_common/clip 0 0 0 0.5 0.5
( 96 0 0 ) ( 96 0 1 ) ( 96 1 0 ) tex_common/clip 0 0 0 0.5 0.5
( 0 0 32 ) ( 1 0 32 ) ( 0 1 32 ) tex_common/clip 0 0 0 0.5 0.5
( 0 32 0 ) ( 0 32 1 ) ( 1 32 0 ) tex_common/clip 0 0 0 0.5 0.5
( 32 0 0 ) ( 32 1 0 ) ( 32 0 1 ) tex_common/clip 0 0 0 0.5 0.5
}
}
{
"classname" "light"
"origin" "64 64 128"
}
"#;

    fn load() -> (SceneGraph, EditorContext) {
        let ctx = EditorContext::default();
        let doc = read_map_from_buffer(MAP.as_bytes()).unwrap();
        (SceneGraph::from_document(&doc, &ctx), ctx)
    }

    fn contains(brush: &Brush, p: &Point3) -> bool {
        brush.faces().iter().all(|f| f.plane3().distance_to(p) < 0.0)
    }

    #[test]
    fn test_subtract_map_workflow() {
        let (mut scene, ctx) = load();
        let ids = scene.brush_ids();
        scene.select(ids[1], true);

        let report = csg_subtract(&mut scene, &ctx);
        assert_eq!(report.cutters, 1);
        assert_eq!(report.before, 1);
        assert!(report.after >= 1);
        assert_eq!(scene.brush_count(), 1 + report.after);

        let inside_cut = Point3::new(64.0, 64.0, 48.0);
        let outside_cut = Point3::new(20.0, 8.0, 12.0);
        let fragments: Vec<NodeId> = scene.unselected_visible_brushes();
        assert!(fragments
            .iter()
            .all(|id| !contains(scene.brush(*id).unwrap(), &inside_cut)));
        assert!(fragments
            .iter()
            .any(|id| contains(scene.brush(*id).unwrap(), &outside_cut)));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["before"], 1);

        assert_eq!(scene.undo().as_deref(), Some("brushSubtract"));
        assert_eq!(scene.brush_count(), 2);
    }

    #[test]
    fn test_round_trip_through_scene() {
        let (mut scene, ctx) = load();
        let ids = scene.brush_ids();
        scene.select(ids[0], true);
        transform_selected(
            &mut scene,
            &ctx,
            &radiant_math::Transform::translation(0.0, 0.0, -64.0),
        );

        let bytes = write_map_to_buffer(&scene.to_document()).unwrap();
        let doc = read_map_from_buffer(&bytes).unwrap();
        assert_eq!(doc.entities.len(), 2);
        assert_eq!(doc.entities[1].value_for_key("origin"), Some("64 64 128"));
        assert_eq!(doc.brush_count(), 2);

        let floor = &doc.entities[0].brushes[0];
        assert_relative_eq!(floor.aabb().min.z, -64.0, epsilon = 1e-9);
        assert_relative_eq!(floor.aabb().max.z, 0.0, epsilon = 1e-9);
        assert_eq!(floor.faces()[0].shader_name(), "textures/tex_misc/floor");
    }

    #[test]
    fn test_hollow_walls_do_not_merge() {
        let (mut scene, ctx) = load();
        let ids = scene.brush_ids();
        scene.select(ids[0], true);

        let report = csg_make_hollow(&mut scene, &ctx);
        assert_eq!(report, HollowReport { hollowed: 1, walls: 6 });
        assert_eq!(scene.brush_count(), 7);

        // the walls enclose a cavity
        for id in scene.brush_ids() {
            let is_wall = !scene.brush(id).unwrap().faces()[0].shader_name().ends_with("clip");
            scene.select(id, is_wall);
        }
        assert_eq!(scene.selected_brushes().len(), 6);
        assert!(csg_merge(&mut scene, &ctx).is_err());

        assert_eq!(scene.undo().as_deref(), Some("brushHollow"));
        assert_eq!(scene.brush_count(), 2);
    }

    #[test]
    fn test_config_drives_hollow_thickness() {
        let config = RadiantConfig::from_toml_str("[grid]\nsize = 16\n").unwrap();
        let ctx = EditorContext::from(&config);
        let doc = read_map_from_buffer(MAP.as_bytes()).unwrap();
        let mut scene = SceneGraph::from_document(&doc, &ctx);
        let floor = scene.brush_ids()[0];
        scene.select(floor, true);
        csg_make_hollow(&mut scene, &ctx);

        let thin = scene
            .brush_ids()
            .into_iter()
            .filter_map(|id| scene.brush(id))
            .filter(|b| {
                let size = b.aabb().extents() * 2.0;
                (size.x - 16.0).abs() < 1e-9
                    || (size.y - 16.0).abs() < 1e-9
                    || (size.z - 16.0).abs() < 1e-9
            })
            .count();
        assert_eq!(thin, 6);
    }
}
