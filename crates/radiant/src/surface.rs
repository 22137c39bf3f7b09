//! Shader, texture projection and flag commands over the selection.

use serde::{Deserialize, Serialize};

use radiant_brush::{
    shader_from_map_name, shader_name_valid, BrushError, ContentsFlagsValue, Face, TexAxis,
    TexDef, SHADER_NOT_FOUND, TEXTURE_PREFIX,
};

use crate::context::EditorContext;
use crate::scene::{NodeId, SceneGraph};

/// Shader shared by the faces of the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum ShaderSelection {
    /// Nothing selected.
    None,
    /// Every selected face uses this shader.
    Unique(String),
    /// The selected faces use different shaders.
    Ambiguous,
}

impl ShaderSelection {
    /// The shader name, or `$NONE` if there is no single shader.
    pub fn name(&self) -> &str {
        match self {
            ShaderSelection::Unique(name) => name,
            _ => SHADER_NOT_FOUND,
        }
    }
}

fn selected_faces(scene: &SceneGraph) -> impl Iterator<Item = &Face> {
    scene
        .selected_brushes()
        .into_iter()
        .filter_map(|id| scene.brush(id))
        .flat_map(|b| b.faces().iter())
        .collect::<Vec<_>>()
        .into_iter()
}

/// The shader of the selected faces.
pub fn unique_shader(scene: &SceneGraph) -> ShaderSelection {
    let mut faces = selected_faces(scene);
    let Some(first) = faces.next() else {
        return ShaderSelection::None;
    };
    let name = first.shader_name();
    if faces.all(|f| f.shader_name() == name) {
        ShaderSelection::Unique(name.to_string())
    } else {
        ShaderSelection::Ambiguous
    }
}

/// The projection of the selected faces, if they all share one.
pub fn unique_texdef(scene: &SceneGraph) -> Option<TexDef> {
    let mut faces = selected_faces(scene);
    let texdef = *faces.next()?.texdef();
    faces.all(|f| *f.texdef() == texdef).then_some(texdef)
}

/// Flags merged over the selected faces. Bits on which faces disagree are
/// marked dirty. `None` if nothing is selected.
pub fn unique_flags(scene: &SceneGraph) -> Option<ContentsFlagsValue> {
    let mut faces = selected_faces(scene).peekable();
    faces.peek()?;
    let mut flags = ContentsFlagsValue::default();
    for face in faces {
        flags.merge(face.flags());
    }
    Some(flags)
}

/// Apply `f` to every face of the selected brushes as one undoable command.
/// Returns the number of faces visited.
fn edit_selected_faces(
    scene: &mut SceneGraph,
    name: &str,
    mut f: impl FnMut(&mut Face),
) -> usize {
    let selected = scene.selected_brushes();
    scene.undoable(name, |scene| {
        let mut count = 0;
        for id in selected {
            scene.edit_brush(id, |b| {
                count += b.len();
                b.for_each_face_mut(&mut f);
            });
        }
        count
    })
}

/// Give every selected face `shader`. Returns the number of faces changed.
pub fn set_shader_selected(
    scene: &mut SceneGraph,
    ctx: &EditorContext,
    shader: &str,
) -> Result<usize, BrushError> {
    if !shader_name_valid(shader) {
        return Err(BrushError::InvalidShaderName(shader.to_string()));
    }
    let full = shader_from_map_name(shader);
    let (w, h) = ctx.texture_size(&full);
    Ok(edit_selected_faces(scene, "setShader", |face| {
        if face.set_shader(&full).is_ok() {
            face.set_texture_size(w, h);
        }
    }))
}

/// Give every selected face `texdef`.
pub fn set_texdef_selected(scene: &mut SceneGraph, texdef: TexDef) -> usize {
    edit_selected_faces(scene, "setTexdef", |face| face.set_texdef(texdef))
}

/// Shift the textures of the selected faces by `(s, t)` pixels.
pub fn shift_texture_selected(scene: &mut SceneGraph, s: f64, t: f64) -> usize {
    edit_selected_faces(scene, "shiftTexture", |face| face.shift_texdef(s, t))
}

/// Add `(s, t)` to the texture scale of the selected faces.
pub fn scale_texture_selected(scene: &mut SceneGraph, s: f64, t: f64) -> usize {
    edit_selected_faces(scene, "scaleTexture", |face| face.scale_texdef(s, t))
}

/// Rotate the textures of the selected faces by `angle` degrees.
pub fn rotate_texture_selected(scene: &mut SceneGraph, angle: f64) -> usize {
    edit_selected_faces(scene, "rotateTexture", |face| face.rotate_texdef(angle))
}

/// Mirror the textures of the selected faces.
pub fn flip_texture_selected(scene: &mut SceneGraph, axis: TexAxis) -> usize {
    edit_selected_faces(scene, "flipTexture", |face| face.flip_texture(axis))
}

/// Fit the textures so each selected face shows `s_repeat` x `t_repeat`
/// copies.
pub fn fit_texture_selected(scene: &mut SceneGraph, s_repeat: f64, t_repeat: f64) -> usize {
    edit_selected_faces(scene, "fitTexture", |face| {
        face.fit_texture(s_repeat, t_repeat)
    })
}

/// Reset the selected faces to the default projection.
pub fn natural_texture_selected(scene: &mut SceneGraph, ctx: &EditorContext) -> usize {
    let scale = ctx.default_scale;
    edit_selected_faces(scene, "naturalTexture", |face| {
        face.set_default_projection(scale)
    })
}

/// Write `flags` to the selected faces. Bits marked dirty in `flags` keep
/// each face's own value.
pub fn set_flags_selected(scene: &mut SceneGraph, flags: &ContentsFlagsValue) -> usize {
    edit_selected_faces(scene, "setFlags", |face| face.set_flags(flags))
}

/// Set or clear the detail bit of the selected brushes.
pub fn set_detail_selected(scene: &mut SceneGraph, detail: bool) -> usize {
    let selected = scene.selected_brushes();
    let name = if detail { "makeDetail" } else { "makeStructural" };
    scene.undoable(name, |scene| {
        for id in &selected {
            scene.edit_brush(*id, |b| b.set_detail(detail));
        }
    });
    selected.len()
}

fn count_shader(scene: &SceneGraph, id: NodeId, full: &str) -> usize {
    scene.brush(id).map_or(0, |b| {
        b.faces()
            .iter()
            .filter(|f| f.shader_name().eq_ignore_ascii_case(full))
            .count()
    })
}

/// Select every visible brush with a face using `shader`. Returns the
/// number of matching faces.
pub fn select_by_shader(scene: &mut SceneGraph, shader: &str) -> usize {
    let full = shader_from_map_name(shader);
    let mut count = 0;
    for id in scene.brush_ids() {
        let matches = count_shader(scene, id, &full);
        if matches > 0 && scene.is_visible(id) {
            scene.select(id, true);
            count += matches;
        }
    }
    count
}

/// Replace shader `find` by `replace` on every face, or only on selected
/// brushes. Names compare ignoring ASCII case.
///
/// An empty `replace`, or one that is only the texture prefix, turns the
/// command into a search: brushes using `find` are selected instead.
/// Returns the number of faces matched.
pub fn find_replace_shader(
    scene: &mut SceneGraph,
    ctx: &EditorContext,
    find: &str,
    replace: &str,
    selected_only: bool,
) -> Result<usize, BrushError> {
    if find.is_empty() {
        return Ok(0);
    }
    if replace.is_empty() || replace == TEXTURE_PREFIX {
        if !selected_only {
            return Ok(select_by_shader(scene, find));
        }
        // narrow the selection to brushes using the shader
        let full = shader_from_map_name(find);
        let mut count = 0;
        for id in scene.selected_brushes() {
            match count_shader(scene, id, &full) {
                0 => scene.select(id, false),
                n => count += n,
            }
        }
        return Ok(count);
    }
    if !shader_name_valid(replace) {
        return Err(BrushError::InvalidShaderName(replace.to_string()));
    }

    let find = shader_from_map_name(find);
    let replace = shader_from_map_name(replace);
    let (w, h) = ctx.texture_size(&replace);
    let targets: Vec<NodeId> = if selected_only {
        scene.selected_brushes()
    } else {
        scene
            .brush_ids()
            .into_iter()
            .filter(|id| scene.is_visible(*id))
            .collect()
    };

    let count = scene.undoable("replaceShader", |scene| {
        let mut count = 0;
        for id in targets {
            if count_shader(scene, id, &find) == 0 {
                continue;
            }
            scene.edit_brush(id, |b| {
                for index in 0..b.len() {
                    let Some(face) = b.face_mut(index) else {
                        continue;
                    };
                    if face.shader_name().eq_ignore_ascii_case(&find)
                        && face.set_shader(&replace).is_ok()
                    {
                        face.set_texture_size(w, h);
                        count += 1;
                        b.shader_changed(index);
                    }
                }
            });
        }
        count
    });
    log::info!("Replaced shader {find} with {replace} on {count} faces");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use radiant_brush::{flags::surface, primitives, Brush, DEFAULT_SHADER};
    use radiant_math::{Aabb, Point3};

    fn cube(offset: f64, shader: &str) -> Brush {
        primitives::cuboid(
            &Aabb::new(
                Point3::new(offset, 0.0, 0.0),
                Point3::new(offset + 64.0, 64.0, 64.0),
            ),
            shader,
            &TexDef::default(),
        )
        .unwrap()
    }

    fn scene() -> (SceneGraph, Vec<NodeId>) {
        let mut scene = SceneGraph::new();
        let world = scene.worldspawn();
        let ids = vec![
            scene.insert_brush(world, cube(0.0, DEFAULT_SHADER)).unwrap(),
            scene.insert_brush(world, cube(128.0, "tex_misc/crate")).unwrap(),
        ];
        (scene, ids)
    }

    #[test]
    fn test_unique_shader() {
        let (mut scene, ids) = scene();
        assert_eq!(unique_shader(&scene), ShaderSelection::None);
        assert_eq!(unique_shader(&scene).name(), SHADER_NOT_FOUND);

        scene.select(ids[1], true);
        assert_eq!(
            unique_shader(&scene),
            ShaderSelection::Unique("textures/tex_misc/crate".to_string())
        );
        scene.select(ids[0], true);
        assert_eq!(unique_shader(&scene), ShaderSelection::Ambiguous);
    }

    #[test]
    fn test_set_shader_uses_texture_size() {
        let (mut scene, ids) = scene();
        let mut ctx = EditorContext::default();
        ctx.texture_sizes
            .insert("textures/tex_misc/wall".to_string(), [256, 128]);
        scene.select(ids[0], true);

        let changed = set_shader_selected(&mut scene, &ctx, "tex_misc/wall").unwrap();
        assert_eq!(changed, 6);
        let face = &scene.brush(ids[0]).unwrap().faces()[0];
        assert_eq!(face.shader_name(), "textures/tex_misc/wall");
        assert_eq!(face.shader().width(), 256.0);

        assert!(set_shader_selected(&mut scene, &ctx, "bad name").is_err());
    }

    #[test]
    fn test_shift_and_undo() {
        let (mut scene, ids) = scene();
        scene.select(ids[0], true);
        shift_texture_selected(&mut scene, 8.0, 0.0);
        assert_eq!(unique_texdef(&scene).unwrap().shift, [8.0, 0.0]);
        assert_eq!(scene.undo().as_deref(), Some("shiftTexture"));
        assert_eq!(unique_texdef(&scene).unwrap().shift, [0.0, 0.0]);
    }

    #[test]
    fn test_flags_merge_and_assign() {
        let (mut scene, ids) = scene();
        scene.select(ids[0], true);
        set_flags_selected(&mut scene, &ContentsFlagsValue::new(surface::NODRAW, 0, 0, true));
        scene.select(ids[1], true);

        let flags = unique_flags(&scene).unwrap();
        assert_eq!(flags.surface_flags_dirty, surface::NODRAW);

        let mut flags = flags;
        flags.value = 300;
        set_flags_selected(&mut scene, &flags);
        let a = scene.brush(ids[0]).unwrap().faces()[0].flags().surface_flags;
        let b = scene.brush(ids[1]).unwrap().faces()[0].flags().surface_flags;
        assert_eq!((a, b), (surface::NODRAW, 0));
        assert_eq!(scene.brush(ids[1]).unwrap().faces()[0].flags().value, 300);
    }

    #[test]
    fn test_detail() {
        let (mut scene, ids) = scene();
        scene.select(ids[1], true);
        assert_eq!(set_detail_selected(&mut scene, true), 1);
        assert!(scene.brush(ids[1]).unwrap().is_detail());
        assert!(!scene.brush(ids[0]).unwrap().is_detail());
    }

    #[test]
    fn test_find_replace() {
        let (mut scene, ids) = scene();
        let ctx = EditorContext::default();
        let count =
            find_replace_shader(&mut scene, &ctx, "TEX_MISC/Crate", "tex_misc/box", false).unwrap();
        assert_eq!(count, 6);
        assert_eq!(
            scene.brush(ids[1]).unwrap().faces()[3].shader_name(),
            "textures/tex_misc/box"
        );
        assert_eq!(scene.brush(ids[0]).unwrap().faces()[0].shader_name(), DEFAULT_SHADER);
        assert_eq!(find_replace_shader(&mut scene, &ctx, "", "x", false), Ok(0));
    }

    #[test]
    fn test_find_replace_selected_only() {
        let (mut scene, ids) = scene();
        let ctx = EditorContext::default();
        let count =
            find_replace_shader(&mut scene, &ctx, "tex_misc/crate", "tex_misc/box", true).unwrap();
        assert_eq!(count, 0);
        assert!(!scene.can_undo());
        scene.select(ids[1], true);
        assert_eq!(
            find_replace_shader(&mut scene, &ctx, "tex_misc/crate", "tex_misc/box", true),
            Ok(6)
        );
    }

    #[test]
    fn test_find_selects() {
        let (mut scene, ids) = scene();
        let ctx = EditorContext::default();
        let count =
            find_replace_shader(&mut scene, &ctx, "tex_misc/crate", "textures/", false).unwrap();
        assert_eq!(count, 6);
        assert_eq!(scene.selected_brushes(), vec![ids[1]]);
        assert!(!scene.can_undo());
    }
}
