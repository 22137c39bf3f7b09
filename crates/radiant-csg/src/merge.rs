//! Merge several convex brushes into one.

use radiant_brush::{planes_concave, Brush, Face};

use crate::error::CsgError;

/// Build the convex brush covering `brushes`, if there is one.
///
/// Faces shared between two inputs (coplanar, opposite, overlapping) are
/// interior and dropped; duplicate planes are kept once. With
/// `only_shape` false, duplicate planes must also agree on their shader.
pub fn merge(brushes: &[Brush], only_shape: bool) -> Result<Brush, CsgError> {
    if brushes.len() < 2 {
        return Err(CsgError::NotEnoughBrushes(brushes.len()));
    }

    let evaluated: Vec<Brush> = brushes
        .iter()
        .map(|b| {
            let mut b = b.clone();
            b.evaluate_brep();
            b
        })
        .collect();

    let mut outer: Vec<&Face> = Vec::new();
    for (i, brush) in evaluated.iter().enumerate() {
        for face in brush.faces().iter().filter(|f| f.contributes()) {
            if is_interior(face, i, &evaluated) {
                continue;
            }

            let plane = face.plane3();
            let mut duplicate = false;
            for kept in &outer {
                let kept_plane = kept.plane3();
                if plane.coincides_with(&kept_plane) {
                    if !only_shape && face.shader_name() != kept.shader_name() {
                        return Err(CsgError::ShaderMismatch(
                            face.shader_name().to_string(),
                            kept.shader_name().to_string(),
                        ));
                    }
                    duplicate = true;
                    break;
                }
                if planes_concave(face.winding(), kept.winding(), &plane, &kept_plane) {
                    return Err(CsgError::NotConvex);
                }
            }
            if !duplicate {
                outer.push(face);
            }
        }
    }

    let mut merged = Brush::new();
    for face in outer {
        if merged.add_face(face).is_none() {
            return Err(CsgError::TooManyFaces);
        }
    }
    merged.remove_empty_faces();
    debug_assert!(!merged.is_empty(), "brush left with no faces after merge");
    Ok(merged)
}

/// True if `face` of brush `owner` is glued to an opposing face of another brush.
fn is_interior(face: &Face, owner: usize, brushes: &[Brush]) -> bool {
    let plane = face.plane3();
    brushes
        .iter()
        .enumerate()
        .filter(|(k, _)| *k != owner)
        .flat_map(|(_, b)| b.faces().iter())
        .any(|other| {
            plane.opposes(&other.plane3())
                && face.winding().overlaps_coplanar(other.winding(), &plane.normal)
        })
}
