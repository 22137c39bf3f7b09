//! Turn a solid brush into a shell of wall brushes.

use radiant_brush::Brush;

/// One wall brush per contributing face: the slab between the face and a
/// copy of it moved `thickness` units inwards.
pub fn make_hollow(brush: &Brush, thickness: f64) -> Vec<Brush> {
    let mut source = brush.clone();
    source.evaluate_brep();

    let mut walls = Vec::new();
    for face in source.faces().iter().filter(|f| f.contributes()) {
        let mut wall = source.clone();
        if let Some(inner) = wall.add_face(face) {
            inner.flip_winding();
            inner.offset(thickness);
        }
        wall.remove_empty_faces();
        walls.push(wall);
    }
    walls
}
