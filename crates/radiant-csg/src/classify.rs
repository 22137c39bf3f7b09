//! Classification of a whole brush against a plane.

use radiant_brush::{Brush, SplitCounts};
use radiant_math::Plane3;

/// Count the winding points of every contributing face on each side of `plane`.
///
/// Uses the windings of the last evaluation.
pub fn classify_brush(brush: &Brush, plane: &Plane3) -> SplitCounts {
    let mut split = SplitCounts::default();
    for face in brush.faces().iter().filter(|f| f.contributes()) {
        split += face.winding().classify_plane(plane);
    }
    split
}
