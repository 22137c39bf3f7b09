//! Convex brushes defined by an ordered list of face planes.
//!
//! The boundary representation (face windings, adjacency, the unique edge
//! and vertex lists and the bounding box) is derived from the planes on
//! demand. Edits mark the brush dirty; [`Brush::evaluate_brep`] rebuilds.

use radiant_math::{Aabb, Mat4, Plane3, Point3, Transform, Vec3, DEFAULT_MAX_WORLD_COORD};

use crate::face::Face;
use crate::flags::ContentsFlagsValue;
use crate::observer::{BrushEvent, FaceVertexId};
use crate::texdef::TexDef;
use crate::winding::{edge_is_degenerate, Winding};

/// Maximum number of faces a brush may have.
pub const MAX_FACES: usize = 1024;

/// The edge paired with `id` in the face on the other side of it.
///
/// Returns `id` itself if the connectivity is broken.
pub fn next_edge(faces: &[Face], id: FaceVertexId) -> FaceVertexId {
    let adjacent = faces
        .get(id.face)
        .and_then(|f| f.winding().points().get(id.vertex))
        .and_then(|v| v.adjacent);
    let Some(adjacent_face) = adjacent else {
        return id;
    };
    match faces
        .get(adjacent_face)
        .and_then(|f| f.winding().find_adjacent(id.face))
    {
        Some(adjacent_vertex) => FaceVertexId::new(adjacent_face, adjacent_vertex),
        None => {
            log::debug!("broken brush connectivity at {:?}", id);
            id
        }
    }
}

/// The next corner in the ring of face corners sharing the point of `id`.
pub fn next_vertex(faces: &[Face], id: FaceVertexId) -> FaceVertexId {
    let edge = next_edge(faces, id);
    if edge == id {
        return id;
    }
    FaceVertexId::new(edge.face, faces[edge.face].winding().next(edge.vertex))
}

/// A convex solid bounded by the half-spaces behind its face planes.
#[derive(Debug)]
pub struct Brush {
    faces: Vec<Face>,
    aabb: Aabb,
    plane_changed: bool,
    max_world_coord: f64,
    edges: Vec<FaceVertexId>,
    vertices: Vec<FaceVertexId>,
    events: Option<Vec<BrushEvent>>,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Brush {
    /// Deep copy of the faces. The copy has no event queue and re-evaluates.
    fn clone(&self) -> Self {
        let mut brush = Brush::with_max_world_coord(self.max_world_coord);
        brush.faces = self.faces.clone();
        brush
    }
}

impl Brush {
    /// A brush with no faces.
    pub fn new() -> Self {
        Self::with_max_world_coord(DEFAULT_MAX_WORLD_COORD)
    }

    /// A brush with no faces inside a world of the given half-size.
    pub fn with_max_world_coord(max_world_coord: f64) -> Self {
        Self {
            faces: Vec::new(),
            aabb: Aabb::empty(),
            plane_changed: true,
            max_world_coord,
            edges: Vec::new(),
            vertices: Vec::new(),
            events: None,
        }
    }

    /// A brush over the given faces.
    pub fn from_faces(faces: Vec<Face>) -> Self {
        let mut brush = Self::new();
        brush.faces = faces;
        brush
    }

    /// Half-size of the world the brush is built in.
    pub fn max_world_coord(&self) -> f64 {
        self.max_world_coord
    }

    /// Change the world half-size. The brush must be re-evaluated.
    pub fn set_max_world_coord(&mut self, max_world_coord: f64) {
        self.max_world_coord = max_world_coord;
        self.plane_changed();
    }

    /// Start recording [`BrushEvent`]s.
    pub fn enable_events(&mut self) {
        if self.events.is_none() {
            self.events = Some(Vec::new());
        }
    }

    /// Drain recorded events.
    pub fn take_events(&mut self) -> Vec<BrushEvent> {
        self.events.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn emit(&mut self, event: BrushEvent) {
        if let Some(events) = self.events.as_mut() {
            events.push(event);
        }
    }

    /// The faces, in plane order.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Number of faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True if the brush has no faces.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// The face at `index`.
    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces.get(index)
    }

    /// Mutable access to the face at `index`. Marks the brush for re-evaluation.
    pub fn face_mut(&mut self, index: usize) -> Option<&mut Face> {
        if index < self.faces.len() {
            self.plane_changed = true;
        }
        self.faces.get_mut(index)
    }

    /// Apply `f` to every face and mark the brush for re-evaluation.
    pub fn for_each_face_mut(&mut self, mut f: impl FnMut(&mut Face)) {
        for face in &mut self.faces {
            f(face);
        }
        self.plane_changed = true;
    }

    /// Reserve storage for `count` more faces.
    pub fn reserve(&mut self, count: usize) {
        self.faces.reserve(count);
        self.emit(BrushEvent::Reserve(count));
    }

    fn push_back(&mut self, face: Face) -> &mut Face {
        self.faces.push(face);
        let index = self.faces.len() - 1;
        self.emit(BrushEvent::PushBack(index));
        let detail = self.is_detail();
        self.plane_changed();
        let face = &mut self.faces[index];
        face.set_detail(detail);
        face
    }

    /// Append a copy of `face`. Returns `None` at [`MAX_FACES`].
    ///
    /// The new face takes the brush's detail bit.
    pub fn add_face(&mut self, face: &Face) -> Option<&mut Face> {
        if self.faces.len() >= MAX_FACES {
            log::warn!("brush already has {} faces", MAX_FACES);
            return None;
        }
        Some(self.push_back(face.clone()))
    }

    /// Append a face through three points. Returns `None` at [`MAX_FACES`].
    pub fn add_plane(
        &mut self,
        p0: Point3,
        p1: Point3,
        p2: Point3,
        shader: &str,
        texdef: TexDef,
    ) -> Option<&mut Face> {
        if self.faces.len() >= MAX_FACES {
            log::warn!("brush already has {} faces", MAX_FACES);
            return None;
        }
        Some(self.push_back(Face::new(p0, p1, p2, shader, texdef)))
    }

    /// Remove the last face.
    pub fn pop_back(&mut self) -> Option<Face> {
        let face = self.faces.pop()?;
        self.emit(BrushEvent::PopBack);
        self.plane_changed();
        Some(face)
    }

    /// Remove the face at `index`.
    pub fn erase(&mut self, index: usize) -> Face {
        let face = self.faces.remove(index);
        self.emit(BrushEvent::Erase(index));
        self.plane_changed();
        face
    }

    /// Remove every face.
    pub fn clear(&mut self) {
        self.faces.clear();
        self.emit(BrushEvent::Clear);
        self.plane_changed();
    }

    /// Replace this brush's faces with copies of `other`'s.
    pub fn copy_from(&mut self, other: &Brush) {
        self.clear();
        for face in &other.faces {
            self.push_back(face.clone());
        }
    }

    /// Mark the boundary representation stale.
    pub fn plane_changed(&mut self) {
        self.plane_changed = true;
    }

    /// Note that the shader of face `index` changed.
    pub fn shader_changed(&mut self, index: usize) {
        self.emit(BrushEvent::ShaderChanged(index));
        self.plane_changed();
    }

    /// True if the boundary representation is stale.
    pub fn needs_evaluation(&self) -> bool {
        self.plane_changed
    }

    /// Rebuild the boundary representation if any plane changed.
    pub fn evaluate_brep(&mut self) {
        if self.plane_changed {
            self.plane_changed = false;
            self.build_brep();
        }
    }

    /// Evaluate and return the brush.
    pub fn evaluated(mut self) -> Self {
        self.evaluate_brep();
        self
    }

    /// Bounds of all face windings, as of the last evaluation.
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// Unique edges of the evaluated brush, one corner per edge.
    pub fn edges(&self) -> &[FaceVertexId] {
        &self.edges
    }

    /// Unique vertices of the evaluated brush, one corner per vertex.
    pub fn vertices(&self) -> &[FaceVertexId] {
        &self.vertices
    }

    /// Position of a face corner.
    pub fn corner(&self, id: FaceVertexId) -> Option<Point3> {
        self.faces
            .get(id.face)
            .and_then(|f| f.winding().points().get(id.vertex))
            .map(|v| v.vertex)
    }

    /// The detail bit of the first face.
    pub fn is_detail(&self) -> bool {
        self.faces.first().is_some_and(Face::is_detail)
    }

    /// Set or clear the detail bit on every face.
    pub fn set_detail(&mut self, detail: bool) {
        for face in &mut self.faces {
            face.set_detail(detail);
        }
    }

    /// Flags of the last face. Faces of a brush are assumed to share flags.
    pub fn flags(&self) -> ContentsFlagsValue {
        self.faces.last().map(|f| *f.flags()).unwrap_or_default()
    }

    /// Write flags to every face.
    pub fn set_flags(&mut self, flags: &ContentsFlagsValue) {
        for face in &mut self.faces {
            face.set_flags(flags);
        }
    }

    /// Apply a live transform to every face.
    pub fn transform(&mut self, matrix: &Mat4, texture_lock: bool) {
        let mirror = Transform::from_matrix(*matrix).is_mirror();
        for face in &mut self.faces {
            face.transform(matrix, mirror, texture_lock);
        }
        self.plane_changed();
    }

    /// Discard the live transform of every face.
    pub fn revert_transform(&mut self) {
        for face in &mut self.faces {
            face.revert_transform();
        }
        self.plane_changed();
    }

    /// Commit the live transform of every face.
    pub fn freeze_transform(&mut self) {
        for face in &mut self.faces {
            face.freeze_transform();
        }
        self.plane_changed();
    }

    /// Snap the plane points of contributing faces to the grid.
    pub fn snap_to(&mut self, grid: f64) {
        self.evaluate_brep();
        for face in &mut self.faces {
            face.snap_to(grid);
        }
        self.plane_changed();
    }

    /// Remove faces whose winding is empty. Leaves the brush evaluated.
    pub fn remove_empty_faces(&mut self) {
        self.evaluate_brep();
        let mut i = 0;
        while i < self.faces.len() {
            if self.faces[i].contributes() {
                i += 1;
            } else {
                self.erase(i);
            }
        }
        // adjacency indices shifted
        self.evaluate_brep();
    }

    /// True if any face has a polygon, as of the last evaluation.
    pub fn has_contributing_faces(&self) -> bool {
        self.faces.iter().any(Face::contributes)
    }

    /// Average of all winding points, as of the last evaluation.
    pub fn centroid(&self) -> Point3 {
        let mut sum = Vec3::zeros();
        let mut count = 0usize;
        for face in self.faces.iter().filter(|f| f.contributes()) {
            for v in face.winding().iter() {
                sum += v.vertex.coords;
                count += 1;
            }
        }
        if count == 0 {
            return Point3::origin();
        }
        Point3::from(sum / count as f64)
    }

    /// True unless another face's plane takes priority over face `index`.
    pub fn plane_unique(&self, index: usize) -> bool {
        let plane = self.faces[index].plane3();
        self.faces.iter().enumerate().all(|(i, f)| {
            let other = f.plane3();
            if i == index {
                true
            } else if plane.coincides_with(&other) {
                // identical planes: the earlier face wins
                index < i
            } else {
                plane.inside(&other)
            }
        })
    }

    /// The polygon cut from `plane` by every other face of the brush.
    pub fn winding_for_clip_plane(&self, plane: &Plane3) -> Winding {
        let mut winding = Winding::infinite(plane, self.max_world_coord + 1.0);
        for (i, face) in self.faces.iter().enumerate() {
            let clip = face.plane3();
            if clip.coincides_with(plane)
                || !clip.is_valid()
                || !self.plane_unique(i)
                || plane.opposes(&clip)
            {
                continue;
            }
            // keep the part behind the other face
            winding = winding.clip(&-clip, i);
        }
        winding
    }

    /// True if every face winding is closed by other faces.
    pub fn is_bounded(&self) -> bool {
        self.faces.iter().all(Face::is_bounded)
    }

    /// Build every face winding. Returns true if the brush is unbounded.
    fn build_windings(&mut self) -> bool {
        self.aabb = Aabb::empty();

        for i in 0..self.faces.len() {
            let plane = self.faces[i].plane3();
            if !plane.is_valid() || !self.plane_unique(i) {
                self.faces[i].winding_mut().clear();
                continue;
            }
            let winding = self.winding_for_clip_plane(&plane);
            for v in winding.iter() {
                self.aabb.include_point(&v.vertex);
            }
            let face = &mut self.faces[i];
            *face.winding_mut() = winding;
            face.emit_texture_coordinates();
        }

        let degenerate = !self.is_bounded();
        if !degenerate {
            // order matters
            self.remove_degenerate_edges();
            self.remove_degenerate_faces();
            self.remove_duplicate_edges();
            self.verify_connectivity_graph();
        }
        degenerate
    }

    /// Remove edges shorter than the winding tolerance, together with their
    /// partner in the adjacent face.
    fn remove_degenerate_edges(&mut self) {
        for i in 0..self.faces.len() {
            let mut j = 0;
            while j < self.faces[i].winding().len() {
                let winding = self.faces[i].winding();
                let next = winding.next(j);
                if !edge_is_degenerate(&winding[j].vertex, &winding[next].vertex) {
                    j += 1;
                    continue;
                }
                if let Some(adjacent) = winding[j].adjacent {
                    if let Some(other) = self.faces.get_mut(adjacent) {
                        if let Some(k) = other.winding().find_adjacent(i) {
                            other.winding_mut().erase(k);
                        }
                    }
                }
                self.faces[i].winding_mut().erase(j);
            }
        }
    }

    /// Clear two-point windings, linking their two neighbours to each other.
    fn remove_degenerate_faces(&mut self) {
        for i in 0..self.faces.len() {
            if self.faces[i].winding().len() != 2 {
                continue;
            }
            let a0 = self.faces[i].winding()[0].adjacent;
            let a1 = self.faces[i].winding()[1].adjacent;
            for (from, to) in [(a0, a1), (a1, a0)] {
                let Some(from) = from else { continue };
                if let Some(face) = self.faces.get_mut(from) {
                    if let Some(k) = face.winding().find_adjacent(i) {
                        face.winding_mut()[k].adjacent = to;
                    }
                }
            }
            self.faces[i].winding_mut().clear();
        }
    }

    /// Remove an edge that has the same adjacent face as its predecessor.
    fn remove_duplicate_edges(&mut self) {
        for face in &mut self.faces {
            let winding = face.winding_mut();
            let mut j = 0;
            while j < winding.len() {
                let next = winding.next(j);
                if winding[j].adjacent == winding[next].adjacent {
                    winding.erase(next);
                } else {
                    j += 1;
                }
            }
        }
    }

    /// Remove edges whose adjacent face has no edge pointing back.
    fn verify_connectivity_graph(&mut self) {
        for i in 0..self.faces.len() {
            let mut j = 0;
            while j < self.faces[i].winding().len() {
                let paired = match self.faces[i].winding()[j].adjacent {
                    Some(a) => self
                        .faces
                        .get(a)
                        .is_some_and(|f| f.winding().find_adjacent(i).is_some()),
                    None => false,
                };
                if paired {
                    j += 1;
                } else {
                    self.faces[i].winding_mut().erase(j);
                }
            }
        }
    }

    /// Rebuild windings, then the unique edge and vertex lists.
    fn build_brep(&mut self) {
        let degenerate = self.build_windings();

        let contributing = self.faces.iter().filter(|f| f.contributes()).count();
        let corner_count: usize = self
            .faces
            .iter()
            .filter(|f| f.contributes())
            .map(|f| f.winding().len())
            .sum();

        self.edges.clear();
        self.vertices.clear();
        self.emit(BrushEvent::EdgeClear);
        self.emit(BrushEvent::VertexClear);

        if degenerate || contributing < 4 || corner_count % 2 != 0 {
            if !self.faces.is_empty() {
                log::debug!(
                    "brush is degenerate: {} faces, {} contributing, {} corners",
                    self.faces.len(),
                    contributing,
                    corner_count
                );
            }
            self.emit(BrushEvent::ConnectivityChanged);
            return;
        }

        let corners: Vec<FaceVertexId> = self
            .faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.contributes())
            .flat_map(|(i, f)| (0..f.winding().len()).map(move |j| FaceVertexId::new(i, j)))
            .collect();

        let mut visited: Vec<Vec<bool>> = self
            .faces
            .iter()
            .map(|f| vec![false; f.winding().len()])
            .collect();

        let mut vertices = Vec::new();
        for &start in &corners {
            if visited[start.face][start.vertex] {
                continue;
            }
            let mut id = start;
            for _ in 0..corners.len() {
                visited[id.face][id.vertex] = true;
                id = next_vertex(&self.faces, id);
                if id == start || visited[id.face][id.vertex] {
                    break;
                }
            }
            vertices.push(start);
        }

        for row in &mut visited {
            row.iter_mut().for_each(|v| *v = false);
        }

        let mut edges = Vec::new();
        for &id in &corners {
            if visited[id.face][id.vertex] {
                continue;
            }
            visited[id.face][id.vertex] = true;
            let pair = next_edge(&self.faces, id);
            visited[pair.face][pair.vertex] = true;
            edges.push(id);
        }

        for &edge in &edges {
            self.emit(BrushEvent::EdgePushBack(edge));
        }
        for &vertex in &vertices {
            self.emit(BrushEvent::VertexPushBack(vertex));
        }
        self.edges = edges;
        self.vertices = vertices;
        self.emit(BrushEvent::ConnectivityChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::cuboid;
    use crate::shader::DEFAULT_SHADER;

    fn cube(min: f64, max: f64) -> Brush {
        cuboid(
            &Aabb::new(Point3::new(min, min, min), Point3::new(max, max, max)),
            DEFAULT_SHADER,
            &TexDef::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_cube_brep() {
        let brush = cube(-32.0, 32.0);
        assert_eq!(brush.len(), 6);
        assert!(brush.faces().iter().all(|f| f.winding().len() == 4));
        assert_eq!(brush.edges().len(), 12);
        assert_eq!(brush.vertices().len(), 8);
        assert!((brush.aabb().min - Point3::new(-32.0, -32.0, -32.0)).norm() < 1e-9);
        assert!((brush.aabb().max - Point3::new(32.0, 32.0, 32.0)).norm() < 1e-9);
        assert!(brush.centroid().coords.norm() < 1e-9);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let brush = cube(0.0, 64.0);
        for (i, face) in brush.faces().iter().enumerate() {
            for v in face.winding().iter() {
                let a = v.adjacent.unwrap();
                assert!(brush.faces()[a].winding().find_adjacent(i).is_some());
            }
        }
    }

    #[test]
    fn test_every_vertex_lies_on_all_planes_it_touches() {
        let brush = cube(0.0, 64.0);
        for face in brush.faces() {
            let plane = face.plane3();
            for v in face.winding().iter() {
                assert!(plane.distance_to(&v.vertex).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_duplicate_plane_is_not_unique() {
        let mut brush = cube(0.0, 64.0);
        let mut looser = brush.faces()[0].clone();
        looser.offset(16.0);
        brush.add_face(&looser);
        brush.evaluate_brep();
        assert!(brush.plane_unique(0));
        assert!(!brush.plane_unique(6));
        assert!(!brush.faces()[6].contributes());
        brush.remove_empty_faces();
        assert_eq!(brush.len(), 6);
        assert!((brush.aabb().max.z - 64.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_planes_keep_first_face() {
        let mut brush = cube(-32.0, 32.0);
        let first = brush.faces()[0].clone();
        let second = brush.faces()[1].clone();
        brush.add_face(&first);
        brush.add_face(&second);
        assert_eq!(brush.len(), 8);
        brush.evaluate_brep();
        assert!(brush.plane_unique(0));
        assert!(brush.plane_unique(1));
        assert!(!brush.plane_unique(6));
        assert!(!brush.plane_unique(7));
        assert!(brush.faces()[0].contributes());
        assert!(!brush.faces()[6].contributes());

        brush.remove_empty_faces();
        assert_eq!(brush.len(), 6);
        assert!(brush.is_bounded());
        assert_eq!(brush.edges().len(), 12);
        assert_eq!(brush.vertices().len(), 8);
        assert!((brush.aabb().min - Point3::new(-32.0, -32.0, -32.0)).norm() < 1e-9);
        assert!((brush.aabb().max - Point3::new(32.0, 32.0, 32.0)).norm() < 1e-9);
    }

    #[test]
    fn test_plane_touching_an_edge_is_dropped() {
        let mut brush = cube(-32.0, 32.0);
        // normal (1, 0, 1) through the edge x = 32, z = 32
        brush.add_plane(
            Point3::new(33.0, 0.0, 31.0),
            Point3::new(32.0, 0.0, 32.0),
            Point3::new(32.0, 1.0, 32.0),
            DEFAULT_SHADER,
            TexDef::default(),
        );
        brush.evaluate_brep();
        assert!(brush.faces()[6].winding().is_empty());
        assert!(brush.is_bounded());
        assert_eq!(brush.edges().len(), 12);
        assert_eq!(brush.vertices().len(), 8);
        for (i, face) in brush.faces().iter().enumerate().take(6) {
            assert_eq!(face.winding().len(), 4);
            for v in face.winding().iter() {
                let a = v.adjacent.unwrap();
                assert_ne!(a, 6);
                assert!(brush.faces()[a].winding().find_adjacent(i).is_some());
            }
        }

        brush.remove_empty_faces();
        assert_eq!(brush.len(), 6);
        assert!((brush.aabb().max - Point3::new(32.0, 32.0, 32.0)).norm() < 1e-9);
    }

    #[test]
    fn test_chop_removes_overhang() {
        let mut brush = cube(0.0, 64.0);
        // plane z = 32 facing up; the brush keeps what is below
        brush.add_plane(
            Point3::new(0.0, 0.0, 32.0),
            Point3::new(0.0, 64.0, 32.0),
            Point3::new(64.0, 0.0, 32.0),
            DEFAULT_SHADER,
            TexDef::default(),
        );
        brush.remove_empty_faces();
        assert_eq!(brush.len(), 6);
        assert!((brush.aabb().max.z - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_unbounded_brush_has_no_edges() {
        let mut brush = cube(0.0, 64.0);
        brush.erase(0);
        brush.evaluate_brep();
        assert!(brush.edges().is_empty());
        assert!(brush.vertices().is_empty());
    }

    #[test]
    fn test_face_limit() {
        let mut brush = Brush::new();
        let face = cube(0.0, 64.0).faces()[0].clone();
        for _ in 0..MAX_FACES {
            assert!(brush.add_face(&face).is_some());
        }
        assert!(brush.add_face(&face).is_none());
    }

    #[test]
    fn test_clone_drops_events() {
        let mut brush = cube(0.0, 64.0);
        brush.enable_events();
        brush.pop_back();
        assert_eq!(brush.take_events(), vec![BrushEvent::PopBack]);
        let copy = brush.clone();
        assert!(copy.needs_evaluation());
        assert!(copy.events.is_none());
    }

    #[test]
    fn test_events_for_rebuild() {
        let mut brush = cube(0.0, 64.0);
        brush.enable_events();
        brush.plane_changed();
        brush.evaluate_brep();
        let events = brush.take_events();
        assert_eq!(events[0], BrushEvent::EdgeClear);
        assert_eq!(events[1], BrushEvent::VertexClear);
        let edges = events
            .iter()
            .filter(|e| matches!(e, BrushEvent::EdgePushBack(_)))
            .count();
        assert_eq!(edges, 12);
        assert_eq!(events.last(), Some(&BrushEvent::ConnectivityChanged));
    }

    #[test]
    fn test_detail_follows_first_face() {
        let mut brush = cube(0.0, 64.0);
        brush.set_detail(true);
        let face = brush.faces()[0].clone();
        let mut other = Brush::new();
        other.add_face(&face);
        assert!(other.is_detail());
        let added = brush
            .add_plane(
                Point3::new(0.0, 0.0, 32.0),
                Point3::new(0.0, 64.0, 32.0),
                Point3::new(64.0, 0.0, 32.0),
                DEFAULT_SHADER,
                TexDef::default(),
            )
            .unwrap();
        assert!(added.is_detail());
    }

    #[test]
    fn test_transform_and_freeze() {
        let mut brush = cube(0.0, 64.0);
        brush.transform(&Transform::translation(0.0, 0.0, 64.0).matrix, false);
        brush.evaluate_brep();
        assert!((brush.aabb().min.z - 64.0).abs() < 1e-9);
        brush.revert_transform();
        brush.evaluate_brep();
        assert!(brush.aabb().min.z.abs() < 1e-9);
    }
}
