//! Change notifications emitted by a brush.
//!
//! A brush with events enabled records every structural change in order.
//! The owner drains the queue with [`crate::Brush::take_events`] and
//! forwards it to whatever mirrors the brush (selection state, renderers).

use serde::{Deserialize, Serialize};

/// Identifies one corner of one face winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FaceVertexId {
    /// Face index within the brush.
    pub face: usize,
    /// Point index within the face's winding.
    pub vertex: usize,
}

impl FaceVertexId {
    /// Construct from face and vertex indices.
    pub fn new(face: usize, vertex: usize) -> Self {
        Self { face, vertex }
    }
}

/// A structural change to a brush.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrushEvent {
    /// Face storage reserved for this many faces.
    Reserve(usize),
    /// A face was appended at this index.
    PushBack(usize),
    /// The last face was removed.
    PopBack,
    /// The face at this index was removed.
    Erase(usize),
    /// All faces were removed.
    Clear,
    /// Face adjacency was rebuilt.
    ConnectivityChanged,
    /// The unique edge list was cleared.
    EdgeClear,
    /// A unique edge was added.
    EdgePushBack(FaceVertexId),
    /// The unique vertex list was cleared.
    VertexClear,
    /// A unique vertex was added.
    VertexPushBack(FaceVertexId),
    /// The shader of the face at this index changed.
    ShaderChanged(usize),
}
