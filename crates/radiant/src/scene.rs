//! Scene graph of entities and brush nodes.
//!
//! Entities and brush nodes live in slot maps, so their keys stay valid
//! while CSG commands insert and delete siblings. Each brush node records
//! its [`BrushEvent`]s; the graph forwards them, along with insertions,
//! removals and selection changes, to subscribers as [`SceneEvent`]s.

use slotmap::{new_key_type, SlotMap};

use radiant_brush::{Brush, BrushEvent};
use radiant_map::{MapDocument, MapEntity};

use crate::context::EditorContext;
use crate::undo::UndoStack;

new_key_type! {
    /// Key of an entity.
    pub struct EntityId;
    /// Key of a brush node.
    pub struct NodeId;
}

/// Something that happened to the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// An entity was added.
    EntityInserted(EntityId),
    /// A brush node was added.
    NodeInserted(NodeId),
    /// A brush node was deleted.
    NodeRemoved(NodeId),
    /// A brush node was selected or deselected.
    SelectionChanged {
        /// The node.
        node: NodeId,
        /// Its new state.
        selected: bool,
    },
    /// A brush reported a face-list or connectivity change.
    Brush {
        /// The node owning the brush.
        node: NodeId,
        /// What changed.
        event: BrushEvent,
    },
    /// The whole scene was replaced by undo or redo.
    Restored,
}

/// An entity: key/value pairs plus the brush nodes it owns, in order.
#[derive(Debug, Clone, Default)]
pub struct EntityNode {
    /// Key/value pairs in file order.
    pub properties: Vec<(String, String)>,
    brushes: Vec<NodeId>,
}

impl EntityNode {
    /// Brush nodes in order.
    pub fn brushes(&self) -> &[NodeId] {
        &self.brushes
    }

    /// The `classname` value, if any.
    pub fn classname(&self) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == "classname")
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct BrushNode {
    brush: Brush,
    parent: EntityId,
    selected: bool,
    visible: bool,
}

/// Everything undo snapshots.
#[derive(Debug, Clone, Default)]
pub(crate) struct SceneState {
    entities: SlotMap<EntityId, EntityNode>,
    entity_order: Vec<EntityId>,
    nodes: SlotMap<NodeId, BrushNode>,
    selection: Vec<NodeId>,
}

/// Handle returned by [`SceneGraph::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

type Subscriber = Box<dyn FnMut(&SceneEvent)>;

/// Entities, brush nodes, selection, subscribers and undo history.
#[derive(Default)]
pub struct SceneGraph {
    state: SceneState,
    subscribers: Vec<Option<Subscriber>>,
    history: UndoStack<SceneState>,
    revision: u64,
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("entities", &self.state.entity_order.len())
            .field("brushes", &self.state.nodes.len())
            .field("selected", &self.state.selection.len())
            .finish()
    }
}

impl SceneGraph {
    /// An empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scene from a map document, applying the context's world
    /// bounds and texture sizes to every brush.
    pub fn from_document(doc: &MapDocument, ctx: &EditorContext) -> Self {
        let mut scene = Self::new();
        for entity in &doc.entities {
            let id = scene.add_entity(entity.properties.clone());
            for brush in &entity.brushes {
                let mut brush = brush.clone();
                ctx.apply_to_brush(&mut brush);
                scene.insert_brush(id, brush);
            }
        }
        scene.history.clear();
        log::debug!(
            "scene loaded: {} entities, {} brushes",
            scene.state.entity_order.len(),
            scene.state.nodes.len()
        );
        scene
    }

    /// The scene as a map document, entities and brushes in order.
    pub fn to_document(&self) -> MapDocument {
        let entities = self
            .state
            .entity_order
            .iter()
            .filter_map(|id| self.state.entities.get(*id))
            .map(|entity| MapEntity {
                properties: entity.properties.clone(),
                brushes: entity
                    .brushes
                    .iter()
                    .filter_map(|n| self.state.nodes.get(*n))
                    .map(|n| n.brush.clone())
                    .collect(),
            })
            .collect();
        MapDocument { entities }
    }

    // =========================================================================
    // Subscribers
    // =========================================================================

    /// Call `f` with every future event.
    pub fn subscribe(&mut self, f: impl FnMut(&SceneEvent) + 'static) -> SubscriberId {
        self.subscribers.push(Some(Box::new(f)));
        SubscriberId(self.subscribers.len() - 1)
    }

    /// Stop calling a subscriber.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        if let Some(slot) = self.subscribers.get_mut(id.0) {
            *slot = None;
        }
    }

    fn emit(&mut self, event: SceneEvent) {
        for subscriber in self.subscribers.iter_mut().flatten() {
            subscriber(&event);
        }
    }

    fn forward_brush_events(&mut self, id: NodeId) {
        let events = match self.state.nodes.get_mut(id) {
            Some(node) => node.brush.take_events(),
            None => return,
        };
        for event in events {
            self.emit(SceneEvent::Brush { node: id, event });
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append an entity.
    pub fn add_entity(&mut self, properties: Vec<(String, String)>) -> EntityId {
        self.revision += 1;
        let id = self.state.entities.insert(EntityNode {
            properties,
            brushes: Vec::new(),
        });
        self.state.entity_order.push(id);
        self.emit(SceneEvent::EntityInserted(id));
        id
    }

    /// Entities in order.
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.state.entity_order
    }

    /// An entity by key.
    pub fn entity(&self, id: EntityId) -> Option<&EntityNode> {
        self.state.entities.get(id)
    }

    /// The first entity, which holds world brushes. Created if missing.
    pub fn worldspawn(&mut self) -> EntityId {
        match self.state.entity_order.first() {
            Some(id) => *id,
            None => self.add_entity(vec![("classname".to_string(), "worldspawn".to_string())]),
        }
    }

    /// Append a brush to entity `parent`. Returns `None` if there is no
    /// such entity.
    pub fn insert_brush(&mut self, parent: EntityId, mut brush: Brush) -> Option<NodeId> {
        if !self.state.entities.contains_key(parent) {
            return None;
        }
        self.revision += 1;
        brush.enable_events();
        brush.evaluate_brep();
        brush.take_events();

        let id = self.state.nodes.insert(BrushNode {
            brush,
            parent,
            selected: false,
            visible: true,
        });
        if let Some(entity) = self.state.entities.get_mut(parent) {
            entity.brushes.push(id);
        }
        self.emit(SceneEvent::NodeInserted(id));
        Some(id)
    }

    /// Delete a brush node, returning its brush.
    pub fn remove_brush(&mut self, id: NodeId) -> Option<Brush> {
        let node = self.state.nodes.remove(id)?;
        self.revision += 1;
        if let Some(entity) = self.state.entities.get_mut(node.parent) {
            entity.brushes.retain(|n| *n != id);
        }
        self.state.selection.retain(|n| *n != id);
        self.emit(SceneEvent::NodeRemoved(id));
        Some(node.brush)
    }

    /// The brush of a node.
    pub fn brush(&self, id: NodeId) -> Option<&Brush> {
        self.state.nodes.get(id).map(|n| &n.brush)
    }

    /// The entity owning a node.
    pub fn parent(&self, id: NodeId) -> Option<EntityId> {
        self.state.nodes.get(id).map(|n| n.parent)
    }

    /// Modify a brush, then re-evaluate it and forward its events.
    pub fn edit_brush<R>(&mut self, id: NodeId, f: impl FnOnce(&mut Brush) -> R) -> Option<R> {
        let node = self.state.nodes.get_mut(id)?;
        self.revision += 1;
        let result = f(&mut node.brush);
        node.brush.evaluate_brep();
        self.forward_brush_events(id);
        Some(result)
    }

    /// Every brush node in scene order.
    pub fn brush_ids(&self) -> Vec<NodeId> {
        self.state
            .entity_order
            .iter()
            .filter_map(|e| self.state.entities.get(*e))
            .flat_map(|e| e.brushes.iter().copied())
            .collect()
    }

    /// Number of brush nodes.
    pub fn brush_count(&self) -> usize {
        self.state.nodes.len()
    }

    // =========================================================================
    // Selection and visibility
    // =========================================================================

    /// Select or deselect a node. Hidden nodes cannot be selected.
    pub fn select(&mut self, id: NodeId, selected: bool) {
        let Some(node) = self.state.nodes.get_mut(id) else {
            return;
        };
        let selected = selected && node.visible;
        if node.selected == selected {
            return;
        }
        node.selected = selected;
        if selected {
            self.state.selection.push(id);
        } else {
            self.state.selection.retain(|n| *n != id);
        }
        self.emit(SceneEvent::SelectionChanged { node: id, selected });
    }

    /// Deselect everything.
    pub fn deselect_all(&mut self) {
        for id in self.state.selection.clone() {
            self.select(id, false);
        }
    }

    /// True if the node is selected.
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.state.nodes.get(id).is_some_and(|n| n.selected)
    }

    /// Show or hide a node. Hiding deselects it.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if !visible {
            self.select(id, false);
        }
        if let Some(node) = self.state.nodes.get_mut(id) {
            node.visible = visible;
        }
    }

    /// True if the node is shown.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.state.nodes.get(id).is_some_and(|n| n.visible)
    }

    /// Visible selected nodes in scene order.
    pub fn selected_brushes(&self) -> Vec<NodeId> {
        self.brush_ids()
            .into_iter()
            .filter(|id| self.is_visible(*id) && self.is_selected(*id))
            .collect()
    }

    /// Visible unselected nodes in scene order.
    pub fn unselected_visible_brushes(&self) -> Vec<NodeId> {
        self.brush_ids()
            .into_iter()
            .filter(|id| self.is_visible(*id) && !self.is_selected(*id))
            .collect()
    }

    /// The most recently selected node.
    pub fn ultimate_selected(&self) -> Option<NodeId> {
        self.state.selection.last().copied()
    }

    // =========================================================================
    // Undo
    // =========================================================================

    /// Run `f` as one undoable command named `name`.
    ///
    /// Nothing is recorded if `f` leaves the scene unchanged.
    pub fn undoable<R>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        let before = self.state.clone();
        let revision = self.revision;
        let result = f(self);
        if self.revision != revision {
            self.history.record(name, before);
        }
        result
    }

    /// Undo the last command, returning its name.
    pub fn undo(&mut self) -> Option<String> {
        let current = std::mem::take(&mut self.state);
        match self.history.undo(current) {
            Ok((name, before)) => {
                self.restore(before);
                Some(name)
            }
            Err(current) => {
                self.state = current;
                None
            }
        }
    }

    /// Redo the last undone command, returning its name.
    pub fn redo(&mut self) -> Option<String> {
        let current = std::mem::take(&mut self.state);
        match self.history.redo(current) {
            Ok((name, after)) => {
                self.restore(after);
                Some(name)
            }
            Err(current) => {
                self.state = current;
                None
            }
        }
    }

    /// True if there is a command to undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn restore(&mut self, state: SceneState) {
        self.state = state;
        self.revision += 1;
        for (_, node) in self.state.nodes.iter_mut() {
            node.brush.enable_events();
            node.brush.evaluate_brep();
            node.brush.take_events();
        }
        self.emit(SceneEvent::Restored);
    }
}
