//! In-memory map document: entities with key/value pairs and brushes.

use radiant_brush::Brush;

/// One `{ ... }` entity block.
#[derive(Debug, Clone, Default)]
pub struct MapEntity {
    /// Key/value pairs in file order.
    pub properties: Vec<(String, String)>,
    /// Brushes in file order.
    pub brushes: Vec<Brush>,
}

impl MapEntity {
    /// An entity with only a `classname`.
    pub fn new(classname: &str) -> Self {
        Self {
            properties: vec![("classname".to_string(), classname.to_string())],
            brushes: Vec::new(),
        }
    }

    /// The `classname` value, if any.
    pub fn classname(&self) -> Option<&str> {
        self.value_for_key("classname")
    }

    /// Value stored under `key`.
    pub fn value_for_key(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set `key`, replacing an existing value.
    pub fn set_key_value(&mut self, key: &str, value: &str) {
        match self.properties.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.properties.push((key.to_string(), value.to_string())),
        }
    }
}

/// A whole map: the world entity first, then point and brush entities.
#[derive(Debug, Clone, Default)]
pub struct MapDocument {
    /// Entities in file order.
    pub entities: Vec<MapEntity>,
}

impl MapDocument {
    /// A document holding an empty `worldspawn`.
    pub fn new() -> Self {
        Self {
            entities: vec![MapEntity::new("worldspawn")],
        }
    }

    /// The `worldspawn` entity.
    pub fn worldspawn(&self) -> Option<&MapEntity> {
        self.entities
            .iter()
            .find(|e| e.classname() == Some("worldspawn"))
    }

    /// Total number of brushes across all entities.
    pub fn brush_count(&self) -> usize {
        self.entities.iter().map(|e| e.brushes.len()).sum()
    }

    /// Every brush in file order.
    pub fn brushes(&self) -> impl Iterator<Item = &Brush> {
        self.entities.iter().flat_map(|e| e.brushes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_values() {
        let mut e = MapEntity::new("func_group");
        assert_eq!(e.classname(), Some("func_group"));
        e.set_key_value("spawnflags", "1");
        e.set_key_value("spawnflags", "2");
        assert_eq!(e.value_for_key("spawnflags"), Some("2"));
        assert_eq!(e.properties.len(), 2);
        assert_eq!(e.value_for_key("origin"), None);
    }

    #[test]
    fn test_new_document() {
        let doc = MapDocument::new();
        assert!(doc.worldspawn().is_some());
        assert_eq!(doc.brush_count(), 0);
    }
}
