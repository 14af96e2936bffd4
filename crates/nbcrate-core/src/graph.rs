//! Entity store keyed by `@id`, in insertion order

use crate::model::*;
use indexmap::IndexMap;

/// Identifier of the crate root dataset.
pub const ROOT_ID: &str = "./";

/// Identifier of the metadata descriptor entity.
pub const METADATA_ID: &str = "ro-crate-metadata.json";

/// Default JSON-LD context for RO-Crate 1.1.
pub const DEFAULT_CONTEXT: &str = "https://w3id.org/ro/crate/1.1/context";

/// The crate graph. A re-inserted entity keeps its position, so repeated
/// runs over the same input serialize identically.
#[derive(Clone, PartialEq)]
pub struct EntityGraph {
    context: serde_json::Value,
    entities: IndexMap<String, Entity>,
}

impl std::fmt::Debug for EntityGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityGraph")
            .field("entity_count", &self.entities.len())
            .finish()
    }
}

impl EntityGraph {
    pub fn new() -> Self {
        EntityGraph {
            context: serde_json::Value::String(DEFAULT_CONTEXT.to_string()),
            entities: IndexMap::new(),
        }
    }

    pub fn with_context(context: serde_json::Value) -> Self {
        EntityGraph {
            context,
            entities: IndexMap::new(),
        }
    }

    pub fn context(&self) -> &serde_json::Value {
        &self.context
    }

    /// Get an entity by ID.
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Get a mutable entity by ID.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Total number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate over all entities in document order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Insert an entity, replacing any entity with the same ID in place.
    pub fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity.id.clone(), entity);
    }

    /// Create-or-merge keyed by `id`.
    ///
    /// An existing entity gets `properties` overlaid on its current ones;
    /// a new entity is created with `properties` as its defaults.
    pub fn upsert(&mut self, id: &str, properties: Properties) -> &mut Entity {
        self.upsert_with(id, Properties::new, properties)
    }

    /// Like [`upsert`](Self::upsert) but with separate defaults that only
    /// apply when the entity is new. `updates` is overlaid in both cases.
    pub fn upsert_with<F>(&mut self, id: &str, defaults: F, updates: Properties) -> &mut Entity
    where
        F: FnOnce() -> Properties,
    {
        let entity = self.entities.entry(id.to_string()).or_insert_with(|| {
            tracing::debug!("Creating entity {}", id);
            Entity::new(id, defaults())
        });
        entity.overlay(updates);
        entity
    }

    /// Remove an entity. References to it elsewhere are left as they are.
    pub fn remove(&mut self, id: &str) -> Option<Entity> {
        self.entities.shift_remove(id)
    }

    /// IDs of all entities carrying the given type tag.
    pub fn ids_of_type(&self, ty: &str) -> Vec<String> {
        self.entities
            .values()
            .filter(|e| e.has_type(ty))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Entities carrying every one of the given type tags.
    pub fn entities_of_types<'a>(&'a self, types: &'a [&'a str]) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities
            .values()
            .filter(move |e| types.iter().all(|t| e.has_type(t)))
    }

    /// The root dataset, if present.
    pub fn root(&self) -> Option<&Entity> {
        self.get(ROOT_ID)
    }

    pub fn root_mut(&mut self) -> Option<&mut Entity> {
        self.get_mut(ROOT_ID)
    }
}

impl Default for EntityGraph {
    fn default() -> Self {
        Self::new()
    }
}
