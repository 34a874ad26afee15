use crate::objects::Identifier;
use id_arena::{Arena, Id};
use log::warn;
use rustc_hash::FxHashMap;
use std::ops::{Index, IndexMut};

/// Entities of one kind, addressable by their GTFS identifier or by arena [Id]
///
/// Entities are never removed; an [Id] handed out by a table stays valid for the table's lifetime.
#[derive(Debug)]
pub struct Table<T> {
    arena: Arena<T>,
    by_key: FxHashMap<String, Id<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            by_key: FxHashMap::default(),
        }
    }
}

impl<T: Identifier> Table<T> {
    /// Inserts an entity unless one with the same identifier exists
    ///
    /// Returns the handle of the entity stored under that identifier and whether it was inserted.
    /// A rejected duplicate is dropped.
    pub fn insert_if_absent(&mut self, entity: T) -> (Id<T>, bool) {
        if let Some(id) = self.by_key.get(entity.id()) {
            warn!("duplicate id {}, keeping the first one", entity.id());
            return (*id, false);
        }
        let key = entity.id().to_owned();
        let id = self.arena.alloc(entity);
        self.by_key.insert(key, id);
        (id, true)
    }

    /// Entity stored under `key`, created with `create` on first access
    pub fn upsert_with(&mut self, key: &str, create: impl FnOnce() -> T) -> &mut T {
        let id = match self.by_key.get(key) {
            Some(id) => *id,
            None => {
                let id = self.arena.alloc(create());
                self.by_key.insert(key.to_owned(), id);
                id
            }
        };
        &mut self.arena[id]
    }
}

impl<T> Table<T> {
    /// Handle of the entity with this identifier
    pub fn id_of(&self, key: &str) -> Option<Id<T>> {
        self.by_key.get(key).copied()
    }

    /// Entity with this identifier
    pub fn get(&self, key: &str) -> Option<&T> {
        self.id_of(key).map(|id| &self.arena[id])
    }

    /// Entity behind a handle
    pub fn resolve(&self, id: Id<T>) -> Option<&T> {
        self.arena.get(id)
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Is the table empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entities in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.arena.iter().map(|(_, e)| e)
    }

    /// Entities with their handle, in insertion order
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        self.arena.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.arena.iter_mut().map(|(_, e)| e)
    }
}

impl<T> Index<Id<T>> for Table<T> {
    type Output = T;

    fn index(&self, id: Id<T>) -> &T {
        &self.arena[id]
    }
}

impl<T> IndexMut<Id<T>> for Table<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.arena[id]
    }
}

impl<T> Index<&str> for Table<T> {
    type Output = T;

    /// Panics if the identifier is unknown, see [Table::get]
    fn index(&self, key: &str) -> &T {
        &self.arena[self.by_key[key]]
    }
}
