use std::future::Future;

use super::{Entity, MutationCoordinator, MutationError, MutationSeq, MutationStore};

/// Entities kept in display order. Rolling back a removal re-inserts the entity at its original
/// position (clamped to the current length).
#[derive(Clone, Debug)]
pub struct EntityList<E>
where
    E: Entity,
{
    entities: Vec<E>,
}

impl<E> Default for EntityList<E>
where
    E: Entity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EntityList<E>
where
    E: Entity,
{
    pub fn new() -> Self {
        Self { entities: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn position(&self, key: &E::Key) -> Option<usize> {
        self.entities.iter().position(|e| &e.key() == key)
    }

    pub fn contains(&self, key: &E::Key) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &E::Key) -> Option<&E> {
        self.position(key).map(|i| &self.entities[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.entities
    }

    /// Append the entity, an existing entity with the same key is removed first.
    pub fn push(&mut self, entity: E) {
        self.remove(&entity.key());
        self.entities.push(entity);
    }

    /// Insert the entity at the index (clamped to the length), an existing entity with the same key
    /// is removed first.
    pub fn insert_at(&mut self, index: usize, entity: E) {
        self.remove(&entity.key());
        let index = index.min(self.entities.len());
        self.entities.insert(index, entity);
    }

    /// Replace the entity in place. Returns false if no entity with the key is present.
    pub fn replace(&mut self, entity: E) -> bool {
        match self.position(&entity.key()) {
            Some(i) => {
                self.entities[i] = entity;
                true
            }
            None => false,
        }
    }

    /// Remove the entity, returning it with its former position.
    pub fn remove(&mut self, key: &E::Key) -> Option<(usize, E)> {
        let index = self.position(key)?;
        Some((index, self.entities.remove(index)))
    }
}

impl<E> FromIterator<E> for EntityList<E>
where
    E: Entity,
{
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut list = Self::new();
        for entity in iter {
            list.push(entity);
        }
        list
    }
}

impl<E> MutationStore for EntityList<E>
where
    E: Entity,
{
    type Key = E::Key;
    type Snapshot = Option<(usize, E)>;

    fn snapshot(&self, key: &E::Key) -> Self::Snapshot {
        self.position(key).map(|i| (i, self.entities[i].clone()))
    }

    fn restore(&mut self, key: &E::Key, snapshot: Self::Snapshot) {
        match snapshot {
            Some((index, entity)) => match self.position(key) {
                // still present at the same place, no reordering
                Some(current) if current == index => self.entities[index] = entity,
                _ => self.insert_at(index, entity),
            },
            None => {
                self.remove(key);
            }
        }
    }
}

impl<E> MutationCoordinator<EntityList<E>>
where
    E: Entity,
{
    /// Replace an existing entity in place with the value computed from the current one.
    /// Returns `None` and skips `persist` if the entity is not present.
    pub fn update<U, F>(&mut self, key: E::Key, update: U, persist: F) -> Option<MutationSeq>
    where
        U: FnOnce(&E) -> E,
        F: Future<Output = Result<(), MutationError>> + Send + 'static,
    {
        if !self.store().contains(&key) {
            log::debug!("Mutation [{key:?}]: no entity to update");
            return None;
        }

        Some(self.apply(
            key,
            |store, key| {
                if let Some(next) = store.get(key).map(update) {
                    debug_assert_eq!(&next.key(), key, "update must preserve the key");
                    store.replace(next);
                }
            },
            persist,
        ))
    }

    /// Append an entity, the rollback removes it.
    pub fn push<F>(&mut self, entity: E, persist: F) -> MutationSeq
    where
        F: Future<Output = Result<(), MutationError>> + Send + 'static,
    {
        self.apply(entity.key(), move |store, _| store.push(entity), persist)
    }

    /// Insert an entity at the given position, the rollback removes it.
    pub fn insert_at<F>(&mut self, index: usize, entity: E, persist: F) -> MutationSeq
    where
        F: Future<Output = Result<(), MutationError>> + Send + 'static,
    {
        self.apply(entity.key(), move |store, _| store.insert_at(index, entity), persist)
    }

    /// Remove an entity, the rollback re-inserts it at its original position.
    /// Returns `None` and skips `persist` if the entity is not present.
    pub fn remove<F>(&mut self, key: E::Key, persist: F) -> Option<MutationSeq>
    where
        F: Future<Output = Result<(), MutationError>> + Send + 'static,
    {
        if !self.store().contains(&key) {
            log::debug!("Mutation [{key:?}]: no entity to remove");
            return None;
        }

        Some(self.apply(
            key,
            |store, key| {
                store.remove(key);
            },
            persist,
        ))
    }
}
