use std::{collections::HashMap, future::Future};

use super::{Entity, MutationCoordinator, MutationError, MutationSeq, MutationStore};

/// Entities indexed by their key, without ordering.
#[derive(Clone, Debug)]
pub struct EntityMap<E>
where
    E: Entity,
{
    entities: HashMap<E::Key, E>,
}

impl<E> Default for EntityMap<E>
where
    E: Entity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EntityMap<E>
where
    E: Entity,
{
    pub fn new() -> Self {
        Self { entities: HashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, key: &E::Key) -> bool {
        self.entities.contains_key(key)
    }

    pub fn get(&self, key: &E::Key) -> Option<&E> {
        self.entities.get(key)
    }

    pub fn values(&self) -> impl Iterator<Item = &E> {
        self.entities.values()
    }

    /// Insert or replace the entity, returns the replaced one.
    pub fn insert(&mut self, entity: E) -> Option<E> {
        self.entities.insert(entity.key(), entity)
    }

    pub fn remove(&mut self, key: &E::Key) -> Option<E> {
        self.entities.remove(key)
    }
}

impl<E> FromIterator<E> for EntityMap<E>
where
    E: Entity,
{
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            entities: iter.into_iter().map(|e| (e.key(), e)).collect(),
        }
    }
}

impl<E> MutationStore for EntityMap<E>
where
    E: Entity,
{
    type Key = E::Key;
    type Snapshot = Option<E>;

    fn snapshot(&self, key: &E::Key) -> Option<E> {
        self.entities.get(key).cloned()
    }

    fn restore(&mut self, key: &E::Key, snapshot: Option<E>) {
        match snapshot {
            Some(entity) => {
                self.entities.insert(key.clone(), entity);
            }
            None => {
                self.entities.remove(key);
            }
        }
    }
}

impl<E> MutationCoordinator<EntityMap<E>>
where
    E: Entity,
{
    /// Replace an existing entity with the value computed from the current one.
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
                    store.insert(next);
                }
            },
            persist,
        ))
    }

    /// Insert (or replace) an entity, the rollback removes it (or restores the replaced one).
    pub fn insert<F>(&mut self, entity: E, persist: F) -> MutationSeq
    where
        F: Future<Output = Result<(), MutationError>> + Send + 'static,
    {
        self.apply(
            entity.key(),
            move |store, _| {
                store.insert(entity);
            },
            persist,
        )
    }

    /// Remove an entity, the rollback puts it back. Returns `None` and skips `persist` if the entity
    /// is not present.
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

#[cfg(test)]
mod test {
    use super::*;
    use quill_test::test;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: u32,
        value: i32,
    }

    impl Entity for Counter {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }
    }

    #[test]
    fn restore_of_absent_snapshot_removes() {
        let mut map: EntityMap<Counter> = [Counter { id: 1, value: 3 }].into_iter().collect();

        let absent = map.snapshot(&2);
        let present = map.snapshot(&1);
        map.insert(Counter { id: 2, value: 0 });
        map.remove(&1);

        map.restore(&2, absent);
        map.restore(&1, present);
        assert!(!map.contains(&2));
        assert_eq!(map.get(&1), Some(&Counter { id: 1, value: 3 }));
    }
}
