use std::{fmt::Debug, hash::Hash};

/// Requirements for the stable identity of an entity.
pub trait EntityKey: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> EntityKey for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// A client-visible record subject to optimistic change.
pub trait Entity: Clone + Debug {
    type Key: EntityKey;

    fn key(&self) -> Self::Key;
}
