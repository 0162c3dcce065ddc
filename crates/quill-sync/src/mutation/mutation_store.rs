use super::EntityKey;

/// Local state that can be captured before and restored after an optimistic change.
pub trait MutationStore {
    type Key: EntityKey;
    type Snapshot;

    /// Capture the current state of the entity with the given key, including its absence.
    fn snapshot(&self, key: &Self::Key) -> Self::Snapshot;

    /// Put the entity back to the captured state.
    fn restore(&mut self, key: &Self::Key, snapshot: Self::Snapshot);
}
