use crate::sync::Event;

use super::{EntityKey, MutationError, MutationSeq};

/// Outcome of a settled mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationEvent<K>
where
    K: EntityKey,
{
    /// The latest mutation of the key was persisted, the optimistic value stays.
    Committed { key: K, seq: MutationSeq },
    /// The latest mutation of the key failed and the entity was restored to the last value accepted by the backend.
    RolledBack { key: K, seq: MutationSeq, error: MutationError },
    /// A newer mutation was issued for the key before this one settled, the result was ignored.
    /// It is never published on the event bus.
    Superseded { key: K, seq: MutationSeq, latest: MutationSeq },
}

impl<K> MutationEvent<K>
where
    K: EntityKey,
{
    pub fn key(&self) -> &K {
        match self {
            Self::Committed { key, .. } | Self::RolledBack { key, .. } | Self::Superseded { key, .. } => key,
        }
    }

    pub fn seq(&self) -> MutationSeq {
        match self {
            Self::Committed { seq, .. } | Self::RolledBack { seq, .. } | Self::Superseded { seq, .. } => *seq,
        }
    }

    pub fn error(&self) -> Option<&MutationError> {
        match self {
            Self::RolledBack { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl<K> Event for MutationEvent<K> where K: EntityKey {}
