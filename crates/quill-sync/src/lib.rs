//! Optimistic client state with server reconciliation.
//!
//! A [`mutation::MutationCoordinator`] applies a change to a local entity store right away, runs the
//! remote write in the background and reconciles once the write settles: the latest mutation of a key
//! either commits or rolls back to its snapshot, older overlapping results are discarded.

pub mod mutation;
pub mod sync;
