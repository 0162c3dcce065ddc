use crate::UserId;

use super::PersistFuture;

/// The follower-following edges between users.
pub trait FollowBackend: Send + Sync + 'static {
    fn follow(&self, follower: UserId, following: UserId) -> PersistFuture;
    fn unfollow(&self, follower: UserId, following: UserId) -> PersistFuture;
}
