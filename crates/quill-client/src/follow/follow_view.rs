use crate::{
    backend::FollowBackend,
    config::ClientConfig,
    notification::{RollbackToasts, ToastBoard},
    UserId,
};
use quill_sync::mutation::{EntityMap, MutationCoordinator, MutationEvent, MutationSeq};

use super::{FollowEdge, FollowError};

/// Follow buttons of the authors on a page, from the point of view of the signed in user.
pub struct FollowView<B>
where
    B: FollowBackend,
{
    viewer: UserId,
    coordinator: MutationCoordinator<EntityMap<FollowEdge>>,
    backend: B,
    toasts: ToastBoard,
}

impl<B> FollowView<B>
where
    B: FollowBackend,
{
    pub async fn new(viewer: UserId, backend: B, config: &ClientConfig) -> Self {
        let coordinator = MutationCoordinator::new(EntityMap::new(), config.coordinator.clone());
        let toasts = ToastBoard::new(config.toast.clone());
        coordinator
            .events()
            .subscribe(RollbackToasts::new(toasts.clone(), "Could not update the follow"))
            .await;

        Self {
            viewer,
            coordinator,
            backend,
            toasts,
        }
    }

    pub fn viewer(&self) -> UserId {
        self.viewer
    }

    /// Show an author with the state loaded from the backend.
    pub fn track(&mut self, author: UserId, is_following: bool, follower_count: u64) {
        self.coordinator.store_mut().insert(FollowEdge {
            follower_id: self.viewer,
            following_id: author,
            is_following,
            follower_count,
        });
    }

    pub fn untrack(&mut self, author: &UserId) {
        self.coordinator.store_mut().remove(author);
    }

    pub fn edge(&self, author: &UserId) -> Option<&FollowEdge> {
        self.coordinator.store().get(author)
    }

    pub fn toasts(&self) -> &ToastBoard {
        &self.toasts
    }

    /// Follow or unfollow the author, depending on the displayed state.
    pub fn toggle(&mut self, author: UserId) -> Result<MutationSeq, FollowError> {
        if author == self.viewer {
            return Err(FollowError::SelfFollow);
        }
        let edge = self.edge(&author).ok_or(FollowError::UnknownAuthor(author))?;

        let persist = if edge.is_following {
            self.backend.unfollow(self.viewer, author)
        } else {
            self.backend.follow(self.viewer, author)
        };
        self.coordinator
            .update(author, FollowEdge::toggled, persist)
            .ok_or(FollowError::UnknownAuthor(author))
    }

    pub async fn reconcile(&mut self) -> Vec<MutationEvent<UserId>> {
        self.coordinator.reconcile().await
    }

    pub async fn settle_all(&mut self) -> Vec<MutationEvent<UserId>> {
        self.coordinator.settle_all().await
    }

    pub async fn settle_next(&mut self) -> Option<MutationEvent<UserId>> {
        self.coordinator.settle_next().await
    }
}
