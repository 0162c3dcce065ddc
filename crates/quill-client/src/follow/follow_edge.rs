use crate::UserId;
use quill_sync::mutation::Entity;
use serde::{Deserialize, Serialize};

/// Relation of the viewer to an author, with the author's follower count as displayed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEdge {
    pub follower_id: UserId,
    pub following_id: UserId,
    pub is_following: bool,
    pub follower_count: u64,
}

impl FollowEdge {
    /// The edge after a follow button click.
    pub fn toggled(&self) -> Self {
        let follower_count = if self.is_following {
            self.follower_count.saturating_sub(1)
        } else {
            self.follower_count + 1
        };
        Self {
            is_following: !self.is_following,
            follower_count,
            ..self.clone()
        }
    }
}

impl Entity for FollowEdge {
    type Key = UserId;

    fn key(&self) -> UserId {
        self.following_id
    }
}
