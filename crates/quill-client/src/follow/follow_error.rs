use crate::UserId;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum FollowError {
    #[error("Author {0} is not displayed")]
    UnknownAuthor(UserId),
    #[error("Users cannot follow themselves")]
    SelfFollow,
}
