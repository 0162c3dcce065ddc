use std::time::Duration;
use thiserror::Error as ThisError;

/// Failure of a persist request. All of them roll the optimistic change back.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Network or service availability issue, the same action may be retried.
    #[error("Temporary failure: {0}")]
    Transient(String),
    /// The backend refused the change (validation, authorization).
    #[error("Change was rejected: {0}")]
    Rejected(String),
    #[error("No response within {}ms", .0.as_millis())]
    Timeout(Duration),
    /// The persist request was dropped or panicked before producing a result.
    #[error("Request aborted: {0}")]
    Aborted(String),
}

impl MutationError {
    pub fn transient<S: Into<String>>(reason: S) -> Self {
        Self::Transient(reason.into())
    }

    pub fn rejected<S: Into<String>>(reason: S) -> Self {
        Self::Rejected(reason.into())
    }

    /// Indicates if retrying the same action could succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}
