use crate::config::ToastConfig;
use quill_sync::{
    mutation::{EntityKey, MutationEvent},
    sync::EventHandler,
};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Instant,
};

/// A short-lived message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    /// The action may succeed if the user tries again.
    pub retryable: bool,
    pub raised_at: Instant,
}

/// The visible notifications. Clones share the same board.
#[derive(Clone)]
pub struct ToastBoard {
    config: ToastConfig,
    toasts: Arc<Mutex<Vec<Toast>>>,
}

impl ToastBoard {
    pub fn new(config: ToastConfig) -> Self {
        Self {
            config,
            toasts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn toasts(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn raise(&self, message: impl Into<String>, retryable: bool) {
        let toast = Toast {
            message: message.into(),
            retryable,
            raised_at: Instant::now(),
        };
        log::debug!("Toast: {}", toast.message);
        self.toasts().push(toast);
    }

    /// The toasts still visible at the given time, the expired ones are dropped.
    pub fn active_at(&self, now: Instant) -> Vec<Toast> {
        let ttl = self.config.ttl();
        let mut toasts = self.toasts();
        toasts.retain(|t| now.saturating_duration_since(t.raised_at) < ttl);
        toasts.clone()
    }

    pub fn active(&self) -> Vec<Toast> {
        self.active_at(Instant::now())
    }

    pub fn dismiss_all(&self) {
        self.toasts().clear();
    }
}

/// Raises a toast for each rolled back mutation.
pub struct RollbackToasts {
    board: ToastBoard,
    context: &'static str,
}

impl RollbackToasts {
    pub fn new(board: ToastBoard, context: &'static str) -> Self {
        Self { board, context }
    }
}

impl<K> EventHandler<MutationEvent<K>> for RollbackToasts
where
    K: EntityKey,
{
    async fn handle(&self, event: &MutationEvent<K>) {
        if let MutationEvent::RolledBack { error, .. } = event {
            let message = if error.is_transient() {
                format!("{}, please try again. {}", self.context, error)
            } else {
                format!("{}. {}", self.context, error)
            };
            self.board.raise(message, error.is_transient());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use quill_sync::mutation::{MutationError, MutationSeq};
    use quill_test::test;
    use std::time::Duration;

    #[test]
    fn expired_toasts_are_dropped() {
        let board = ToastBoard::new(ToastConfig { ttl_ms: 1_000 });
        board.raise("first", false);
        let raised_at = board.active()[0].raised_at;

        assert_eq!(board.active_at(raised_at + Duration::from_millis(999)).len(), 1);
        assert!(board.active_at(raised_at + Duration::from_millis(1_000)).is_empty());
    }

    #[test]
    fn dismissed_toasts_are_gone_from_every_clone() {
        let board = ToastBoard::new(ToastConfig::default());
        let shared = board.clone();
        board.raise("first", true);
        shared.raise("second", false);
        assert_eq!(board.active().len(), 2);

        shared.dismiss_all();
        assert!(board.active().is_empty());
    }

    #[test]
    async fn only_rollbacks_raise_toasts() {
        let board = ToastBoard::new(ToastConfig::default());
        let handler = RollbackToasts::new(board.clone(), "Could not save");
        let seq = MutationSeq::NONE.next();

        handler.handle(&MutationEvent::Committed { key: 1u32, seq }).await;
        handler
            .handle(&MutationEvent::Superseded {
                key: 1u32,
                seq,
                latest: seq.next(),
            })
            .await;
        assert!(board.active().is_empty());

        handler
            .handle(&MutationEvent::RolledBack {
                key: 1u32,
                seq,
                error: MutationError::rejected("not allowed"),
            })
            .await;
        let toasts = board.active();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].message, "Could not save. Change was rejected: not allowed");
        assert!(!toasts[0].retryable);
    }
}
