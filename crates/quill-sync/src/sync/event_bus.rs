use futures::future::join_all;
use std::{
    collections::BTreeMap,
    marker::PhantomData,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tokio::sync::RwLock;

use super::{BoxedHandler, Event, EventHandler, EventHandlerId, FnHandler, WrappedBoxingHandler};

struct Inner<E>
where
    E: Event,
{
    next_handler_id: AtomicUsize,
    // ordered by id, handlers are invoked in subscription order
    handlers: RwLock<BTreeMap<usize, BoxedHandler<E>>>,
}

/// Fan-out of events to the subscribed handlers. Cloning shares the subscriptions.
#[derive(Clone)]
pub struct EventBus<E>(Arc<Inner<E>>)
where
    E: Event;

impl<E> Default for EventBus<E>
where
    E: Event,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E>
where
    E: Event,
{
    pub fn new() -> Self {
        Self(Arc::new(Inner {
            next_handler_id: AtomicUsize::new(1),
            handlers: Default::default(),
        }))
    }

    pub async fn subscribe<H>(&self, handler: H) -> EventHandlerId
    where
        H: EventHandler<E>,
    {
        let handler: BoxedHandler<E> = Box::new(WrappedBoxingHandler(handler, PhantomData));
        let id = self.0.next_handler_id.fetch_add(1, Ordering::Relaxed);
        let mut handlers = self.0.handlers.write().await;
        handlers.insert(id, handler);

        EventHandlerId(id)
    }

    pub async fn subscribe_fn<F>(&self, handler: F) -> EventHandlerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe(FnHandler(handler)).await
    }

    /// Remove a handler, returns false if it was not subscribed.
    pub async fn unsubscribe(&self, handler_id: &EventHandlerId) -> bool {
        let mut handlers = self.0.handlers.write().await;
        handlers.remove(&handler_id.0).is_some()
    }

    pub async fn handler_count(&self) -> usize {
        self.0.handlers.read().await.len()
    }

    pub async fn publish(&self, event: &E) {
        let handlers = self.0.handlers.read().await;
        let futures = handlers.values().map(|h| h.handle(event));
        join_all(futures).await;
    }
}
