use std::future::Future;

/// A notification published on an [`EventBus`](super::EventBus).
pub trait Event: Send + Sync + 'static {}

pub trait EventHandler<E>: Send + Sync + 'static
where
    E: Event,
{
    fn handle<'a>(&'a self, event: &'a E) -> impl Future<Output = ()> + Send + 'a;
}

#[derive(Eq, Hash, PartialEq, Clone, Debug, Default)]
pub struct EventHandlerId(pub(in crate::sync) usize);

/// Adapter to subscribe a plain (synchronous) closure.
pub struct FnHandler<F>(pub F);

impl<E, F> EventHandler<E> for FnHandler<F>
where
    E: Event,
    F: Fn(&E) + Send + Sync + 'static,
{
    async fn handle(&self, event: &E) {
        (self.0)(event)
    }
}
