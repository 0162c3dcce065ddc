use crate::{cart::CartLine, CartLineId, UserId};
use futures::FutureExt;
use quill_sync::mutation::MutationError;
use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::sync::oneshot;

use super::{CartBackend, FollowBackend, PersistFuture};

type GateResult = Result<(), MutationError>;

/// Scripted behavior of the next request.
enum Scripted {
    Fail(MutationError),
    Hold(oneshot::Receiver<GateResult>),
}

/// Releases a request held by [`BackendEmulation::hold_next`].
pub struct PersistGate(oneshot::Sender<GateResult>);

impl PersistGate {
    /// Let the request write. Returns false if the request was already dropped.
    pub fn succeed(self) -> bool {
        self.0.send(Ok(())).is_ok()
    }

    /// Fail the request without writing. Returns false if the request was already dropped.
    pub fn fail(self, error: MutationError) -> bool {
        self.0.send(Err(error)).is_ok()
    }
}

#[derive(Default)]
struct EmulationState {
    cart: HashMap<CartLineId, CartLine>,
    follows: HashSet<(UserId, UserId)>,
    script: VecDeque<Scripted>,
    requests: usize,
}

/// An in-memory stand-in of the hosted backend. It keeps the authoritative state and can be
/// scripted to fail or to hold the upcoming requests, in the order they are issued.
#[derive(Clone, Default)]
pub struct BackendEmulation {
    state: Arc<Mutex<EmulationState>>,
}

impl BackendEmulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cart<I: IntoIterator<Item = CartLine>>(self, lines: I) -> Self {
        self.state().cart.extend(lines.into_iter().map(|l| (l.id, l)));
        self
    }

    pub fn with_follow(self, follower: UserId, following: UserId) -> Self {
        self.state().follows.insert((follower, following));
        self
    }

    fn state(&self) -> MutexGuard<'_, EmulationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The next request fails with the given error and writes nothing.
    pub fn fail_next(&self, error: MutationError) {
        self.state().script.push_back(Scripted::Fail(error));
    }

    /// The next request waits until the returned gate is resolved.
    pub fn hold_next(&self) -> PersistGate {
        let (sender, receiver) = oneshot::channel();
        self.state().script.push_back(Scripted::Hold(receiver));
        PersistGate(sender)
    }

    /// Number of the requests received so far.
    pub fn requests(&self) -> usize {
        self.state().requests
    }

    pub fn cart_line(&self, id: &CartLineId) -> Option<CartLine> {
        self.state().cart.get(id).cloned()
    }

    pub fn is_following(&self, follower: UserId, following: UserId) -> bool {
        self.state().follows.contains(&(follower, following))
    }

    pub fn follower_count(&self, following: UserId) -> usize {
        self.state().follows.iter().filter(|(_, f)| *f == following).count()
    }

    fn execute<W>(&self, request: String, write: W) -> PersistFuture
    where
        W: FnOnce(&mut EmulationState) -> Result<(), MutationError> + Send + 'static,
    {
        // the script is consumed in the order of the requests, not in the order of their completion
        let scripted = {
            let mut state = self.state();
            state.requests += 1;
            state.script.pop_front()
        };

        let emulation = self.clone();
        async move {
            match scripted {
                Some(Scripted::Fail(error)) => {
                    log::info!("Request {request} failed by script: {error}");
                    return Err(error);
                }
                Some(Scripted::Hold(release)) => match release.await {
                    Ok(Ok(())) => {}
                    Ok(Err(error)) => {
                        log::info!("Request {request} failed by gate: {error}");
                        return Err(error);
                    }
                    Err(_) => return Err(MutationError::Aborted(format!("{request}: gate dropped"))),
                },
                None => {}
            }

            let result = write(&mut emulation.state());
            log::debug!("Request {request}: {result:?}");
            result
        }
        .boxed()
    }
}

impl CartBackend for BackendEmulation {
    fn update_quantity(&self, line_id: CartLineId, quantity: u32) -> PersistFuture {
        self.execute(format!("update_quantity({line_id}, {quantity})"), move |state| {
            if quantity == 0 {
                return Err(MutationError::rejected("quantity must be positive"));
            }
            let line = state
                .cart
                .get_mut(&line_id)
                .ok_or_else(|| MutationError::rejected("cart line not found"))?;
            line.quantity = quantity;
            Ok(())
        })
    }

    fn remove_line(&self, line_id: CartLineId) -> PersistFuture {
        self.execute(format!("remove_line({line_id})"), move |state| {
            state
                .cart
                .remove(&line_id)
                .map(|_| ())
                .ok_or_else(|| MutationError::rejected("cart line not found"))
        })
    }

    fn add_line(&self, line: CartLine) -> PersistFuture {
        self.execute(format!("add_line({})", line.id), move |state| {
            state.cart.insert(line.id, line);
            Ok(())
        })
    }
}

impl FollowBackend for BackendEmulation {
    fn follow(&self, follower: UserId, following: UserId) -> PersistFuture {
        self.execute(format!("follow({follower}, {following})"), move |state| {
            if follower == following {
                return Err(MutationError::rejected("users cannot follow themselves"));
            }
            if state.follows.insert((follower, following)) {
                Ok(())
            } else {
                Err(MutationError::rejected("already following"))
            }
        })
    }

    fn unfollow(&self, follower: UserId, following: UserId) -> PersistFuture {
        self.execute(format!("unfollow({follower}, {following})"), move |state| {
            state.follows.remove(&(follower, following));
            Ok(())
        })
    }
}
