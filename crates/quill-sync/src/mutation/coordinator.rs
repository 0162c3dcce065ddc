use crate::sync::EventBus;
use futures::FutureExt;
use std::{
    any::Any,
    collections::{BTreeMap, HashMap, VecDeque},
    future::Future,
    panic::AssertUnwindSafe,
    time::Duration,
};
use tokio::sync::mpsc;

use super::{CoordinatorConfig, MutationError, MutationEvent, MutationSeq, MutationStore};

/// Sequence counter and the rollback snapshots of the in-flight mutations of a key.
struct KeyState<P> {
    last_seq: MutationSeq,
    /// Highest sequence number confirmed by the backend.
    committed: MutationSeq,
    snapshots: BTreeMap<MutationSeq, P>,
    /// Failure of the latest mutation, waiting for the older in-flight mutations to settle.
    deferred_failure: Option<MutationError>,
}

impl<P> KeyState<P> {
    fn new() -> Self {
        Self {
            last_seq: MutationSeq::NONE,
            committed: MutationSeq::NONE,
            snapshots: BTreeMap::new(),
            deferred_failure: None,
        }
    }

    fn has_older_in_flight(&self, seq: MutationSeq) -> bool {
        self.snapshots.range(..seq).next().is_some()
    }

    /// Drop the snapshot of a confirmed, superseded mutation.
    fn confirm_superseded(&mut self, seq: MutationSeq) {
        self.snapshots.remove(&seq);
        self.committed = self.committed.max(seq);
    }

    /// Hand the snapshot of a failed, superseded mutation over to the next in-flight mutation of the key,
    /// so its rollback skips the value the backend never accepted.
    /// Nothing is handed over if a newer mutation has already been confirmed.
    fn forward_snapshot(&mut self, seq: MutationSeq) {
        let Some(snapshot) = self.snapshots.remove(&seq) else {
            return;
        };
        if seq < self.committed {
            return;
        }
        if let Some((_, next)) = self.snapshots.range_mut(seq..).next() {
            *next = snapshot;
        }
    }
}

/// Result of a persist request, posted back by the persist task.
struct PersistOutcome<K> {
    key: K,
    seq: MutationSeq,
    result: Result<(), MutationError>,
}

/// Applies changes to the owned store optimistically and reconciles them with the result of the
/// remote writes.
///
/// The coordinator has a single owner: local state is modified only through `&mut self`, the
/// persist futures run as tokio tasks and report back through a channel. The outcomes are
/// processed when the owner calls [`reconcile`](Self::reconcile), [`settle_next`](Self::settle_next)
/// or [`settle_all`](Self::settle_all).
///
/// For each key only the most recently issued mutation decides the final state:
///  - if it succeeds, the optimistic value is kept,
///  - if it fails, the entity is restored to the last value accepted by the backend (or the value
///    before the first mutation if none was accepted) and a [`MutationEvent::RolledBack`] is published,
///  - results of older mutations arriving later (or earlier) are discarded without touching the store.
///
/// The rollback of the latest mutation waits until the older in-flight mutations of the key have
/// settled, until then the optimistic value stays visible.
pub struct MutationCoordinator<S>
where
    S: MutationStore,
{
    store: S,
    config: CoordinatorConfig,
    keys: HashMap<S::Key, KeyState<S::Snapshot>>,
    in_flight: usize,
    outcome_sender: mpsc::UnboundedSender<PersistOutcome<S::Key>>,
    outcome_receiver: mpsc::UnboundedReceiver<PersistOutcome<S::Key>>,
    settled: VecDeque<MutationEvent<S::Key>>,
    events: EventBus<MutationEvent<S::Key>>,
}

impl<S> MutationCoordinator<S>
where
    S: MutationStore,
{
    pub fn new(store: S, config: CoordinatorConfig) -> Self {
        Self::with_events(store, config, EventBus::new())
    }

    /// Create a coordinator publishing to an existing (shared) event bus.
    pub fn with_events(store: S, config: CoordinatorConfig, events: EventBus<MutationEvent<S::Key>>) -> Self {
        let (outcome_sender, outcome_receiver) = mpsc::unbounded_channel();
        Self {
            store,
            config,
            keys: HashMap::new(),
            in_flight: 0,
            outcome_sender,
            outcome_receiver,
            settled: VecDeque::new(),
            events,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct, non-optimistic access to the store, ex. to load the initial state.
    /// Changes made here for a key with in-flight mutations are lost if those mutations roll back.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn events(&self) -> &EventBus<MutationEvent<S::Key>> {
        &self.events
    }

    /// Number of mutations whose outcome has not been processed yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn in_flight_for(&self, key: &S::Key) -> usize {
        self.keys.get(key).map(|s| s.snapshots.len()).unwrap_or(0)
    }

    /// The sequence number of the most recent mutation issued for the key.
    pub fn last_seq(&self, key: &S::Key) -> Option<MutationSeq> {
        self.keys.get(key).map(|s| s.last_seq)
    }

    /// Apply `mutate` to the store immediately and start `persist` in the background.
    /// It has to be called within a tokio runtime.
    pub fn apply<M, F>(&mut self, key: S::Key, mutate: M, persist: F) -> MutationSeq
    where
        M: FnOnce(&mut S, &S::Key),
        F: Future<Output = Result<(), MutationError>> + Send + 'static,
    {
        let snapshot = self.store.snapshot(&key);

        let state = self.keys.entry(key.clone()).or_insert_with(KeyState::new);
        let previous = state.last_seq;
        state.last_seq = previous.next();
        let seq = state.last_seq;
        let superseding = state.snapshots.len();
        state.snapshots.insert(seq, snapshot);

        // a failed mutation still waiting for its rollback is superseded by this one
        if let Some(error) = state.deferred_failure.take() {
            log::debug!("Mutation [{key:?}{previous}]: superseded by {seq} before its rollback ({error})");
            state.forward_snapshot(previous);
            self.in_flight = self.in_flight.saturating_sub(1);
            self.settled.push_back(MutationEvent::Superseded {
                key: key.clone(),
                seq: previous,
                latest: seq,
            });
        }

        mutate(&mut self.store, &key);
        self.in_flight += 1;

        if superseding > 0 {
            log::debug!("Mutation [{key:?}{seq}]: applied, superseding {superseding} in-flight mutation(s)");
        } else {
            log::debug!("Mutation [{key:?}{seq}]: applied");
        }

        self.spawn_persist(key, seq, persist);
        seq
    }

    fn spawn_persist<F>(&self, key: S::Key, seq: MutationSeq, persist: F)
    where
        F: Future<Output = Result<(), MutationError>> + Send + 'static,
    {
        let sender = self.outcome_sender.clone();
        let timeout = self.config.persist_timeout();
        tokio::spawn(async move {
            let result = run_persist(persist, timeout).await;
            if let Err(err) = sender.send(PersistOutcome { key, seq, result }) {
                let outcome = err.0;
                log::debug!(
                    "Mutation [{:?}{}]: coordinator dropped before the outcome arrived",
                    outcome.key,
                    outcome.seq
                );
            }
        });
    }

    /// Process all the outcomes that have already arrived, without waiting.
    pub async fn reconcile(&mut self) -> Vec<MutationEvent<S::Key>> {
        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            self.resolve(outcome).await;
        }
        self.settled.drain(..).collect()
    }

    /// Wait for the next settled mutation. Returns `None` if nothing is in flight.
    pub async fn settle_next(&mut self) -> Option<MutationEvent<S::Key>> {
        loop {
            if let Some(event) = self.settled.pop_front() {
                return Some(event);
            }
            if self.in_flight == 0 {
                return None;
            }
            // the coordinator keeps a sender, the channel cannot close
            let outcome = self.outcome_receiver.recv().await?;
            self.resolve(outcome).await;
        }
    }

    /// Wait until every issued mutation has settled.
    pub async fn settle_all(&mut self) -> Vec<MutationEvent<S::Key>> {
        let mut events = Vec::new();
        while let Some(event) = self.settle_next().await {
            events.push(event);
        }
        events
    }

    async fn resolve(&mut self, outcome: PersistOutcome<S::Key>) {
        let PersistOutcome { key, seq, result } = outcome;

        let Some(state) = self.keys.get_mut(&key) else {
            log::error!("Mutation [{key:?}{seq}]: outcome for an unknown key");
            let latest = MutationSeq::NONE;
            self.settle(MutationEvent::Superseded { key, seq, latest }).await;
            return;
        };
        let latest = state.last_seq;

        if seq != latest {
            log::debug!("Mutation [{key:?}{seq}]: superseded by {latest}, outcome ignored ({result:?})");
            match result {
                Ok(()) => state.confirm_superseded(seq),
                Err(_) => state.forward_snapshot(seq),
            }

            let released = match state.deferred_failure.take() {
                Some(error) if state.has_older_in_flight(latest) => {
                    state.deferred_failure = Some(error);
                    None
                }
                Some(error) => Some(Self::roll_back(&mut self.store, state, &key, latest, error)),
                None => None,
            };

            self.settle(MutationEvent::Superseded {
                key: key.clone(),
                seq,
                latest,
            })
            .await;
            if let Some(event) = released {
                self.settle(event).await;
            }
            return;
        }

        let event = match result {
            Ok(()) => {
                log::debug!("Mutation [{key:?}{seq}]: committed");
                state.snapshots.remove(&seq);
                state.committed = seq;
                MutationEvent::Committed { key, seq }
            }
            Err(error) if state.has_older_in_flight(seq) => {
                log::debug!("Mutation [{key:?}{seq}]: failed, rollback waits for the older mutations ({error})");
                state.deferred_failure = Some(error);
                return;
            }
            Err(error) => Self::roll_back(&mut self.store, state, &key, seq, error),
        };
        self.settle(event).await;
    }

    /// Restore the snapshot of the latest mutation of the key.
    fn roll_back(
        store: &mut S,
        state: &mut KeyState<S::Snapshot>,
        key: &S::Key,
        seq: MutationSeq,
        error: MutationError,
    ) -> MutationEvent<S::Key> {
        log::warn!("Mutation [{key:?}{seq}]: rolling back, {error}");
        match state.snapshots.remove(&seq) {
            Some(snapshot) => store.restore(key, snapshot),
            None => log::error!("Mutation [{key:?}{seq}]: missing snapshot, rollback skipped"),
        }
        MutationEvent::RolledBack {
            key: key.clone(),
            seq,
            error,
        }
    }

    async fn settle(&mut self, event: MutationEvent<S::Key>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !matches!(event, MutationEvent::Superseded { .. }) {
            self.events.publish(&event).await;
        }
        self.settled.push_back(event);
    }
}

/// Run the persist future with a time limit, turning panics and expiry into errors.
async fn run_persist<F>(persist: F, timeout: Option<Duration>) -> Result<(), MutationError>
where
    F: Future<Output = Result<(), MutationError>>,
{
    let guarded = AssertUnwindSafe(persist).catch_unwind();
    let outcome = match timeout {
        Some(timeout) => match tokio::time::timeout(timeout, guarded).await {
            Ok(outcome) => outcome,
            Err(_) => return Err(MutationError::Timeout(timeout)),
        },
        None => guarded.await,
    };

    outcome.unwrap_or_else(|panic| Err(MutationError::Aborted(panic_reason(panic.as_ref()))))
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(reason) = panic.downcast_ref::<&str>() {
        reason.to_string()
    } else if let Some(reason) = panic.downcast_ref::<String>() {
        reason.clone()
    } else {
        "persist request panicked".to_string()
    }
}
