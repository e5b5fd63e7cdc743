//! Single-outcome request coordinator.
//!
//! Holds the latest [`FetchOutcome`] and publishes every transition to
//! callback observers and to `watch` receivers. Each `fetch` publishes
//! `Pending` before anything is spawned; the spawned task publishes the
//! resolution unless a newer fetch was issued in the meantime.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{outcome::FetchOutcome, provider::WeatherClient};

type Observer = Box<dyn Fn(&FetchOutcome) + Send + Sync>;

#[derive(Clone)]
pub struct RequestCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    client: Arc<dyn WeatherClient>,
    state: watch::Sender<FetchOutcome>,
    // Also serializes publication so observers see transitions in order.
    observers: Mutex<Vec<Observer>>,
    issued: AtomicU64,
}

impl RequestCoordinator {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        let (state, _) = watch::channel(FetchOutcome::Idle);

        Self {
            inner: Arc::new(Inner {
                client,
                state,
                observers: Mutex::new(Vec::new()),
                issued: AtomicU64::new(0),
            }),
        }
    }

    /// Start a lookup for `query`.
    ///
    /// `Pending` is published before this returns. The request itself runs
    /// on a spawned task; the handle can be awaited but does not have to be.
    /// The query is not validated here, an empty one is left for the
    /// provider to reject.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn fetch(&self, query: impl Into<String>) -> JoinHandle<()> {
        let query = query.into();
        let seq = self.inner.begin();
        info!(seq, query = %query, "fetching current weather");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = inner.client.get(&query).await;
            if let Err(err) = &result {
                warn!(seq, kind = err.kind(), error = %err, "weather fetch failed");
            }
            inner.resolve(seq, FetchOutcome::from_result(result));
        })
    }

    /// Register `observer`; it is called with the current outcome right away
    /// and then once per transition.
    ///
    /// Observers run while the publication lock is held and must not call
    /// back into `fetch` or `subscribe`.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(&FetchOutcome) + Send + Sync + 'static,
    {
        let mut observers = self.inner.lock_observers();
        let current = self.inner.state.borrow().clone();
        observer(&current);
        observers.push(Box::new(observer));
    }

    /// A receiver that always holds the latest outcome.
    pub fn watch(&self) -> watch::Receiver<FetchOutcome> {
        self.inner.state.subscribe()
    }

    pub fn current(&self) -> FetchOutcome {
        self.inner.state.borrow().clone()
    }
}

impl std::fmt::Debug for RequestCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCoordinator")
            .field("client", &self.inner.client)
            .field("current", &*self.inner.state.borrow())
            .field("issued", &self.inner.issued.load(Ordering::SeqCst))
            .finish()
    }
}

impl Inner {
    fn lock_observers(&self) -> MutexGuard<'_, Vec<Observer>> {
        // A panicking observer must not wedge the coordinator.
        self.observers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue the next sequence number and publish `Pending` under one guard,
    /// so the latest issued fetch is always the last to publish `Pending`.
    fn begin(&self) -> u64 {
        let observers = self.lock_observers();
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish_locked(&observers, FetchOutcome::Pending);
        seq
    }

    fn resolve(&self, seq: u64, outcome: FetchOutcome) {
        let observers = self.lock_observers();

        let latest = self.issued.load(Ordering::SeqCst);
        if seq != latest {
            debug!(seq, latest, "discarding superseded weather result");
            return;
        }

        self.publish_locked(&observers, outcome);
    }

    fn publish_locked(&self, observers: &[Observer], outcome: FetchOutcome) {
        self.state.send_replace(outcome.clone());
        for observer in observers {
            observer(&outcome);
        }
    }
}
