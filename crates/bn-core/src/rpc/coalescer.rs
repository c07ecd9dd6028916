//! In-flight request table shared by every caller of one dispatcher.
//!
//! The first caller for a [`RequestKey`] becomes the owner and receives a
//! [`Publisher`]; everyone arriving while that call is outstanding receives a
//! clone of the same [`PendingOutcome`]. The table entry lives exactly as
//! long as the underlying round trip.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::error::RpcError;

use super::key::RequestKey;

/// Result of one physical round trip, shared by every coalesced caller.
pub type Outcome = Result<serde_json::Value, RpcError>;

type Slot = Option<Arc<Outcome>>;

// ==============================================================================
// Pending Outcome
// ==============================================================================

/// Read side of a single in-flight call. Cheap to clone; every clone observes
/// the same resolution.
#[derive(Clone)]
pub struct PendingOutcome {
    rx: watch::Receiver<Slot>,
}

impl PendingOutcome {
    /// Wait for the owner to publish. Cancel-safe: dropping this future only
    /// stops this caller from waiting.
    pub async fn wait(mut self) -> Arc<Outcome> {
        let resolved = match self.rx.wait_for(Option::is_some).await {
            Ok(slot) => slot.clone(),
            // Sender dropped without a value. `Publisher::drop` always sends
            // first, so this only happens if the runtime tore the task down
            // mid-drop.
            Err(_) => None,
        };
        resolved.unwrap_or_else(|| Arc::new(Err(RpcError::Aborted)))
    }

    /// Non-blocking peek, `None` while the call is still in flight.
    pub fn try_get(&self) -> Option<Arc<Outcome>> {
        self.rx.borrow().clone()
    }
}

// ==============================================================================
// Publisher
// ==============================================================================

/// Write side held by the owner of a key. Publishing (or dropping without
/// publishing) removes the key from the table and resolves every waiter.
pub struct Publisher {
    coalescer: Arc<Coalescer>,
    key: RequestKey,
    tx: Option<watch::Sender<Slot>>,
}

impl Publisher {
    pub fn key(&self) -> &RequestKey {
        &self.key
    }

    pub fn publish(mut self, outcome: Outcome) {
        self.resolve(outcome);
    }

    fn resolve(&mut self, outcome: Outcome) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        // Remove and publish under one lock so a caller arriving afterwards
        // can never attach to an already-resolved entry.
        let mut inflight = self.coalescer.lock();
        inflight.remove(&self.key);
        tx.send_replace(Some(Arc::new(outcome)));
    }
}

impl Drop for Publisher {
    fn drop(&mut self) {
        if self.tx.is_some() {
            self.resolve(Err(RpcError::Aborted));
        }
    }
}

// ==============================================================================
// Coalescer
// ==============================================================================

pub enum Acquired {
    /// First caller for this key: must perform the round trip and publish.
    Owner(PendingOutcome, Publisher),
    /// A round trip for this key is already outstanding.
    Waiter(PendingOutcome),
}

#[derive(Default)]
pub struct Coalescer {
    inflight: Mutex<HashMap<RequestKey, PendingOutcome>>,
}

impl Coalescer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(self: &Arc<Self>, key: RequestKey) -> Acquired {
        let mut inflight = self.lock();
        if let Some(pending) = inflight.get(&key) {
            return Acquired::Waiter(pending.clone());
        }

        let (tx, rx) = watch::channel(None);
        let pending = PendingOutcome { rx };
        inflight.insert(key.clone(), pending.clone());
        drop(inflight);

        Acquired::Owner(
            pending,
            Publisher {
                coalescer: Arc::clone(self),
                key,
                tx: Some(tx),
            },
        )
    }

    /// Number of distinct keys currently awaiting a round trip.
    pub fn in_flight(&self) -> usize {
        self.lock().len()
    }

    // The table is left consistent at every unlock, so a poisoned lock is
    // still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<RequestKey, PendingOutcome>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
