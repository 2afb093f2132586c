// Completion tracking for dynamic fan-out / fan-in
//
// Every asynchronous operation of a run holds a `Pending` guard for as long as
// it is in flight. The tracker counts outstanding guards and fires its drain
// signal exactly once, when the count returns to zero.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

type DrainCallback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct TrackerState {
    pending: usize,
    registered: u64,
    completed: u64,
    drained: bool,
    on_drain: Option<DrainCallback>,
}

struct Shared {
    state: Mutex<TrackerState>,
    drained_tx: watch::Sender<bool>,
}

/// Wait-group that detects when all registered work is done.
///
/// # Contract
///
/// - [`register()`](Self::register) increments the pending count and returns a
///   [`Pending`] guard. It must be called synchronously, *before* the
///   operation it stands for is scheduled.
/// - Completing the guard (explicitly with [`Pending::complete`] or by dropping
///   it) decrements the count. The transition `1 -> 0` fires the drain signal
///   and the optional callback. No other transition does.
/// - **Ordering rule:** a unit of work that discovers more work must register
///   every new unit before completing itself. Otherwise the count can touch
///   zero in the gap and the run ends early.
///
/// The guard makes pairing structural: each decrement corresponds to exactly
/// one prior increment, so the count can never go negative.
///
/// # Example
///
/// ```
/// use syntux::CompletionTracker;
///
/// let tracker = CompletionTracker::new();
/// let listing = tracker.register();
/// let child = tracker.register(); // discovered by the listing
/// listing.complete();
/// assert!(!tracker.is_drained());
/// child.complete();
/// assert!(tracker.is_drained());
/// ```
#[derive(Clone)]
pub struct CompletionTracker {
    shared: Arc<Shared>,
}

impl CompletionTracker {
    /// Create a tracker in the idle state with no drain callback
    pub fn new() -> Self {
        let (drained_tx, _) = watch::channel(false);
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(TrackerState::default()),
                drained_tx,
            }),
        }
    }

    /// Create a tracker that invokes `on_drain` once, when all work is done
    pub fn with_drain_callback<F>(on_drain: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let tracker = Self::new();
        tracker.lock().on_drain = Some(Box::new(on_drain));
        tracker
    }

    /// Register one unit of work. Call before scheduling the operation.
    pub fn register(&self) -> Pending {
        let mut state = self.lock();
        if state.drained {
            tracing::warn!("work registered after the tracker drained; it will not re-fire");
        }
        state.pending += 1;
        state.registered += 1;
        Pending {
            tracker: self.clone(),
        }
    }

    fn complete_one(&self) {
        let callback = {
            let mut state = self.lock();
            let Some(pending) = state.pending.checked_sub(1) else {
                tracing::error!("completion without a matching registration ignored");
                return;
            };
            state.pending = pending;
            state.completed += 1;

            if pending > 0 || state.drained {
                return;
            }
            state.drained = true;
            state.on_drain.take()
        };

        tracing::trace!("tracker drained");
        // Callback first: `drained()` waiters must observe its effects.
        if let Some(callback) = callback {
            callback();
        }
        self.shared.drained_tx.send_replace(true);
    }

    /// Number of operations currently in flight
    pub fn pending(&self) -> usize {
        self.lock().pending
    }

    /// Total registrations since creation
    pub fn registered(&self) -> u64 {
        self.lock().registered
    }

    /// Total completions since creation
    pub fn completed(&self) -> u64 {
        self.lock().completed
    }

    /// Whether the drain has fired
    pub fn is_drained(&self) -> bool {
        self.lock().drained
    }

    /// Wait until the drain fires.
    ///
    /// Resolves immediately if it already has, and never before the drain
    /// callback has returned. Only await this after at least one unit of work
    /// was registered: an idle tracker that never saw work never drains.
    pub async fn drained(&self) {
        let mut rx = self.shared.drained_tx.subscribe();
        // The sender lives in `self.shared`, so the channel cannot close here.
        let _ = rx.wait_for(|drained| *drained).await;
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompletionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("CompletionTracker")
            .field("pending", &state.pending)
            .field("registered", &state.registered)
            .field("completed", &state.completed)
            .field("drained", &state.drained)
            .finish()
    }
}

/// One registered unit of in-flight work.
///
/// Completes on [`complete()`](Self::complete) or on drop, whichever comes
/// first. Move it into the task that performs the operation.
#[must_use = "dropping a Pending guard completes the work it stands for"]
pub struct Pending {
    tracker: CompletionTracker,
}

impl Pending {
    /// Mark this unit of work as finished
    pub fn complete(self) {}
}

impl Drop for Pending {
    fn drop(&mut self) {
        self.tracker.complete_one();
    }
}

impl std::fmt::Debug for Pending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending").finish_non_exhaustive()
    }
}
