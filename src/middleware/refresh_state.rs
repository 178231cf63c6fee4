// Single-flight coordination for token refresh
// One watch channel per refresh cycle; the slot is empty whenever no refresh is running

use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

use crate::error::RefreshFailure;

/// Outcome of one refresh cycle: the new access token, or why there is none
pub(crate) type RefreshOutcome = std::result::Result<String, RefreshFailure>;

type OutcomeSlot = Option<RefreshOutcome>;

/// Refresh flag plus the broadcast channel of the current cycle, owned by one
/// `AuthInterceptor` and shared by its clones.
///
/// The mutex is only held for the synchronous check-then-set; nothing awaits
/// while holding it.
#[derive(Debug, Default)]
pub(crate) struct RefreshState {
    in_flight: Mutex<Option<watch::Receiver<OutcomeSlot>>>,
}

/// Publishing half of a cycle. Exactly one exists per cycle.
#[derive(Debug)]
pub(crate) struct CycleSender(watch::Sender<OutcomeSlot>);

/// Subscription to a cycle's outcome
#[derive(Debug)]
pub(crate) struct CycleWaiter(watch::Receiver<OutcomeSlot>);

impl RefreshState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh cycle is currently in flight
    pub fn is_refreshing(&self) -> bool {
        self.slot()
            .as_ref()
            .is_some_and(|rx| rx.has_changed().is_ok())
    }

    /// Subscribe to the running cycle, or open a new one.
    ///
    /// Returns a sender only to the caller that opened the cycle; that caller
    /// must eventually pass it to [`RefreshState::settle`].
    pub(crate) fn join_or_begin(&self) -> (CycleWaiter, Option<CycleSender>) {
        let mut slot = self.slot();

        if let Some(rx) = slot.as_ref() {
            // A closed sender means the cycle was abandoned without settling
            if rx.has_changed().is_ok() {
                return (CycleWaiter(rx.clone()), None);
            }
            tracing::warn!("Discarding abandoned refresh cycle");
        }

        let (tx, rx) = watch::channel(None);
        *slot = Some(rx.clone());
        (CycleWaiter(rx), Some(CycleSender(tx)))
    }

    /// Close the current cycle and publish its outcome to every waiter.
    ///
    /// The slot is cleared before publishing so that requests arriving after
    /// this point open a fresh cycle instead of observing this one.
    pub(crate) fn settle(&self, cycle: CycleSender, outcome: RefreshOutcome) {
        self.slot().take();
        cycle.0.send_replace(Some(outcome));
    }

    fn slot(&self) -> MutexGuard<'_, Option<watch::Receiver<OutcomeSlot>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CycleWaiter {
    /// Suspend until the cycle settles
    pub(crate) async fn outcome(mut self) -> RefreshOutcome {
        let published = match self.0.wait_for(Option::is_some).await {
            Ok(value) => (*value).clone(),
            Err(_) => None,
        };

        published.unwrap_or_else(|| {
            Err(RefreshFailure::Endpoint(
                "refresh ended without a result".to_string(),
            ))
        })
    }
}
