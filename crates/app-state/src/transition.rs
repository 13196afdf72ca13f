//! Serialization of appearance mode changes
//!
//! At most one mode change runs at a time. Once a change finishes, the guard
//! stays busy for a short debounce window so that rapid repeated taps on the
//! toggle control are dropped instead of queued.

use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Default debounce window after a transition completes (100ms)
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Observable state of a [`TransitionGuard`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    /// A new transition may start
    Idle,
    /// A transition is running or its debounce window has not elapsed
    Busy {
        /// When the transition started
        since: Instant,
    },
}

impl TransitionState {
    /// Check if the guard would reject a new transition
    pub fn is_busy(&self) -> bool {
        matches!(self, TransitionState::Busy { .. })
    }
}

/// Result of [`TransitionGuard::guard`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    /// The action ran to completion
    Completed(T),
    /// Another transition was in flight; the action never ran
    Rejected,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Idle,
    Running { since: Instant },
    Cooling { since: Instant, until: Instant },
}

impl Slot {
    fn observe(&self, now: Instant) -> TransitionState {
        match *self {
            Slot::Running { since } => TransitionState::Busy { since },
            Slot::Cooling { since, until } if now < until => TransitionState::Busy { since },
            _ => TransitionState::Idle,
        }
    }
}

/// Admits one transition at a time
#[derive(Debug)]
pub struct TransitionGuard {
    debounce: Duration,
    slot: Mutex<Slot>,
}

impl Default for TransitionGuard {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl TransitionGuard {
    /// Create a guard with the given debounce window
    pub fn new(debounce: Duration) -> Self {
        Self { debounce, slot: Mutex::new(Slot::Idle) }
    }

    /// The debounce window
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Current state
    pub fn state(&self) -> TransitionState {
        self.slot.lock().observe(Instant::now())
    }

    /// Check if a new transition would be rejected
    pub fn is_busy(&self) -> bool {
        self.state().is_busy()
    }

    /// Atomically move from Idle to Busy
    ///
    /// The returned permit holds the guard busy; dropping it starts the
    /// debounce window.
    pub fn try_begin(&self) -> Option<TransitionPermit<'_>> {
        let now = Instant::now();
        let mut slot = self.slot.lock();
        if slot.observe(now).is_busy() {
            return None;
        }
        *slot = Slot::Running { since: now };
        Some(TransitionPermit { guard: self, since: now })
    }

    /// Run `action` unless another transition is in flight
    pub async fn guard<F, Fut, T>(&self, action: F) -> GuardOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let Some(_permit) = self.try_begin() else {
            tracing::debug!("Transition rejected: another transition is in flight");
            return GuardOutcome::Rejected;
        };

        GuardOutcome::Completed(action().await)
    }
}

/// Proof that a transition is running
///
/// Released on drop, including when the transition's future is cancelled or
/// panics.
#[derive(Debug)]
pub struct TransitionPermit<'a> {
    guard: &'a TransitionGuard,
    since: Instant,
}

impl Drop for TransitionPermit<'_> {
    fn drop(&mut self) {
        let until = Instant::now() + self.guard.debounce;
        *self.guard.slot.lock() = Slot::Cooling { since: self.since, until };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_default_guard_is_idle() {
        let guard = TransitionGuard::default();
        assert_eq!(guard.debounce(), DEFAULT_DEBOUNCE);
        assert_eq!(guard.state(), TransitionState::Idle);
        assert!(!guard.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_guard_runs_action() {
        let guard = TransitionGuard::default();
        let outcome = guard.guard(|| async { 42 }).await;
        assert_eq!(outcome, GuardOutcome::Completed(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_during_debounce_window() {
        let guard = TransitionGuard::new(Duration::from_millis(100));
        guard.guard(|| async {}).await;

        assert!(guard.is_busy());
        let outcome = guard.guard(|| async { "second" }).await;
        assert_eq!(outcome, GuardOutcome::Rejected);

        tokio::time::advance(Duration::from_millis(99)).await;
        assert!(guard.is_busy());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!guard.is_busy());
        assert_eq!(guard.guard(|| async { "third" }).await, GuardOutcome::Completed("third"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_action_never_runs() {
        let guard = TransitionGuard::default();
        let _permit = guard.try_begin().unwrap();

        let ran = AtomicBool::new(false);
        let flag = &ran;
        let outcome = guard.guard(move || async move { flag.store(true, Ordering::SeqCst) }).await;
        assert_eq!(outcome, GuardOutcome::Rejected);
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_while_action_runs() {
        let guard = TransitionGuard::default();
        let started = Instant::now();
        let inner = &guard;

        let outcome = guard
            .guard(move || async move {
                assert_eq!(inner.state(), TransitionState::Busy { since: started });
                tokio::time::sleep(Duration::from_secs(1)).await;
                assert!(inner.try_begin().is_none());
            })
            .await;

        assert_eq!(outcome, GuardOutcome::Completed(()));
        // The window starts when the action finishes, not when it started
        assert_eq!(guard.state(), TransitionState::Busy { since: started });
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_debounce_releases_immediately() {
        let guard = TransitionGuard::new(Duration::ZERO);
        guard.guard(|| async {}).await;
        assert!(!guard.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_action_releases_guard() {
        let guard = TransitionGuard::new(Duration::from_millis(50));

        let stalled = guard.guard(|| std::future::pending::<()>());
        let timed_out = tokio::time::timeout(Duration::from_millis(10), stalled).await;
        assert!(timed_out.is_err());

        assert!(guard.is_busy());
        tokio::time::advance(Duration::from_millis(50)).await;
        assert!(!guard.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_permit_drop_starts_window() {
        let guard = TransitionGuard::new(Duration::from_secs(60));
        let since = Instant::now();
        let permit = guard.try_begin().unwrap();
        assert!(guard.try_begin().is_none());

        drop(permit);
        assert_eq!(guard.state(), TransitionState::Busy { since });
    }
}
