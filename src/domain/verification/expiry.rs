//! Cancelable one-shot timers for pending-secret expiry.
//!
//! Each timer is a spawned task that sleeps and then runs its callback.
//! Cancellation aborts the task. Abort can lose the race with a timer that
//! has already woken, so callbacks must re-check state before acting.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Opaque handle to one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Owns every armed expiry timer.
#[derive(Clone, Default)]
pub struct ExpirySupervisor {
    inner: Arc<SupervisorInner>,
}

#[derive(Default)]
struct SupervisorInner {
    next_id: AtomicU64,
    timers: Mutex<HashMap<TimerHandle, JoinHandle<()>>>,
}

impl SupervisorInner {
    fn timers(&self) -> MutexGuard<'_, HashMap<TimerHandle, JoinHandle<()>>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ExpirySupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `on_fire` after `delay` unless cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, on_fire: F) -> TimerHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = TimerHandle(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let registry: Weak<SupervisorInner> = Arc::downgrade(&self.inner);

        // Registration happens under the lock so a zero-delay timer cannot
        // deregister itself before it is inserted.
        let mut timers = self.inner.timers();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(registry) = registry.upgrade() {
                registry.timers().remove(&handle);
            }
            on_fire.await;
        });
        timers.insert(handle, task);

        handle
    }

    /// Cancels a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&self, handle: TimerHandle) -> bool {
        match self.inner.timers().remove(&handle) {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    /// Whether `handle` is scheduled and has not yet fired.
    pub fn is_armed(&self, handle: TimerHandle) -> bool {
        self.inner.timers().contains_key(&handle)
    }

    /// Cancels every armed timer, returning how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.inner.timers().drain().collect();
        let count = drained.len();
        for (_, task) in drained {
            task.abort();
        }
        count
    }

    /// Number of timers armed and not yet fired.
    pub fn pending_count(&self) -> usize {
        self.inner.timers().len()
    }
}

impl std::fmt::Debug for ExpirySupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpirySupervisor")
            .field("pending", &self.pending_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let clone = fired.clone();
        (fired, move || clone.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn timer_fires_after_delay() {
        let supervisor = ExpirySupervisor::new();
        let (fired, handle_for) = counter();
        let hits = handle_for();

        supervisor.schedule(Duration::from_secs(120), async move {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(supervisor.pending_count(), 1);

        tokio::time::advance(Duration::from_secs(119)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(supervisor.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let supervisor = ExpirySupervisor::new();
        let (fired, handle_for) = counter();
        let hits = handle_for();

        let handle = supervisor.schedule(Duration::from_secs(5), async move {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        assert!(supervisor.cancel(handle));
        assert!(!supervisor.cancel(handle));

        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_all_clears_every_timer() {
        let supervisor = ExpirySupervisor::new();
        let (fired, handle_for) = counter();

        for _ in 0..3 {
            let hits = handle_for();
            supervisor.schedule(Duration::from_secs(5), async move {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(supervisor.cancel_all(), 3);
        assert_eq!(supervisor.pending_count(), 0);

        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_fire_reports_false() {
        let supervisor = ExpirySupervisor::new();
        let handle = supervisor.schedule(Duration::from_millis(10), async {});

        tokio::time::advance(Duration::from_millis(20)).await;
        tokio::task::yield_now().await;

        assert!(!supervisor.is_armed(handle));
        assert!(!supervisor.cancel(handle));
    }

    #[tokio::test(start_paused = true)]
    async fn armed_until_fired() {
        let supervisor = ExpirySupervisor::new();
        let handle = supervisor.schedule(Duration::from_secs(1), async {});
        assert!(supervisor.is_armed(handle));

        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert!(!supervisor.is_armed(handle));
    }
}
