//! Single-slot debouncing of async work.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs the most recently scheduled task after a quiet period.
///
/// Scheduling a task aborts the previous one, whether it is still waiting
/// out the delay or already running. Dropping the debouncer aborts whatever
/// is pending.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Run `task` once `delay` has passed without another call to
    /// `schedule` or [`cancel`](Self::cancel).
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        if let Some(previous) = self.slot().replace(handle) {
            previous.abort();
        }
    }

    /// Abort the pending task, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.slot().take() {
            previous.abort();
        }
    }

    /// Whether a scheduled task has not finished yet.
    pub fn is_pending(&self) -> bool {
        self.slot().as_ref().is_some_and(|h| !h.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DELAY: Duration = Duration::from_millis(300);

    fn counting(counter: &Arc<AtomicUsize>, add: usize) -> impl Future<Output = ()> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(add, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_after_delay() {
        let runs = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(DELAY);

        debouncer.schedule(counting(&runs, 1));
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_of_a_burst_runs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(DELAY);

        for add in [1, 10, 100] {
            debouncer.schedule(counting(&runs, add));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(DELAY).await;

        assert_eq!(runs.load(Ordering::SeqCst), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn reschedule_aborts_running_task() {
        let runs = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(DELAY);

        let slow = {
            let runs = runs.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(1)).await;
                runs.fetch_add(1, Ordering::SeqCst);
            }
        };
        debouncer.schedule(slow);
        tokio::time::sleep(DELAY + Duration::from_millis(10)).await;

        debouncer.schedule(counting(&runs, 10));
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_abort() {
        let runs = Arc::new(AtomicUsize::new(0));

        let debouncer = Debouncer::new(DELAY);
        debouncer.schedule(counting(&runs, 1));
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        let dropped = Debouncer::new(DELAY);
        dropped.schedule(counting(&runs, 1));
        drop(dropped);

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
