//! Cancellable quiet-period timer.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Runs the most recently scheduled job once input has been quiet for
/// `delay`.
///
/// Each schedule bumps a generation counter; jobs receive their generation
/// and should check [`Debouncer::is_current`] before publishing results, since
/// a job that already started is not cancelled by a newer schedule.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restarts the timer with a new job and returns the job's generation.
    pub fn schedule<F, Fut>(&self, job: F) -> u64
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let current = Arc::clone(&self.generation);
        let delay = self.delay;

        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) == generation {
                // Detached so restarting the timer never cancels a started job.
                tokio::spawn(job(generation));
            }
        });

        if let Some(previous) = self.pending.lock().replace(timer) {
            previous.abort();
        }
        generation
    }

    /// Stops the pending timer and marks any running job as stale.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.get_mut().take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_job_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        let runs = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicU64::new(0));

        for _ in 0..3 {
            let runs = Arc::clone(&runs);
            let last = Arc::clone(&last);
            debouncer.schedule(move |generation| async move {
                runs.fetch_add(1, Ordering::SeqCst);
                last.store(generation, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_run() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        let runs = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&runs);
        let generation = debouncer.schedule(move |_| async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_current(generation));
    }
}
