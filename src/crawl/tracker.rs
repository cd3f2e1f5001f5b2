// src/crawl/tracker.rs
// =============================================================================
// The completion tracker: a "wait group" for crawl tasks.
//
// Crawl tasks spawn more crawl tasks, so we never know up front how many
// there will be. The tracker counts the tasks that are still in flight:
//
// - add(n) BEFORE spawning a task
// - done() when a task finishes (on every exit path)
// - wait() until the count drops to zero
//
// Because every spawn is preceded by an add() from a task that is itself
// still counted, the count can only reach zero once all work is finished.
//
// TaskGuard wraps done() in Drop, so a task calls it exactly once no matter
// how it returns (or even if it panics).
//
// Rust concepts:
// - AtomicUsize: A counter many threads can update without a lock
// - tokio::sync::Notify: Wakes up an async task that is waiting
// - Drop: Code that runs automatically when a value goes out of scope
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct CompletionTracker {
    in_flight: AtomicUsize,
    zero: Notify,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `n` units of outstanding work
    pub fn add(&self, n: usize) {
        self.in_flight.fetch_add(n, Ordering::SeqCst);
    }

    /// Marks one unit of work as finished
    ///
    /// Panics if called more times than add() accounted for. That is a bug
    /// in the caller, and carrying on would make wait() hang or return early.
    pub fn done(&self) {
        let previous = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));

        match previous {
            Ok(1) => self.zero.notify_waiters(),
            Ok(_) => {}
            Err(_) => panic!("CompletionTracker::done() called with no work in flight"),
        }
    }

    /// Current number of in-flight units
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Waits until the in-flight count reaches zero
    pub async fn wait(&self) {
        loop {
            // Register interest BEFORE reading the counter; otherwise a done()
            // landing between the load and the await would be missed
            let notified = self.zero.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Adds one unit of work and returns the guard that will finish it
    ///
    /// Call this on the spawning side, then move the guard into the task.
    pub fn register(self: &Arc<Self>) -> TaskGuard {
        self.add(1);
        TaskGuard {
            tracker: Arc::clone(self),
        }
    }
}

/// Calls `done()` on the tracker when dropped
#[derive(Debug)]
#[must_use = "dropping the guard immediately marks the task as finished"]
pub struct TaskGuard {
    tracker: Arc<CompletionTracker>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.tracker.done();
    }
}
