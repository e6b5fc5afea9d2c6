// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A cancellable work queue that owns its own wake-up logic.
//!
//! Workers park in `wait_for_work` until a batch is published or the
//! queue is closed, then drain it with the non-blocking `try_pop`.
//! Everything except the cancellation flag sits behind one mutex, so
//! an item is either still queued or fully handed to exactly one
//! worker.  The flag lives outside the lock because workers poll it
//! while computing, at least once per scanline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Shared cooperative-cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Asks everyone holding a clone to stop at their next check.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clears the flag for the next round of work.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Whether `cancel` has been called since the last `reset`.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Outcome of a non-blocking pop.
#[derive(Debug, PartialEq)]
pub enum Pop<T> {
    /// The caller now owns this item.
    Item(T),
    /// Nothing is queued; the caller should go back to waiting.
    Empty,
    /// The current batch was cancelled; the caller should stop.
    Cancelled,
}

/// Why a parked worker woke up.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Wake {
    /// A batch was published.
    Work,
    /// The queue was closed for good.
    Closed,
}

#[derive(Debug)]
struct State<T> {
    items: Vec<T>,
    available: bool,
    closed: bool,
}

/// See the module documentation.
#[derive(Debug)]
pub struct WorkQueue<T> {
    state: Mutex<State<T>>,
    work: Condvar,
    emptied: Condvar,
    cancel: CancelToken,
}

impl<T> WorkQueue<T> {
    /// An empty, open queue.
    pub fn new() -> WorkQueue<T> {
        WorkQueue {
            state: Mutex::new(State {
                items: Vec::new(),
                available: false,
                closed: false,
            }),
            work: Condvar::new(),
            emptied: Condvar::new(),
            cancel: CancelToken::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A clone of the flag workers poll while computing.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Adds one item without waking anyone.
    pub fn push(&self, item: T) {
        self.lock().items.push(item);
    }

    /// Queues a whole batch, clears any earlier cancellation, and wakes
    /// every parked worker.
    pub fn publish<I: IntoIterator<Item = T>>(&self, batch: I) {
        let mut state = self.lock();
        if state.closed {
            return;
        }
        state.items.extend(batch);
        self.cancel.reset();
        state.available = true;
        self.work.notify_all();
    }

    /// Takes one item if there is one.  Finding the queue empty also
    /// withdraws the "work available" signal so idle workers park.
    pub fn try_pop(&self) -> Pop<T> {
        if self.cancel.is_cancelled() {
            return Pop::Cancelled;
        }
        let mut state = self.lock();
        match state.items.pop() {
            Some(item) => {
                if state.items.is_empty() {
                    self.emptied.notify_all();
                }
                Pop::Item(item)
            }
            None => {
                state.available = false;
                self.emptied.notify_all();
                Pop::Empty
            }
        }
    }

    /// Drops every queued item and withdraws the "work available"
    /// signal.  Returns how many items were dropped.
    pub fn clear(&self) -> usize {
        let mut state = self.lock();
        let dropped = state.items.len();
        state.items.clear();
        state.available = false;
        self.emptied.notify_all();
        dropped
    }

    /// Raises the cancellation flag and clears the queue.  Nothing can
    /// be popped again until the next `publish`.
    pub fn cancel(&self) -> usize {
        self.cancel.cancel();
        self.clear()
    }

    /// Parks the caller until a batch is published or the queue is
    /// closed.  The predicate is re-checked after every wake-up.
    pub fn wait_for_work(&self) -> Wake {
        let mut state = self.lock();
        while !state.available && !state.closed {
            state = self.work.wait(state).unwrap_or_else(PoisonError::into_inner);
        }
        if state.closed {
            Wake::Closed
        } else {
            Wake::Work
        }
    }

    /// Parks the caller until every queued item has been handed out.
    pub fn wait_empty(&self) {
        let mut state = self.lock();
        while !state.items.is_empty() && !state.closed {
            state = self
                .emptied
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Cancels, drops all items, and releases every parked worker for
    /// the last time.
    pub fn close(&self) {
        self.cancel.cancel();
        let mut state = self.lock();
        state.closed = true;
        state.items.clear();
        self.work.notify_all();
        self.emptied.notify_all();
    }

    /// Items still waiting to be claimed.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether nothing is waiting to be claimed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        WorkQueue::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn pops_every_published_item_once() {
        let q = WorkQueue::new();
        q.publish(vec![1, 2, 3]);
        let mut seen = vec![];
        while let Pop::Item(i) = q.try_pop() {
            seen.push(i);
        }
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3]);
        assert_eq!(q.try_pop(), Pop::Empty);
    }

    #[test]
    fn cancel_empties_and_reports_cancelled() {
        let q = WorkQueue::new();
        q.publish(0..10);
        assert_eq!(q.cancel(), 10);
        assert!(q.is_empty());
        assert_eq!(q.try_pop(), Pop::Cancelled);
        assert!(q.cancel_token().is_cancelled());

        q.publish(vec![7]);
        assert!(!q.cancel_token().is_cancelled());
        assert_eq!(q.try_pop(), Pop::Item(7));
    }

    #[test]
    fn push_does_not_signal_work() {
        let q = WorkQueue::new();
        q.push(1);
        assert_eq!(q.len(), 1);
        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn parked_worker_wakes_on_publish() {
        let q = Arc::new(WorkQueue::new());
        let worker = {
            let q = q.clone();
            thread::spawn(move || {
                assert_eq!(q.wait_for_work(), Wake::Work);
                q.try_pop()
            })
        };
        thread::sleep(Duration::from_millis(20));
        q.publish(vec!["tile"]);
        assert_eq!(worker.join().unwrap(), Pop::Item("tile"));
    }

    #[test]
    fn close_releases_parked_workers() {
        let q: Arc<WorkQueue<u8>> = Arc::new(WorkQueue::new());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let q = q.clone();
                thread::spawn(move || q.wait_for_work())
            })
            .collect();
        thread::sleep(Duration::from_millis(20));
        q.close();
        for w in workers {
            assert_eq!(w.join().unwrap(), Wake::Closed);
        }
        q.publish(vec![1]);
        assert!(q.is_empty());
    }

    #[test]
    fn empty_queue_withdraws_availability() {
        let q = Arc::new(WorkQueue::new());
        q.publish(vec![1]);
        assert_eq!(q.wait_for_work(), Wake::Work);
        assert_eq!(q.try_pop(), Pop::Item(1));
        assert_eq!(q.try_pop(), Pop::Empty);
        let parked = {
            let q = q.clone();
            thread::spawn(move || q.wait_for_work())
        };
        thread::sleep(Duration::from_millis(20));
        q.close();
        assert_eq!(parked.join().unwrap(), Wake::Closed);
    }
}
