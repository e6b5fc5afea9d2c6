// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A reusable "wait until all N participants are idle" barrier.
//!
//! Participants mark themselves busy with `enter`, which hands back a
//! guard; dropping the guard (normally or while unwinding) marks them
//! idle again.  `wait_idle` returns once nobody is busy.  Unlike
//! `std::sync::Barrier` it can be waited on any number of times and the
//! waiter is not one of the participants.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// See the module documentation.
#[derive(Debug)]
pub struct IdleBarrier {
    size: usize,
    busy: Mutex<usize>,
    all_idle: Condvar,
}

/// Proof that a participant is busy.  Dropping it marks the
/// participant idle.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    barrier: &'a IdleBarrier,
}

impl IdleBarrier {
    /// A barrier for `size` participants, all of them idle.
    pub fn new(size: usize) -> IdleBarrier {
        IdleBarrier {
            size,
            busy: Mutex::new(0),
            all_idle: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.busy.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks one participant busy until the guard is dropped.
    pub fn enter(&self) -> BusyGuard<'_> {
        let mut busy = self.lock();
        debug_assert!(*busy < self.size, "more participants than the barrier was built for");
        *busy += 1;
        BusyGuard { barrier: self }
    }

    fn leave(&self) {
        let mut busy = self.lock();
        *busy -= 1;
        if *busy == 0 {
            self.all_idle.notify_all();
        }
    }

    /// Blocks until every participant is idle.  Returns immediately if
    /// they already are.
    pub fn wait_idle(&self) {
        let mut busy = self.lock();
        while *busy > 0 {
            busy = self
                .all_idle
                .wait(busy)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Participants currently idle.
    pub fn idle(&self) -> usize {
        self.size - *self.lock()
    }

    /// Participants the barrier was built for.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl<'a> Drop for BusyGuard<'a> {
    fn drop(&mut self) {
        self.barrier.leave();
    }
}
