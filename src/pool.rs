// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A fixed set of long-lived worker threads.
//!
//! Each worker parks until the queue publishes a batch, marks itself
//! busy, and then claims tiles until the queue runs dry or is
//! cancelled, at which point it marks itself idle and parks again.  A
//! tile carries the frame it belongs to, so a worker always draws onto
//! the canvas and viewport of the generation the tile was cut for.
//! Threads are only started here and only joined on shutdown.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::barrier::IdleBarrier;
use crate::canvas::Canvas;
use crate::error::{ExplorerError, Result};
use crate::evaluator::Evaluator;
use crate::planes::PlaneMapper;
use crate::queue::{CancelToken, Pop, Wake, WorkQueue};
use crate::tiles::Tile;

/// Everything a tile of one generation is drawn against.
#[derive(Debug)]
pub struct Frame {
    /// Where pixels go.
    pub canvas: Arc<Canvas>,
    /// Pixel to complex-plane mapping for this generation.
    pub mapper: PlaneMapper,
    /// Which generation this is.
    pub generation: u64,
}

/// One unit of work: a tile and the frame it belongs to.
#[derive(Clone, Debug)]
pub struct Job {
    /// The pixels to compute.
    pub tile: Tile,
    /// What to compute them against.
    pub frame: Arc<Frame>,
}

#[derive(Debug)]
struct Shared {
    queue: WorkQueue<Job>,
    barrier: IdleBarrier,
    evaluator: Evaluator,
}

/// See the module documentation.
#[derive(Debug)]
pub struct WorkerPool {
    shared: Arc<Shared>,
    handles: Vec<JoinHandle<()>>,
}

/// Computes every pixel of `tile` into the frame's canvas, row by row.
/// The cancellation flag is checked before each row; returns `false`
/// if the tile was abandoned part way.
pub fn render_tile(evaluator: &Evaluator, frame: &Frame, tile: &Tile, cancel: &CancelToken) -> bool {
    for y in tile.min_y..tile.max_y {
        if cancel.is_cancelled() {
            return false;
        }
        for x in tile.min_x..tile.max_x {
            frame.canvas.put(x, y, evaluator.evaluate(&frame.mapper, x, y));
        }
    }
    true
}

fn run_job(shared: &Shared, job: &Job, cancel: &CancelToken, id: usize) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        render_tile(&shared.evaluator, &job.frame, &job.tile, cancel)
    }));
    match outcome {
        Ok(true) => trace!("worker {} finished {:?}", id, job.tile),
        Ok(false) => trace!("worker {} abandoned {:?}", id, job.tile),
        Err(_) => warn!(
            "worker {} panicked in {:?} of generation {}; keeping what was drawn",
            id, job.tile, job.frame.generation
        ),
    }
}

fn work(shared: Arc<Shared>, id: usize) {
    let cancel = shared.queue.cancel_token();
    while let Wake::Work = shared.queue.wait_for_work() {
        let _busy = shared.barrier.enter();
        while let Pop::Item(job) = shared.queue.try_pop() {
            run_job(&shared, &job, &cancel, id);
        }
    }
    debug!("worker {} exiting", id);
}

impl WorkerPool {
    /// Starts `workers` threads that will color pixels with
    /// `evaluator`.  They stay parked until work is published.
    pub fn new(workers: usize, evaluator: Evaluator) -> Result<WorkerPool> {
        if workers < 1 {
            return Err(ExplorerError::NoWorkers);
        }
        let shared = Arc::new(Shared {
            queue: WorkQueue::new(),
            barrier: IdleBarrier::new(workers),
            evaluator,
        });
        let mut pool = WorkerPool {
            shared,
            handles: Vec::with_capacity(workers),
        };
        for id in 0..workers {
            let shared = pool.shared.clone();
            let handle = thread::Builder::new()
                .name(format!("explorer-worker-{}", id))
                .spawn(move || work(shared, id))
                .map_err(ExplorerError::Spawn)?;
            pool.handles.push(handle);
        }
        info!("started {} workers", workers);
        Ok(pool)
    }

    /// The queue tiles are published to.
    pub fn queue(&self) -> &WorkQueue<Job> {
        &self.shared.queue
    }

    /// The barrier the workers report busy and idle on.
    pub fn barrier(&self) -> &IdleBarrier {
        &self.shared.barrier
    }

    /// The evaluator every worker shares.
    pub fn evaluator(&self) -> &Evaluator {
        &self.shared.evaluator
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.shared.barrier.size()
    }

    /// Workers that are not currently working through the queue.
    pub fn idle_workers(&self) -> usize {
        self.shared.barrier.idle()
    }

    /// Stops and joins every worker.  Calling it again does nothing.
    pub fn shutdown(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        self.shared.queue.close();
        for handle in self.handles.drain(..) {
            if handle.join().is_err() {
                error!("a worker thread died outside of a tile");
            }
        }
        info!("worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
