use crate::bounded_heap::BoundedMinHeap;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// One consumer of the shared work queue.
///
/// Each worker owns a private bounded heap so the hot insert path never
/// contends with other workers; a single shared heap under one lock would
/// serialize every insertion. The only cross-thread access to the heap is the
/// orchestrator's periodic merge sweep, coordinated by the mutation guard:
/// while a sweep holds the guard, the loop's next insert is paused, not
/// skipped, so no value is lost.
#[derive(Debug)]
pub struct Worker {
    /// Mutation guard over the private heap. Held by exactly one actor at a
    /// time: the processing loop or a merge sweep.
    heap: Mutex<BoundedMinHeap>,
    capacity: usize,
    queue: Receiver<i64>,
    recv_timeout: Duration,
    running: AtomicBool,
    done: AtomicBool,
}

impl Worker {
    pub fn new(capacity: usize, queue: Receiver<i64>, recv_timeout: Duration) -> Self {
        Self {
            heap: Mutex::new(BoundedMinHeap::new(capacity)),
            capacity,
            queue,
            recv_timeout,
            running: AtomicBool::new(true),
            done: AtomicBool::new(false),
        }
    }

    /// Processing loop: block on the queue, insert under the guard, repeat
    /// until asked to finish. Sets the done flag on every exit path.
    pub fn run(&self) {
        while self.running.load(Ordering::Acquire) {
            self.process();
        }
        self.done.store(true, Ordering::Release);
    }

    fn process(&self) {
        match self.queue.recv_timeout(self.recv_timeout) {
            Ok(value) => self.heap.lock().insert(value),
            // Timeout is the flag-polling tick, not an error.
            Err(RecvTimeoutError::Timeout) => {}
            // Every producer is gone and the queue is drained; treat the
            // closed channel as a finish request.
            Err(RecvTimeoutError::Disconnected) => self.request_finish(),
        }
    }

    /// Asks the loop to stop at its next iteration boundary. Does not drain
    /// or block.
    pub fn request_finish(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// True only after the processing loop has fully exited.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Merges whatever this worker has accumulated into `overall`, then
    /// replaces the private heap with a fresh one so no value is counted
    /// twice across successive sweeps.
    pub fn merge_into(&self, overall: &mut BoundedMinHeap) {
        let mut heap = self.heap.lock();
        heap.merge_into(overall);
        *heap = BoundedMinHeap::new(self.capacity);
    }
}
