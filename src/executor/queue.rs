//! Bounded single-producer/multi-consumer work queue.
//!
//! A fixed ring of task slots indexed by three monotonically increasing
//! cursors:
//!
//! - `head` - producer write position, advanced (release) after a slot is
//!   filled;
//! - `consumer` - claim ticket counter, advanced (fetch-add) by any worker;
//! - `tail` - the producer's cached minimum of all per-worker claim
//!   cursors, recomputed lazily under backpressure.
//!
//! Capacity is a power of two so slot selection is `cursor & (capacity−1)`.
//! Tasks are claimed in submission order; completion order is unspecified.
//! Each cursor lives on its own cache line to keep producer and consumers
//! from bouncing the same line.
//!
//! Tasks are borrowed, not owned: submission goes through [`WorkQueue::scope`],
//! which guarantees (with a drop guard, so panics cannot leak a borrow) that
//! every submitted task finishes before the borrows expire.

use std::cell::UnsafeCell;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::error::UmbraError;
use crate::executor::WaitStrategy;

/// A borrowed task: shared, callable from any worker exactly once.
type RawTask = *const (dyn Fn() + Send + Sync);

/// Pads a value out to its own cache line.
#[repr(align(64))]
struct CachePadded<T> {
    value: T,
}

impl<T> CachePadded<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

/// State shared between the producer handle and the worker threads.
struct Shared {
    slots: Box<[UnsafeCell<Option<RawTask>>]>,
    mask: u64,
    head: CachePadded<AtomicU64>,
    tail: CachePadded<AtomicU64>,
    consumer: CachePadded<AtomicU64>,
    /// Per-worker claim cursors: the ticket each worker is waiting on or
    /// currently running. Only ever increases.
    cursors: Box<[CachePadded<AtomicU64>]>,
    /// Guards the single-producer contract: set for the duration of a scope.
    producing: AtomicBool,
    running: AtomicBool,
    wait: WaitStrategy,
}

// SAFETY: the raw task pointers stored in `slots` are only dereferenced
// between a release of `head` (publish) and the matching `wait_all`
// (retire), during which `scope` keeps the referents alive. All cursor
// state is atomic.
unsafe impl Send for Shared {}
unsafe impl Sync for Shared {}

impl Shared {
    fn capacity(&self) -> u64 {
        self.mask + 1
    }

    /// Producer-side enqueue.
    ///
    /// # Safety
    ///
    /// `task` must remain valid until a subsequent [`Self::wait_all`]
    /// returns. Must only be called from the single producer thread.
    unsafe fn submit(&self, task: RawTask) {
        let head = self.head.value.load(Ordering::Relaxed);

        // Backpressure: ring full. Recompute `tail` from the claim cursors
        // and wait for a slot to retire.
        if head >= self.tail.value.load(Ordering::Relaxed) + self.capacity() {
            loop {
                let mut min = u64::MAX;
                for cursor in self.cursors.iter() {
                    min = min.min(cursor.value.load(Ordering::Acquire));
                }
                self.tail.value.store(min, Ordering::Relaxed);
                if head < min + self.capacity() {
                    break;
                }
                self.wait.pause();
            }
        }

        let slot = &self.slots[(head & self.mask) as usize];
        // SAFETY: `head` has not been published yet, so no worker reads this
        // slot; the single-producer discipline rules out concurrent writes.
        unsafe {
            *slot.get() = Some(task);
        }

        // Publish: workers acquire `head`, so the slot write above
        // happens-before any claim of this ticket.
        self.head.value.store(head + 1, Ordering::Release);
    }

    /// Block until every worker's claim cursor has reached `head`, i.e. no
    /// submitted task is still unclaimed or running.
    fn wait_all(&self) {
        let head = self.head.value.load(Ordering::Relaxed);
        for cursor in self.cursors.iter() {
            while cursor.value.load(Ordering::Acquire) < head {
                self.wait.pause();
            }
        }
    }

    fn worker_loop(&self, index: usize) {
        loop {
            // Claim the next ticket. Tickets are handed out in submission
            // order; the ticket may be ahead of `head` while the queue is
            // idle, which is exactly what lets `wait_all` observe idleness.
            let ticket = self.consumer.value.fetch_add(1, Ordering::Relaxed);
            self.cursors[index].value.store(ticket, Ordering::Release);

            while ticket >= self.head.value.load(Ordering::Acquire) {
                if !self.running.load(Ordering::Acquire) {
                    return;
                }
                self.wait.pause();
            }

            // SAFETY: `ticket < head` was observed with acquire ordering,
            // so the slot contents for this ticket are visible, and the
            // enclosing scope keeps the task alive until `wait_all`.
            let task = unsafe { *self.slots[(ticket & self.mask) as usize].get() };
            if let Some(task) = task {
                // SAFETY: as above; the pointer refers to a live closure.
                let task = unsafe { &*task };
                task();
            }
        }
    }
}

/// Bounded single-producer/multi-consumer task queue with a fixed pool of
/// worker threads.
///
/// Create once at startup, submit batches of borrowed tasks through
/// [`WorkQueue::scope`], drop at shutdown (drains, then joins all workers).
pub struct WorkQueue {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkQueue {
    /// Spawn `workers` worker threads sharing a ring of `capacity` task
    /// slots.
    ///
    /// # Errors
    ///
    /// Returns [`UmbraError::ThreadSpawn`] when the OS refuses a thread.
    ///
    /// # Panics
    ///
    /// When `workers` is zero or `capacity` is not a non-zero power of two
    /// (programming errors).
    pub fn new(
        workers: usize,
        capacity: usize,
        wait: WaitStrategy,
    ) -> Result<Self, UmbraError> {
        assert!(workers > 0, "work queue needs at least one worker");
        assert!(
            capacity > 0 && capacity.is_power_of_two(),
            "task capacity must be a non-zero power of two"
        );

        let shared = Arc::new(Shared {
            slots: (0..capacity).map(|_| UnsafeCell::new(None)).collect(),
            mask: capacity as u64 - 1,
            head: CachePadded::new(AtomicU64::new(0)),
            tail: CachePadded::new(AtomicU64::new(0)),
            consumer: CachePadded::new(AtomicU64::new(0)),
            cursors: (0..workers)
                .map(|_| CachePadded::new(AtomicU64::new(0)))
                .collect(),
            producing: AtomicBool::new(false),
            running: AtomicBool::new(true),
            wait,
        });

        let mut handles = Vec::with_capacity(workers);
        for index in 0..workers {
            let shared = Arc::clone(&shared);
            let handle = std::thread::Builder::new()
                .name(format!("umbra-worker-{index}"))
                .spawn(move || shared.worker_loop(index))
                .map_err(UmbraError::ThreadSpawn)?;
            handles.push(handle);
        }
        log::debug!("work queue up: {workers} workers, {capacity} task slots");

        Ok(Self {
            shared,
            workers: handles,
        })
    }

    /// Number of worker threads.
    #[must_use]
    pub fn workers(&self) -> u32 {
        self.workers.len() as u32
    }

    /// Submit a batch of borrowed tasks and wait for all of them.
    ///
    /// Tasks submitted through the scope may borrow anything that outlives
    /// the `scope` call; the scope waits for every submitted task before
    /// returning (also on unwind). Tasks must be independent: they are
    /// claimed in submission order but complete in any order.
    ///
    /// # Panics
    ///
    /// The queue has a single producer: overlapping scopes from two threads
    /// are a programming error and fatal.
    pub fn scope<'env, F>(&self, f: F)
    where
        F: FnOnce(&TaskScope<'_, 'env>),
    {
        assert!(
            !self.shared.producing.swap(true, Ordering::Acquire),
            "work queue scopes must not overlap: single-producer contract"
        );
        // The guard runs `wait_all` even if `f` panics after submitting.
        let guard = DrainGuard { shared: &self.shared };
        let scope = TaskScope {
            queue: self,
            _env: PhantomData,
        };
        f(&scope);
        drop(guard);
    }

    /// Block until every submitted task has been claimed and completed.
    ///
    /// Establishes a happens-before edge with each task's effects, so
    /// results (counters, pixels) may be read plainly afterwards.
    pub fn wait_all(&self) {
        self.shared.wait_all();
    }
}

impl Drop for WorkQueue {
    /// Orderly shutdown: drain outstanding work, signal, then join every
    /// worker so no task memory is referenced past this point.
    fn drop(&mut self) {
        self.shared.wait_all();
        self.shared.running.store(false, Ordering::Release);
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("work queue worker panicked during shutdown");
            }
        }
    }
}

/// Submission handle passed to the closure of [`WorkQueue::scope`].
pub struct TaskScope<'queue, 'env> {
    queue: &'queue WorkQueue,
    _env: PhantomData<&'env ()>,
}

impl<'env> TaskScope<'_, 'env> {
    /// Enqueue one task. Blocks (via the wait strategy) when the ring is
    /// full.
    pub fn submit(&self, task: &'env (dyn Fn() + Send + Sync)) {
        let raw: *const (dyn Fn() + Send + Sync + 'env) = task;
        // SAFETY: lifetime erasure only. The referent lives for 'env, which
        // encloses the scope, and the scope's drain guard runs `wait_all`
        // before 'env can end.
        let raw: RawTask = unsafe { std::mem::transmute(raw) };
        // SAFETY: scope holds `&WorkQueue`; the queue outlives the call and
        // the referent outlives `wait_all` per above. Scopes are used from
        // the single producer thread.
        unsafe { self.queue.shared.submit(raw) }
    }
}

struct DrainGuard<'a> {
    shared: &'a Shared,
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.shared.wait_all();
        self.shared.producing.store(false, Ordering::Release);
    }
}
