//! Task execution: the work queue and the seam the renderer drives it
//! through.
//!
//! The renderer does not know about threads; it hands the executor a batch
//! of independent tasks and a partition-count hint comes back the other way.
//! [`WorkQueue`] is the production implementation; [`InlineExecutor`] runs
//! everything on the calling thread for tests and single-core fallback.

mod queue;
mod wait;

pub use queue::{TaskScope, WorkQueue};
pub use wait::WaitStrategy;

/// Execution seam consumed by the renderer.
pub trait Executor: Sync {
    /// How many partitions the caller should split its work into.
    fn nprocs(&self) -> u32;

    /// Run a batch of independent tasks to completion. Returns only when
    /// every task has finished; completion order is unspecified.
    fn run(&self, tasks: &[&(dyn Fn() + Send + Sync)]);
}

impl Executor for WorkQueue {
    fn nprocs(&self) -> u32 {
        self.workers()
    }

    fn run(&self, tasks: &[&(dyn Fn() + Send + Sync)]) {
        self.scope(|scope| {
            for &task in tasks {
                scope.submit(task);
            }
        });
    }
}

/// Executor that runs every task synchronously on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn nprocs(&self) -> u32 {
        1
    }

    fn run(&self, tasks: &[&(dyn Fn() + Send + Sync)]) {
        for task in tasks {
            task();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn inline_executor_runs_everything() {
        let counter = AtomicU64::new(0);
        let bump = || {
            let _ = counter.fetch_add(1, Ordering::Relaxed);
        };
        let tasks: [&(dyn Fn() + Send + Sync); 3] = [&bump, &bump, &bump];
        InlineExecutor.run(&tasks);
        assert_eq!(counter.load(Ordering::Relaxed), 3);
    }

    #[test]
    fn work_queue_reports_its_worker_count() {
        let queue = WorkQueue::new(3, 16, WaitStrategy::Yield).expect("queue");
        assert_eq!(queue.nprocs(), 3);
    }

    #[test]
    fn work_queue_runs_batches_through_the_trait() {
        let queue = WorkQueue::new(2, 8, WaitStrategy::BusySpin).expect("queue");
        let counter = AtomicU64::new(0);
        let bump = || {
            let _ = counter.fetch_add(1, Ordering::Relaxed);
        };
        let tasks: Vec<&(dyn Fn() + Send + Sync)> = vec![&bump; 17];
        let executor: &dyn Executor = &queue;
        executor.run(&tasks);
        assert_eq!(counter.load(Ordering::Relaxed), 17);
    }
}
