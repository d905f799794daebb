//! Wait strategies: what a stalled producer or worker does between polls.

/// Pluggable wait strategy for the work queue.
///
/// Invoked by workers when no task is claimable and by the producer under
/// backpressure. Neither variant blocks; both return after a single hint to
/// the scheduler or CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitStrategy {
    /// Issue a CPU pause hint and keep spinning. Lowest latency, burns the
    /// core while idle.
    BusySpin,
    /// Yield the thread's timeslice back to the scheduler. Friendlier on
    /// shared machines, higher wakeup latency.
    #[default]
    Yield,
}

impl WaitStrategy {
    /// Perform one wait step.
    #[inline]
    pub fn pause(self) {
        match self {
            Self::BusySpin => std::hint::spin_loop(),
            Self::Yield => std::thread::yield_now(),
        }
    }
}
