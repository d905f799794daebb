//! Per-frame ray counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Ray classification for counting. Reflection and refraction are reserved
/// kinds - carried in the model, never recursively cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RayKind {
    /// Primary ray from the camera.
    Camera,
    /// Reserved: reflection bounce.
    Reflection,
    /// Reserved: refraction bounce.
    Refraction,
    /// Occlusion probe toward a light.
    Shadow,
}

impl RayKind {
    /// Number of ray kinds.
    pub const COUNT: usize = 4;

    const fn index(self) -> usize {
        match self {
            Self::Camera => 0,
            Self::Reflection => 1,
            Self::Refraction => 2,
            Self::Shadow => 3,
        }
    }
}

/// Per-renderer cast counters, one per [`RayKind`].
///
/// Increments are relaxed; workers bump them concurrently during a draw and
/// nothing orders them until the frame barrier. Read them only after the
/// draw's `wait_all`, which establishes the happens-before edge that makes
/// the totals exact.
#[derive(Debug)]
pub struct Counters {
    counts: [AtomicU64; RayKind::COUNT],
}

impl Counters {
    /// All-zero counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: [
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
                AtomicU64::new(0),
            ],
        }
    }

    /// Zero every counter. Called at the start of each draw.
    pub fn reset(&self) {
        for counter in &self.counts {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Record one cast of the given kind.
    #[inline]
    pub fn record(&self, kind: RayKind) {
        let _ = self.counts[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Current count for the given kind.
    #[must_use]
    pub fn get(&self, kind: RayKind) -> u64 {
        self.counts[kind.index()].load(Ordering::Relaxed)
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_reset() {
        let counters = Counters::new();
        counters.record(RayKind::Camera);
        counters.record(RayKind::Camera);
        counters.record(RayKind::Shadow);
        assert_eq!(counters.get(RayKind::Camera), 2);
        assert_eq!(counters.get(RayKind::Shadow), 1);
        assert_eq!(counters.get(RayKind::Reflection), 0);

        counters.reset();
        for kind in [
            RayKind::Camera,
            RayKind::Reflection,
            RayKind::Refraction,
            RayKind::Shadow,
        ] {
            assert_eq!(counters.get(kind), 0);
        }
    }
}
