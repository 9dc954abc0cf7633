//! Parallel execution utilities.

use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::error::{ExactError, Result};
use crate::types::DatapointIndex;

/// Minimum number of items before parallelization is beneficial.
pub const MIN_PARALLEL_SIZE: usize = 1024;

/// How per-query work is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Allow the rayon pool to be used.
    pub parallel: bool,
    /// Item count at which the pool is actually used.
    pub threshold: usize,
}

impl Schedule {
    /// Always run on the calling thread.
    pub const SEQUENTIAL: Schedule = Schedule {
        parallel: false,
        threshold: usize::MAX,
    };

    /// Whether `count` items would be processed on the pool.
    #[inline]
    pub fn is_parallel_for(&self, count: usize) -> bool {
        self.parallel && count >= self.threshold
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            parallel: true,
            threshold: MIN_PARALLEL_SIZE,
        }
    }
}

/// Map `f` over `0..count`, in parallel when the schedule allows it.
///
/// Output order always matches index order. On the calling thread the
/// lowest-index error is returned and later items do not run. On the pool
/// any failing item's error may be returned, and other items may or may not
/// have run.
pub fn try_map_indices<U, F>(count: usize, schedule: Schedule, f: F) -> Result<Vec<U>>
where
    U: Send,
    F: Fn(usize) -> Result<U> + Sync + Send,
{
    if schedule.is_parallel_for(count) {
        (0..count).into_par_iter().map(f).collect()
    } else {
        (0..count).map(f).collect()
    }
}

/// Run `f` and measure its wall-clock time on the current thread.
#[inline]
pub fn timed<U>(f: impl FnOnce() -> U) -> (U, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// Fail with [`ExactError::Cancelled`] if the flag is raised.
#[inline]
pub fn check_cancelled(flag: Option<&AtomicBool>, index: usize) -> Result<()> {
    match flag {
        Some(flag) if flag.load(Ordering::Relaxed) => Err(ExactError::Cancelled {
            query: index as DatapointIndex,
        }),
        _ => Ok(()),
    }
}
