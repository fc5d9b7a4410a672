//! Rayon thread-pool scoping and batch splitting for gear-set sweeps.

use rayon::ThreadPoolBuilder;

/// Configures how many worker threads a parallel sweep uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerPool {
    /// Number of worker threads. 0 means the global Rayon pool (all cores).
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// Runs a closure on a pool with this worker count. With 0 workers the
    /// closure runs on the global Rayon pool; otherwise a temporary pool is
    /// built with exactly that many threads.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            f()
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
                .expect("Rayon thread pool");
            pool.install(f)
        }
    }
}

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for index in 0..num_batches {
        let size = base + usize::from(index < remainder);
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}
