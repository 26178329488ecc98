//! Fixed-partition fan-out over index ranges.
//!
//! The input is split once into contiguous ranges, one per worker. Every
//! worker produces a purely local result; merging happens on the calling
//! thread after all workers joined, so no lock guards the shared output.

use crate::libs::error::{GhError, Result};
use rayon::prelude::*;
use std::ops::Range;

/// Splits `0..len` into at most `parts` contiguous, non-empty ranges
///
/// ```
/// let ranges = ghcube::libs::parallel::partition(10, 3);
/// assert_eq!(ranges, vec![0..4, 4..8, 8..10]);
///
/// assert!(ghcube::libs::parallel::partition(0, 4).is_empty());
/// assert_eq!(ghcube::libs::parallel::partition(2, 8).len(), 2);
/// ```
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return vec![];
    }
    let parts = parts.clamp(1, len);
    let chunk = len.div_ceil(parts);
    (0..len)
        .step_by(chunk)
        .map(|start| start..usize::min(start + chunk, len))
        .collect()
}

/// Worker count for a parallel phase, 1 when already inside a rayon worker
pub fn effective_threads(threads: usize) -> usize {
    if rayon::current_thread_index().is_some() {
        1
    } else {
        threads.max(1)
    }
}

/// Runs `work` on each partition of `0..len` and returns the local results
/// in partition order. The first error fails the whole phase.
pub fn map_partitions<T, F>(len: usize, threads: usize, work: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(Range<usize>) -> Result<T> + Sync,
{
    let threads = effective_threads(threads);
    let ranges = partition(len, threads);

    if threads == 1 {
        return ranges.into_iter().map(work).collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| GhError::config(format!("cannot build thread pool: {}", e)))?;

    pool.install(|| ranges.into_par_iter().map(&work).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_covers() {
        for len in 0..40 {
            for parts in 1..9 {
                let ranges = partition(len, parts);
                assert!(ranges.len() <= parts);
                let flat: Vec<usize> = ranges.iter().flat_map(|r| r.clone()).collect();
                assert_eq!(flat, (0..len).collect::<Vec<_>>());
                assert!(ranges.iter().all(|r| !r.is_empty()));
            }
        }
    }

    #[test]
    fn test_map_partitions() {
        let data: Vec<u64> = (1..=100).collect();
        let sums = map_partitions(data.len(), 4, |r| Ok(data[r].iter().sum::<u64>())).unwrap();
        assert_eq!(sums.len(), 4);
        assert_eq!(sums.iter().sum::<u64>(), 5050);
    }

    #[test]
    fn test_map_partitions_error() {
        let res: Result<Vec<()>> = map_partitions(10, 3, |r| {
            if r.contains(&5) {
                Err(GhError::config("boom"))
            } else {
                Ok(())
            }
        });
        assert_eq!(res, Err(GhError::config("boom")));
    }
}
