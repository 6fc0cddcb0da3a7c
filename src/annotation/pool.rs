//! Bounded parallel dispatch of chromosome partitions.
//!
//! Uses a dedicated rayon pool so the worker count is exact and independent of the
//! global pool. Results come back in task submission order no matter which worker
//! finishes first, because indexed parallel iterators collect by position.

use std::collections::HashMap;
use std::time::Duration;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::annotation::worker::{process_chromosome, ChromosomeResult, ChromosomeTask};
use crate::core::reference::ReferenceSource;
use crate::core::types::VariantRecord;
use crate::error::AnnotationError;

/// Host parallelism, falling back to a single worker if it cannot be queried
#[must_use]
pub fn available_workers() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Clamp a requested worker count into `1..=2 * available`, warning when it changes.
#[must_use]
pub fn clamp_workers(requested: usize, available: usize) -> usize {
    let max = available.max(1) * 2;
    let workers = requested.clamp(1, max);
    if workers != requested {
        warn!("Reducing processes from {requested} to system limit {workers}");
    }
    workers
}

/// Split `records` into one task per chromosome, in the order of `chromosomes`.
///
/// Rows keep their input order within a task. With `max_per_chrom`, only the
/// first rows of each chromosome are kept.
#[must_use]
pub fn split_partitions(
    records: Vec<VariantRecord>,
    chromosomes: &[String],
    max_per_chrom: Option<usize>,
) -> Vec<ChromosomeTask> {
    let slots: HashMap<&str, usize> = chromosomes
        .iter()
        .enumerate()
        .map(|(i, chrom)| (chrom.as_str(), i))
        .collect();

    let mut tasks: Vec<ChromosomeTask> = chromosomes
        .iter()
        .map(|chrom| ChromosomeTask {
            chrom: chrom.clone(),
            records: Vec::new(),
        })
        .collect();

    for record in records {
        let Some(&slot) = slots.get(record.chrom.as_str()) else {
            continue;
        };
        let task = &mut tasks[slot];
        if max_per_chrom.is_some_and(|max| task.records.len() >= max) {
            continue;
        }
        task.records.push(record);
    }

    tasks
}

/// Run every task on a pool of `workers` threads.
///
/// `workers` goes through [`clamp_workers`] first. At most that many partitions run
/// at once; the rest wait for a free thread. The returned results are in the same
/// order as `tasks`.
///
/// # Errors
///
/// Returns `AnnotationError::WorkerPool` if the thread pool cannot be created.
pub fn run_partitions<S: ReferenceSource>(
    tasks: Vec<ChromosomeTask>,
    source: &S,
    workers: usize,
    progress_interval: Duration,
) -> Result<Vec<ChromosomeResult>, AnnotationError> {
    let workers = clamp_workers(workers, available_workers());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("partition-{i}"))
        .build()
        .map_err(|e| AnnotationError::WorkerPool(e.to_string()))?;

    info!(
        "Starting {workers} parallel workers for {} chromosomes",
        tasks.len()
    );

    let results = pool.install(|| {
        tasks
            .into_par_iter()
            .with_max_len(1)
            .map(|task| process_chromosome(task, source, progress_interval))
            .collect::<Vec<_>>()
    });

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::test_support::MemorySource;

    fn record(chrom: &str, pos: u64) -> VariantRecord {
        VariantRecord::new(chrom, pos, format!("{chrom}:{pos}"), "A", "G")
    }

    #[test]
    fn test_clamp_workers() {
        assert_eq!(clamp_workers(4, 8), 4);
        assert_eq!(clamp_workers(16, 8), 16);
        assert_eq!(clamp_workers(17, 8), 16);
        assert_eq!(clamp_workers(0, 8), 1);
        assert_eq!(clamp_workers(3, 0), 2);
    }

    #[test]
    fn test_split_partitions_preserves_row_order() {
        let records = vec![
            record("chr2", 50),
            record("chr1", 30),
            record("chr2", 10),
            record("chr1", 20),
        ];
        let chromosomes = vec!["chr1".to_string(), "chr2".to_string()];

        let tasks = split_partitions(records, &chromosomes, None);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].chrom, "chr1");
        let positions: Vec<u64> = tasks[0].records.iter().map(|r| r.pos).collect();
        assert_eq!(positions, vec![30, 20]);
        let positions: Vec<u64> = tasks[1].records.iter().map(|r| r.pos).collect();
        assert_eq!(positions, vec![50, 10]);
    }

    #[test]
    fn test_split_partitions_row_cap() {
        let records = (1..=5).map(|pos| record("chr1", pos)).collect();
        let chromosomes = vec!["chr1".to_string()];

        let tasks = split_partitions(records, &chromosomes, Some(2));
        let positions: Vec<u64> = tasks[0].records.iter().map(|r| r.pos).collect();
        assert_eq!(positions, vec![1, 2]);
    }

    #[test]
    fn test_results_follow_submission_order() {
        // The first partitions are the slowest, so they finish last
        let source = MemorySource::new()
            .with_sequence("chr1", "AAAA")
            .with_sequence("chr2", "AAAA")
            .with_sequence("chr10", "AAAA")
            .with_open_delay("chr1", Duration::from_millis(150))
            .with_open_delay("chr2", Duration::from_millis(75));

        let chromosomes = vec!["chr1".to_string(), "chr2".to_string(), "chr10".to_string()];
        let records = vec![record("chr10", 1), record("chr2", 1), record("chr1", 1)];
        let tasks = split_partitions(records, &chromosomes, None);

        let results = run_partitions(tasks, &source, 3, Duration::from_secs(30)).unwrap();
        let order: Vec<&str> = results.iter().map(|r| r.chrom.as_str()).collect();
        assert_eq!(order, vec!["chr1", "chr2", "chr10"]);
    }

    #[test]
    fn test_failed_partition_does_not_affect_others() {
        let chromosomes = vec!["chr1".to_string(), "chr2".to_string(), "chr3".to_string()];
        let records = || {
            vec![
                record("chr1", 1),
                record("chr2", 2),
                record("chr2", 3),
                record("chr3", 1),
            ]
        };
        let full = MemorySource::new()
            .with_sequence("chr1", "AAAA")
            .with_sequence("chr2", "AAAA")
            .with_sequence("chr3", "AAAA");
        let without_chr2 = MemorySource::new()
            .with_sequence("chr1", "AAAA")
            .with_sequence("chr3", "AAAA");

        let baseline = run_partitions(
            split_partitions(records(), &chromosomes, None),
            &full,
            2,
            Duration::from_secs(30),
        )
        .unwrap();
        let degraded = run_partitions(
            split_partitions(records(), &chromosomes, None),
            &without_chr2,
            2,
            Duration::from_secs(30),
        )
        .unwrap();

        let failures: Vec<&str> = degraded
            .iter()
            .filter(|r| !r.is_ok())
            .map(|r| r.chrom.as_str())
            .collect();
        assert_eq!(failures, vec!["chr2"]);

        for i in [0, 2] {
            assert_eq!(baseline[i].processed, degraded[i].processed);
            assert_eq!(baseline[i].skipped, degraded[i].skipped);
            assert_eq!(baseline[i].resolved, degraded[i].resolved);
        }
    }

    #[test]
    fn test_single_worker_runs_everything() {
        let source = MemorySource::new()
            .with_sequence("1", "AC")
            .with_sequence("2", "GT");
        let chromosomes = vec!["1".to_string(), "2".to_string()];
        let records = vec![record("1", 1), record("2", 1), record("1", 2)];

        let results = run_partitions(
            split_partitions(records, &chromosomes, None),
            &source,
            1,
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(results[0].processed + results[0].skipped, 2);
        assert_eq!(results[1].processed + results[1].skipped, 1);
    }

    #[test]
    fn test_worker_count_is_clamped() {
        let source = MemorySource::new()
            .with_sequence("chr1", "AC")
            .with_sequence("chr2", "GT");
        let chromosomes = vec!["chr1".to_string(), "chr2".to_string()];
        let records = vec![record("chr1", 1), record("chr2", 1)];

        let results = run_partitions(
            split_partitions(records, &chromosomes, None),
            &source,
            0,
            Duration::from_secs(30),
        )
        .unwrap();
        assert!(results.iter().all(ChromosomeResult::is_ok));
        assert_eq!(source.pool_sizes(), vec![1, 1]);
    }
}
