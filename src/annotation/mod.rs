//! Parallel REF/ALT annotation of a variant table.
//!
//! The pipeline:
//!
//! 1. [`ordered_chromosomes`] derives the natural chromosome order once
//! 2. [`pool::split_partitions`] splits the rows into one task per chromosome
//! 3. [`pool::run_partitions`] runs the tasks on a bounded worker pool, each one
//!    through [`worker::process_chromosome`]
//! 4. [`aggregate::Aggregate`] concatenates successful partitions in order
//!
//! A failure in one chromosome (missing reference, unreadable file) is logged and
//! reported in the summary without affecting the others. The run only fails when
//! nothing at all could be resolved.

pub mod aggregate;
pub mod pool;
pub mod progress;
pub mod worker;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::core::chrom::ordered_chromosomes;
use crate::core::reference::ReferenceSource;
use crate::core::types::VariantRecord;
use crate::error::AnnotationError;

use aggregate::{Aggregate, PartitionFailure};
use progress::DEFAULT_PROGRESS_INTERVAL;

/// Settings for an annotation run
#[derive(Debug, Clone)]
pub struct AnnotationConfig {
    /// Worker threads; clamped to `1..=2 * available cores` when the pool starts
    pub workers: usize,
    /// Keep only the first N rows of each chromosome
    pub max_variants_per_chrom: Option<usize>,
    /// Wall-clock interval between per-partition progress messages
    pub progress_interval: Duration,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            workers: pool::available_workers(),
            max_variants_per_chrom: None,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Resolve REF/ALT for every record, one partition per chromosome.
///
/// # Errors
///
/// Returns `AnnotationError::Validation` if `records` is empty,
/// `AnnotationError::WorkerPool` if the pool cannot start, or
/// `AnnotationError::NoResolvedRows` if no partition resolved any row.
pub fn annotate<S: ReferenceSource>(
    records: Vec<VariantRecord>,
    source: &S,
    config: &AnnotationConfig,
) -> Result<Aggregate, AnnotationError> {
    let chromosomes = ordered_chromosomes(&records)?;
    info!("Found {} chromosomes to process", chromosomes.len());

    let tasks = pool::split_partitions(records, &chromosomes, config.max_variants_per_chrom);
    let results = pool::run_partitions(tasks, source, config.workers, config.progress_interval)?;

    Aggregate::collect(results).require_rows()
}

/// Final report of a run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub output: PathBuf,
    pub partitions: usize,
    pub failed_partitions: Vec<PartitionFailure>,
    pub processed: usize,
    pub skipped: usize,
    pub elapsed_seconds: f64,
}

impl RunSummary {
    #[must_use]
    pub fn new(aggregate: &Aggregate, output: PathBuf, started: Instant) -> Self {
        Self {
            output,
            partitions: aggregate.partitions,
            failed_partitions: aggregate.failures.clone(),
            processed: aggregate.processed,
            skipped: aggregate.skipped,
            elapsed_seconds: started.elapsed().as_secs_f64(),
        }
    }

    /// Log the summary at info level
    pub fn log(&self) {
        info!("Processing complete");
        info!("  Total variants processed: {}", self.processed);
        info!("  Total variants skipped: {}", self.skipped);
        if !self.failed_partitions.is_empty() {
            info!(
                "  Failed chromosomes: {}",
                self.failed_partitions
                    .iter()
                    .map(|f| f.chrom.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        info!("  Time elapsed: {:.2} seconds", self.elapsed_seconds);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::MemorySource;
    use super::*;

    fn config(workers: usize) -> AnnotationConfig {
        AnnotationConfig {
            workers,
            ..AnnotationConfig::default()
        }
    }

    #[test]
    fn test_annotate_end_to_end() {
        let mut sequence = vec![b'C'; 300];
        sequence[99] = b'A';
        sequence[199] = b'A';
        let sequence = String::from_utf8(sequence).unwrap();
        let source = MemorySource::new().with_sequence("chr1", &sequence);

        let records = vec![
            VariantRecord::new("chr1", 100, "rs1", "A", "G"),
            VariantRecord::new("chr1", 200, "rs2", "T", "C"),
        ];
        let aggregate = annotate(records, &source, &config(2)).unwrap();

        let rows: Vec<(u64, &str, &str, &str)> = aggregate
            .records
            .iter()
            .map(|r| (r.pos, r.id.as_str(), r.ref_allele.as_str(), r.alt_allele.as_str()))
            .collect();
        assert_eq!(rows, vec![(100, "rs1", "A", "G"), (200, "rs2", "A", "G")]);
    }

    #[test]
    fn test_annotate_conservation() {
        let source = MemorySource::new()
            .with_sequence("chr1", "ACGTACGT")
            .with_sequence("chr2", "GGGG")
            .with_sequence("chr10", "TTTT");
        let records = vec![
            VariantRecord::new("chr10", 1, "a", "A", "C"),
            VariantRecord::new("chr1", 1, "b", "A", "G"),
            VariantRecord::new("chr2", 2, "c", "A", "T"),
            VariantRecord::new("chr1", 2, "d", "C", "T"),
            VariantRecord::new("chr1", 3, "e", "A", "T"),
            VariantRecord::new("chr2", 50, "f", "G", "T"),
        ];
        let total = records.len();

        let aggregate = annotate(records, &source, &config(3)).unwrap();
        assert_eq!(aggregate.processed + aggregate.skipped, total);
        assert_eq!(aggregate.processed, aggregate.records.len());

        let chroms: Vec<&str> = aggregate.records.iter().map(|r| r.chrom.as_str()).collect();
        assert_eq!(chroms, vec!["chr1", "chr1", "chr10"]);
    }

    #[test]
    fn test_annotate_row_cap() {
        let source = MemorySource::new().with_sequence("chr1", "AAAA");
        let records = (1..=4)
            .map(|pos| VariantRecord::new("chr1", pos, "x", "A", "G"))
            .collect();
        let config = AnnotationConfig {
            max_variants_per_chrom: Some(3),
            ..config(1)
        };

        let aggregate = annotate(records, &source, &config).unwrap();
        assert_eq!(aggregate.processed, 3);
    }

    #[test]
    fn test_annotate_fails_without_any_rows() {
        let source = MemorySource::new();
        let records = vec![VariantRecord::new("chr1", 1, "rs1", "A", "G")];
        let result = annotate(records, &source, &config(1));
        assert!(matches!(result, Err(AnnotationError::NoResolvedRows)));
    }

    #[test]
    fn test_annotate_partial_failure_still_succeeds() {
        let source = MemorySource::new().with_sequence("chr2", "A");
        let records = vec![
            VariantRecord::new("chr1", 1, "rs1", "A", "G"),
            VariantRecord::new("chr2", 1, "rs2", "A", "G"),
        ];
        let aggregate = annotate(records, &source, &config(2)).unwrap();
        assert_eq!(aggregate.records.len(), 1);
        assert_eq!(aggregate.failures.len(), 1);
        assert_eq!(aggregate.failures[0].chrom, "chr1");

        let summary = RunSummary::new(&aggregate, PathBuf::from("out.tsv"), Instant::now());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["processed"], 1);
        assert_eq!(json["failed_partitions"][0]["chrom"], "chr1");
    }

    #[test]
    fn test_annotate_empty_input() {
        let source = MemorySource::new();
        let result = annotate(Vec::new(), &source, &config(1));
        assert!(matches!(result, Err(AnnotationError::Validation(_))));
    }
}
