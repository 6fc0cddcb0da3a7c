use serde::Serialize;
use tracing::error;

use crate::annotation::worker::ChromosomeResult;
use crate::core::types::ResolvedRecord;
use crate::error::AnnotationError;

/// A partition that failed, as reported in the run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionFailure {
    pub chrom: String,
    pub error: String,
}

/// Concatenated output of all successful partitions
#[derive(Debug, Default)]
pub struct Aggregate {
    /// Resolved rows in partition order, then input order
    pub records: Vec<ResolvedRecord>,
    pub processed: usize,
    pub skipped: usize,
    pub partitions: usize,
    pub failures: Vec<PartitionFailure>,
}

impl Aggregate {
    /// Collect partition results in the order given, without re-sorting rows.
    ///
    /// Failed partitions are logged and recorded; they contribute no rows or counts.
    #[must_use]
    pub fn collect(results: Vec<ChromosomeResult>) -> Self {
        let mut aggregate = Self {
            partitions: results.len(),
            ..Self::default()
        };

        for result in results {
            if let Some(e) = result.error {
                error!("Failed to process {}: {e}", result.chrom);
                aggregate.failures.push(PartitionFailure {
                    chrom: result.chrom,
                    error: e.to_string(),
                });
                continue;
            }

            aggregate.processed += result.processed;
            aggregate.skipped += result.skipped;
            aggregate.records.extend(result.resolved);
        }

        aggregate
    }

    /// Fail unless at least one row was resolved
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError::NoResolvedRows` if no partition produced output.
    pub fn require_rows(self) -> Result<Self, AnnotationError> {
        if self.records.is_empty() {
            Err(AnnotationError::NoResolvedRows)
        } else {
            Ok(self)
        }
    }
}
