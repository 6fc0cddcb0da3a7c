//! Per-chromosome partition worker.
//!
//! A worker owns its task (the chromosome's rows) and opens its own reference
//! accessor. Failures are contained at two levels:
//!
//! - a row whose base cannot be fetched, or whose alleles do not match, is skipped
//! - a failure that makes the accessor unusable aborts the partition, and the
//!   result carries the error instead of rows

use std::time::{Duration, Instant};

use tracing::{debug, info, info_span, warn};

use crate::annotation::progress::ProgressReporter;
use crate::core::allele::resolve;
use crate::core::reference::ReferenceSource;
use crate::core::types::{ResolvedRecord, VariantRecord};
use crate::error::AnnotationError;
use crate::parsing::fasta::{BaseFetch, FetchError};

/// The rows of one chromosome, ready for dispatch
#[derive(Debug, Clone)]
pub struct ChromosomeTask {
    pub chrom: String,
    /// Rows in input order
    pub records: Vec<VariantRecord>,
}

/// Outcome of one partition
#[derive(Debug)]
pub struct ChromosomeResult {
    pub chrom: String,

    /// Resolved rows, in input order
    pub resolved: Vec<ResolvedRecord>,

    /// Rows resolved (equals `resolved.len()`)
    pub processed: usize,

    /// Rows skipped
    pub skipped: usize,

    /// Partition-level failure; when set, `resolved` is empty
    pub error: Option<AnnotationError>,
}

impl ChromosomeResult {
    fn failed(chrom: String, error: AnnotationError) -> Self {
        Self {
            chrom,
            resolved: Vec::new(),
            processed: 0,
            skipped: 0,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Why a single row produced no output
#[derive(Debug)]
pub enum SkipReason {
    /// The reference base could not be fetched
    Fetch(FetchError),
    /// Neither allele nor its reverse complement equals the reference base
    NoMatch { reference_base: u8 },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "could not fetch base: {e}"),
            Self::NoMatch { reference_base } => write!(
                f,
                "neither allele matches reference base {} (including reverse complement)",
                char::from(*reference_base)
            ),
        }
    }
}

/// Resolve every row of `task` against the reference opened from `source`.
///
/// Never fails: partition-level errors are returned in [`ChromosomeResult::error`]
/// and reported by the aggregator.
pub fn process_chromosome<S: ReferenceSource>(
    task: ChromosomeTask,
    source: &S,
    progress_interval: Duration,
) -> ChromosomeResult {
    let span = info_span!("partition", chrom = %task.chrom);
    let _enter = span.enter();
    let start = Instant::now();

    match annotate_partition(&task, source, progress_interval) {
        Ok(result) => result,
        Err(e) => {
            debug!(
                "Abandoning partition after {:.2}s",
                start.elapsed().as_secs_f64()
            );
            ChromosomeResult::failed(task.chrom, e)
        }
    }
}

fn annotate_partition<S: ReferenceSource>(
    task: &ChromosomeTask,
    source: &S,
    progress_interval: Duration,
) -> Result<ChromosomeResult, AnnotationError> {
    let start = Instant::now();
    info!("Started processing chromosome {}", task.chrom);

    let mut accessor = source.open(&task.chrom)?;

    let total = task.records.len();
    if total == 0 {
        warn!("No variants found for {}", task.chrom);
        return Ok(ChromosomeResult {
            chrom: task.chrom.clone(),
            resolved: Vec::new(),
            processed: 0,
            skipped: 0,
            error: None,
        });
    }

    let mut progress = ProgressReporter::new(progress_interval);
    let mut resolved = Vec::with_capacity(total);
    let mut skipped = 0;

    for (i, record) in task.records.iter().enumerate() {
        let row = i + 1;
        progress.tick(row, total);

        match resolve_row(&mut accessor, record) {
            Ok(Ok(record)) => resolved.push(record),
            Ok(Err(reason)) => {
                warn!("Skipping {}:{} - {reason}", record.chrom, record.pos);
                skipped += 1;
            }
            Err(e) => {
                return Err(AnnotationError::Partition {
                    chrom: task.chrom.clone(),
                    row,
                    total,
                    message: e.to_string(),
                });
            }
        }
    }

    let processed = resolved.len();
    info!(
        "Finished processing {} in {:.2}s - Processed: {processed}, Skipped: {skipped}",
        task.chrom,
        start.elapsed().as_secs_f64()
    );

    Ok(ChromosomeResult {
        chrom: task.chrom.clone(),
        resolved,
        processed,
        skipped,
        error: None,
    })
}

/// Resolve one row.
///
/// The outer `Err` is an accessor failure that must abort the partition; the
/// inner `Err` is a recoverable skip.
fn resolve_row<F: BaseFetch>(
    accessor: &mut F,
    record: &VariantRecord,
) -> Result<Result<ResolvedRecord, SkipReason>, FetchError> {
    let base = match accessor.fetch(record.pos) {
        Ok(base) => base,
        Err(e) if e.is_row_scoped() => return Ok(Err(SkipReason::Fetch(e))),
        Err(e) => return Err(e),
    };

    let Some(alleles) = resolve(&record.allele1, &record.allele2, base) else {
        return Ok(Err(SkipReason::NoMatch {
            reference_base: base,
        }));
    };

    debug!(
        "{}:{} {}/{} -> REF={} ALT={} ({:?})",
        record.chrom,
        record.pos,
        record.allele1,
        record.allele2,
        alleles.ref_allele,
        alleles.alt_allele,
        alleles.strand
    );
    Ok(Ok(ResolvedRecord::from_variant(record, alleles)))
}
