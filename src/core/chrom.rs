//! Chromosome partitioning in natural order.
//!
//! Chromosome keys are split into alternating text/digit runs, always starting
//! with a (possibly empty) text run. Text runs compare lexically and digit runs
//! compare as integers, so `chr2 < chr10 < chrX` and `2 < 10 < X`.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::core::types::VariantRecord;
use crate::error::AnnotationError;

/// Split a chromosome key into alternating text and digit runs.
///
/// The first run is always text (possibly empty), so runs at the same index of
/// two keys are always of the same kind.
fn runs(key: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut in_digits = false;

    for (i, c) in key.char_indices() {
        if c.is_ascii_digit() != in_digits {
            runs.push(&key[start..i]);
            start = i;
            in_digits = !in_digits;
        }
    }
    runs.push(&key[start..]);
    runs
}

/// Compare two digit runs by numeric value without parsing into a fixed-width integer
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Natural (numeric-aware) comparison of chromosome keys.
///
/// Keys that are equal under natural order (`chr01` vs `chr1`) fall back to
/// byte order so that sorting is total.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use refalt_annotator::core::chrom::natural_cmp;
///
/// assert_eq!(natural_cmp("chr2", "chr10"), Ordering::Less);
/// assert_eq!(natural_cmp("chr10", "chrX"), Ordering::Less);
/// ```
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = runs(a);
    let right = runs(b);

    for (i, (x, y)) in left.iter().zip(right.iter()).enumerate() {
        let ordering = if i % 2 == 1 {
            compare_digits(x, y)
        } else {
            x.cmp(y)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}

/// Distinct chromosome keys of `records`, naturally sorted.
///
/// This order is the canonical output order of a run.
///
/// # Errors
///
/// Returns `AnnotationError::Validation` if there are no records.
pub fn ordered_chromosomes(records: &[VariantRecord]) -> Result<Vec<String>, AnnotationError> {
    if records.is_empty() {
        return Err(AnnotationError::Validation(
            "No chromosomes found in input file".to_string(),
        ));
    }

    let distinct: BTreeSet<&str> = records.iter().map(|r| r.chrom.as_str()).collect();
    let mut chromosomes: Vec<String> = distinct.into_iter().map(str::to_string).collect();
    chromosomes.sort_by(|a, b| natural_cmp(a, b));

    Ok(chromosomes)
}
