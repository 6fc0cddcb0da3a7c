//! Error taxonomy for an annotation run.
//!
//! Failures are tagged by how far they reach:
//!
//! | Variant | Scope |
//! |---------|-------|
//! | [`AnnotationError::Validation`], [`AnnotationError::Header`] | whole run, before processing |
//! | [`AnnotationError::PathNotFound`], [`AnnotationError::PermissionDenied`] | whole run, before processing |
//! | [`AnnotationError::ReferenceNotFound`], [`AnnotationError::ReferenceUnreadable`] | one chromosome |
//! | [`AnnotationError::Partition`] | one chromosome |
//! | [`AnnotationError::NoResolvedRows`] | whole run, after processing |
//!
//! Row-level problems never become an `AnnotationError`; they are reported as a
//! [`SkipReason`](crate::annotation::worker::SkipReason) and counted as skipped.

use std::path::PathBuf;

use thiserror::Error;

use crate::parsing::tsv::HeaderError;

#[derive(Error, Debug)]
pub enum AnnotationError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid file header: {0}")]
    Header(#[from] HeaderError),

    #[error("{kind} not found: {}", .path.display())]
    PathNotFound { kind: &'static str, path: PathBuf },

    #[error("No {access} permission for {kind}: {}", .path.display())]
    PermissionDenied {
        kind: &'static str,
        access: &'static str,
        path: PathBuf,
    },

    #[error("Reference not found for chromosome {chrom}: {reason}")]
    ReferenceNotFound { chrom: String, reason: String },

    #[error("Failed to open reference {} for chromosome {chrom}: {source}", .path.display())]
    ReferenceUnreadable {
        chrom: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chromosome {chrom}: failed at variant {row} of {total}: {message}")]
    Partition {
        chrom: String,
        row: usize,
        total: usize,
        message: String,
    },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    #[error("No variants were processed successfully")]
    NoResolvedRows,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnnotationError {
    /// Chromosome a partition-scoped error belongs to, if any
    #[must_use]
    pub fn chromosome(&self) -> Option<&str> {
        match self {
            Self::ReferenceNotFound { chrom, .. }
            | Self::ReferenceUnreadable { chrom, .. }
            | Self::Partition { chrom, .. } => Some(chrom),
            _ => None,
        }
    }

    /// Whether this error only invalidates a single chromosome partition
    #[must_use]
    pub fn is_partition_scoped(&self) -> bool {
        self.chromosome().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_scope() {
        let err = AnnotationError::Partition {
            chrom: "chr7".to_string(),
            row: 12,
            total: 40,
            message: "unexpected end of file".to_string(),
        };
        assert!(err.is_partition_scoped());
        assert_eq!(err.chromosome(), Some("chr7"));
        assert_eq!(
            err.to_string(),
            "Chromosome chr7: failed at variant 12 of 40: unexpected end of file"
        );

        let err = AnnotationError::Validation("no chromosomes".to_string());
        assert!(!err.is_partition_scoped());
        assert!(err.chromosome().is_none());
    }

    #[test]
    fn test_path_messages() {
        let err = AnnotationError::PermissionDenied {
            kind: "output directory",
            access: "write",
            path: PathBuf::from("/data/out"),
        };
        assert_eq!(
            err.to_string(),
            "No write permission for output directory: /data/out"
        );
    }
}
