use std::path::PathBuf;

use tracing::debug;

use crate::error::AnnotationError;
use crate::parsing::fasta::{BaseFetch, FastaReference};

/// Opens a per-chromosome base accessor.
///
/// Shared by reference across all partition workers, so it must be `Sync`; each
/// worker opens and owns its own accessor.
pub trait ReferenceSource: Sync {
    type Accessor: BaseFetch;

    /// Open the accessor for `chrom`
    ///
    /// # Errors
    ///
    /// Returns a partition-scoped `AnnotationError` (reference not found or
    /// unreadable) if the chromosome's reference cannot be opened.
    fn open(&self, chrom: &str) -> Result<Self::Accessor, AnnotationError>;
}

/// A directory of per-chromosome indexed FASTA files
#[derive(Debug, Clone)]
pub struct ReferenceDir {
    root: PathBuf,
}

impl ReferenceDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ReferenceSource for ReferenceDir {
    type Accessor = FastaReference;

    fn open(&self, chrom: &str) -> Result<FastaReference, AnnotationError> {
        let reference = FastaReference::open(&self.root, chrom)?;
        debug!(
            "Reading {chrom} from contig {} of {}",
            reference.contig(),
            reference.path().display()
        );
        Ok(reference)
    }
}
