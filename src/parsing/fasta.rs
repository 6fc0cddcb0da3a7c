//! Indexed single-base access into per-chromosome FASTA files using noodles.
//!
//! A reference directory holds one FASTA per chromosome with a `.fai` sidecar:
//!
//! ```text
//! refs/
//!   chr1.fa   chr1.fa.fai
//!   chr2.fa   chr2.fa.fai
//!   ...
//! ```
//!
//! For a chromosome key `C` the candidates `C.fa`, `chrC.fa`, then the same stems
//! with `.fasta` and `.fna`, are tried in that order.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use noodles::core::{Position, Region};
use noodles::fasta;
use thiserror::Error;

use crate::error::AnnotationError;

/// FASTA extensions tried for each candidate stem, in order
pub const FASTA_EXTENSIONS: [&str; 3] = ["fa", "fasta", "fna"];

/// Why a single base could not be fetched
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("position {position} is outside {contig} (length {length})")]
    OutOfRange {
        contig: String,
        position: u64,
        length: u64,
    },

    #[error("query rejected for {contig}:{position}: {message}")]
    Query {
        contig: String,
        position: u64,
        message: String,
    },

    #[error("reference read failed: {0}")]
    Io(#[from] io::Error),
}

impl FetchError {
    /// Whether the failure only concerns the requested coordinate.
    ///
    /// I/O failures mean the reader itself can no longer be trusted.
    #[must_use]
    pub fn is_row_scoped(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Source of reference bases for one chromosome
pub trait BaseFetch {
    /// Uppercased base at a 1-based `position`
    ///
    /// # Errors
    ///
    /// Returns a row-scoped `FetchError` for bad coordinates, or
    /// `FetchError::Io` if the underlying store failed.
    fn fetch(&mut self, position: u64) -> Result<u8, FetchError>;
}

/// Index path for a FASTA file (`<file>.fai`)
#[must_use]
pub fn index_path(fasta_path: &Path) -> PathBuf {
    let mut s = OsString::from(fasta_path.as_os_str());
    s.push(".fai");
    PathBuf::from(s)
}

/// Candidate file names for a chromosome key, in lookup order
#[must_use]
pub fn candidate_names(chrom: &str) -> Vec<String> {
    let mut stems = vec![chrom.to_string()];
    if !chrom.starts_with("chr") {
        stems.push(format!("chr{chrom}"));
    }

    FASTA_EXTENSIONS
        .iter()
        .flat_map(|ext| stems.iter().map(move |stem| format!("{stem}.{ext}")))
        .collect()
}

/// Locate the FASTA and index files for `chrom` under `ref_dir`.
///
/// # Errors
///
/// Returns `AnnotationError::ReferenceNotFound` if no candidate FASTA exists,
/// or if the first one found has no `.fai` index.
pub fn locate(ref_dir: &Path, chrom: &str) -> Result<(PathBuf, PathBuf), AnnotationError> {
    let candidates = candidate_names(chrom);

    let fasta_path = candidates
        .iter()
        .map(|name| ref_dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| AnnotationError::ReferenceNotFound {
            chrom: chrom.to_string(),
            reason: format!(
                "none of {} found in {}",
                candidates.join(", "),
                ref_dir.display()
            ),
        })?;

    let fai_path = index_path(&fasta_path);
    if !fai_path.is_file() {
        return Err(AnnotationError::ReferenceNotFound {
            chrom: chrom.to_string(),
            reason: format!("index not found for {}", fasta_path.display()),
        });
    }

    Ok((fasta_path, fai_path))
}

/// A per-chromosome FASTA opened for random access
pub struct FastaReference {
    path: PathBuf,
    contig: String,
    length: u64,
    reader: fasta::io::IndexedReader<BufReader<File>>,
}

impl std::fmt::Debug for FastaReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastaReference")
            .field("path", &self.path)
            .field("contig", &self.contig)
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl FastaReference {
    /// Locate and open the reference for `chrom`.
    ///
    /// Bases are read from the first contig listed in the index, whatever its name,
    /// so `21.fa` holding `>chr21` serves the key `21`.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError::ReferenceNotFound` if the files are missing or the
    /// index lists no contigs, or `AnnotationError::ReferenceUnreadable` if either
    /// file cannot be opened or the index cannot be parsed.
    pub fn open(ref_dir: &Path, chrom: &str) -> Result<Self, AnnotationError> {
        let (fasta_path, fai_path) = locate(ref_dir, chrom)?;

        let unreadable = |path: &Path, source: io::Error| AnnotationError::ReferenceUnreadable {
            chrom: chrom.to_string(),
            path: path.to_path_buf(),
            source,
        };

        let index = File::open(&fai_path)
            .map(BufReader::new)
            .and_then(|reader| fasta::fai::io::Reader::new(reader).read_index())
            .map_err(|e| unreadable(&fai_path, e))?;

        let (contig, length) = index
            .as_ref()
            .first()
            .map(|record| {
                (
                    String::from_utf8_lossy(record.name()).to_string(),
                    record.length(),
                )
            })
            .ok_or_else(|| AnnotationError::ReferenceNotFound {
                chrom: chrom.to_string(),
                reason: format!("no contigs listed in {}", fai_path.display()),
            })?;

        let inner = File::open(&fasta_path)
            .map(BufReader::new)
            .map_err(|e| unreadable(&fasta_path, e))?;
        let reader = fasta::io::IndexedReader::new(inner, index);

        Ok(Self {
            path: fasta_path,
            contig,
            length,
            reader,
        })
    }

    /// Path of the FASTA file in use
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the contig bases are read from
    #[must_use]
    pub fn contig(&self) -> &str {
        &self.contig
    }

    /// Contig length from the index
    #[must_use]
    pub fn length(&self) -> u64 {
        self.length
    }

    fn out_of_range(&self, position: u64) -> FetchError {
        FetchError::OutOfRange {
            contig: self.contig.clone(),
            position,
            length: self.length,
        }
    }
}

impl BaseFetch for FastaReference {
    fn fetch(&mut self, position: u64) -> Result<u8, FetchError> {
        if position > self.length {
            return Err(self.out_of_range(position));
        }
        // Position is 1-based; noodles converts to the 0-based byte offset internally
        let start = usize::try_from(position)
            .ok()
            .and_then(Position::new)
            .ok_or_else(|| self.out_of_range(position))?;

        let region = Region::new(self.contig.as_str(), start..=start);
        let record = self.reader.query(&region).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidInput => FetchError::Query {
                contig: self.contig.clone(),
                position,
                message: e.to_string(),
            },
            _ => FetchError::Io(e),
        })?;

        // The index vouches for `position`; no bytes there means the file is shorter than indexed
        record
            .sequence()
            .as_ref()
            .first()
            .map(u8::to_ascii_uppercase)
            .ok_or_else(|| {
                FetchError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "{} ends before position {position} of {} (indexed length {})",
                        self.path.display(),
                        self.contig,
                        self.length
                    ),
                ))
            })
    }
}
