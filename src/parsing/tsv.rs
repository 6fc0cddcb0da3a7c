//! Reading variant tables and writing resolved tables.
//!
//! Input: `#CHROM  POS  ID  allele1  allele2` (tab-separated, header required).
//! Output: `#CHROM  POS  ID  REF  ALT`.
//!
//! Paths ending in `.gz` are read and written through gzip.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

use crate::core::types::{ResolvedRecord, VariantRecord};
use crate::error::AnnotationError;

/// Expected input header columns, in order
pub const INPUT_COLUMNS: [&str; 5] = ["#CHROM", "POS", "ID", "allele1", "allele2"];

/// Output header columns, in order
pub const OUTPUT_COLUMNS: [&str; 5] = ["#CHROM", "POS", "ID", "REF", "ALT"];

/// A header column that does not match the expected name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMismatch {
    /// 1-based column number
    pub column: usize,
    pub expected: String,
    pub found: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("Input file is empty, expected a header line")]
    Missing,

    #[error("Header has {found} columns, expected {expected}")]
    ColumnCount { found: usize, expected: usize },

    #[error("Header column mismatches:\n{}", format_mismatches(.0))]
    Mismatch(Vec<ColumnMismatch>),
}

fn format_mismatches(mismatches: &[ColumnMismatch]) -> String {
    mismatches
        .iter()
        .map(|m| {
            format!(
                "Column {}: expected '{}', got '{}'",
                m.column, m.expected, m.found
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".gz")
}

/// Open a possibly gzip-compressed text file for line reading
///
/// # Errors
///
/// Returns `std::io::Error` if the file cannot be opened.
pub fn open_reader(path: &Path) -> std::io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    line.trim().split('\t').collect()
}

/// Validate an input header line against [`INPUT_COLUMNS`].
///
/// # Errors
///
/// Returns `HeaderError::ColumnCount` if the number of columns differs, or
/// `HeaderError::Mismatch` listing every column whose name differs.
pub fn validate_header(line: &str) -> Result<(), HeaderError> {
    let actual = split_fields(line);
    if actual.len() != INPUT_COLUMNS.len() {
        return Err(HeaderError::ColumnCount {
            found: actual.len(),
            expected: INPUT_COLUMNS.len(),
        });
    }

    let mismatches: Vec<ColumnMismatch> = INPUT_COLUMNS
        .iter()
        .zip(actual.iter())
        .enumerate()
        .filter(|(_, (expected, found))| expected != found)
        .map(|(i, (expected, found))| ColumnMismatch {
            column: i + 1,
            expected: (*expected).to_string(),
            found: (*found).to_string(),
        })
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(HeaderError::Mismatch(mismatches))
    }
}

/// Read and validate only the header line of an input file
///
/// # Errors
///
/// Returns `AnnotationError::Io` if the file cannot be read, or
/// `AnnotationError::Header` if the header is missing or invalid.
pub fn validate_header_file(path: &Path) -> Result<(), AnnotationError> {
    let mut reader = open_reader(path)?;
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(HeaderError::Missing.into());
    }
    validate_header(&line)?;
    Ok(())
}

/// Column positions of the required fields, located by header name
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    chrom: usize,
    pos: usize,
    id: usize,
    allele1: usize,
    allele2: usize,
    width: usize,
}

impl ColumnLayout {
    fn from_header(line: &str) -> Result<Self, AnnotationError> {
        let fields = split_fields(line);
        let find = |name: &str| {
            fields
                .iter()
                .position(|f| *f == name)
                .ok_or_else(|| AnnotationError::Validation(format!("Input has no '{name}' column")))
        };

        let layout = Self {
            chrom: find(INPUT_COLUMNS[0])?,
            pos: find(INPUT_COLUMNS[1])?,
            id: find(INPUT_COLUMNS[2])?,
            allele1: find(INPUT_COLUMNS[3])?,
            allele2: find(INPUT_COLUMNS[4])?,
            width: 0,
        };
        let columns = [
            layout.chrom,
            layout.pos,
            layout.id,
            layout.allele1,
            layout.allele2,
        ];
        let width = 1 + columns.into_iter().max().unwrap_or(0);

        Ok(Self { width, ..layout })
    }

    fn parse(&self, line: &str, line_num: usize) -> Result<VariantRecord, AnnotationError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        if fields.len() < self.width {
            return Err(AnnotationError::Validation(format!(
                "Line {line_num} has {} fields, expected at least {}",
                fields.len(),
                self.width
            )));
        }

        let raw_pos = fields[self.pos].trim();
        let pos: u64 = raw_pos
            .parse()
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| {
                AnnotationError::Validation(format!(
                    "Invalid position on line {line_num}: '{raw_pos}'"
                ))
            })?;

        Ok(VariantRecord::new(
            fields[self.chrom].trim(),
            pos,
            fields[self.id].trim(),
            fields[self.allele1].trim(),
            fields[self.allele2].trim(),
        ))
    }
}

/// Read all variant records from a reader.
///
/// The first line is the header. When `check_header` is set it must match
/// [`INPUT_COLUMNS`] exactly; otherwise columns are located by name and extra
/// columns are ignored. Blank lines are skipped.
///
/// # Errors
///
/// Returns `AnnotationError::Header` for an invalid header,
/// `AnnotationError::Validation` for a missing column or a malformed row, or
/// `AnnotationError::Io` if reading fails.
pub fn read_variants<R: BufRead>(
    reader: R,
    check_header: bool,
) -> Result<Vec<VariantRecord>, AnnotationError> {
    let mut lines = reader.lines();

    let header = lines.next().ok_or(HeaderError::Missing)??;
    if check_header {
        validate_header(&header)?;
    }
    let layout = ColumnLayout::from_header(&header)?;

    let mut records = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        // Line numbers in errors are 1-based and count the header
        records.push(layout.parse(&line, i + 2)?);
    }

    Ok(records)
}

/// Read all variant records from a file (gzip if the path ends in `.gz`)
///
/// # Errors
///
/// See [`read_variants`].
pub fn read_variant_file(
    path: &Path,
    check_header: bool,
) -> Result<Vec<VariantRecord>, AnnotationError> {
    let reader = open_reader(path)?;
    read_variants(reader, check_header)
}

/// Write resolved records with the output header
///
/// # Errors
///
/// Returns `std::io::Error` if writing fails.
pub fn write_resolved<W: Write>(writer: &mut W, records: &[ResolvedRecord]) -> std::io::Result<()> {
    writeln!(writer, "{}", OUTPUT_COLUMNS.join("\t"))?;
    for record in records {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            record.chrom, record.pos, record.id, record.ref_allele, record.alt_allele
        )?;
    }
    writer.flush()
}

/// Write resolved records to a file (gzip if the path ends in `.gz`)
///
/// # Errors
///
/// Returns `AnnotationError::Io` if the file cannot be created or written.
pub fn write_resolved_file(path: &Path, records: &[ResolvedRecord]) -> Result<(), AnnotationError> {
    let file = File::create(path)?;
    if is_gzipped(path) {
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        write_resolved(&mut encoder, records)?;
        encoder.finish()?.flush()?;
    } else {
        write_resolved(&mut BufWriter::new(file), records)?;
    }
    Ok(())
}
