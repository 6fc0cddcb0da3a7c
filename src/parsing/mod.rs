//! File formats read and written by the annotator.
//!
//! - **Variant tables** ([`tsv`]): tab-separated `#CHROM POS ID allele1 allele2` input and
//!   `#CHROM POS ID REF ALT` output, optionally gzip-compressed
//! - **Indexed FASTA** ([`fasta`]): per-chromosome sequences with `.fai` sidecars, read
//!   one base at a time
//!
//! ## Example
//!
//! ```rust,no_run
//! use refalt_annotator::parsing::fasta::{BaseFetch, FastaReference};
//! use refalt_annotator::parsing::tsv::read_variant_file;
//! use std::path::Path;
//!
//! let variants = read_variant_file(Path::new("variants.tsv"), true).unwrap();
//! let mut reference = FastaReference::open(Path::new("refs"), "chr1").unwrap();
//! let base = reference.fetch(variants[0].pos).unwrap();
//! ```

pub mod fasta;
pub mod tsv;
