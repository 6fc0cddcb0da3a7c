//! # refalt-annotator
//!
//! Assign REF and ALT to variants given as an unordered allele pair.
//!
//! Genotyping arrays and many summary-statistics files report the two alleles of
//! a variant without saying which one is on the reference, and sometimes on the
//! opposite strand. `refalt-annotator` reads the reference base at each position
//! from per-chromosome indexed FASTA files and picks the allele that matches it,
//! reverse complementing both alleles when only the other strand matches.
//!
//! ## Features
//!
//! - **Strand-aware**: alleles reported on the minus strand are flipped
//! - **Parallel**: one chromosome per worker on a bounded thread pool
//! - **Deterministic output**: natural chromosome order, input order within a chromosome
//! - **Failure isolation**: a missing or broken reference only loses its own chromosome
//!
//! ## Example
//!
//! ```rust,no_run
//! use refalt_annotator::annotation::{annotate, AnnotationConfig};
//! use refalt_annotator::core::reference::ReferenceDir;
//! use refalt_annotator::parsing::tsv::{read_variant_file, write_resolved_file};
//! use std::path::Path;
//!
//! let variants = read_variant_file(Path::new("variants.tsv"), true).unwrap();
//! let refs = ReferenceDir::new("refs/");
//!
//! let result = annotate(variants, &refs, &AnnotationConfig::default()).unwrap();
//! write_resolved_file(Path::new("annotated.tsv"), &result.records).unwrap();
//!
//! println!("{} resolved, {} skipped", result.processed, result.skipped);
//! ```
//!
//! ## Modules
//!
//! - [`annotation`]: partition workers, the worker pool, and result aggregation
//! - [`core`]: record types, allele resolution, chromosome ordering
//! - [`parsing`]: variant tables and indexed FASTA access
//! - [`cli`]: command-line interface implementation
//! - [`error`]: the error taxonomy of a run

pub mod annotation;
pub mod cli;
pub mod core;
pub mod error;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::annotation::{annotate, AnnotationConfig, RunSummary};
pub use crate::core::allele::{resolve, reverse_complement};
pub use crate::core::types::{ResolvedRecord, VariantRecord};
pub use crate::error::AnnotationError;
