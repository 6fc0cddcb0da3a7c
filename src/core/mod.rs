//! Core data types and the pure parts of allele resolution.
//!
//! - [`VariantRecord`](types::VariantRecord): one input row with an unordered allele pair
//! - [`ResolvedRecord`](types::ResolvedRecord): one output row with REF/ALT assigned
//! - [`allele`]: reverse complement and the REF/ALT resolver
//! - [`chrom`]: natural chromosome ordering and partition keys
//! - [`reference`]: the seam through which workers open reference sequences
//!
//! ## Chromosome naming
//!
//! Input keys are used verbatim for partitioning and output. Only reference file
//! lookup tolerates the two common conventions:
//!
//! | Key | Files tried |
//! |-----|-------------|
//! | `21`    | `21.fa`, `chr21.fa` |
//! | `chr21` | `chr21.fa` |

pub mod allele;
pub mod chrom;
pub mod reference;
pub mod types;
