use serde::{Deserialize, Serialize};

use crate::core::allele::ResolvedAlleles;

/// One input row: an unordered allele pair at a 1-based genomic position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    /// Chromosome key, exactly as written in the input
    pub chrom: String,

    /// 1-based position
    pub pos: u64,

    /// Variant identifier (e.g. an rsID)
    pub id: String,

    pub allele1: String,
    pub allele2: String,
}

impl VariantRecord {
    pub fn new(
        chrom: impl Into<String>,
        pos: u64,
        id: impl Into<String>,
        allele1: impl Into<String>,
        allele2: impl Into<String>,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            pos,
            id: id.into(),
            allele1: allele1.into(),
            allele2: allele2.into(),
        }
    }
}

/// One output row with REF/ALT assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRecord {
    pub chrom: String,
    pub pos: u64,
    pub id: String,

    /// Equals the reference base at (chrom, pos)
    #[serde(rename = "ref")]
    pub ref_allele: String,

    #[serde(rename = "alt")]
    pub alt_allele: String,
}

impl ResolvedRecord {
    #[must_use]
    pub fn from_variant(record: &VariantRecord, alleles: ResolvedAlleles) -> Self {
        Self {
            chrom: record.chrom.clone(),
            pos: record.pos,
            id: record.id.clone(),
            ref_allele: alleles.ref_allele,
            alt_allele: alleles.alt_allele,
        }
    }
}
