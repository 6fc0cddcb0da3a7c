//! REF/ALT resolution for an unordered allele pair.
//!
//! The input does not say which allele is on the reference, nor which strand the
//! alleles were reported on. Both alleles are compared against the reference base,
//! first as given and then reverse complemented, in a fixed priority order:
//!
//! 1. `allele1 == base`
//! 2. `allele2 == base`
//! 3. `revcomp(allele1) == base` (both alleles are flipped)
//! 4. `revcomp(allele2) == base` (both alleles are flipped)
//!
//! When both alleles equal the base, `allele1` becomes REF purely because it is
//! checked first.

/// Complement table indexed by ASCII byte; bytes outside `ACGTN` map to themselves.
static COMPLEMENT: [u8; 128] = build_complement_table();

const fn build_complement_table() -> [u8; 128] {
    let mut table = [0u8; 128];
    let mut i = 0;
    while i < 128 {
        #[allow(clippy::cast_possible_truncation)] // i < 128
        {
            table[i] = i as u8;
        }
        i += 1;
    }
    table[b'A' as usize] = b'T';
    table[b'T' as usize] = b'A';
    table[b'C' as usize] = b'G';
    table[b'G' as usize] = b'C';
    table[b'N' as usize] = b'N';
    table
}

/// Complement of a single base
#[inline]
#[must_use]
pub fn complement(base: char) -> char {
    if base.is_ascii() {
        char::from(COMPLEMENT[base as usize])
    } else {
        base
    }
}

/// Reverse complement of an allele, treated as an ordered base sequence.
///
/// # Examples
///
/// ```
/// use refalt_annotator::core::allele::reverse_complement;
///
/// assert_eq!(reverse_complement("T"), "A");
/// assert_eq!(reverse_complement("ACCG"), "CGGT");
/// assert_eq!(reverse_complement("A-N"), "N-T");
/// ```
#[must_use]
pub fn reverse_complement(allele: &str) -> String {
    allele.chars().rev().map(complement).collect()
}

/// Which orientation of the input alleles matched the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// A resolved allele pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAlleles {
    pub ref_allele: String,
    pub alt_allele: String,
    pub strand: Strand,
}

impl ResolvedAlleles {
    fn new(ref_allele: String, alt_allele: String, strand: Strand) -> Self {
        Self {
            ref_allele,
            alt_allele,
            strand,
        }
    }
}

fn is_base(allele: &str, base: u8) -> bool {
    allele.as_bytes() == [base]
}

/// Assign REF and ALT for `allele1`/`allele2` against a single reference base.
///
/// Alleles and base are compared uppercased. Returns `None` when neither allele,
/// nor its reverse complement, equals the base.
#[must_use]
pub fn resolve(allele1: &str, allele2: &str, reference_base: u8) -> Option<ResolvedAlleles> {
    let a1 = allele1.to_ascii_uppercase();
    let a2 = allele2.to_ascii_uppercase();
    let base = reference_base.to_ascii_uppercase();

    if is_base(&a1, base) {
        return Some(ResolvedAlleles::new(a1, a2, Strand::Forward));
    }
    if is_base(&a2, base) {
        return Some(ResolvedAlleles::new(a2, a1, Strand::Forward));
    }

    let rc1 = reverse_complement(&a1);
    let rc2 = reverse_complement(&a2);

    if is_base(&rc1, base) {
        return Some(ResolvedAlleles::new(rc1, rc2, Strand::Reverse));
    }
    if is_base(&rc2, base) {
        return Some(ResolvedAlleles::new(rc2, rc1, Strand::Reverse));
    }

    None
}
