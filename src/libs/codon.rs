//! NCBI genetic code tables and codon translation.
//!
//! Covers tables 1 (standard), 2, 3, 4, 5 and 11. Codons containing
//! ambiguity codes translate to `X`; stop is `*`.

/// A=0, C=1, G=2, T/U=3
fn base_index(base: u8) -> Option<usize> {
    match base.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' | b'U' => Some(3),
        _ => None,
    }
}

fn codon_index(codon: &[u8]) -> Option<usize> {
    if codon.len() != 3 {
        return None;
    }
    let b1 = base_index(codon[0])?;
    let b2 = base_index(codon[1])?;
    let b3 = base_index(codon[2])?;
    Some(b1 * 16 + b2 * 4 + b3)
}

// Codon order: AAA, AAC, AAG, AAT, ACA, ACC, ACG, ACT, AGA, AGC, AGG, AGT,
//              ATA, ATC, ATG, ATT, CAA, CAC, CAG, CAT, CCA, CCC, CCG, CCT,
//              CGA, CGC, CGG, CGT, CTA, CTC, CTG, CTT, GAA, GAC, GAG, GAT,
//              GCA, GCC, GCG, GCT, GGA, GGC, GGG, GGT, GTA, GTC, GTG, GTT,
//              TAA, TAC, TAG, TAT, TCA, TCC, TCG, TCT, TGA, TGC, TGG, TGT,
//              TTA, TTC, TTG, TTT

/// Standard code (table 1); also table 11, which differs only in starts.
const TABLE1_AA: [u8; 64] = [
    b'K', b'N', b'K', b'N', b'T', b'T', b'T', b'T', b'R', b'S', b'R', b'S',
    b'I', b'I', b'M', b'I', b'Q', b'H', b'Q', b'H', b'P', b'P', b'P', b'P',
    b'R', b'R', b'R', b'R', b'L', b'L', b'L', b'L', b'E', b'D', b'E', b'D',
    b'A', b'A', b'A', b'A', b'G', b'G', b'G', b'G', b'V', b'V', b'V', b'V',
    b'*', b'Y', b'*', b'Y', b'S', b'S', b'S', b'S', b'*', b'C', b'W', b'C',
    b'L', b'F', b'L', b'F',
];

/// Vertebrate mitochondrial (table 2): AGA/AGG stop, ATA Met, TGA Trp.
const TABLE2_AA: [u8; 64] = [
    b'K', b'N', b'K', b'N', b'T', b'T', b'T', b'T', b'*', b'S', b'*', b'S',
    b'M', b'I', b'M', b'I', b'Q', b'H', b'Q', b'H', b'P', b'P', b'P', b'P',
    b'R', b'R', b'R', b'R', b'L', b'L', b'L', b'L', b'E', b'D', b'E', b'D',
    b'A', b'A', b'A', b'A', b'G', b'G', b'G', b'G', b'V', b'V', b'V', b'V',
    b'*', b'Y', b'*', b'Y', b'S', b'S', b'S', b'S', b'W', b'C', b'W', b'C',
    b'L', b'F', b'L', b'F',
];

/// Yeast mitochondrial (table 3): CTA/CTG Thr, ATA Met, TGA Trp.
const TABLE3_AA: [u8; 64] = [
    b'K', b'N', b'K', b'N', b'T', b'T', b'T', b'T', b'R', b'S', b'R', b'S',
    b'M', b'I', b'M', b'I', b'Q', b'H', b'Q', b'H', b'P', b'P', b'P', b'P',
    b'R', b'R', b'R', b'R', b'T', b'L', b'T', b'L', b'E', b'D', b'E', b'D',
    b'A', b'A', b'A', b'A', b'G', b'G', b'G', b'G', b'V', b'V', b'V', b'V',
    b'*', b'Y', b'*', b'Y', b'S', b'S', b'S', b'S', b'W', b'C', b'W', b'C',
    b'L', b'F', b'L', b'F',
];

/// Mold/protozoan mitochondrial and mycoplasma (table 4): TGA Trp.
const TABLE4_AA: [u8; 64] = [
    b'K', b'N', b'K', b'N', b'T', b'T', b'T', b'T', b'R', b'S', b'R', b'S',
    b'I', b'I', b'M', b'I', b'Q', b'H', b'Q', b'H', b'P', b'P', b'P', b'P',
    b'R', b'R', b'R', b'R', b'L', b'L', b'L', b'L', b'E', b'D', b'E', b'D',
    b'A', b'A', b'A', b'A', b'G', b'G', b'G', b'G', b'V', b'V', b'V', b'V',
    b'*', b'Y', b'*', b'Y', b'S', b'S', b'S', b'S', b'W', b'C', b'W', b'C',
    b'L', b'F', b'L', b'F',
];

/// Invertebrate mitochondrial (table 5): AGA/AGG Ser, ATA Met, TGA Trp.
const TABLE5_AA: [u8; 64] = [
    b'K', b'N', b'K', b'N', b'T', b'T', b'T', b'T', b'S', b'S', b'S', b'S',
    b'M', b'I', b'M', b'I', b'Q', b'H', b'Q', b'H', b'P', b'P', b'P', b'P',
    b'R', b'R', b'R', b'R', b'L', b'L', b'L', b'L', b'E', b'D', b'E', b'D',
    b'A', b'A', b'A', b'A', b'G', b'G', b'G', b'G', b'V', b'V', b'V', b'V',
    b'*', b'Y', b'*', b'Y', b'S', b'S', b'S', b'S', b'W', b'C', b'W', b'C',
    b'L', b'F', b'L', b'F',
];

/// A codon -> amino acid mapping identified by its NCBI table number.
#[derive(Debug, Clone, Copy)]
pub struct GeneticCode {
    aa: &'static [u8; 64],
}

impl GeneticCode {
    pub fn standard() -> Self {
        Self { aa: &TABLE1_AA }
    }

    /// Resolve a numeric table identifier; unknown identifiers fall back
    /// to the standard code.
    ///
    /// ```
    /// use gffpep::libs::codon::GeneticCode;
    /// assert_eq!(GeneticCode::from_id("1").translate(b"ATGAAATAG"), "MK*");
    /// assert_eq!(GeneticCode::from_id("2").translate(b"TGA"), "W");
    /// assert_eq!(GeneticCode::from_id("5").translate(b"AGA"), "S");
    /// ```
    pub fn from_id(id: &str) -> Self {
        let aa = match id {
            "2" => &TABLE2_AA,
            "3" => &TABLE3_AA,
            "4" => &TABLE4_AA,
            "5" => &TABLE5_AA,
            _ => &TABLE1_AA,
        };
        Self { aa }
    }

    /// Translate a nucleotide sequence codon by codon, case-insensitive.
    /// Codons with ambiguity codes, and a trailing partial codon, yield `X`.
    ///
    /// ```
    /// use gffpep::libs::codon::GeneticCode;
    /// let code = GeneticCode::standard();
    /// assert_eq!(code.translate(b"atgAAAtag"), "MK*");
    /// assert_eq!(code.translate(b"ATGANN"), "MX");
    /// ```
    pub fn translate(&self, seq: &[u8]) -> String {
        seq.chunks(3)
            .map(|codon| match codon_index(codon) {
                Some(idx) => self.aa[idx] as char,
                None => 'X',
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_stops() {
        let code = GeneticCode::standard();
        assert_eq!(code.translate(b"TAATAGTGA"), "***");
    }

    #[test]
    fn table_variants() {
        assert_eq!(GeneticCode::from_id("2").translate(b"AGAATA"), "*M");
        assert_eq!(GeneticCode::from_id("3").translate(b"CTACTG"), "TT");
        assert_eq!(GeneticCode::from_id("4").translate(b"TGA"), "W");
        // table 11 shares the standard amino acid assignments
        assert_eq!(GeneticCode::from_id("11").translate(b"TGA"), "*");
    }

    #[test]
    fn unknown_table_falls_back_to_standard() {
        assert_eq!(GeneticCode::from_id("99").translate(b"ATG"), "M");
        assert_eq!(GeneticCode::from_id("").translate(b"TGA"), "*");
    }

    #[test]
    fn rna_and_case_insensitive() {
        let code = GeneticCode::standard();
        assert_eq!(code.translate(b"AUGaaaUAG"), "MK*");
    }
}
