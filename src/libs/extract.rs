//! Coding-sequence extraction, translation and the phasing decision.
//!
//! The assembly is consumed in a single streaming pass; only the current
//! contig's sequence is held in memory. Every gene is translated twice,
//! from the raw and the phase-adjusted coordinate lists, and quality
//! signals for both variants are tallied so that one of them can be chosen
//! globally at the end.

use std::io::{BufRead, Write};

use anyhow::bail;
use bio::alphabets::dna::revcomp;

use crate::libs::annotation::{FeatureGraph, Gene, Span};
use crate::libs::codon::GeneticCode;

/// Quality signals accumulated over all genes, per phasing variant.
/// Plain sums, so per-contig tallies combine in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub stops_phased: usize,
    pub stops_unphased: usize,
    pub pads_phased: usize,
    pub pads_unphased: usize,
}

impl Tally {
    pub fn phased_total(&self) -> usize {
        self.stops_phased + self.pads_phased
    }

    pub fn unphased_total(&self) -> usize {
        self.stops_unphased + self.pads_unphased
    }
}

/// Whether phase-adjusted coordinates are used for the final output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhasePolicy {
    Auto,
    On,
    Off,
}

impl PhasePolicy {
    pub fn from_str(value: &str) -> anyhow::Result<Self> {
        match value {
            "auto" => Ok(Self::Auto),
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            _ => bail!("unrecognized phase policy `{}`; expected `auto`, `on` or `off`", value),
        }
    }
}

/// Concatenate the intervals of `spans` from `seq`, reverse-complementing
/// each piece for reverse-strand genes. Intervals are clamped to the contig.
fn assemble(seq: &[u8], spans: &[Span], is_reverse: bool) -> Vec<u8> {
    let mut out = Vec::new();
    for span in spans {
        let end = span.end.min(seq.len());
        if span.start >= end {
            continue;
        }
        let piece = &seq[span.start..end];
        if is_reverse {
            out.extend(revcomp(piece));
        } else {
            out.extend_from_slice(piece);
        }
    }
    out
}

fn pad_to_codon(seq: &mut Vec<u8>) -> bool {
    let rem = seq.len() % 3;
    if rem == 0 {
        return false;
    }
    seq.resize(seq.len() + (3 - rem), b'N');
    true
}

fn translate_gene(gene: &mut Gene, seq: &[u8], tally: &mut Tally) {
    let mut unphased = assemble(seq, &gene.coordinates, gene.is_reverse);
    let mut phased = assemble(seq, &gene.phased_coordinates, gene.is_reverse);

    if pad_to_codon(&mut phased) {
        tally.pads_phased += 1;
    }
    if pad_to_codon(&mut unphased) {
        tally.pads_unphased += 1;
    }

    let code = GeneticCode::from_id(&gene.transl_table);
    gene.protein_phased = code.translate(&phased);
    gene.protein_unphased = code.translate(&unphased);

    // The two variants are scored asymmetrically on purpose: the phased one
    // counts a stop at the terminal residue, the unphased one counts stops
    // anywhere before it. Downstream counts depend on this.
    if gene.protein_phased.ends_with('*') {
        tally.stops_phased += 1;
    }
    let unphased = &gene.protein_unphased;
    if unphased.len() > 1 && unphased[..unphased.len() - 1].contains('*') {
        tally.stops_unphased += 1;
    }
}

/// Derive both protein variants for every gene on `contig`, adding quality
/// signals to `tally`.
pub fn set_contig_proteins(graph: &mut FeatureGraph, contig: &str, seq: &[u8], tally: &mut Tally) {
    let Some(gene_ids) = graph.contigs.get(contig) else {
        return;
    };
    for gene_id in gene_ids.clone() {
        let Some(gene) = graph.genes.get_mut(&gene_id) else {
            continue;
        };
        if !gene.is_coding() {
            continue;
        }
        translate_gene(gene, seq, tally);
    }
}

/// Stream the assembly and translate the genes of each contig as its
/// sequence comes by. Geneless contigs are skipped outright.
pub fn extract_proteins<R: BufRead>(graph: &mut FeatureGraph, reader: R) -> anyhow::Result<Tally> {
    let mut tally = Tally::default();
    let mut fa_in = noodles_fasta::io::Reader::new(reader);

    for result in fa_in.records() {
        let record = result?;
        let name = String::from_utf8(record.name().into())?;
        if !graph.contigs.contains_key(&name) {
            continue;
        }
        let seq = record.sequence();
        set_contig_proteins(graph, &name, seq.get(..).unwrap(), &mut tally);
    }

    Ok(tally)
}

/// Decide once, globally, which variant to emit.
pub fn decide_phasing(policy: PhasePolicy, tally: &Tally) -> bool {
    match policy {
        PhasePolicy::On => true,
        PhasePolicy::Off => false,
        PhasePolicy::Auto => {
            let phased = tally.phased_total();
            let unphased = tally.unphased_total();
            if phased != unphased {
                return phased < unphased;
            }
            // internal stops weigh stronger than padding
            if tally.stops_phased != tally.stops_unphased {
                return tally.stops_phased < tally.stops_unphased;
            }
            true
        }
    }
}

/// Emit the chosen protein per gene in contig-then-discovery order.
/// Genes that never produced a protein are left out.
pub fn write_proteins<W: Write>(
    graph: &FeatureGraph,
    writer: &mut W,
    use_phased: bool,
) -> anyhow::Result<()> {
    for gene_ids in graph.contigs.values() {
        for gene_id in gene_ids {
            let Some(gene) = graph.genes.get(gene_id) else {
                continue;
            };
            let protein = if use_phased {
                &gene.protein_phased
            } else {
                &gene.protein_unphased
            };
            if protein.is_empty() {
                continue;
            }
            writer.write_fmt(format_args!(">{}\n{}\n", gene_id, protein))?;
        }
    }
    Ok(())
}

/// One warning summary at the end of the run; nonzero counts point at
/// annotation/assembly mismatches but never abort.
pub fn report_quality(use_phased: bool, tally: &Tally) {
    let (stops, pads) = if use_phased {
        (tally.stops_phased, tally.pads_phased)
    } else {
        (tally.stops_unphased, tally.pads_unphased)
    };

    if stops != 0 {
        eprintln!("Warning: {} protein(s) with internal stop codon(s)", stops);
    }
    if pads != 0 {
        eprintln!(
            "Warning: {} protein(s) from partial codons; trailing Ns were added",
            pads
        );
    }
    if stops != 0 || pads != 0 {
        eprintln!("Warning: the annotation may not match the assembly");
    }
}
