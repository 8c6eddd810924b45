//! Gene models from a GFF annotation stream.
//!
//! Builds the gene -> transcript -> coding-segment hierarchy from 9-column
//! records, tolerating input that is not sorted parent-before-child, then
//! selects the transcript with the longest coding sequence per gene and
//! derives its extraction coordinates.

use std::collections::HashMap;
use std::io::BufRead;

use anyhow::bail;
use indexmap::IndexMap;
use itertools::Itertools;

/// How transcript and coding-segment records name their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// A declared parent attribute, `Parent=` by convention
    Parent,
    /// An inline gene-identifier attribute, e.g. `gene_id=`
    Inline,
}

impl Linkage {
    pub fn from_str(value: &str) -> anyhow::Result<Self> {
        match value {
            "parent" => Ok(Self::Parent),
            "inline" => Ok(Self::Inline),
            _ => bail!(
                "unrecognized linkage rule `{}`; expected `parent` or `inline`",
                value
            ),
        }
    }
}

/// Parsing options. The caller validates these; `source` set to `all`
/// disables the source-column filter.
#[derive(Debug, Clone)]
pub struct ParseOpts {
    pub gene_type: String,
    pub transcript_type: String,
    pub cds_type: String,
    pub source: String,
    pub linkage: Linkage,
    pub parent_attr: String,
    pub gene_attr: String,
}

impl Default for ParseOpts {
    fn default() -> Self {
        Self {
            gene_type: "gene".to_string(),
            transcript_type: "mRNA".to_string(),
            cds_type: "CDS".to_string(),
            source: "all".to_string(),
            linkage: Linkage::Parent,
            parent_attr: "Parent".to_string(),
            gene_attr: "gene_id".to_string(),
        }
    }
}

/// One tab-delimited annotation line.
///
/// Attribute pairs that do not split into exactly two parts on `=` are
/// dropped per-attribute, not per-record.
#[derive(Debug, Clone)]
pub struct GffRecord {
    pub contig: String,
    pub source: String,
    pub ty: String,
    pub start: usize,
    pub end: usize,
    pub strand: char,
    pub phase: Option<u8>,
    pub attrs: HashMap<String, String>,
}

impl GffRecord {
    /// ```
    /// use gffpep::libs::annotation::GffRecord;
    /// let rec = GffRecord::parse("ctg1\tmaker\tCDS\t21\t80\t.\t-\t2\tID=c1;Parent=t1;broken").unwrap();
    /// assert_eq!(rec.start, 21);
    /// assert_eq!(rec.phase, Some(2));
    /// assert_eq!(rec.attr("Parent"), Some("t1"));
    /// assert_eq!(rec.attr("broken"), None);
    /// ```
    pub fn parse(line: &str) -> Option<GffRecord> {
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() < 9 {
            return None;
        }
        let start: usize = fields[3].parse().ok()?;
        let end: usize = fields[4].parse().ok()?;
        if start == 0 || end < start {
            return None;
        }

        let mut attrs = HashMap::new();
        for pair in fields[8].split(';') {
            let kv: Vec<&str> = pair.split('=').collect();
            if kv.len() == 2 {
                attrs.insert(kv[0].to_string(), kv[1].to_string());
            }
        }

        Some(GffRecord {
            contig: fields[0].to_string(),
            source: fields[1].to_string(),
            ty: fields[2].to_string(),
            start,
            end,
            strand: fields[6].chars().next().unwrap_or('.'),
            phase: fields[7].parse().ok(),
            attrs,
        })
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(|value| value.as_str())
    }
}

/// A coding segment of a transcript.
#[derive(Debug, Clone)]
pub struct Feature {
    pub contig: String,
    pub id: Option<String>,
    pub start: usize,
    pub end: usize,
    pub strand: char,
    pub phase: Option<u8>,
    pub biotype: Option<String>,
    pub transl_table: Option<String>,
}

impl Feature {
    fn from_record(rec: &GffRecord) -> Self {
        Self {
            contig: rec.contig.clone(),
            id: rec.attr("ID").map(String::from),
            start: rec.start,
            end: rec.end,
            strand: rec.strand,
            phase: rec.phase,
            biotype: rec
                .attr("biotype")
                .or_else(|| rec.attr("gene_biotype"))
                .map(String::from),
            transl_table: rec.attr("transl_table").map(String::from),
        }
    }

    /// Length in nucleotides, both endpoints inclusive
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// A zero-based half-open extraction interval plus the annotated phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub phase: u8,
}

/// A protein-coding gene and everything derived for it.
#[derive(Debug, Clone, Default)]
pub struct Gene {
    pub id: String,
    pub contig: String,
    /// transcript id -> total coding length, in discovery order
    pub transcripts: IndexMap<String, usize>,
    /// transcript id -> coding segments, in discovery order
    pub segments: IndexMap<String, Vec<Feature>>,
    /// extraction intervals of the selected transcript, 5' to 3'
    pub coordinates: Vec<Span>,
    /// same intervals with each segment trimmed by its phase offset
    pub phased_coordinates: Vec<Span>,
    pub is_reverse: bool,
    pub transl_table: String,
    pub protein_phased: String,
    pub protein_unphased: String,
}

impl Gene {
    /// Genes that never received a transcript with coding segments stay
    /// empty and are excluded from extraction and output.
    pub fn is_coding(&self) -> bool {
        !self.coordinates.is_empty()
    }

    fn select(&mut self) {
        if self.transcripts.is_empty() || self.segments.is_empty() {
            return;
        }

        for (id, segs) in &self.segments {
            let length = segs.iter().map(Feature::len).sum();
            self.transcripts.insert(id.clone(), length);
        }

        // longest coding sequence wins; on ties, the transcript seen last
        let Some(idx) = self.transcripts.values().position_max() else {
            return;
        };
        let Some((selected, _)) = self.transcripts.get_index(idx) else {
            return;
        };
        let selected = selected.clone();
        let Some(segs) = self.segments.get(&selected) else {
            return;
        };
        let Some(last) = segs.last() else {
            return;
        };

        // segments of one transcript share a strand; the translation table,
        // if annotated at all, sits on the coding segments
        self.is_reverse = last.strand != '+';
        self.transl_table = last
            .transl_table
            .clone()
            .unwrap_or_else(|| String::from("1"));

        self.coordinates = segs
            .iter()
            .map(|seg| Span {
                start: seg.start - 1,
                end: seg.end,
                phase: seg.phase.unwrap_or(0),
            })
            .collect();

        // extraction walks 5' -> 3', so reverse-strand genes list their
        // segments by descending start
        if self.is_reverse {
            self.coordinates.sort_by(|a, b| b.start.cmp(&a.start));
        } else {
            self.coordinates.sort_by_key(|span| span.start);
        }

        // phase marks how many bases of a segment precede the first full
        // codon; trimming happens at the strand-relative 5' end
        self.phased_coordinates = self
            .coordinates
            .iter()
            .map(|span| {
                if self.is_reverse {
                    Span {
                        start: span.start,
                        end: span.end.saturating_sub(span.phase as usize),
                        phase: span.phase,
                    }
                } else {
                    Span {
                        start: span.start + span.phase as usize,
                        end: span.end,
                        phase: span.phase,
                    }
                }
            })
            .collect();
    }
}

/// Arena of genes keyed by identifier, plus the contig index that drives
/// the single streaming pass over the assembly.
#[derive(Debug, Default)]
pub struct FeatureGraph {
    /// gene id -> gene, in discovery order
    pub genes: IndexMap<String, Gene>,
    /// transcript id -> owning gene id
    transcripts: HashMap<String, String>,
    /// contig -> ids of genes located on it, in discovery order
    pub contigs: IndexMap<String, Vec<String>>,
}

impl FeatureGraph {
    fn knows(&self, id: &str) -> bool {
        self.genes.contains_key(id) || self.transcripts.contains_key(id)
    }

    fn add_gene(&mut self, rec: &GffRecord) {
        let feature = Feature::from_record(rec);
        // without a biotype tag the gene is assumed protein-coding
        if let Some(biotype) = &feature.biotype {
            if biotype != "protein_coding" {
                return;
            }
        }
        let Some(id) = feature.id else {
            return;
        };
        self.contigs
            .entry(rec.contig.clone())
            .or_default()
            .push(id.clone());
        self.genes.insert(
            id.clone(),
            Gene {
                id,
                contig: rec.contig.clone(),
                transl_table: String::from("1"),
                ..Default::default()
            },
        );
    }

    /// Attach a transcript or coding-segment record below `parent_id`.
    /// Returns false when the parent is not (yet) in the graph.
    fn attach(&mut self, rec: &GffRecord, parent_id: &str, opts: &ParseOpts) -> bool {
        if rec.ty == opts.transcript_type {
            let Some(gene) = self.genes.get_mut(parent_id) else {
                return false;
            };
            if let Some(id) = rec.attr("ID") {
                gene.transcripts.insert(id.to_string(), 0);
                gene.segments.insert(id.to_string(), Vec::new());
                self.transcripts
                    .insert(id.to_string(), parent_id.to_string());
            }
            return true;
        }

        // coding segment; the parent is either a transcript or, when the
        // annotation declares no transcripts, the gene itself playing the
        // transcript role
        let (gene_id, transcript_id) = if let Some(gene_id) = self.transcripts.get(parent_id) {
            (gene_id.clone(), parent_id.to_string())
        } else if self.genes.contains_key(parent_id) {
            (parent_id.to_string(), parent_id.to_string())
        } else {
            return false;
        };

        let Some(gene) = self.genes.get_mut(&gene_id) else {
            return false;
        };
        if !gene.transcripts.contains_key(&transcript_id) {
            gene.transcripts.insert(transcript_id.clone(), 0);
        }
        gene.segments
            .entry(transcript_id)
            .or_default()
            .push(Feature::from_record(rec));
        true
    }

    /// For every gene, pick the transcript with the longest total coding
    /// length and populate the raw and phase-adjusted coordinate lists.
    pub fn select_transcripts(&mut self) {
        for gene in self.genes.values_mut() {
            gene.select();
        }
    }
}

fn parent_of<'a>(rec: &'a GffRecord, opts: &ParseOpts) -> Option<&'a str> {
    let key = match opts.linkage {
        Linkage::Parent => &opts.parent_attr,
        Linkage::Inline => &opts.gene_attr,
    };
    rec.attr(key)
}

/// Stream annotation records into a [`FeatureGraph`].
///
/// Gene records register immediately; transcript and coding-segment records
/// whose parent has not been seen yet are deferred and redrained after the
/// stream ends. Records whose parent never appears are dropped silently.
pub fn read_graph<R: BufRead>(reader: R, opts: &ParseOpts) -> anyhow::Result<FeatureGraph> {
    let mut graph = FeatureGraph::default();
    let mut pending: IndexMap<String, Vec<GffRecord>> = IndexMap::new();

    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') {
            // an embedded sequence block ends the annotation section
            if line.contains("#FASTA") {
                break;
            }
            continue;
        }
        let Some(rec) = GffRecord::parse(&line) else {
            continue;
        };
        if opts.source != "all" && rec.source != opts.source {
            continue;
        }

        if rec.ty == opts.gene_type {
            graph.add_gene(&rec);
        } else if rec.ty == opts.transcript_type || rec.ty == opts.cds_type {
            let Some(parent_id) = parent_of(&rec, opts) else {
                continue;
            };
            let parent_id = parent_id.to_string();
            if !graph.attach(&rec, &parent_id, opts) {
                pending.entry(parent_id).or_default().push(rec);
            }
        }
    }

    // The hierarchy is two levels deep, so two redrains settle any ordering:
    // transcripts resolve against their genes in the first, coding segments
    // against those transcripts in the second.
    for _ in 0..2 {
        if pending.is_empty() {
            break;
        }
        let ready: Vec<String> = pending
            .keys()
            .filter(|id| graph.knows(id))
            .cloned()
            .collect();
        for parent_id in ready {
            if let Some(recs) = pending.swap_remove(&parent_id) {
                for rec in recs {
                    graph.attach(&rec, &parent_id, opts);
                }
            }
        }
    }

    Ok(graph)
}
