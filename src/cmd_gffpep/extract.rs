use clap::*;

use gffpep::libs::annotation::{read_graph, Linkage, ParseOpts};
use gffpep::libs::extract::{
    decide_phasing, extract_proteins, report_quality, write_proteins, PhasePolicy,
};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("extract")
        .about("Extracts protein sequences of annotated genes")
        .after_help(
            r###"
This command reads a genome annotation (GFF) and the matching assembly (FASTA), picks the
transcript with the longest coding sequence for every protein-coding gene, assembles and
translates its coding sequence, and writes one protein per gene as FASTA.

Notes:
* Feature type labels are configurable; records of other types are ignored
* Annotations that are not sorted parent-before-child are handled
* Genes whose transcripts or coding segments never resolve are skipped silently
* Every gene is translated twice, with and without the phase attribute applied; unless
  --phase forces one of them, the variant with fewer internal stop codons and partial
  codons across the whole annotation is written
* Supports both plain text and gzipped (.gz) files

Examples:
1. Extract proteins with default GFF3 conventions:
   gffpep extract genome.gff genome.fa -o proteins.fa

2. An annotation that links CDS records via a gene_id attribute:
   gffpep extract --link inline --gene-attr gene_id genome.gff genome.fa

3. Keep only records from one annotation source and force phase use off:
   gffpep extract --source maker --phase off genome.gff genome.fa

"###,
        )
        .arg(
            Arg::new("gff")
                .required(true)
                .index(1)
                .help("Input annotation file (GFF)"),
        )
        .arg(
            Arg::new("fasta")
                .required(true)
                .index(2)
                .help("Input assembly file (FASTA)"),
        )
        .arg(
            Arg::new("gene_type")
                .long("gene-type")
                .num_args(1)
                .default_value("gene")
                .help("Type label of gene records"),
        )
        .arg(
            Arg::new("transcript_type")
                .long("transcript-type")
                .num_args(1)
                .default_value("mRNA")
                .help("Type label of transcript records"),
        )
        .arg(
            Arg::new("cds_type")
                .long("cds-type")
                .num_args(1)
                .default_value("CDS")
                .help("Type label of coding-segment records"),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .num_args(1)
                .default_value("all")
                .help("Only read records of this source column value. [all] reads everything"),
        )
        .arg(
            Arg::new("link")
                .long("link")
                .num_args(1)
                .default_value("parent")
                .help("How records name their parent: `parent` or `inline`"),
        )
        .arg(
            Arg::new("parent_attr")
                .long("parent-attr")
                .num_args(1)
                .default_value("Parent")
                .help("Attribute holding the parent identifier for --link parent"),
        )
        .arg(
            Arg::new("gene_attr")
                .long("gene-attr")
                .num_args(1)
                .default_value("gene_id")
                .help("Attribute holding the gene identifier for --link inline"),
        )
        .arg(
            Arg::new("phase")
                .long("phase")
                .num_args(1)
                .default_value("auto")
                .help("Apply the phase attribute: `auto`, `on` or `off`"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let opts = ParseOpts {
        gene_type: args.get_one::<String>("gene_type").unwrap().clone(),
        transcript_type: args.get_one::<String>("transcript_type").unwrap().clone(),
        cds_type: args.get_one::<String>("cds_type").unwrap().clone(),
        source: args.get_one::<String>("source").unwrap().clone(),
        linkage: Linkage::from_str(args.get_one::<String>("link").unwrap())?,
        parent_attr: args.get_one::<String>("parent_attr").unwrap().clone(),
        gene_attr: args.get_one::<String>("gene_attr").unwrap().clone(),
    };
    let policy = PhasePolicy::from_str(args.get_one::<String>("phase").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let gff = gffpep::reader(args.get_one::<String>("gff").unwrap());
    let mut graph = read_graph(gff, &opts)?;
    graph.select_transcripts();

    let fasta = gffpep::reader(args.get_one::<String>("fasta").unwrap());
    let tally = extract_proteins(&mut graph, fasta)?;

    let use_phased = decide_phasing(policy, &tally);

    let mut writer = gffpep::writer(args.get_one::<String>("outfile").unwrap());
    write_proteins(&graph, &mut writer, use_phased)?;

    report_quality(use_phased, &tally);

    Ok(())
}
