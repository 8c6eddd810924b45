extern crate clap;
use clap::*;

mod cmd_gffpep;

fn main() -> anyhow::Result<()> {
    let app = Command::new("gffpep")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`gffpep` - protein sequences of annotated genes from GFF and FASTA")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_gffpep::extract::make_subcommand());

    // Check which subcomamnd the user ran...
    match app.get_matches().subcommand() {
        Some(("extract", sub_matches)) => cmd_gffpep::extract::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
