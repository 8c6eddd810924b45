use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn command_invalid() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("gffpep")?;
    cmd.arg("foobar");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("recognized"));

    Ok(())
}

#[test]
fn extract_fixture_proteins() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("gffpep")?;
    let output = cmd
        .arg("extract")
        .arg("tests/extract/genes.gff")
        .arg("tests/extract/genome.fa")
        .output()?;
    let stdout = String::from_utf8(output.stdout)?;

    // g2 is on the reverse strand: revcomp(CTATTTCAT) = ATGAAATAG
    assert_eq!(stdout, ">g1\nMK*\n>g2\nMK*\n");

    Ok(())
}

#[test]
fn extract_idempotent() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let out1 = temp.path().join("run1.fa");
    let out2 = temp.path().join("run2.fa");

    for out in [&out1, &out2] {
        let mut cmd = Command::cargo_bin("gffpep")?;
        cmd.arg("extract")
            .arg("tests/extract/genes.gff")
            .arg("tests/extract/genome.fa")
            .arg("-o")
            .arg(out);
        cmd.assert().success();
    }

    assert_eq!(fs::read(&out1)?, fs::read(&out2)?);

    Ok(())
}

#[test]
fn extract_unsorted_annotation() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let gff = temp.path().join("unsorted.gff");
    let fa = temp.path().join("genome.fa");

    // segment before transcript before gene, plus an orphan segment
    fs::write(
        &gff,
        "ctg1\t.\tCDS\t1\t9\t.\t+\t0\tID=c1;Parent=t1\n\
         ctg1\t.\tmRNA\t1\t9\t.\t+\t.\tID=t1;Parent=g1\n\
         ctg1\t.\tgene\t1\t9\t.\t+\t.\tID=g1\n\
         ctg1\t.\tCDS\t1\t9\t.\t+\t0\tID=cx;Parent=missing\n",
    )?;
    fs::write(&fa, ">ctg1\nATGAAATAG\n")?;

    let mut cmd = Command::cargo_bin("gffpep")?;
    let output = cmd.arg("extract").arg(&gff).arg(&fa).output()?;

    assert_eq!(String::from_utf8(output.stdout)?, ">g1\nMK*\n");

    Ok(())
}

#[test]
fn extract_phase_policies() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let gff = temp.path().join("phased.gff");
    let fa = temp.path().join("genome.fa");

    // phase 2 skips the leading CC; the raw frame is junk
    fs::write(
        &gff,
        "ctg1\t.\tgene\t1\t8\t.\t+\t.\tID=g1\n\
         ctg1\t.\tmRNA\t1\t8\t.\t+\t.\tID=t1;Parent=g1\n\
         ctg1\t.\tCDS\t1\t8\t.\t+\t2\tID=c1;Parent=t1\n",
    )?;
    fs::write(&fa, ">ctg1\nCCAAATAG\n")?;

    let mut cmd = Command::cargo_bin("gffpep")?;
    let output = cmd
        .arg("extract")
        .arg(&gff)
        .arg(&fa)
        .arg("--phase")
        .arg("on")
        .output()?;
    assert_eq!(String::from_utf8(output.stdout)?, ">g1\nK*\n");

    let mut cmd = Command::cargo_bin("gffpep")?;
    let output = cmd
        .arg("extract")
        .arg(&gff)
        .arg(&fa)
        .arg("--phase")
        .arg("off")
        .output()?;
    // CCAAATAG padded with one N
    assert_eq!(String::from_utf8(output.stdout)?, ">g1\nPNX\n");

    Ok(())
}

#[test]
fn extract_auto_prefers_cleaner_variant() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let gff = temp.path().join("phased.gff");
    let fa = temp.path().join("genome.fa");

    fs::write(
        &gff,
        "ctg1\t.\tgene\t1\t8\t.\t+\t.\tID=g1\n\
         ctg1\t.\tmRNA\t1\t8\t.\t+\t.\tID=t1;Parent=g1\n\
         ctg1\t.\tCDS\t1\t8\t.\t+\t2\tID=c1;Parent=t1\n",
    )?;
    fs::write(&fa, ">ctg1\nCCAAACCC\n")?;

    // phased: AAACCC -> KP, clean; unphased: CCAAACCCN -> PNX, one padding
    let mut cmd = Command::cargo_bin("gffpep")?;
    let output = cmd.arg("extract").arg(&gff).arg(&fa).output()?;
    assert_eq!(String::from_utf8(output.stdout)?, ">g1\nKP\n");

    Ok(())
}

#[test]
fn extract_unknown_linkage_fails() -> anyhow::Result<()> {
    let mut cmd = Command::cargo_bin("gffpep")?;
    cmd.arg("extract")
        .arg("tests/extract/genes.gff")
        .arg("tests/extract/genome.fa")
        .arg("--link")
        .arg("nested");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("linkage"));

    Ok(())
}

#[test]
fn extract_warns_on_internal_stops() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let gff = temp.path().join("stops.gff");
    let fa = temp.path().join("genome.fa");

    fs::write(
        &gff,
        "ctg1\t.\tgene\t1\t9\t.\t+\t.\tID=g1\n\
         ctg1\t.\tmRNA\t1\t9\t.\t+\t.\tID=t1;Parent=g1\n\
         ctg1\t.\tCDS\t1\t9\t.\t+\t0\tID=c1;Parent=t1\n",
    )?;
    fs::write(&fa, ">ctg1\nATGTAAAAA\n")?;

    let mut cmd = Command::cargo_bin("gffpep")?;
    cmd.arg("extract")
        .arg(&gff)
        .arg(&fa)
        .arg("--phase")
        .arg("off");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("M*K"))
        .stderr(predicate::str::contains("internal stop"));

    Ok(())
}
