use assert_cmd::Command;
use predicates::prelude::*;

fn run_prefilter(extra: &[&str]) -> anyhow::Result<String> {
    let mut cmd = Command::cargo_bin("ghcube")?;
    let output = cmd
        .arg("prefilter")
        .arg("tests/ghcube/sizes.tsv")
        .arg("tests/ghcube/occ.tsv")
        .arg("--occ-max")
        .arg("1")
        .args(extra)
        .output()?;
    assert!(output.status.success());
    Ok(String::from_utf8(output.stdout)?)
}

#[test]
fn command_prefilter() -> anyhow::Result<()> {
    let stdout = run_prefilter(&["--tile-size", "100", "--pre-threshold", "2"])?;
    assert_eq!(stdout, "0\t2\tspecies1:s1_1:0:+,species2:s2_1:0:+\n");

    // every cube holds the single reference sequence
    let stdout = run_prefilter(&["--tile-size", "100", "--pre-threshold", "1"])?;
    assert_eq!(stdout.lines().count(), 14);
    assert!(stdout.lines().all(|l| l.starts_with("0\t")));

    Ok(())
}

#[test]
fn command_prefilter_neighbours() -> anyhow::Result<()> {
    let stdout = run_prefilter(&[
        "--tile-size",
        "100",
        "--pre-threshold",
        "2",
        "--neighbours",
    ])?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "0\t0\tspecies1:s1_1:0:+,species2:s2_1:-1:+",
            "0\t2\tspecies1:s1_1:0:+,species2:s2_1:0:+",
            "0\t0\tspecies1:s1_1:0:+,species2:s2_1:1:+",
        ]
    );

    Ok(())
}

#[test]
fn command_prefilter_hasse() -> anyhow::Result<()> {
    let stdout = run_prefilter(&["--tile-size", "100", "--pre-threshold", "1", "--hasse"])?;
    assert_eq!(stdout.lines().count(), 15);
    assert!(stdout.contains("0\t0\tspecies1:s1_1:0:+,species4:s4_3:0:+\n"));

    Ok(())
}

#[test]
fn command_prefilter_no_sampling_options() -> anyhow::Result<()> {
    for opt in ["--link-limit", "--seed"] {
        let mut cmd = Command::cargo_bin("ghcube")?;
        cmd.arg("prefilter")
            .arg("tests/ghcube/sizes.tsv")
            .arg("tests/ghcube/occ.tsv")
            .arg(opt)
            .arg("1")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unexpected argument"));
    }

    Ok(())
}
