use assert_cmd::Command;

fn run_cubes(extra: &[&str]) -> anyhow::Result<String> {
    let mut cmd = Command::cargo_bin("ghcube")?;
    let output = cmd
        .arg("cubes")
        .arg("tests/ghcube/sizes.tsv")
        .arg("tests/ghcube/occ.tsv")
        .arg("--tile-size")
        .arg("100")
        .arg("--occ-max")
        .arg("1")
        .args(extra)
        .output()?;
    assert!(output.status.success());
    Ok(String::from_utf8(output.stdout)?)
}

#[test]
fn command_cubes() -> anyhow::Result<()> {
    let stdout = run_cubes(&["--threshold", "0"])?;

    assert_eq!(stdout.lines().count(), 14);
    // the cube with two links scores twice as high as any single-link 2D cube
    assert_eq!(
        stdout.lines().next().unwrap(),
        "3.200000e11\t2\tspecies1:s1_1:0:+,species2:s2_1:0:+"
    );
    assert!(stdout.contains("1.600000e11\t1\tspecies1:s1_1:0:+,species2:s2_2:0:+"));
    assert!(stdout.lines().all(|l| l.split('\t').count() == 3));

    let above = run_cubes(&["--threshold", "2e11"])?;
    assert_eq!(above.lines().count(), 1);

    Ok(())
}

#[test]
fn command_cubes_hasse() -> anyhow::Result<()> {
    let stdout = run_cubes(&["--hasse"])?;

    assert_eq!(stdout.lines().count(), 14);
    assert!(stdout.lines().all(|l| l.split('\t').count() == 4));
    assert!(stdout.contains(
        "species1:s1_1:0:+,species2:s2_1:0:+,species3:s3_2:0:+,species4:s4_1:0:+,species5:s5_1:0:+\t\
         species1:s1_1:0:+,species2:s2_1:0:+,species3:s3_2:0:+,species5:s5_1:0:+;\
         species1:s1_1:0:+,species2:s2_1:0:+,species4:s4_1:0:+,species5:s5_1:0:+\n"
    ));

    Ok(())
}

#[test]
fn command_cubes_parallel() -> anyhow::Result<()> {
    let single = run_cubes(&["--hasse", "--chunk-size", "50"])?;
    let multi = run_cubes(&["--hasse", "--chunk-size", "50", "--parallel", "4"])?;
    assert_eq!(single, multi);

    Ok(())
}

#[test]
fn command_cubes_tolerance() -> anyhow::Result<()> {
    // 1.6e11 falls into the 2e11 bucket but stays below the threshold
    let stdout = run_cubes(&["--tolerance", "2e11", "--threshold", "1.9e11"])?;
    assert_eq!(stdout.lines().count(), 1);
    assert!(stdout.starts_with("3.200000e11\t2\t"));

    Ok(())
}
