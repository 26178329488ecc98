use clap::*;
use ghcube::libs::cube::CubeSet;
use ghcube::libs::io::{format_cube, read_occurrence_groups, read_sizes};
use ghcube::libs::link::LinkSet;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("cubes")
        .about("Buckets links into cubes and scores them")
        .after_help(
            r###"
Links are tiled relative to their reference occurrence; links sharing all tile
distances form a cube. Each cube is scored against the background link density.

Notes:
* --tile-size 0 turns cubes into sequence tuples
* Score: p-norm of the link counts per sub-tile and chunk, divided by the
  expected count
* --hasse needs at least 3 genomes, adds the direct subcubes as a 4th column,
  separated by ';'
* Output: score, number of links and the cube as genome:sequence:distance:strand,
  highest score first, cubes below --threshold are omitted

Examples:
1. Score all cubes with 100 bp tiles:
   ghcube cubes tests/ghcube/sizes.tsv tests/ghcube/occ.tsv --tile-size 100 --threshold 0

2. With the subcube relation, in parallel:
   ghcube cubes tests/ghcube/sizes.tsv tests/ghcube/occ.tsv --tile-size 100 --hasse -p 4

"###,
        );
    let cmd = super::io_args(cmd);
    let cmd = super::occ_args(cmd);
    let cmd = super::link_args(cmd);
    let cmd = super::cube_args(cmd);
    super::score_args(cmd)
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let config = super::config_from(args)?;
    let mut rng = super::rng_from(&config);

    let (ids, lengths) = read_sizes(args.get_one::<String>("sizes").unwrap())?;
    let groups = read_occurrence_groups(args.get_one::<String>("occ").unwrap(), &ids)?;

    //----------------------------
    // Operating
    //----------------------------
    let mut links = LinkSet::new(&ids, &config);
    links.extend_from_groups(&groups, &mut rng)?;
    let cubes = CubeSet::new(&links, &lengths)?;

    //----------------------------
    // Output
    //----------------------------
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());
    for (_, bucket) in cubes.cubes_above(config.score_threshold) {
        for cid in bucket {
            let mut line = format!(
                "{:.6e}\t{}\t{}",
                cubes.score(cid),
                cubes.link_ids(cid).len(),
                format_cube(cubes.cube(cid), &ids)?
            );
            if cubes.has_hasse() {
                let subs = cubes
                    .direct_subcubes(cid)
                    .into_iter()
                    .map(|s| format_cube(cubes.cube(s), &ids))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                line.push('\t');
                line.push_str(&subs.join(";"));
            }
            writer.write_fmt(format_args!("{}\n", line))?;
        }
    }

    Ok(())
}
