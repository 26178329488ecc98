use clap::*;
use ghcube::libs::cube::PrefilterCubeSet;
use ghcube::libs::io::{format_cube, read_occurrence_groups, read_sizes};
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("prefilter")
        .about("Finds relevant cubes and clusters their sequences")
        .after_help(
            r###"
Every possible link of every k-mer is counted in its cube, links themselves are
not kept and no link limit applies. Cubes with at least --pre-threshold
links are relevant. Sequences of relevant cubes sharing any sequence are
clustered together.

Notes:
* --neighbours also marks every cube one tile away on any non-reference axis
* With --hasse, cubes of 3 or more genomes add their reference plus first
  non-reference genome cube
* Output: cluster index, link count and cube, grouped by cluster

Examples:
1. Relevant sequence tuples:
   ghcube prefilter tests/ghcube/sizes.tsv tests/ghcube/occ.tsv --pre-threshold 2

2. Relevant 100 bp cubes with their neighbours:
   ghcube prefilter tests/ghcube/sizes.tsv tests/ghcube/occ.tsv --tile-size 100 --neighbours

"###,
        )
        .arg(
            Arg::new("pre_threshold")
                .long("pre-threshold")
                .num_args(1)
                .default_value("5")
                .value_parser(value_parser!(usize))
                .help("Links a cube needs to be relevant"),
        )
        .arg(
            Arg::new("neighbours")
                .long("neighbours")
                .action(ArgAction::SetTrue)
                .help("Add the neighbouring cubes of relevant cubes"),
        );
    let cmd = super::io_args(cmd);
    let cmd = super::occ_args(cmd);
    super::cube_args(cmd)
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let config = super::config_from(args)?;

    let (ids, _) = read_sizes(args.get_one::<String>("sizes").unwrap())?;
    let groups = read_occurrence_groups(args.get_one::<String>("occ").unwrap(), &ids)?;

    //----------------------------
    // Operating
    //----------------------------
    let pre = PrefilterCubeSet::new(&groups, ids.genome_count(), &config)?;
    let clusters = pre.sequence_cluster();
    log::info!(
        "{} relevant cubes form {} clusters",
        pre.len(),
        clusters.len()
    );
    let counts: fxhash::FxHashMap<_, _> = pre.relevant().collect();

    //----------------------------
    // Output
    //----------------------------
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());
    for (i, cluster) in clusters.iter().enumerate() {
        for cube in &cluster.cubes {
            writer.write_fmt(format_args!(
                "{}\t{}\t{}\n",
                i,
                counts.get(cube).copied().unwrap_or(0),
                format_cube(cube, &ids)?
            ))?;
        }
    }

    Ok(())
}
