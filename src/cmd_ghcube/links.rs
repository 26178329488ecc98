use clap::*;
use ghcube::libs::io::{format_link, read_occurrence_groups, read_sizes};
use ghcube::libs::link::LinkSet;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("links")
        .about("Explodes seed occurrences into multi-genome links")
        .after_help(
            r###"
Each k-mer's occurrences are split by genome and every combination of one
occurrence per genome becomes a link. Identical links are counted.

Notes:
* K-mers are discarded when
    * the reference genome has no occurrence
    * only the reference genome has occurrences
    * a genome has more than --occ-max or fewer than --occ-min occurrences
* With more than --link-limit combinations a random sample is kept, always
  holding the first and the last combination
* Output: count and the link's occurrences as genome:sequence:position:strand

Examples:
1. All links of the occurrences:
   ghcube links tests/ghcube/sizes.tsv tests/ghcube/occ.tsv

2. Single-copy seeds only, reproducible sampling:
   ghcube links tests/ghcube/sizes.tsv tests/ghcube/occ.tsv --occ-max 1 --seed 42

"###,
        );
    let cmd = super::io_args(cmd);
    let cmd = super::occ_args(cmd);
    super::link_args(cmd)
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let config = super::config_from(args)?;
    let mut rng = super::rng_from(&config);

    let (ids, _) = read_sizes(args.get_one::<String>("sizes").unwrap())?;
    let groups = read_occurrence_groups(args.get_one::<String>("occ").unwrap(), &ids)?;

    //----------------------------
    // Operating
    //----------------------------
    let mut links = LinkSet::new(&ids, &config);
    links.extend_from_groups(&groups, &mut rng)?;

    //----------------------------
    // Output
    //----------------------------
    let mut writer = intspan::writer(args.get_one::<String>("outfile").unwrap());
    for (link, count) in links.iter() {
        writer.write_fmt(format_args!("{}\t{}\n", count, format_link(link, &ids)?))?;
    }

    Ok(())
}
