extern crate clap;
use clap::*;

mod cmd_ghcube;

fn main() -> anyhow::Result<()> {
    let app = Command::new("ghcube")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`ghcube` - Geometric hashing of multi-genome seed links")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log progress to stderr, -vv for details"),
        )
        .subcommand(cmd_ghcube::links::make_subcommand())
        .subcommand(cmd_ghcube::cubes::make_subcommand())
        .subcommand(cmd_ghcube::prefilter::make_subcommand())
        .after_help(
            r###"Subcommands:

* links     - Explode seed occurrences into multi-genome links
* cubes     - Bucket links into cubes and score them
* prefilter - Count-only pass, relevant cubes and sequence clusters

Inputs:
* <sizes>: genome, sequence, length; the first genome is the reference
* <occ>:   kmer, genome, sequence, position, strand (+/-)

"###,
        );

    let matches = app.get_matches();

    env_logger::Builder::new()
        .filter_level(match matches.get_count("verbose") {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    match matches.subcommand() {
        Some(("links", sub_matches)) => cmd_ghcube::links::execute(sub_matches),
        Some(("cubes", sub_matches)) => cmd_ghcube::cubes::execute(sub_matches),
        Some(("prefilter", sub_matches)) => cmd_ghcube::prefilter::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
