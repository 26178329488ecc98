//! Subcommand modules for the `ghcube` binary.

pub mod cubes;
pub mod links;
pub mod prefilter;

use clap::*;
use ghcube::{GhConfig, ScoreBucketing};
use rand::SeedableRng;

/// Positional inputs and the output file
pub fn io_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("sizes")
            .required(true)
            .num_args(1)
            .index(1)
            .help("Sequence sizes: genome, sequence, length"),
    )
    .arg(
        Arg::new("occ")
            .required(true)
            .num_args(1)
            .index(2)
            .help("Seed occurrences: kmer, genome, sequence, position, strand"),
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

/// Per-genome occurrence filters applied to every seed
pub fn occ_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("occ_max")
            .long("occ-max")
            .num_args(1)
            .default_value("0")
            .value_parser(value_parser!(usize))
            .help("At most this many occurrences per genome, 0 for no limit"),
    )
    .arg(
        Arg::new("occ_min")
            .long("occ-min")
            .num_args(1)
            .default_value("1")
            .value_parser(value_parser!(usize))
            .help("At least this many occurrences in a genome that has any"),
    )
}

/// Sampling of the links of a seed
pub fn link_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("link_limit")
            .long("link-limit")
            .num_args(1)
            .default_value("10")
            .value_parser(value_parser!(usize))
            .help("At most this many links per k-mer, 0 for no limit"),
    )
    .arg(
        Arg::new("discard_exceeding")
            .long("discard-exceeding")
            .action(ArgAction::SetTrue)
            .help("Drop k-mers with more links than --link-limit instead of sampling"),
    )
    .arg(
        Arg::new("seed")
            .long("seed")
            .num_args(1)
            .value_parser(value_parser!(u64))
            .help("Random seed for link sampling"),
    )
}

/// Tiling and parallelism
pub fn cube_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("tile_size")
            .long("tile-size")
            .num_args(1)
            .default_value("0")
            .value_parser(value_parser!(u64))
            .help("Tile size, 0 uses the longest sequence of each cube"),
    )
    .arg(
        Arg::new("hasse")
            .long("hasse")
            .action(ArgAction::SetTrue)
            .help("Compute the subcube relation"),
    )
    .arg(
        Arg::new("parallel")
            .long("parallel")
            .short('p')
            .num_args(1)
            .default_value("1")
            .value_parser(value_parser!(usize))
            .help("Number of threads for parallel processing"),
    )
}

/// Cube score parameters
pub fn score_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("subtiles")
            .long("subtiles")
            .num_args(1)
            .default_value("500")
            .value_parser(value_parser!(usize))
            .help("Targeted number of sub-tiles per cube"),
    )
    .arg(
        Arg::new("chunk_size")
            .long("chunk-size")
            .num_args(1)
            .default_value("0")
            .value_parser(value_parser!(u64))
            .help("Chunk size along the summed positions, 0 disables chunking"),
    )
    .arg(
        Arg::new("norm")
            .long("norm")
            .num_args(1)
            .default_value("2")
            .value_parser(value_parser!(u32))
            .help("Exponent p of the p-norm"),
    )
    .arg(
        Arg::new("threshold")
            .long("threshold")
            .num_args(1)
            .default_value("25")
            .value_parser(value_parser!(f64))
            .help("Report cubes scoring at least this"),
    )
    .arg(
        Arg::new("tolerance")
            .long("tolerance")
            .num_args(1)
            .value_parser(value_parser!(f64))
            .help("Bucket scores by multiples of this instead of exact values"),
    )
}

fn opt<T: Clone + Send + Sync + 'static>(args: &ArgMatches, id: &str) -> Option<T> {
    args.try_get_one::<T>(id).ok().flatten().cloned()
}

/// Builds the configuration from the options a subcommand defines
pub fn config_from(args: &ArgMatches) -> anyhow::Result<GhConfig> {
    let mut config = GhConfig::default();

    if let Some(v) = opt(args, "tile_size") {
        config.tile_size = v;
    }
    if let Ok(v) = args.try_get_one::<bool>("hasse") {
        config.hasse = v.copied().unwrap_or(false);
    }
    if let Some(v) = opt(args, "parallel") {
        config.threads = v;
    }
    if let Some(v) = opt(args, "subtiles") {
        config.subtiles_target = v;
    }
    if let Some(v) = opt(args, "chunk_size") {
        config.chunk_size = v;
    }
    if let Some(v) = opt(args, "norm") {
        config.norm_exponent = v;
    }
    if let Some(v) = opt(args, "threshold") {
        config.score_threshold = v;
    }
    if let Some(eps) = opt(args, "tolerance") {
        config.score_bucketing = ScoreBucketing::Tolerance(eps);
    }
    if let Some(v) = opt(args, "link_limit") {
        config.link_limit = v;
    }
    if let Ok(v) = args.try_get_one::<bool>("discard_exceeding") {
        config.discard_exceeding = v.copied().unwrap_or(false);
    }
    if let Some(v) = opt(args, "occ_max") {
        config.occ_per_genome_max = v;
    }
    if let Some(v) = opt(args, "occ_min") {
        config.occ_per_genome_min = v;
    }
    if let Some(v) = opt(args, "pre_threshold") {
        config.pre_link_threshold = v;
    }
    if let Ok(v) = args.try_get_one::<bool>("neighbours") {
        config.pre_add_neighbours = v.copied().unwrap_or(false);
    }
    config.seed = opt(args, "seed");

    config.validate()?;
    Ok(config)
}

pub fn rng_from(config: &GhConfig) -> rand::rngs::StdRng {
    match config.seed {
        Some(seed) => rand::rngs::StdRng::seed_from_u64(seed),
        None => rand::rngs::StdRng::from_entropy(),
    }
}
