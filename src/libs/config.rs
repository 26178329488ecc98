use crate::libs::error::{GhError, Result};

/// How cube scores are grouped into buckets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBucketing {
    /// Bit-exact floating point keys, cubes only tie on identical scores
    Exact,
    /// Scores are rounded to the nearest multiple of the tolerance
    Tolerance(f64),
}

impl ScoreBucketing {
    /// Bucket key of `score`
    pub fn key(&self, score: f64) -> f64 {
        let key = match *self {
            ScoreBucketing::Exact => score,
            ScoreBucketing::Tolerance(eps) => (score / eps).round() * eps,
        };
        // -0.0 and 0.0 share a bucket
        if key == 0.0 {
            0.0
        } else {
            key
        }
    }
}

/// Parameters of link creation, cube scoring and the prefilter.
///
/// Defaults are the ones of the established geometric hashing pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GhConfig {
    /// Tile width, 0 derives it per cube from the longest sequence involved
    pub tile_size: u64,
    /// Compute the subcube relation
    pub hasse: bool,
    pub threads: usize,
    /// Targeted number of sub-tiles per cube
    pub subtiles_target: usize,
    /// Chunk size along the summed positions, 0 disables chunking
    pub chunk_size: u64,
    /// Exponent p of the p-norm in the score
    pub norm_exponent: u32,
    pub score_threshold: f64,
    /// At most this many links per k-mer, 0 for no limit
    pub link_limit: usize,
    /// Drop k-mers exceeding `link_limit` instead of sampling
    pub discard_exceeding: bool,
    /// At most this many occurrences in any genome, 0 for no limit
    pub occ_per_genome_max: usize,
    /// At least this many occurrences in a genome that has any
    pub occ_per_genome_min: usize,
    /// Links a prefilter cube needs to be relevant
    pub pre_link_threshold: usize,
    /// Add the 3^(d-1) neighbourhood of every relevant prefilter cube
    pub pre_add_neighbours: bool,
    pub score_bucketing: ScoreBucketing,
    /// Seed for link sampling, entropy when absent
    pub seed: Option<u64>,
}

impl Default for GhConfig {
    fn default() -> Self {
        Self {
            tile_size: 0,
            hasse: false,
            threads: 1,
            subtiles_target: 500,
            chunk_size: 0,
            norm_exponent: 2,
            score_threshold: 25.0,
            link_limit: 10,
            discard_exceeding: false,
            occ_per_genome_max: 0,
            occ_per_genome_min: 1,
            pre_link_threshold: 5,
            pre_add_neighbours: false,
            score_bucketing: ScoreBucketing::Exact,
            seed: None,
        }
    }
}

impl GhConfig {
    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            return Err(GhError::config("threads must be at least 1"));
        }
        if self.subtiles_target == 0 {
            return Err(GhError::config("subtiles target must be at least 1"));
        }
        if self.norm_exponent == 0 {
            return Err(GhError::config("normalization exponent p must be at least 1"));
        }
        if self.occ_per_genome_max > 0 && self.occ_per_genome_min > self.occ_per_genome_max {
            return Err(GhError::config(format!(
                "occurrence per genome min {} exceeds max {}",
                self.occ_per_genome_min, self.occ_per_genome_max
            )));
        }
        if let ScoreBucketing::Tolerance(eps) = self.score_bucketing {
            if !(eps.is_finite() && eps > 0.0) {
                return Err(GhError::config(format!(
                    "score tolerance must be positive and finite, got {}",
                    eps
                )));
            }
        }
        Ok(())
    }

    /// Effective per-genome maximum
    pub fn occ_max(&self) -> usize {
        if self.occ_per_genome_max == 0 {
            usize::MAX
        } else {
            self.occ_per_genome_max
        }
    }

    /// Effective link limit
    pub fn link_max(&self) -> usize {
        if self.link_limit == 0 {
            usize::MAX
        } else {
            self.link_limit
        }
    }
}
