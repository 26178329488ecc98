//! Cube scoring.
//!
//! A cube's links are re-tiled into sub-tiles and, when chunking is on,
//! split by chunk of their summed positions. The p-norm of the per-bucket
//! link counts is compared with the count expected from the background link
//! density (`lambda`) over all buckets.

use crate::libs::config::GhConfig;
use crate::libs::cube::record::Cube;
use crate::libs::error::{GhError, Result};
use crate::libs::ids::{genome_length_sums, IdMapping, SequenceLengths};
use crate::libs::link::{LinkId, LinkSet};
use fxhash::FxHashMap;
use std::cmp::Ordering;

/// Total-order key of a score bucket
#[derive(Debug, Clone, Copy)]
pub struct ScoreKey(pub f64);

impl PartialEq for ScoreKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoreKey {}

impl PartialOrd for ScoreKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoreKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Observed links divided by the length sum of every genome in turn
pub fn link_fraction(n_links: usize, ids: &IdMapping, lengths: &SequenceLengths) -> Result<f64> {
    let sums = genome_length_sums(ids, lengths)?;
    let mut fraction = n_links as f64;
    for (genome, &sum) in sums.iter().enumerate() {
        if sum == 0 {
            return Err(GhError::ZeroGenomeLength {
                genome: genome as u8,
            });
        }
        fraction /= sum as f64;
    }
    Ok(fraction)
}

/// Largest `r` with `r^k <= n`
fn integer_root(n: u64, k: u32) -> u64 {
    if k <= 1 {
        return n;
    }
    let mut r = (n as f64).powf(1.0 / k as f64).floor() as u64;
    while r > 0 && r.checked_pow(k).map_or(true, |x| x > n) {
        r -= 1;
    }
    while (r + 1).checked_pow(k).map_or(false, |x| x <= n) {
        r += 1;
    }
    r
}

/// Sub-tiles per axis and their width for one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubTiling {
    pub per_side: u64,
    pub width: u64,
}

impl SubTiling {
    pub fn new(tile_size: u64, target: usize, dimensionality: usize) -> Self {
        let target = target.max(1) as u64;
        let mut per_side = if dimensionality > 2 {
            integer_root(target, (dimensionality - 1) as u32)
        } else {
            target
        }
        .max(1);

        let width = tile_size / per_side;
        if width == 0 {
            // more sub-tiles than positions: a width of 0 gives a chunk volume of
            // 0 and an infinite score, so each position gets its own sub-tile
            return Self {
                per_side: tile_size.max(1),
                width: 1,
            };
        }
        if tile_size % per_side > 0 {
            per_side += 1;
        }
        Self { per_side, width }
    }

    /// Number of sub-tiles in a cube of `dimensionality` genomes
    pub fn count(&self, dimensionality: usize) -> f64 {
        (self.per_side as f64).powi(dimensionality.saturating_sub(1) as i32)
    }
}

/// Everything the score of a single cube reads
pub struct ScoreContext<'a> {
    pub links: &'a LinkSet<'a>,
    pub lengths: &'a SequenceLengths,
    pub config: &'a GhConfig,
    pub link_fraction: f64,
}

impl<'a> ScoreContext<'a> {
    /// Configured tile size, or the longest sequence of the cube when 0
    pub fn tile_size(&self, cube: &Cube) -> Result<u64> {
        if self.config.tile_size > 0 {
            return Ok(self.config.tile_size);
        }
        let mut tile = 0;
        for sequence in cube.sequences() {
            let len = self
                .lengths
                .get(&sequence)
                .ok_or_else(|| GhError::UnknownSequenceLength {
                    sequence,
                    cube: cube.to_string(),
                })?;
            tile = tile.max(*len);
        }
        if tile == 0 {
            return Err(cube.geometry_error(0, self.config.chunk_size, "all sequences are empty"));
        }
        Ok(tile)
    }

    pub fn score(&self, cube: &Cube, link_ids: &[LinkId]) -> Result<f64> {
        let config = self.config;
        let dim = cube.dimensionality();
        let tile_size = self.tile_size(cube)?;
        let sub = SubTiling::new(tile_size, config.subtiles_target, dim);
        let nsubtiles = sub.count(dim);

        let geo = cube.geo_properties(tile_size, config.chunk_size, self.lengths)?;
        let (nchunks, chunklen) = if config.chunk_size > 0 {
            ((geo.max_chunk - geo.min_chunk + 1) as f64, config.chunk_size as f64)
        } else {
            (1.0, geo.length.max(1) as f64)
        };
        let chunkvol = chunklen * (sub.width as f64).powi(dim as i32 - 1);
        let lambda = chunkvol * self.link_fraction;

        let mut buckets: FxHashMap<(Cube, u64), usize> = FxHashMap::default();
        for &id in link_ids {
            let link = self.links.link(id);
            let subcube = Cube::from_link(link, sub.width)?;
            *buckets
                .entry((subcube, link.chunk_id(config.chunk_size)))
                .or_insert(0) += 1;
        }

        let p = config.norm_exponent as i32;
        let inv_p = 1.0 / config.norm_exponent as f64;
        let pnorm: f64 = buckets.values().map(|&c| (c as f64).powi(p)).sum();
        let normalization = lambda * (nsubtiles * nchunks).powf(inv_p);
        let score = pnorm.powf(inv_p) / normalization;

        if !score.is_finite() || score < 0.0 {
            log::warn!(
                "suspicious score {} for cube {}: tile size {}, sub-tiles per side {}, sub-tile width {}, \
                 sub-tiles {}, length {}, chunks {} ({}..={}), chunk length {}, chunk volume {}, \
                 link fraction {:e}, lambda {:e}, p {}, p-norm {}, normalization {:e}, links {}",
                score,
                cube,
                tile_size,
                sub.per_side,
                sub.width,
                nsubtiles,
                geo.length,
                nchunks,
                geo.min_chunk,
                geo.max_chunk,
                chunklen,
                chunkvol,
                self.link_fraction,
                lambda,
                config.norm_exponent,
                pnorm,
                normalization,
                link_ids.len()
            );
        }
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_root() {
        assert_eq!(integer_root(500, 1), 500);
        assert_eq!(integer_root(500, 2), 22);
        assert_eq!(integer_root(500, 3), 7);
        assert_eq!(integer_root(8, 3), 2);
        assert_eq!(integer_root(27, 3), 3);
        assert_eq!(integer_root(26, 3), 2);
        assert_eq!(integer_root(1, 4), 1);
    }

    #[test]
    fn test_sub_tiling() {
        // 500 per side does not fit into 100 positions
        assert_eq!(SubTiling::new(100, 500, 2), SubTiling { per_side: 100, width: 1 });
        // 22 per side, width 45, 22 * 45 < 1000 needs one more
        assert_eq!(SubTiling::new(1000, 500, 3), SubTiling { per_side: 23, width: 45 });
        assert_eq!(SubTiling::new(1000, 500, 2), SubTiling { per_side: 500, width: 2 });
        assert_eq!(SubTiling::new(1000, 8, 4), SubTiling { per_side: 2, width: 500 });
        assert_eq!(SubTiling::new(1000, 8, 4).count(4), 8.0);
    }

    #[test]
    fn test_score_key_order() {
        let mut keys = vec![ScoreKey(2.0), ScoreKey(-1.0), ScoreKey(0.5), ScoreKey(2.0)];
        keys.sort();
        keys.dedup();
        let v: Vec<f64> = keys.iter().map(|k| k.0).collect();
        assert_eq!(v, vec![-1.0, 0.5, 2.0]);
    }
}
