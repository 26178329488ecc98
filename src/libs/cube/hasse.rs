//! Subcube relation between the cubes of a cube set.
//!
//! Supercube candidates of a cube are looked up in the tile index bucket of
//! its reference entry only. A subcube always carries the reference tile of
//! its supercube, so the bucket holds every candidate and the relation found
//! is the complete containment order among the observed cubes.

use crate::libs::cube::record::Cube;
use crate::libs::cube::tile::TileDistance;
use crate::libs::cube::CubeId;
use crate::libs::error::Result;
use crate::libs::link::LinkId;
use crate::libs::parallel::map_partitions;
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use std::collections::BTreeSet;

pub type CubeMap = IndexMap<Cube, Vec<LinkId>, FxBuildHasher>;
pub type TileIndex = IndexMap<TileDistance, Vec<CubeId>, FxBuildHasher>;

/// Cubes of the anchored bucket that contain `cube`
pub fn find_supercubes(
    cubes: &CubeMap,
    tile_index: &TileIndex,
    genome_count: usize,
    cube: &Cube,
) -> Vec<CubeId> {
    if cube.dimensionality() >= genome_count {
        return vec![];
    }
    let Some(bucket) = tile_index.get(cube.reference()) else {
        return vec![];
    };
    bucket
        .iter()
        .copied()
        .filter(|&cid| {
            cubes
                .get_index(cid)
                .map_or(false, |(candidate, _)| candidate.has_subcube(cube))
        })
        .collect()
}

/// Subcube and supercube sets indexed by cube ID
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relation {
    pub subcubes: Vec<BTreeSet<CubeId>>,
    pub supercubes: Vec<BTreeSet<CubeId>>,
}

impl Relation {
    pub fn empty(n: usize) -> Self {
        Self {
            subcubes: vec![BTreeSet::new(); n],
            supercubes: vec![BTreeSet::new(); n],
        }
    }

    /// Workers collect `(supercube, subcube)` pairs of their own slice of the
    /// cube map, the calling thread merges them.
    pub fn build(
        cubes: &CubeMap,
        tile_index: &TileIndex,
        genome_count: usize,
        threads: usize,
    ) -> Result<Self> {
        let locals = map_partitions(cubes.len(), threads, |range| {
            let mut pairs: Vec<(CubeId, CubeId)> = vec![];
            for id in range {
                if let Some((cube, _)) = cubes.get_index(id) {
                    for sup in find_supercubes(cubes, tile_index, genome_count, cube) {
                        pairs.push((sup, id));
                    }
                }
            }
            Ok(pairs)
        })?;

        let mut relation = Self::empty(cubes.len());
        for (sup, sub) in locals.into_iter().flatten() {
            relation.subcubes[sup].insert(sub);
            relation.supercubes[sub].insert(sup);
        }
        Ok(relation)
    }

    /// Subcubes of `id` not contained in another subcube of `id`
    pub fn direct_subcubes(&self, id: CubeId) -> BTreeSet<CubeId> {
        let subs = &self.subcubes[id];
        subs.iter()
            .copied()
            .filter(|s| !subs.iter().any(|t| self.subcubes[*t].contains(s)))
            .collect()
    }

    /// Number of subcube pairs
    pub fn len(&self) -> usize {
        self.subcubes.iter().map(|s| s.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
