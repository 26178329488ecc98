//! Count-only first pass over the seed stream.
//!
//! Every possible link of every seed is turned into its cube and counted,
//! no link is stored. Cubes reaching the link threshold are relevant, and
//! the sequences of relevant cubes are grouped into independent clusters
//! that the full pipeline can process one at a time.

use crate::libs::config::GhConfig;
use crate::libs::cube::record::Cube;
use crate::libs::error::Result;
use crate::libs::link::{Link, OccurrenceGroup, Verdict};
use crate::libs::occurrence::Occurrence;
use crate::libs::parallel::map_partitions;
use fxhash::{FxBuildHasher, FxHashMap};
use indexmap::IndexMap;
use petgraph::unionfind::UnionFind;
use std::collections::BTreeSet;

/// Sequences connected through shared relevant cubes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceCluster {
    pub sequences: BTreeSet<u32>,
    pub cubes: Vec<Cube>,
}

#[derive(Debug, Clone)]
pub struct PrefilterCubeSet {
    // relevant cube -> link count, 0 for cubes only added as neighbours
    relevant: IndexMap<Cube, usize, FxBuildHasher>,
    n_counted: usize,
}

impl PrefilterCubeSet {
    /// Counts the cubes of all occurrence groups, partitioned over
    /// `config.threads` workers, and keeps the relevant ones
    pub fn new(groups: &[Vec<Occurrence>], genome_count: usize, config: &GhConfig) -> Result<Self> {
        config.validate()?;
        let shards = map_partitions(groups.len(), config.threads, |range| {
            let mut counts: FxHashMap<Cube, usize> = FxHashMap::default();
            for occs in &groups[range] {
                let group = match OccurrenceGroup::classify(occs, genome_count, config)? {
                    Verdict::Accept(group) => group,
                    Verdict::Discard(_) => continue,
                };
                for combination in group.iter_all() {
                    let cube = Cube::from_link(&Link::new(combination)?, config.tile_size)?;
                    *counts.entry(cube).or_insert(0) += 1;
                }
            }
            Ok(counts)
        })?;

        let mut shards = shards.into_iter();
        let mut counts = shards.next().unwrap_or_default();
        for shard in shards {
            for (cube, c) in shard {
                *counts.entry(cube).or_insert(0) += c;
            }
        }
        Self::from_counts(counts, config)
    }

    /// Selects the relevant cubes of a complete count map
    pub fn from_counts(counts: FxHashMap<Cube, usize>, config: &GhConfig) -> Result<Self> {
        let mut selected: BTreeSet<Cube> = BTreeSet::new();
        for (cube, &count) in &counts {
            if count < config.pre_link_threshold {
                continue;
            }
            if config.pre_add_neighbours {
                selected.extend(cube.neighbours()?);
            } else {
                selected.insert(cube.clone());
            }
            if config.hasse && cube.dimensionality() > 2 {
                selected.extend(cube.pair(1));
            }
        }

        let relevant: IndexMap<Cube, usize, FxBuildHasher> = selected
            .into_iter()
            .map(|cube| {
                let c = counts.get(&cube).copied().unwrap_or(0);
                (cube, c)
            })
            .collect();
        log::info!(
            "{} relevant cubes out of {} counted",
            relevant.len(),
            counts.len()
        );
        Ok(Self {
            relevant,
            n_counted: counts.len(),
        })
    }

    /// Relevant cubes with their link counts, in cube order
    pub fn relevant(&self) -> impl Iterator<Item = (&Cube, usize)> {
        self.relevant.iter().map(|(cube, &c)| (cube, c))
    }

    pub fn contains(&self, cube: &Cube) -> bool {
        self.relevant.contains_key(cube)
    }

    pub fn len(&self) -> usize {
        self.relevant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relevant.is_empty()
    }

    /// Distinct cubes seen before thresholding
    pub fn n_counted(&self) -> usize {
        self.n_counted
    }

    /// Partitions the sequences of the relevant cubes: two cubes end up in
    /// one cluster exactly when a chain of shared sequences connects them.
    ///
    /// Clusters are ordered by their first relevant cube.
    pub fn sequence_cluster(&self) -> Vec<SequenceCluster> {
        let mut slots: FxHashMap<u32, usize> = FxHashMap::default();
        for cube in self.relevant.keys() {
            for sid in cube.sequences() {
                let next = slots.len();
                slots.entry(sid).or_insert(next);
            }
        }

        let mut sets: UnionFind<usize> = UnionFind::new(slots.len());
        for cube in self.relevant.keys() {
            let mut sids = cube.sequences().map(|sid| slots[&sid]);
            if let Some(first) = sids.next() {
                for other in sids {
                    sets.union(first, other);
                }
            }
        }

        let mut clusters: Vec<SequenceCluster> = vec![];
        let mut cluster_of_root: FxHashMap<usize, usize> = FxHashMap::default();
        for cube in self.relevant.keys() {
            let Some(sid) = cube.sequences().next() else {
                continue;
            };
            let root = sets.find(slots[&sid]);
            let idx = *cluster_of_root.entry(root).or_insert_with(|| {
                clusters.push(SequenceCluster::default());
                clusters.len() - 1
            });
            let cluster = &mut clusters[idx];
            cluster.sequences.extend(cube.sequences());
            cluster.cubes.push(cube.clone());
        }
        clusters
    }
}
