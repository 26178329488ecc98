use crate::libs::config::GhConfig;
use crate::libs::cube::hasse::{CubeMap, Relation, TileIndex};
use crate::libs::cube::record::Cube;
use crate::libs::cube::score::{link_fraction, ScoreContext, ScoreKey};
use crate::libs::cube::tile::TileDistance;
use crate::libs::error::{GhError, Result};
use crate::libs::ids::SequenceLengths;
use crate::libs::link::{Link, LinkId, LinkSet};
use crate::libs::parallel::map_partitions;
use std::collections::{BTreeMap, BTreeSet};

/// Index of a cube inside its [`CubeSet`]
pub type CubeId = usize;

/// Cubes of a link set with their links, subcube relation and scores.
///
/// Built in one pass: cube map and tile index sequentially, then the
/// optional subcube relation and the scores in parallel. Read-only
/// afterwards.
#[derive(Debug)]
pub struct CubeSet<'a> {
    links: &'a LinkSet<'a>,
    cubes: CubeMap,
    tile_index: TileIndex,
    relation: Relation,
    hasse: bool,
    scores: Vec<f64>,
    buckets: BTreeMap<ScoreKey, Vec<CubeId>>,
    link_fraction: f64,
}

impl<'a> CubeSet<'a> {
    pub fn new(links: &'a LinkSet<'a>, lengths: &'a SequenceLengths) -> Result<Self> {
        let config = links.config();
        config.validate()?;
        if config.tile_size == 0 && lengths.is_empty() {
            return Err(GhError::config(
                "tile size 0 derives tiles from sequence lengths, but none are known",
            ));
        }
        let fraction = link_fraction(links.len(), links.ids(), lengths)?;

        let mut cubes = CubeMap::default();
        let mut tile_index = TileIndex::default();
        for (lid, (link, _)) in links.iter().enumerate() {
            let cube = Cube::from_link(link, config.tile_size)?;
            let cid = match cubes.get_index_of(&cube) {
                Some(cid) => cid,
                None => {
                    // first sighting registers the cube in the tile index
                    tile_index
                        .entry(*cube.reference())
                        .or_default()
                        .push(cubes.len());
                    cubes.insert_full(cube, vec![]).0
                }
            };
            cubes[cid].push(lid);
        }
        log::info!(
            "{} cubes from {} links, {} reference tiles",
            cubes.len(),
            links.len(),
            tile_index.len()
        );

        let hasse = config.hasse && links.genome_count() > 2;
        let relation = if hasse {
            let relation = Relation::build(&cubes, &tile_index, links.genome_count(), config.threads)?;
            log::info!("{} subcube relations", relation.len());
            relation
        } else {
            Relation::empty(cubes.len())
        };

        let mut set = Self {
            links,
            cubes,
            tile_index,
            relation,
            hasse,
            scores: vec![],
            buckets: BTreeMap::new(),
            link_fraction: fraction,
        };
        set.compute_scores(lengths, config)?;
        Ok(set)
    }

    fn compute_scores(&mut self, lengths: &SequenceLengths, config: &GhConfig) -> Result<()> {
        let ctx = ScoreContext {
            links: self.links,
            lengths,
            config,
            link_fraction: self.link_fraction,
        };
        let cubes = &self.cubes;
        let locals = map_partitions(cubes.len(), config.threads, |range| {
            let mut local: Vec<(CubeId, f64)> = Vec::with_capacity(range.len());
            for cid in range {
                if let Some((cube, lids)) = cubes.get_index(cid) {
                    local.push((cid, ctx.score(cube, lids)?));
                }
            }
            Ok(local)
        })?;

        self.scores = vec![0.0; cubes.len()];
        for (cid, score) in locals.into_iter().flatten() {
            self.scores[cid] = score;
            self.buckets
                .entry(ScoreKey(config.score_bucketing.key(score)))
                .or_default()
                .push(cid);
        }
        log::debug!("{} distinct scores", self.buckets.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn link_set(&self) -> &'a LinkSet<'a> {
        self.links
    }

    /// Panics if `id` is not from this set, like slice indexing.
    pub fn cube(&self, id: CubeId) -> &Cube {
        self.cubes.get_index(id).expect("CubeId from this set").0
    }

    pub fn id_of(&self, cube: &Cube) -> Option<CubeId> {
        self.cubes.get_index_of(cube)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CubeId, &Cube)> {
        self.cubes.keys().enumerate()
    }

    /// IDs of the links mapping to cube `id`, in link set order
    pub fn link_ids(&self, id: CubeId) -> &[LinkId] {
        self.cubes
            .get_index(id)
            .map_or(&[][..], |(_, lids)| lids.as_slice())
    }

    pub fn links(&self, id: CubeId) -> impl Iterator<Item = &'a Link> + '_ {
        let set = self.links;
        self.link_ids(id).iter().map(move |&lid| set.link(lid))
    }

    /// Cubes sharing the reference entry `tile`, in order of first sighting
    pub fn tile_bucket(&self, tile: &TileDistance) -> &[CubeId] {
        self.tile_index.get(tile).map_or(&[][..], |v| v.as_slice())
    }

    pub fn tile_index_len(&self) -> usize {
        self.tile_index.len()
    }

    /// Whether the subcube relation was computed
    pub fn has_hasse(&self) -> bool {
        self.hasse
    }

    /// Every observed cube strictly contained in cube `id`
    pub fn subcubes(&self, id: CubeId) -> &BTreeSet<CubeId> {
        &self.relation.subcubes[id]
    }

    /// Subcubes of `id` without the ones reachable through another subcube
    pub fn direct_subcubes(&self, id: CubeId) -> BTreeSet<CubeId> {
        self.relation.direct_subcubes(id)
    }

    /// Every observed cube strictly containing cube `id`
    pub fn supercubes(&self, id: CubeId) -> &BTreeSet<CubeId> {
        &self.relation.supercubes[id]
    }

    pub fn score(&self, id: CubeId) -> f64 {
        self.scores[id]
    }

    pub fn link_fraction(&self) -> f64 {
        self.link_fraction
    }

    /// Score buckets from the highest score down
    pub fn score_buckets(&self) -> impl Iterator<Item = (f64, &[CubeId])> {
        self.buckets.iter().rev().map(|(k, v)| (k.0, v.as_slice()))
    }

    /// Score buckets holding cubes that score at least `threshold`, highest
    /// first. Only the cubes of a bucket reaching the threshold are listed,
    /// a rounded bucket key never lets a lower score through. NaN scores are
    /// never reported.
    pub fn cubes_above(&self, threshold: f64) -> impl Iterator<Item = (f64, Vec<CubeId>)> + '_ {
        let start = self.links.config().score_bucketing.key(threshold);
        self.buckets
            .range(ScoreKey(start)..)
            .rev()
            .filter(|(k, _)| !k.0.is_nan())
            .filter_map(move |(k, v)| {
                let ids: Vec<CubeId> = v
                    .iter()
                    .copied()
                    .filter(|&cid| self.scores[cid] >= threshold)
                    .collect();
                if ids.is_empty() {
                    None
                } else {
                    Some((k.0, ids))
                }
            })
    }
}
