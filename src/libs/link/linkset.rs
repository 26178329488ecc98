use crate::libs::config::GhConfig;
use crate::libs::error::{GhError, Result};
use crate::libs::ids::IdMapping;
use crate::libs::link::group::{Discard, OccurrenceGroup, Verdict};
use crate::libs::link::record::Link;
use crate::libs::occurrence::Occurrence;
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use rand::Rng;

/// Index of a link inside its [`LinkSet`]
pub type LinkId = usize;

/// Seeds that produced no link, by reason
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscardCounts {
    pub not_in_reference: usize,
    pub only_in_reference: usize,
    pub too_many: usize,
    pub too_few: usize,
    /// Only counted with `discard_exceeding`
    pub exceeding: usize,
}

impl DiscardCounts {
    fn record(&mut self, reason: Discard) {
        match reason {
            Discard::NotInReference => self.not_in_reference += 1,
            Discard::OnlyInReference => self.only_in_reference += 1,
            Discard::TooMany => self.too_many += 1,
            Discard::TooFew => self.too_few += 1,
            Discard::ExceedingLimit => self.exceeding += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.not_in_reference + self.only_in_reference + self.too_many + self.too_few + self.exceeding
    }
}

/// Distinct links with the number of times each was derived.
///
/// Grows by insertion or increment only. Insertion order is kept, so a
/// [`LinkId`] stays valid for the lifetime of the set.
#[derive(Debug, Clone)]
pub struct LinkSet<'a> {
    ids: &'a IdMapping,
    config: &'a GhConfig,
    links: IndexMap<Link, usize, FxBuildHasher>,
    discards: DiscardCounts,
}

impl<'a> LinkSet<'a> {
    pub fn new(ids: &'a IdMapping, config: &'a GhConfig) -> Self {
        Self {
            ids,
            config,
            links: IndexMap::default(),
            discards: DiscardCounts::default(),
        }
    }

    /// Explodes the occurrences of one seed into links.
    ///
    /// Returns the number of links inserted or incremented, 0 if the seed
    /// was discarded.
    pub fn create_links<R: Rng + ?Sized>(
        &mut self,
        occurrences: &[Occurrence],
        rng: &mut R,
    ) -> Result<usize> {
        let group = match OccurrenceGroup::classify(occurrences, self.genome_count(), self.config)? {
            Verdict::Accept(group) => group,
            Verdict::Discard(reason) => {
                self.discards.record(reason);
                return Ok(0);
            }
        };

        let limit = self.config.link_max();
        if group.n_possible().is_none() && self.config.link_limit == 0 {
            // too many combinations to count, let alone enumerate
            log::debug!("seed with {} occurrences has too many links", occurrences.len());
            self.discards.record(Discard::ExceedingLimit);
            return Ok(0);
        }
        let exceeding = group.n_possible().map_or(true, |n| n > limit);
        if exceeding && self.config.discard_exceeding {
            self.discards.record(Discard::ExceedingLimit);
            return Ok(0);
        }
        let combinations = if exceeding {
            group.sample(limit, rng)
        } else {
            group.all()
        };

        let n = combinations.len();
        for occs in combinations {
            self.add_link(Link::new(occs)?)?;
        }
        Ok(n)
    }

    /// Runs [`LinkSet::create_links`] over a stream of seeds and logs the
    /// resulting counters
    pub fn extend_from_groups<R: Rng + ?Sized>(
        &mut self,
        groups: &[Vec<Occurrence>],
        rng: &mut R,
    ) -> Result<()> {
        for occs in groups {
            self.create_links(occs, rng)?;
        }
        let d = &self.discards;
        log::info!(
            "{} links from {} seeds, discarded {} (not in reference {}, only in reference {}, too many {}, too few {}, exceeding limit {})",
            self.links.len(),
            groups.len(),
            d.total(),
            d.not_in_reference,
            d.only_in_reference,
            d.too_many,
            d.too_few,
            d.exceeding
        );
        Ok(())
    }

    /// Inserts `link` with count 1 or increments its count
    pub fn add_link(&mut self, link: Link) -> Result<LinkId> {
        for occ in link.occurrences() {
            self.ids.sequence_name(occ.sequence)?;
            let gid = self.ids.genome_of_sequence(occ.sequence)?;
            if gid != occ.genome {
                return Err(GhError::unknown(format!(
                    "sequence {} belongs to genome {}, not {} as in link {}",
                    occ.sequence, gid, occ.genome, link
                )));
            }
        }
        let entry = self.links.entry(link);
        let id = entry.index();
        *entry.or_insert(0) += 1;
        Ok(id)
    }

    /// Times `link` was derived, 0 if absent
    pub fn count(&self, link: &Link) -> usize {
        self.links.get(link).copied().unwrap_or(0)
    }

    pub fn link(&self, id: LinkId) -> &Link {
        self.links
            .get_index(id)
            .map(|(link, _)| link)
            .expect("LinkId from this set")
    }

    pub fn count_of(&self, id: LinkId) -> usize {
        self.links.get_index(id).map_or(0, |(_, &c)| c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Link, usize)> {
        self.links.iter().map(|(link, &c)| (link, c))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn discards(&self) -> &DiscardCounts {
        &self.discards
    }

    pub fn num_discarded_kmers(&self) -> usize {
        self.discards.total()
    }

    pub fn genome_count(&self) -> usize {
        self.ids.genome_count()
    }

    pub fn ids(&self) -> &'a IdMapping {
        self.ids
    }

    pub fn config(&self) -> &'a GhConfig {
        self.config
    }
}
