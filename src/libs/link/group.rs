//! Validation and combinatorial explosion of one seed's occurrences.

use crate::libs::config::GhConfig;
use crate::libs::error::{GhError, Result};
use crate::libs::occurrence::Occurrence;
use fxhash::FxHashSet;
use itertools::Itertools;
use rand::Rng;

/// Reason a seed produced no links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discard {
    NotInReference,
    OnlyInReference,
    TooMany,
    TooFew,
    ExceedingLimit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accept(OccurrenceGroup),
    Discard(Discard),
}

/// The occurrences of one seed, split by genome.
///
/// Only genomes with at least one occurrence have a factor, in genome
/// order, so the reference genome is always `factors[0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceGroup {
    factors: Vec<Vec<Occurrence>>,
}

impl OccurrenceGroup {
    /// Splits `occurrences` by genome and applies the per-genome filters.
    ///
    /// The filters count every listed occurrence. Identical occurrences
    /// collapse into one only afterwards, when the factors are built.
    pub fn classify(
        occurrences: &[Occurrence],
        genome_count: usize,
        config: &GhConfig,
    ) -> Result<Verdict> {
        let mut per_genome: Vec<Vec<Occurrence>> = vec![vec![]; genome_count];
        for occ in occurrences {
            per_genome
                .get_mut(occ.genome as usize)
                .ok_or_else(|| {
                    GhError::unknown(format!(
                        "genome ID {} in occurrence {}, only {} genomes known",
                        occ.genome, occ, genome_count
                    ))
                })?
                .push(*occ);
        }

        if per_genome.first().map_or(true, |v| v.is_empty()) {
            return Ok(Verdict::Discard(Discard::NotInReference));
        }
        if per_genome.iter().filter(|v| !v.is_empty()).count() < 2 {
            return Ok(Verdict::Discard(Discard::OnlyInReference));
        }
        for occs in &per_genome {
            let c = occs.len();
            if c > config.occ_max() {
                return Ok(Verdict::Discard(Discard::TooMany));
            }
            if c > 0 && c < config.occ_per_genome_min {
                return Ok(Verdict::Discard(Discard::TooFew));
            }
        }

        let factors = per_genome
            .into_iter()
            .filter(|v| !v.is_empty())
            .map(|v| v.into_iter().sorted().dedup().collect::<Vec<_>>())
            .collect();
        Ok(Verdict::Accept(OccurrenceGroup { factors }))
    }

    pub fn factors(&self) -> &[Vec<Occurrence>] {
        &self.factors
    }

    /// Number of possible links, `None` if it overflows `usize`
    pub fn n_possible(&self) -> Option<usize> {
        self.factors
            .iter()
            .try_fold(1usize, |acc, f| acc.checked_mul(f.len()))
    }

    /// Mixed-radix digits of combination `id`, the first genome varies fastest
    pub fn digits(&self, mut id: usize) -> Vec<usize> {
        self.factors
            .iter()
            .map(|f| {
                let d = id % f.len();
                id /= f.len();
                d
            })
            .collect()
    }

    pub fn combination(&self, digits: &[usize]) -> Vec<Occurrence> {
        self.factors
            .iter()
            .zip(digits)
            .map(|(f, &d)| f[d])
            .collect()
    }

    /// All combinations, in combination-ID order
    pub fn all(&self) -> Vec<Vec<Occurrence>> {
        match self.n_possible() {
            Some(n) => (0..n).map(|id| self.combination(&self.digits(id))).collect(),
            None => self.iter_all().collect(),
        }
    }

    /// Lazy enumeration of every combination, order unspecified
    pub fn iter_all(&self) -> impl Iterator<Item = Vec<Occurrence>> + '_ {
        self.factors
            .iter()
            .map(|f| f.iter().copied())
            .multi_cartesian_product()
    }

    /// Exactly `min(limit, n_possible)` distinct combinations.
    ///
    /// The first (all digits 0) and last (all digits maximal) combinations
    /// are always part of the sample, the rest is drawn uniformly without
    /// replacement.
    pub fn sample<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Vec<Vec<Occurrence>> {
        if limit == 0 {
            return vec![];
        }
        let first: Vec<usize> = vec![0; self.factors.len()];
        let last: Vec<usize> = self.factors.iter().map(|f| f.len() - 1).collect();

        let mut chosen: Vec<Vec<usize>> = match self.n_possible() {
            Some(n) if n <= limit => return self.all(),
            Some(n) => {
                let mut ids = vec![0];
                if limit >= 2 {
                    ids.push(n - 1);
                    ids.extend(
                        rand::seq::index::sample(rng, n - 2, limit - 2)
                            .into_iter()
                            .map(|i| i + 1),
                    );
                }
                ids.sort_unstable();
                ids.into_iter().map(|id| self.digits(id)).collect()
            }
            None => {
                let mut seen: FxHashSet<Vec<usize>> = FxHashSet::default();
                seen.insert(first.clone());
                if limit >= 2 {
                    seen.insert(last.clone());
                }
                while seen.len() < limit {
                    let digits = self
                        .factors
                        .iter()
                        .map(|f| rng.gen_range(0..f.len()))
                        .collect();
                    seen.insert(digits);
                }
                let mut v: Vec<_> = seen.into_iter().collect();
                v.sort_unstable();
                v
            }
        };
        chosen.dedup();
        debug_assert!(chosen.contains(&first));
        debug_assert!(limit < 2 || chosen.contains(&last));

        chosen.iter().map(|d| self.combination(d)).collect()
    }
}
