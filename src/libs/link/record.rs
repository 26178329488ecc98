use crate::libs::error::{GhError, Result};
use crate::libs::occurrence::Occurrence;
use std::cmp::Ordering;
use std::fmt;

/// A multi-genome tuple of occurrences of the same seed.
///
/// Occurrences are kept sorted by genome and each genome appears at most
/// once. Equality and hashing look at genome, sequence, position and strand
/// of every slot. The derived `Ord` is the lexicographic order of the
/// occurrence vector; [`Link::shared_cmp`] gives the genome-aware order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    occurrences: Vec<Occurrence>,
}

impl Link {
    /// Hard cap on occurrences, one per possible genome ID
    pub const MAX_OCCURRENCES: usize = u8::MAX as usize + 1;

    /// Creates a link, sorting `occurrences` by genome when needed
    pub fn new(mut occurrences: Vec<Occurrence>) -> Result<Self> {
        if !occurrences.windows(2).all(|w| w[0] <= w[1]) {
            occurrences.sort();
        }
        let duplicate = occurrences
            .windows(2)
            .find(|w| w[0].genome == w[1].genome)
            .map(|w| w[0].genome);
        if let Some(genome) = duplicate {
            return Err(GhError::DuplicateGenome {
                genome,
                link: Link { occurrences }.to_string(),
            });
        }
        Ok(Self { occurrences })
    }

    /// Ordered insert of one more occurrence
    pub fn insert_occurrence(&mut self, occ: Occurrence) -> Result<()> {
        if self.occurrences.iter().any(|o| o.genome == occ.genome) {
            return Err(GhError::DuplicateGenome {
                genome: occ.genome,
                link: self.to_string(),
            });
        }
        if self.occurrences.len() >= Self::MAX_OCCURRENCES {
            return Err(GhError::LinkFull {
                max: Self::MAX_OCCURRENCES,
                link: self.to_string(),
            });
        }
        let idx = self.occurrences.partition_point(|o| *o <= occ);
        self.occurrences.insert(idx, occ);
        Ok(())
    }

    /// Number of genomes in this link
    pub fn dimensionality(&self) -> usize {
        self.occurrences.len()
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    /// Panics if `i` is out of bounds, like slice indexing.
    pub fn occurrence(&self, i: usize) -> &Occurrence {
        &self.occurrences[i]
    }

    pub fn genome(&self, i: usize) -> u8 {
        self.occurrences[i].genome
    }

    pub fn sequence(&self, i: usize) -> u32 {
        self.occurrences[i].sequence
    }

    pub fn position(&self, i: usize) -> u64 {
        self.occurrences[i].position
    }

    pub fn reverse(&self, i: usize) -> bool {
        self.occurrences[i].reverse
    }

    pub fn first(&self) -> Result<&Occurrence> {
        self.get(0)
    }

    pub fn second(&self) -> Result<&Occurrence> {
        self.get(1)
    }

    fn get(&self, index: usize) -> Result<&Occurrence> {
        self.occurrences
            .get(index)
            .ok_or_else(|| GhError::MissingOccurrence {
                index,
                link: self.to_string(),
            })
    }

    /// Offsets of every occurrence to the first one
    pub fn diagonal(&self) -> Vec<i64> {
        match self.occurrences.first() {
            None => vec![],
            Some(head) => self
                .occurrences
                .iter()
                .map(|o| o.position as i64 - head.position as i64)
                .collect(),
        }
    }

    /// Chunk of the summed positions, always 0 with `chunk_size == 0`
    pub fn chunk_id(&self, chunk_size: u64) -> u64 {
        if chunk_size == 0 {
            return 0;
        }
        let sum: u64 = self.occurrences.iter().map(|o| o.position).sum();
        sum / chunk_size
    }

    /// Both links cover the same sequences and strands, slot by slot
    pub fn same_sequences(&self, other: &Link) -> bool {
        self.occurrences.len() == other.occurrences.len()
            && self
                .occurrences
                .iter()
                .zip(other.occurrences.iter())
                .all(|(a, b)| a.same_sequence(b))
    }

    /// Genome-aware comparison.
    ///
    /// Occurrences in genomes present in both links decide first, in genome
    /// order. Ties are broken by dimensionality (fewer genomes is less), then
    /// by the lowest genome that only one link has: that link is less.
    ///
    /// Over links of one genome set this agrees with `Ord`. Across
    /// different genome sets it is not transitive, so it must not be used
    /// as a sort key for mixed collections.
    pub fn shared_cmp(&self, other: &Link) -> Ordering {
        let (mut i, mut j) = (0, 0);
        let mut lowest_unshared: Option<(u8, Ordering)> = None;
        while i < self.occurrences.len() && j < other.occurrences.len() {
            let (a, b) = (&self.occurrences[i], &other.occurrences[j]);
            match a.genome.cmp(&b.genome) {
                Ordering::Equal => {
                    let ord = a.cmp(b);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    i += 1;
                    j += 1;
                }
                Ordering::Less => {
                    lowest_unshared.get_or_insert((a.genome, Ordering::Less));
                    i += 1;
                }
                Ordering::Greater => {
                    lowest_unshared.get_or_insert((b.genome, Ordering::Greater));
                    j += 1;
                }
            }
        }
        if lowest_unshared.is_none() {
            if let Some(a) = self.occurrences.get(i) {
                lowest_unshared = Some((a.genome, Ordering::Less));
            } else if let Some(b) = other.occurrences.get(j) {
                lowest_unshared = Some((b.genome, Ordering::Greater));
            }
        }

        self.dimensionality()
            .cmp(&other.dimensionality())
            .then_with(|| lowest_unshared.map_or(Ordering::Equal, |(_, ord)| ord))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, occ) in self.occurrences.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", occ)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn occ(g: u8, s: u32, p: u64) -> Occurrence {
        Occurrence::new(g, s, p, false)
    }

    #[test]
    fn test_link_new_sorts() {
        let link = Link::new(vec![occ(2, 5, 10), occ(0, 0, 3), occ(1, 2, 7)]).unwrap();
        assert_eq!(link.dimensionality(), 3);
        assert_eq!(link.genome(0), 0);
        assert_eq!(link.genome(1), 1);
        assert_eq!(link.genome(2), 2);
        assert_eq!(link.position(2), 10);
        assert_eq!(link.sequence(1), 2);
        assert!(!link.reverse(0));
        assert_eq!(link.first().unwrap(), &occ(0, 0, 3));
        assert_eq!(link.second().unwrap(), &occ(1, 2, 7));
    }

    #[test]
    fn test_link_duplicate_genome() {
        let res = Link::new(vec![occ(0, 0, 3), occ(1, 2, 7), occ(1, 3, 9)]);
        assert!(matches!(res, Err(GhError::DuplicateGenome { genome: 1, .. })));

        let mut link = Link::default();
        link.insert_occurrence(occ(1, 1, 0)).unwrap();
        link.insert_occurrence(occ(0, 0, 0)).unwrap();
        assert_eq!(link.genome(0), 0);
        assert!(matches!(
            link.insert_occurrence(occ(1, 4, 4)),
            Err(GhError::DuplicateGenome { genome: 1, .. })
        ));
    }

    #[test]
    fn test_link_full() {
        let mut link = Link::default();
        for g in 0..=u8::MAX {
            link.insert_occurrence(occ(g, g as u32, 0)).unwrap();
        }
        assert_eq!(link.dimensionality(), Link::MAX_OCCURRENCES);
        // genome IDs are exhausted, any further genome is a duplicate
        assert!(link.insert_occurrence(occ(0, 9, 9)).is_err());
    }

    #[test]
    fn test_link_missing() {
        let link = Link::new(vec![occ(0, 0, 3)]).unwrap();
        assert!(link.first().is_ok());
        assert!(matches!(
            link.second(),
            Err(GhError::MissingOccurrence { index: 1, .. })
        ));
        assert!(Link::default().first().is_err());
    }

    #[test]
    fn test_link_diagonal_chunk() {
        let link = Link::new(vec![occ(0, 0, 100), occ(1, 0, 40), occ(2, 0, 130)]).unwrap();
        assert_eq!(link.diagonal(), vec![0, -60, 30]);
        assert_eq!(link.chunk_id(0), 0);
        assert_eq!(link.chunk_id(100), 2);
        assert_eq!(link.chunk_id(1000), 0);

        let other = Link::new(vec![occ(0, 0, 5), occ(1, 0, 1), occ(2, 0, 9)]).unwrap();
        assert!(link.same_sequences(&other));
        let other = Link::new(vec![occ(0, 0, 5), occ(1, 1, 1), occ(2, 0, 9)]).unwrap();
        assert!(!link.same_sequences(&other));
    }

    #[test]
    fn test_shared_cmp() {
        let a = Link::new(vec![occ(0, 0, 1), occ(1, 0, 5)]).unwrap();
        let b = Link::new(vec![occ(0, 0, 1), occ(1, 0, 6)]).unwrap();
        let c = Link::new(vec![occ(0, 0, 1), occ(1, 0, 5), occ(2, 0, 0)]).unwrap();
        let d = Link::new(vec![occ(0, 0, 1), occ(2, 0, 0)]).unwrap();

        assert_eq!(a.shared_cmp(&b), Ordering::Less);
        assert_eq!(b.shared_cmp(&a), Ordering::Greater);
        // all shared equal, fewer genomes is less
        assert_eq!(a.shared_cmp(&c), Ordering::Less);
        assert_eq!(c.shared_cmp(&a), Ordering::Greater);
        // same dimensionality, a has the lowest unshared genome
        assert_eq!(a.shared_cmp(&d), Ordering::Less);
        assert_eq!(d.shared_cmp(&a), Ordering::Greater);
        assert_eq!(a.shared_cmp(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_ordering_totality() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let links: Vec<Link> = (0..60)
            .map(|_| {
                let occs = (0..3u8)
                    .map(|g| Occurrence::new(g, rng.gen_range(0..2), rng.gen_range(0..4), rng.gen()))
                    .collect();
                Link::new(occs).unwrap()
            })
            .collect();

        for a in &links {
            for b in &links {
                let lt = a.shared_cmp(b) == Ordering::Less;
                let gt = a.shared_cmp(b) == Ordering::Greater;
                let eq = a == b;
                assert_eq!([lt, gt, eq].iter().filter(|&&x| x).count(), 1);
                assert_eq!(a.shared_cmp(b), a.cmp(b));
                assert_eq!(a.shared_cmp(b), b.shared_cmp(a).reverse());
            }
        }
    }
}
