//! Identifier mapping between genome / sequence names and integer IDs.
//!
//! The reference genome is the first genome registered and always gets ID 0.
//! Sequence IDs are global across genomes. After seed extraction the mapping
//! is only read, the link and cube code never registers new names.

use crate::libs::error::{GhError, Result};
use fxhash::FxHashMap;
use indexmap::IndexMap;

/// Sequence ID to sequence length
pub type SequenceLengths = FxHashMap<u32, u64>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IdMapping {
    genomes: IndexMap<String, u8>,
    // indexed by sequence ID
    sequences: Vec<(u8, String)>,
    sequence_ids: FxHashMap<(u8, String), u32>,
}

impl IdMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mapping with `reference` as genome 0
    pub fn with_reference(reference: &str) -> Result<Self> {
        let mut map = Self::new();
        map.query_genome_id(reference)?;
        Ok(map)
    }

    /// Returns the ID of `genome`, registering it when new
    pub fn query_genome_id(&mut self, genome: &str) -> Result<u8> {
        if let Some(&id) = self.genomes.get(genome) {
            return Ok(id);
        }
        if self.genomes.len() > u8::MAX as usize {
            return Err(GhError::unknown(format!(
                "too many genomes, cannot register {}",
                genome
            )));
        }
        let id = self.genomes.len() as u8;
        self.genomes.insert(genome.to_string(), id);
        Ok(id)
    }

    /// Returns the ID of `sequence` in `genome`, registering both when new
    pub fn query_sequence_id(&mut self, sequence: &str, genome: &str) -> Result<u32> {
        let gid = self.query_genome_id(genome)?;
        let key = (gid, sequence.to_string());
        if let Some(&sid) = self.sequence_ids.get(&key) {
            return Ok(sid);
        }
        let sid = self.sequences.len() as u32;
        self.sequences.push(key.clone());
        self.sequence_ids.insert(key, sid);
        Ok(sid)
    }

    pub fn genome_id(&self, genome: &str) -> Result<u8> {
        self.genomes
            .get(genome)
            .copied()
            .ok_or_else(|| GhError::unknown(format!("genome {}", genome)))
    }

    pub fn sequence_id(&self, sequence: &str, genome: &str) -> Result<u32> {
        let gid = self.genome_id(genome)?;
        self.sequence_ids
            .get(&(gid, sequence.to_string()))
            .copied()
            .ok_or_else(|| GhError::unknown(format!("sequence {} in genome {}", sequence, genome)))
    }

    pub fn genome_count(&self) -> usize {
        self.genomes.len()
    }

    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn genome_name(&self, id: u8) -> Result<&str> {
        self.genomes
            .get_index(id as usize)
            .map(|(name, _)| name.as_str())
            .ok_or_else(|| GhError::unknown(format!("genome ID {}", id)))
    }

    pub fn sequence_name(&self, id: u32) -> Result<&str> {
        self.sequences
            .get(id as usize)
            .map(|(_, name)| name.as_str())
            .ok_or_else(|| GhError::unknown(format!("sequence ID {}", id)))
    }

    pub fn genome_of_sequence(&self, id: u32) -> Result<u8> {
        self.sequences
            .get(id as usize)
            .map(|(gid, _)| *gid)
            .ok_or_else(|| GhError::unknown(format!("sequence ID {}", id)))
    }
}

/// Sums the sequence lengths of each genome, indexed by genome ID
pub fn genome_length_sums(ids: &IdMapping, lengths: &SequenceLengths) -> Result<Vec<u64>> {
    let mut sums = vec![0u64; ids.genome_count()];
    for (&sid, &len) in lengths {
        let gid = ids.genome_of_sequence(sid)?;
        sums[gid as usize] += len;
    }
    Ok(sums)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_mapping() {
        let mut map = IdMapping::with_reference("human").unwrap();
        assert_eq!(map.query_genome_id("mouse").unwrap(), 1);
        assert_eq!(map.query_genome_id("human").unwrap(), 0);

        let s0 = map.query_sequence_id("chr1", "human").unwrap();
        let s1 = map.query_sequence_id("chr1", "mouse").unwrap();
        let s2 = map.query_sequence_id("chr2", "human").unwrap();
        assert_eq!((s0, s1, s2), (0, 1, 2));
        assert_eq!(map.query_sequence_id("chr1", "mouse").unwrap(), 1);

        assert_eq!(map.genome_count(), 2);
        assert_eq!(map.sequence_count(), 3);
        assert_eq!(map.sequence_name(1).unwrap(), "chr1");
        assert_eq!(map.genome_of_sequence(1).unwrap(), 1);
        assert_eq!(map.genome_name(1).unwrap(), "mouse");
        assert_eq!(map.sequence_id("chr2", "human").unwrap(), 2);

        assert!(map.sequence_name(3).is_err());
        assert!(map.genome_of_sequence(7).is_err());
        assert!(map.genome_id("rat").is_err());
    }

    #[test]
    fn test_genome_length_sums() {
        let mut map = IdMapping::with_reference("a").unwrap();
        let a1 = map.query_sequence_id("1", "a").unwrap();
        let a2 = map.query_sequence_id("2", "a").unwrap();
        let b1 = map.query_sequence_id("1", "b").unwrap();

        let mut lengths = SequenceLengths::default();
        lengths.insert(a1, 100);
        lengths.insert(a2, 50);
        lengths.insert(b1, 70);

        assert_eq!(genome_length_sums(&map, &lengths).unwrap(), vec![150, 70]);
    }
}
